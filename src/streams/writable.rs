use super::{
    error::StreamError, CountQueuingStrategy, Locked, QueuingStrategy, StreamResult, Unlocked,
    WakerSet,
};
use crate::platform::{BoxedStrategy, MaybeSend, PlatformBoxFutureStatic, PlatformFuture, SharedPtr};
use futures::{
    channel::{
        mpsc::{unbounded, UnboundedReceiver, UnboundedSender},
        oneshot,
    },
    future::{self, poll_fn},
    stream::StreamExt,
    task::AtomicWaker,
};
use parking_lot::RwLock;
use std::{
    collections::VecDeque,
    future::Future,
    marker::PhantomData,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    task::{Poll, Waker},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritableStreamState {
    Writable,
    Closed,
    Errored,
}

// ----------- Sink Trait -----------
pub trait WritableSink<T: MaybeSend + 'static>: MaybeSend + Sized + 'static {
    /// Start the sink
    fn start(
        &mut self,
        controller: &mut WritableStreamDefaultController,
    ) -> impl Future<Output = StreamResult<()>> + MaybeSend {
        let _ = controller;
        future::ready(Ok(())) // default no-op
    }

    /// Write a chunk to the sink
    fn write(
        &mut self,
        chunk: T,
        controller: &mut WritableStreamDefaultController,
    ) -> impl Future<Output = StreamResult<()>> + MaybeSend;

    /// Close the sink
    fn close(self) -> impl Future<Output = StreamResult<()>> + MaybeSend {
        future::ready(Ok(())) // default no-op
    }

    /// Abort the sink
    fn abort(
        &mut self,
        reason: Option<StreamError>,
    ) -> impl Future<Output = StreamResult<()>> + MaybeSend {
        let _ = reason;
        future::ready(Ok(())) // default no-op
    }
}

// ----------- Stream Commands -----------
enum StreamCommand<T> {
    Write {
        chunk: T,
        completion: oneshot::Sender<StreamResult<()>>,
    },
    Close {
        completion: oneshot::Sender<StreamResult<()>>,
    },
    Abort {
        reason: Option<StreamError>,
        completion: oneshot::Sender<StreamResult<()>>,
    },
    RegisterReadyWaker {
        waker: Waker,
    },
    RegisterClosedWaker {
        waker: Waker,
    },
}

enum ControllerMsg {
    Error(StreamError),
}

/// Flags published by the stream task, read synchronously by handles.
struct WritableShared {
    backpressure: AtomicBool,
    closed: AtomicBool,
    errored: AtomicBool,
    locked: AtomicBool,
    close_requested: AtomicBool,
    /// Writes submitted by a writer that the task has not accounted for yet.
    unaccounted_writes: AtomicUsize,
    queue_total_size: AtomicUsize,
    high_water_mark: usize,
    stored_error: RwLock<Option<StreamError>>,
}

impl WritableShared {
    fn new(high_water_mark: usize) -> Self {
        Self {
            backpressure: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            errored: AtomicBool::new(false),
            locked: AtomicBool::new(false),
            close_requested: AtomicBool::new(false),
            unaccounted_writes: AtomicUsize::new(0),
            queue_total_size: AtomicUsize::new(0),
            high_water_mark,
            stored_error: RwLock::new(None),
        }
    }

    fn state(&self) -> WritableStreamState {
        if self.errored.load(Ordering::SeqCst) {
            WritableStreamState::Errored
        } else if self.closed.load(Ordering::SeqCst) {
            WritableStreamState::Closed
        } else {
            WritableStreamState::Writable
        }
    }

    fn stored_error(&self) -> StreamError {
        self.stored_error
            .read()
            .clone()
            .unwrap_or_else(|| "Stream is errored".into())
    }

    fn closed_outcome(&self) -> Option<StreamResult<()>> {
        match self.state() {
            WritableStreamState::Errored => Some(Err(self.stored_error())),
            WritableStreamState::Closed => Some(Ok(())),
            WritableStreamState::Writable => None,
        }
    }

    fn ready_outcome(&self) -> Option<StreamResult<()>> {
        match self.state() {
            WritableStreamState::Errored => Some(Err(self.stored_error())),
            WritableStreamState::Closed => Some(Err(StreamError::Closed)),
            WritableStreamState::Writable
                if self.close_requested.load(Ordering::SeqCst) =>
            {
                Some(Err(StreamError::Closing))
            }
            WritableStreamState::Writable => {
                let settled = self.unaccounted_writes.load(Ordering::SeqCst) == 0
                    && !self.backpressure.load(Ordering::SeqCst);
                settled.then_some(Ok(()))
            }
        }
    }
}

type WriteFuture<Sink> = PlatformBoxFutureStatic<(Sink, StreamResult<()>)>;

enum Settled<Sink> {
    Write(Sink, StreamResult<()>),
    Close(StreamResult<()>),
    Abort(StreamResult<()>),
}

enum InFlight<Sink> {
    Write {
        fut: WriteFuture<Sink>,
        size: usize,
        completion: oneshot::Sender<StreamResult<()>>,
    },
    Close {
        fut: PlatformBoxFutureStatic<StreamResult<()>>,
    },
    Abort {
        fut: PlatformBoxFutureStatic<StreamResult<()>>,
    },
}

struct PendingWrite<T> {
    chunk: T,
    completion: oneshot::Sender<StreamResult<()>>,
}

struct WritableStreamInner<T, Sink> {
    state: WritableStreamState,
    queue: VecDeque<PendingWrite<T>>,
    /// Includes the size of the write in flight until it settles.
    queue_total_size: usize,
    strategy: BoxedStrategy<T>,
    sink: Option<Sink>,
    close_requested: bool,
    close_completions: Vec<oneshot::Sender<StreamResult<()>>>,
    pending_abort: Option<Option<StreamError>>,
    abort_completions: Vec<oneshot::Sender<StreamResult<()>>>,
    ready_wakers: WakerSet,
    closed_wakers: WakerSet,
    shared: SharedPtr<WritableShared>,
}

impl<T: MaybeSend + 'static, Sink> WritableStreamInner<T, Sink> {
    fn new(sink: Sink, strategy: BoxedStrategy<T>, shared: SharedPtr<WritableShared>) -> Self {
        Self {
            state: WritableStreamState::Writable,
            queue: VecDeque::new(),
            queue_total_size: 0,
            strategy,
            sink: Some(sink),
            close_requested: false,
            close_completions: Vec::new(),
            pending_abort: None,
            abort_completions: Vec::new(),
            ready_wakers: WakerSet::new(),
            closed_wakers: WakerSet::new(),
            shared,
        }
    }

    fn update_flags(&self) {
        let backpressure = self.state == WritableStreamState::Writable
            && self.queue_total_size >= self.strategy.high_water_mark();
        self.shared.backpressure.store(backpressure, Ordering::SeqCst);
        self.shared
            .queue_total_size
            .store(self.queue_total_size, Ordering::SeqCst);
        self.shared
            .closed
            .store(self.state == WritableStreamState::Closed, Ordering::SeqCst);
        self.shared
            .errored
            .store(self.state == WritableStreamState::Errored, Ordering::SeqCst);

        if !backpressure {
            self.ready_wakers.wake_all();
        }
        if self.state != WritableStreamState::Writable {
            self.closed_wakers.wake_all();
        }
    }

    fn error(&mut self, error: StreamError) {
        if self.state != WritableStreamState::Writable {
            return;
        }
        tracing::debug!(%error, "writable stream errored");
        self.state = WritableStreamState::Errored;
        *self.shared.stored_error.write() = Some(error.clone());
        for pending in self.queue.drain(..) {
            let _ = pending.completion.send(Err(error.clone()));
        }
        for completion in self.close_completions.drain(..) {
            let _ = completion.send(Err(error.clone()));
        }
        self.queue_total_size = 0;
        self.close_requested = false;
        self.shared.close_requested.store(false, Ordering::SeqCst);
        self.update_flags();
    }

    fn handle_controller_msg(&mut self, msg: ControllerMsg) {
        match msg {
            ControllerMsg::Error(error) => self.error(error),
        }
    }

    fn handle_command(&mut self, cmd: StreamCommand<T>, controller: &WritableStreamDefaultController) {
        match cmd {
            StreamCommand::Write { chunk, completion } => {
                self.shared.unaccounted_writes.fetch_sub(1, Ordering::SeqCst);
                let rejection = match self.state {
                    WritableStreamState::Errored => Some(self.shared.stored_error()),
                    WritableStreamState::Closed => Some(StreamError::Closed),
                    WritableStreamState::Writable if self.close_requested => {
                        Some(StreamError::Closing)
                    }
                    WritableStreamState::Writable => None,
                };
                match rejection {
                    Some(error) => {
                        let _ = completion.send(Err(error));
                    }
                    None => {
                        self.queue_total_size += self.strategy.size(&chunk);
                        self.queue.push_back(PendingWrite { chunk, completion });
                    }
                }
                self.update_flags();
            }
            StreamCommand::Close { completion } => match self.state {
                WritableStreamState::Errored => {
                    let _ = completion.send(Err(self.shared.stored_error()));
                }
                WritableStreamState::Closed => {
                    let _ = completion.send(Ok(()));
                }
                WritableStreamState::Writable => {
                    self.close_requested = true;
                    self.shared.close_requested.store(true, Ordering::SeqCst);
                    self.close_completions.push(completion);
                    self.update_flags();
                }
            },
            StreamCommand::Abort { reason, completion } => match self.state {
                WritableStreamState::Writable => {
                    let stored = reason.clone().unwrap_or(StreamError::Aborted(None));
                    self.error(stored);
                    controller.request_abort();
                    self.pending_abort = Some(reason);
                    self.abort_completions.push(completion);
                }
                _ if !self.abort_completions.is_empty() => self.abort_completions.push(completion),
                _ => {
                    let _ = completion.send(Ok(()));
                }
            },
            StreamCommand::RegisterReadyWaker { waker } => {
                self.ready_wakers.register(&waker);
                if !self.shared.backpressure.load(Ordering::SeqCst) {
                    self.ready_wakers.wake_all();
                }
            }
            StreamCommand::RegisterClosedWaker { waker } => {
                self.closed_wakers.register(&waker);
                if self.state != WritableStreamState::Writable {
                    self.closed_wakers.wake_all();
                }
            }
        }
    }

    fn finish_abort(&mut self, result: StreamResult<()>) {
        for completion in self.abort_completions.drain(..) {
            let _ = completion.send(result.clone());
        }
    }
}

// ----------- Main WritableStream with Typestate -----------
pub struct WritableStream<T: MaybeSend + 'static, Sink, LockState = Unlocked> {
    command_tx: UnboundedSender<StreamCommand<T>>,
    shared: SharedPtr<WritableShared>,
    _phantom: PhantomData<fn() -> (T, Sink, LockState)>,
}

impl<T: MaybeSend + 'static, Sink, LockState> WritableStream<T, Sink, LockState> {
    pub fn locked(&self) -> bool {
        self.shared.locked.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> WritableStreamState {
        self.shared.state()
    }

    pub fn stored_error(&self) -> Option<StreamError> {
        match self.state() {
            WritableStreamState::Errored => Some(self.shared.stored_error()),
            _ => None,
        }
    }

    /// True once a close has been requested and not yet completed.
    pub fn close_queued_or_in_flight(&self) -> bool {
        self.state() == WritableStreamState::Writable
            && self.shared.close_requested.load(Ordering::SeqCst)
    }

    pub fn desired_size(&self) -> Option<isize> {
        match self.state() {
            WritableStreamState::Writable => Some(
                self.shared.high_water_mark as isize
                    - self.shared.queue_total_size.load(Ordering::SeqCst) as isize,
            ),
            _ => None,
        }
    }

    fn with_lock_state<L>(&self) -> WritableStream<T, Sink, L> {
        WritableStream {
            command_tx: self.command_tx.clone(),
            shared: SharedPtr::clone(&self.shared),
            _phantom: PhantomData,
        }
    }

    async fn send_abort(&self, reason: Option<StreamError>) -> StreamResult<()> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .unbounded_send(StreamCommand::Abort {
                reason,
                completion: tx,
            })
            .map_err(|_| StreamError::TaskDropped)?;
        rx.await.unwrap_or_else(|_| Err(StreamError::TaskDropped))
    }

    async fn send_close(&self) -> StreamResult<()> {
        if self.state() == WritableStreamState::Writable {
            self.shared.close_requested.store(true, Ordering::SeqCst);
        }
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .unbounded_send(StreamCommand::Close { completion: tx })
            .map_err(|_| StreamError::TaskDropped)?;
        rx.await.unwrap_or_else(|_| Err(StreamError::TaskDropped))
    }
}

impl<T: MaybeSend + 'static, Sink> WritableStream<T, Sink, Unlocked> {
    /// Aborts the stream. Refused while a writer holds the lock.
    pub async fn abort(&self, reason: Option<StreamError>) -> StreamResult<()> {
        if self.locked() {
            return Err(StreamError::Locked);
        }
        self.send_abort(reason).await
    }

    /// Closes the stream after every queued write. Refused while a writer holds the lock.
    pub async fn close(&self) -> StreamResult<()> {
        if self.locked() {
            return Err(StreamError::Locked);
        }
        self.send_close().await
    }

    pub fn get_writer(
        &self,
    ) -> StreamResult<(
        WritableStream<T, Sink, Locked>,
        WritableStreamDefaultWriter<T, Sink>,
    )> {
        if self
            .shared
            .locked
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(StreamError::Locked);
        }

        let locked = self.with_lock_state::<Locked>();
        let writer = WritableStreamDefaultWriter {
            stream: self.with_lock_state::<Locked>(),
        };
        Ok((locked, writer))
    }
}

impl<T: MaybeSend + 'static, Sink: WritableSink<T>> WritableStream<T, Sink, Unlocked> {
    fn new_inner(sink: Sink, strategy: BoxedStrategy<T>) -> (Self, impl Future<Output = ()>) {
        let (command_tx, command_rx) = unbounded();
        let (ctrl_tx, ctrl_rx) = unbounded();
        let shared = SharedPtr::new(WritableShared::new(strategy.high_water_mark()));

        let inner = WritableStreamInner::new(sink, strategy, SharedPtr::clone(&shared));
        let controller = WritableStreamDefaultController::new(ctrl_tx);
        let task_fut = writable_stream_task(command_rx, ctrl_rx, inner, controller);

        let stream = Self {
            command_tx,
            shared,
            _phantom: PhantomData,
        };

        (stream, task_fut)
    }

    /// Returns a builder for this writable stream
    pub fn builder(sink: Sink) -> WritableStreamBuilder<T, Sink> {
        WritableStreamBuilder::new(sink)
    }
}

// ----------- Default Writer -----------
pub struct WritableStreamDefaultWriter<T: MaybeSend + 'static, Sink> {
    stream: WritableStream<T, Sink, Locked>,
}

impl<T: MaybeSend + 'static, Sink> WritableStreamDefaultWriter<T, Sink> {
    pub fn state(&self) -> WritableStreamState {
        self.stream.state()
    }

    pub fn stored_error(&self) -> Option<StreamError> {
        self.stream.stored_error()
    }

    pub fn close_queued_or_in_flight(&self) -> bool {
        self.stream.close_queued_or_in_flight()
    }

    pub fn desired_size(&self) -> Option<isize> {
        self.stream.desired_size()
    }

    /// Submits a chunk immediately; the returned future resolves once the sink
    /// has processed it.
    pub fn write(&self, chunk: T) -> PlatformBoxFutureStatic<StreamResult<()>> {
        let (tx, rx) = oneshot::channel();
        self.stream
            .shared
            .unaccounted_writes
            .fetch_add(1, Ordering::SeqCst);
        let submitted = self
            .stream
            .command_tx
            .unbounded_send(StreamCommand::Write {
                chunk,
                completion: tx,
            })
            .map_err(|_| {
                self.stream
                    .shared
                    .unaccounted_writes
                    .fetch_sub(1, Ordering::SeqCst);
                StreamError::TaskDropped
            });

        Box::pin(async move {
            submitted?;
            rx.await.unwrap_or_else(|_| Err(StreamError::TaskDropped))
        })
    }

    pub async fn close(&self) -> StreamResult<()> {
        self.stream.send_close().await
    }

    /// Closes unless a close is already underway or done; reports the stored
    /// error if the stream is errored.
    pub async fn close_with_error_propagation(&self) -> StreamResult<()> {
        match self.state() {
            WritableStreamState::Closed => Ok(()),
            WritableStreamState::Errored => Err(self.stream.shared.stored_error()),
            WritableStreamState::Writable if self.close_queued_or_in_flight() => Ok(()),
            WritableStreamState::Writable => self.close().await,
        }
    }

    pub async fn abort(&self, reason: Option<StreamError>) -> StreamResult<()> {
        self.stream.send_abort(reason).await
    }

    /// Resolves when the stream can accept more writes without exceeding its
    /// high water mark.
    pub async fn ready(&self) -> StreamResult<()> {
        poll_fn(|cx| {
            if let Some(outcome) = self.stream.shared.ready_outcome() {
                return Poll::Ready(outcome);
            }
            if self
                .stream
                .command_tx
                .unbounded_send(StreamCommand::RegisterReadyWaker {
                    waker: cx.waker().clone(),
                })
                .is_err()
            {
                return Poll::Ready(Err(StreamError::TaskDropped));
            }
            match self.stream.shared.ready_outcome() {
                Some(outcome) => Poll::Ready(outcome),
                None => Poll::Pending,
            }
        })
        .await
    }

    pub async fn closed(&self) -> StreamResult<()> {
        poll_fn(|cx| {
            if let Some(outcome) = self.stream.shared.closed_outcome() {
                return Poll::Ready(outcome);
            }
            if self
                .stream
                .command_tx
                .unbounded_send(StreamCommand::RegisterClosedWaker {
                    waker: cx.waker().clone(),
                })
                .is_err()
            {
                return Poll::Ready(Err(StreamError::TaskDropped));
            }
            match self.stream.shared.closed_outcome() {
                Some(outcome) => Poll::Ready(outcome),
                None => Poll::Pending,
            }
        })
        .await
    }

    pub fn release_lock(self) -> WritableStream<T, Sink, Unlocked> {
        self.stream.shared.locked.store(false, Ordering::SeqCst);
        self.stream.with_lock_state::<Unlocked>()
    }
}

impl<T: MaybeSend + 'static, Sink> Drop for WritableStreamDefaultWriter<T, Sink> {
    fn drop(&mut self) {
        self.stream.shared.locked.store(false, Ordering::SeqCst);
    }
}

// ----------- Stream Task Implementation -----------
async fn writable_stream_task<T, Sink>(
    mut command_rx: UnboundedReceiver<StreamCommand<T>>,
    mut ctrl_rx: UnboundedReceiver<ControllerMsg>,
    mut inner: WritableStreamInner<T, Sink>,
    mut controller: WritableStreamDefaultController,
) where
    T: MaybeSend + 'static,
    Sink: WritableSink<T>,
{
    if let Some(mut sink) = inner.sink.take() {
        match sink.start(&mut controller).await {
            Ok(()) => inner.sink = Some(sink),
            Err(error) => inner.error(error),
        }
    }

    let mut inflight: Option<InFlight<Sink>> = None;
    let mut commands_closed = false;

    poll_fn(|cx| loop {
        let mut progressed = false;

        while let Poll::Ready(Some(msg)) = ctrl_rx.poll_next_unpin(cx) {
            inner.handle_controller_msg(msg);
        }

        while !commands_closed {
            match command_rx.poll_next_unpin(cx) {
                Poll::Ready(Some(cmd)) => inner.handle_command(cmd, &controller),
                Poll::Ready(None) => commands_closed = true,
                Poll::Pending => break,
            }
        }

        let settled = match inflight.as_mut() {
            Some(InFlight::Write { fut, .. }) => match fut.as_mut().poll(cx) {
                Poll::Ready((sink, result)) => Some(Settled::Write(sink, result)),
                Poll::Pending => None,
            },
            Some(InFlight::Close { fut }) => match fut.as_mut().poll(cx) {
                Poll::Ready(result) => Some(Settled::Close(result)),
                Poll::Pending => None,
            },
            Some(InFlight::Abort { fut }) => match fut.as_mut().poll(cx) {
                Poll::Ready(result) => Some(Settled::Abort(result)),
                Poll::Pending => None,
            },
            None => None,
        };

        if let Some(settled) = settled {
            let finished = inflight.take();
            match (settled, finished) {
                (Settled::Write(sink, result), Some(InFlight::Write { size, completion, .. })) => {
                    inner.sink = Some(sink);
                    inner.queue_total_size = inner.queue_total_size.saturating_sub(size);
                    match result {
                        Ok(()) => {
                            let _ = completion.send(Ok(()));
                            inner.update_flags();
                        }
                        Err(error) => {
                            let _ = completion.send(Err(error.clone()));
                            inner.error(error);
                        }
                    }
                }
                (Settled::Close(Ok(())), _) => {
                    if inner.state == WritableStreamState::Writable {
                        inner.state = WritableStreamState::Closed;
                    }
                    inner.close_requested = false;
                    inner.shared.close_requested.store(false, Ordering::SeqCst);
                    for completion in inner.close_completions.drain(..) {
                        let _ = completion.send(Ok(()));
                    }
                    inner.update_flags();
                }
                (Settled::Close(Err(error)), _) => inner.error(error),
                (Settled::Abort(result), _) => inner.finish_abort(result),
                (Settled::Write(..), _) => {}
            }
            progressed = true;
        }

        if inflight.is_none() {
            if inner.pending_abort.is_some() {
                let reason = inner.pending_abort.take().flatten();
                match inner.sink.take() {
                    Some(mut sink) => {
                        inflight = Some(InFlight::Abort {
                            fut: Box::pin(async move { sink.abort(reason).await }),
                        });
                    }
                    None => inner.finish_abort(Ok(())),
                }
                progressed = true;
            } else if inner.state == WritableStreamState::Writable {
                if let Some(PendingWrite { chunk, completion }) = inner.queue.pop_front() {
                    if let Some(mut sink) = inner.sink.take() {
                        let size = inner.strategy.size(&chunk);
                        let mut controller = controller.clone();
                        inflight = Some(InFlight::Write {
                            fut: Box::pin(async move {
                                let result = sink.write(chunk, &mut controller).await;
                                (sink, result)
                            }),
                            size,
                            completion,
                        });
                        progressed = true;
                    }
                } else if inner.close_requested {
                    if let Some(sink) = inner.sink.take() {
                        inflight = Some(InFlight::Close {
                            fut: Box::pin(async move { sink.close().await }),
                        });
                        progressed = true;
                    }
                }
            }
        }

        if !progressed {
            if commands_closed && inflight.is_none() && inner.queue.is_empty() {
                return Poll::Ready(());
            }
            return Poll::Pending;
        }
    })
    .await;
}

// ----------- Controller -----------
#[derive(Clone)]
pub struct WritableStreamDefaultController {
    tx: UnboundedSender<ControllerMsg>,
    abort_requested: SharedPtr<AtomicBool>,
    abort_waker: SharedPtr<AtomicWaker>,
}

impl WritableStreamDefaultController {
    fn new(sender: UnboundedSender<ControllerMsg>) -> Self {
        Self {
            tx: sender,
            abort_requested: SharedPtr::new(AtomicBool::new(false)),
            abort_waker: SharedPtr::new(AtomicWaker::new()),
        }
    }

    /// Signal an error on the stream
    pub fn error(&self, error: StreamError) {
        // ignore send failure if receiver is dropped
        let _ = self.tx.unbounded_send(ControllerMsg::Error(error));
    }

    /// Returns `true` if the stream has been aborted.
    pub fn is_aborted(&self) -> bool {
        self.abort_requested.load(Ordering::SeqCst)
    }

    fn request_abort(&self) {
        self.abort_requested.store(true, Ordering::SeqCst);
        self.abort_waker.wake();
    }

    /// Resolves once the stream is aborted.
    ///
    /// Sinks with long-running writes can race their work against this future
    /// to stop promptly; the abort itself still waits for the write to return.
    pub fn abort_future(&self) -> impl Future<Output = ()> {
        let waker = self.abort_waker.clone();
        let flag = self.abort_requested.clone();
        poll_fn(move |cx| {
            if flag.load(Ordering::SeqCst) {
                Poll::Ready(())
            } else {
                waker.register(cx.waker());
                if flag.load(Ordering::SeqCst) {
                    Poll::Ready(())
                } else {
                    Poll::Pending
                }
            }
        })
    }
}

// ----------- Builder Pattern Implementation -----------
pub struct WritableStreamBuilder<T: MaybeSend + 'static, Sink> {
    sink: Sink,
    strategy: BoxedStrategy<T>,
}

impl<T: MaybeSend + 'static, Sink: WritableSink<T>> WritableStreamBuilder<T, Sink> {
    fn new(sink: Sink) -> Self {
        Self {
            sink,
            strategy: Box::new(CountQueuingStrategy::new(1)),
        }
    }

    pub fn strategy<S: QueuingStrategy<T> + MaybeSend + 'static>(mut self, s: S) -> Self {
        self.strategy = Box::new(s);
        self
    }

    /// Return stream + future without spawning
    pub fn prepare(self) -> (WritableStream<T, Sink, Unlocked>, impl Future<Output = ()>) {
        WritableStream::new_inner(self.sink, self.strategy)
    }

    /// Spawn the stream task with an owned spawner function
    pub fn spawn<F, R>(self, spawn_fn: F) -> WritableStream<T, Sink, Unlocked>
    where
        F: FnOnce(PlatformFuture<'static, ()>) -> R,
    {
        let (stream, fut) = self.prepare();
        spawn_fn(Box::pin(fut));
        stream
    }
}
