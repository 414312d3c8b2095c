use super::{
    error::StreamError,
    pipe::{pipe, StreamPipeOptions},
    writable::WritableStream,
    CountQueuingStrategy, Locked, QueuingStrategy, StreamResult, Unlocked, WakerSet,
};
use crate::platform::{BoxedStrategy, MaybeSend, PlatformBoxFutureStatic, PlatformFuture, SharedPtr};
use futures::{
    channel::{
        mpsc::{unbounded, UnboundedReceiver, UnboundedSender},
        oneshot,
    },
    future::{self, poll_fn, Either},
    pin_mut,
    stream::{Stream, StreamExt},
};
use parking_lot::RwLock;
use std::{
    collections::VecDeque,
    future::Future,
    marker::PhantomData,
    sync::atomic::{AtomicBool, AtomicIsize, Ordering},
    task::{Poll, Waker},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadableStreamState {
    Readable,
    Closed,
    Errored,
}

// ----------- Source Trait -----------
pub trait ReadableSource<T: MaybeSend + 'static>: MaybeSend + 'static {
    fn start(
        &mut self,
        controller: &mut ReadableStreamDefaultController<T>,
    ) -> impl Future<Output = StreamResult<()>> + MaybeSend {
        let _ = controller;
        future::ready(Ok(()))
    }

    fn pull(
        &mut self,
        controller: &mut ReadableStreamDefaultController<T>,
    ) -> impl Future<Output = StreamResult<()>> + MaybeSend;

    fn cancel(
        &mut self,
        reason: Option<StreamError>,
    ) -> impl Future<Output = StreamResult<()>> + MaybeSend {
        let _ = reason;
        future::ready(Ok(()))
    }
}

// ----------- Stream Commands -----------
enum StreamCommand<T> {
    Read {
        completion: oneshot::Sender<StreamResult<Option<T>>>,
    },
    Cancel {
        reason: Option<StreamError>,
        completion: oneshot::Sender<StreamResult<()>>,
    },
    RegisterClosedWaker {
        waker: Waker,
    },
}

// ----------- Controller Messages -----------
enum ControllerMsg<T> {
    Enqueue(T),
    Close,
    Error(StreamError),
}

/// State published by the stream task so handles can answer queries synchronously.
struct ReadableShared {
    closed: AtomicBool,
    errored: AtomicBool,
    locked: AtomicBool,
    close_requested: AtomicBool,
    desired_size: AtomicIsize,
    stored_error: RwLock<Option<StreamError>>,
}

impl ReadableShared {
    fn new(high_water_mark: usize) -> Self {
        Self {
            closed: AtomicBool::new(false),
            errored: AtomicBool::new(false),
            locked: AtomicBool::new(false),
            close_requested: AtomicBool::new(false),
            desired_size: AtomicIsize::new(high_water_mark as isize),
            stored_error: RwLock::new(None),
        }
    }

    fn state(&self) -> ReadableStreamState {
        if self.errored.load(Ordering::SeqCst) {
            ReadableStreamState::Errored
        } else if self.closed.load(Ordering::SeqCst) {
            ReadableStreamState::Closed
        } else {
            ReadableStreamState::Readable
        }
    }

    fn stored_error(&self) -> StreamError {
        self.stored_error
            .read()
            .clone()
            .unwrap_or_else(|| "Stream is errored".into())
    }

    /// `Some` once the stream has reached a terminal state.
    fn closed_outcome(&self) -> Option<StreamResult<()>> {
        match self.state() {
            ReadableStreamState::Errored => Some(Err(self.stored_error())),
            ReadableStreamState::Closed => Some(Ok(())),
            ReadableStreamState::Readable => None,
        }
    }
}

// ----------- Controller -----------
pub struct ReadableStreamDefaultController<T: MaybeSend + 'static> {
    tx: UnboundedSender<ControllerMsg<T>>,
    shared: SharedPtr<ReadableShared>,
}

impl<T: MaybeSend + 'static> Clone for ReadableStreamDefaultController<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            shared: SharedPtr::clone(&self.shared),
        }
    }
}

impl<T: MaybeSend + 'static> ReadableStreamDefaultController<T> {
    pub fn desired_size(&self) -> Option<isize> {
        match self.shared.state() {
            ReadableStreamState::Readable => Some(self.shared.desired_size.load(Ordering::SeqCst)),
            _ => None,
        }
    }

    fn ensure_can_close_or_enqueue(&self) -> StreamResult<()> {
        match self.shared.state() {
            ReadableStreamState::Errored => Err(self.shared.stored_error()),
            ReadableStreamState::Closed => Err(StreamError::Closed),
            ReadableStreamState::Readable if self.shared.close_requested.load(Ordering::SeqCst) => {
                Err(StreamError::Closing)
            }
            ReadableStreamState::Readable => Ok(()),
        }
    }

    /// Requests a close; the stream closes once every queued chunk has been read.
    pub fn close(&self) -> StreamResult<()> {
        self.ensure_can_close_or_enqueue()?;
        self.shared.close_requested.store(true, Ordering::SeqCst);
        self.tx
            .unbounded_send(ControllerMsg::Close)
            .map_err(|_| StreamError::TaskDropped)
    }

    pub fn enqueue(&self, chunk: T) -> StreamResult<()> {
        self.ensure_can_close_or_enqueue()?;
        self.tx
            .unbounded_send(ControllerMsg::Enqueue(chunk))
            .map_err(|_| StreamError::TaskDropped)
    }

    pub fn error(&self, error: StreamError) -> StreamResult<()> {
        self.tx
            .unbounded_send(ControllerMsg::Error(error))
            .map_err(|_| StreamError::TaskDropped)
    }
}

// ----------- Inner State -----------
struct ReadableStreamInner<T, Source> {
    state: ReadableStreamState,
    queue: VecDeque<T>,
    queue_total_size: usize,
    strategy: BoxedStrategy<T>,
    source: Option<Source>,
    close_requested: bool,
    /// Set whenever something happened that may warrant another pull.
    needs_pull: bool,
    pulling: bool,
    pull_interrupt: Option<oneshot::Sender<()>>,
    pending_reads: VecDeque<oneshot::Sender<StreamResult<Option<T>>>>,
    pending_cancel: Option<Option<StreamError>>,
    cancel_completions: Vec<oneshot::Sender<StreamResult<()>>>,
    closed_wakers: WakerSet,
    shared: SharedPtr<ReadableShared>,
}

impl<T: MaybeSend + 'static, Source> ReadableStreamInner<T, Source> {
    fn new(source: Source, strategy: BoxedStrategy<T>, shared: SharedPtr<ReadableShared>) -> Self {
        Self {
            state: ReadableStreamState::Readable,
            queue: VecDeque::new(),
            queue_total_size: 0,
            strategy,
            source: Some(source),
            close_requested: false,
            needs_pull: true,
            pulling: false,
            pull_interrupt: None,
            pending_reads: VecDeque::new(),
            pending_cancel: None,
            cancel_completions: Vec::new(),
            closed_wakers: WakerSet::new(),
            shared,
        }
    }

    fn desired_size(&self) -> isize {
        self.strategy.high_water_mark() as isize - self.queue_total_size as isize
    }

    fn publish_desired_size(&self) {
        let desired = match self.state {
            ReadableStreamState::Readable => self.desired_size(),
            _ => 0,
        };
        self.shared.desired_size.store(desired, Ordering::SeqCst);
    }

    fn should_pull(&self) -> bool {
        self.state == ReadableStreamState::Readable
            && self.needs_pull
            && !self.close_requested
            && !self.pulling
            && self.pending_cancel.is_none()
            && self.source.is_some()
            && (!self.pending_reads.is_empty() || self.desired_size() > 0)
    }

    fn enqueue(&mut self, mut chunk: T) {
        if self.state != ReadableStreamState::Readable || self.close_requested {
            return;
        }
        self.needs_pull = true;
        // A reader may have given up on its read; hand the chunk to the next one.
        while let Some(completion) = self.pending_reads.pop_front() {
            match completion.send(Ok(Some(chunk))) {
                Ok(()) => return,
                Err(Ok(Some(returned))) => chunk = returned,
                Err(_) => return,
            }
        }
        self.queue_total_size += self.strategy.size(&chunk);
        self.queue.push_back(chunk);
        self.publish_desired_size();
    }

    fn request_close(&mut self) {
        if self.state != ReadableStreamState::Readable || self.close_requested {
            return;
        }
        self.close_requested = true;
        if self.queue.is_empty() {
            self.close();
        }
    }

    fn close(&mut self) {
        if self.state != ReadableStreamState::Readable {
            return;
        }
        self.state = ReadableStreamState::Closed;
        self.queue.clear();
        self.queue_total_size = 0;
        self.shared.closed.store(true, Ordering::SeqCst);
        self.publish_desired_size();
        while let Some(completion) = self.pending_reads.pop_front() {
            let _ = completion.send(Ok(None));
        }
        self.closed_wakers.wake_all();
    }

    fn error(&mut self, error: StreamError) {
        if self.state != ReadableStreamState::Readable {
            return;
        }
        self.state = ReadableStreamState::Errored;
        *self.shared.stored_error.write() = Some(error.clone());
        self.shared.errored.store(true, Ordering::SeqCst);
        self.queue.clear();
        self.queue_total_size = 0;
        self.publish_desired_size();
        while let Some(completion) = self.pending_reads.pop_front() {
            let _ = completion.send(Err(error.clone()));
        }
        self.closed_wakers.wake_all();
    }

    fn handle_controller_msg(&mut self, msg: ControllerMsg<T>) {
        match msg {
            ControllerMsg::Enqueue(chunk) => self.enqueue(chunk),
            ControllerMsg::Close => self.request_close(),
            ControllerMsg::Error(error) => self.error(error),
        }
    }

    fn handle_command(&mut self, cmd: StreamCommand<T>) {
        match cmd {
            StreamCommand::Read { completion } => match self.state {
                ReadableStreamState::Errored => {
                    let _ = completion.send(Err(self.shared.stored_error()));
                }
                ReadableStreamState::Closed => {
                    let _ = completion.send(Ok(None));
                }
                ReadableStreamState::Readable => {
                    self.needs_pull = true;
                    if let Some(chunk) = self.queue.pop_front() {
                        let size = self.strategy.size(&chunk);
                        self.queue_total_size = self.queue_total_size.saturating_sub(size);
                        let _ = completion.send(Ok(Some(chunk)));
                        if self.close_requested && self.queue.is_empty() {
                            self.close();
                        } else {
                            self.publish_desired_size();
                        }
                    } else {
                        self.pending_reads.push_back(completion);
                    }
                }
            },
            StreamCommand::Cancel { reason, completion } => match self.state {
                ReadableStreamState::Errored => {
                    let _ = completion.send(Err(self.shared.stored_error()));
                }
                ReadableStreamState::Closed if self.cancel_completions.is_empty() => {
                    let _ = completion.send(Ok(()));
                }
                ReadableStreamState::Closed => self.cancel_completions.push(completion),
                ReadableStreamState::Readable => {
                    self.close();
                    self.pending_cancel = Some(reason);
                    self.cancel_completions.push(completion);
                    if let Some(interrupt) = self.pull_interrupt.take() {
                        let _ = interrupt.send(());
                    }
                }
            },
            StreamCommand::RegisterClosedWaker { waker } => {
                self.closed_wakers.register(&waker);
                if self.state != ReadableStreamState::Readable {
                    self.closed_wakers.wake_all();
                }
            }
        }
    }

    fn finish_cancel(&mut self, result: StreamResult<()>) {
        for completion in self.cancel_completions.drain(..) {
            let _ = completion.send(result.clone());
        }
    }
}

// ----------- Main ReadableStream with Typestate -----------
pub struct ReadableStream<T: MaybeSend + 'static, Source, LockState = Unlocked> {
    command_tx: UnboundedSender<StreamCommand<T>>,
    shared: SharedPtr<ReadableShared>,
    _phantom: PhantomData<fn() -> (T, Source, LockState)>,
}

impl<T: MaybeSend + 'static, Source, LockState> ReadableStream<T, Source, LockState> {
    pub fn locked(&self) -> bool {
        self.shared.locked.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ReadableStreamState {
        self.shared.state()
    }

    /// The error the stream failed with, if it is errored.
    pub fn stored_error(&self) -> Option<StreamError> {
        match self.state() {
            ReadableStreamState::Errored => Some(self.shared.stored_error()),
            _ => None,
        }
    }

    fn with_lock_state<L>(&self) -> ReadableStream<T, Source, L> {
        ReadableStream {
            command_tx: self.command_tx.clone(),
            shared: SharedPtr::clone(&self.shared),
            _phantom: PhantomData,
        }
    }

    async fn send_cancel(&self, reason: Option<StreamError>) -> StreamResult<()> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .unbounded_send(StreamCommand::Cancel {
                reason,
                completion: tx,
            })
            .map_err(|_| StreamError::TaskDropped)?;
        rx.await.unwrap_or_else(|_| Err(StreamError::TaskDropped))
    }
}

impl<T: MaybeSend + 'static, Source> ReadableStream<T, Source, Unlocked> {
    /// Cancels the stream. Refused while a reader holds the lock.
    pub async fn cancel(&self, reason: Option<StreamError>) -> StreamResult<()> {
        if self.locked() {
            return Err(StreamError::Locked);
        }
        self.send_cancel(reason).await
    }

    pub fn get_reader(
        &self,
    ) -> StreamResult<(
        ReadableStream<T, Source, Locked>,
        ReadableStreamDefaultReader<T, Source>,
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
        let reader = ReadableStreamDefaultReader {
            stream: self.with_lock_state::<Locked>(),
        };
        Ok((locked, reader))
    }

    /// Pipes every chunk of this stream into `destination`.
    ///
    /// Both streams stay locked until the returned future settles. See [`pipe`]
    /// for how closure, errors and cancellation propagate.
    pub async fn pipe_to<Sink>(
        &self,
        destination: &WritableStream<T, Sink>,
        options: Option<StreamPipeOptions>,
    ) -> StreamResult<()> {
        pipe(self, destination, options.unwrap_or_default()).await
    }
}

// ----------- Constructor -----------
impl<T: MaybeSend + 'static, Source: ReadableSource<T>> ReadableStream<T, Source, Unlocked> {
    fn new_inner(source: Source, strategy: BoxedStrategy<T>) -> (Self, impl Future<Output = ()>) {
        let (command_tx, command_rx) = unbounded();
        let (ctrl_tx, ctrl_rx) = unbounded();
        let shared = SharedPtr::new(ReadableShared::new(strategy.high_water_mark()));

        let controller = ReadableStreamDefaultController {
            tx: ctrl_tx,
            shared: SharedPtr::clone(&shared),
        };
        let inner = ReadableStreamInner::new(source, strategy, SharedPtr::clone(&shared));
        let task_fut = readable_stream_task(command_rx, ctrl_rx, inner, controller);

        let stream = Self {
            command_tx,
            shared,
            _phantom: PhantomData,
        };

        (stream, task_fut)
    }
}

// ----------- Example Source Implementations -----------
pub struct IteratorSource<I> {
    iter: I,
}

impl<I, T: MaybeSend + 'static> ReadableSource<T> for IteratorSource<I>
where
    I: Iterator<Item = T> + MaybeSend + 'static,
{
    async fn pull(
        &mut self,
        controller: &mut ReadableStreamDefaultController<T>,
    ) -> StreamResult<()> {
        match self.iter.next() {
            Some(item) => controller.enqueue(item),
            None => controller.close(),
        }
    }
}

pub struct AsyncStreamSource<S> {
    stream: S,
}

impl<S, T: MaybeSend + 'static> ReadableSource<T> for AsyncStreamSource<S>
where
    S: Stream<Item = T> + Unpin + MaybeSend + 'static,
{
    async fn pull(
        &mut self,
        controller: &mut ReadableStreamDefaultController<T>,
    ) -> StreamResult<()> {
        match self.stream.next().await {
            Some(item) => controller.enqueue(item),
            None => controller.close(),
        }
    }
}

// ----------- Default Reader -----------
pub struct ReadableStreamDefaultReader<T: MaybeSend + 'static, Source> {
    stream: ReadableStream<T, Source, Locked>,
}

impl<T: MaybeSend + 'static, Source> ReadableStreamDefaultReader<T, Source> {
    pub fn state(&self) -> ReadableStreamState {
        self.stream.state()
    }

    pub fn stored_error(&self) -> Option<StreamError> {
        self.stream.stored_error()
    }

    /// Resolves `Ok` once the stream closes, or with the stored error once it errors.
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

    pub async fn cancel(&self, reason: Option<StreamError>) -> StreamResult<()> {
        self.stream.send_cancel(reason).await
    }

    /// `Ok(None)` signals the end of the stream.
    pub async fn read(&self) -> StreamResult<Option<T>> {
        let (tx, rx) = oneshot::channel();
        self.stream
            .command_tx
            .unbounded_send(StreamCommand::Read { completion: tx })
            .map_err(|_| StreamError::TaskDropped)?;
        rx.await.unwrap_or_else(|_| Err(StreamError::TaskDropped))
    }

    pub fn release_lock(self) -> ReadableStream<T, Source, Unlocked> {
        self.stream.shared.locked.store(false, Ordering::SeqCst);
        self.stream.with_lock_state::<Unlocked>()
    }
}

impl<T: MaybeSend + 'static, Source> Drop for ReadableStreamDefaultReader<T, Source> {
    fn drop(&mut self) {
        self.stream.shared.locked.store(false, Ordering::SeqCst);
    }
}

// ----------- Stream Task Implementation -----------
type PullFuture<Source> = PlatformBoxFutureStatic<(Source, Option<StreamResult<()>>)>;

async fn readable_stream_task<T, Source>(
    mut command_rx: UnboundedReceiver<StreamCommand<T>>,
    mut ctrl_rx: UnboundedReceiver<ControllerMsg<T>>,
    mut inner: ReadableStreamInner<T, Source>,
    mut controller: ReadableStreamDefaultController<T>,
) where
    T: MaybeSend + 'static,
    Source: ReadableSource<T>,
{
    // start() runs to completion before any command is served
    if let Some(mut source) = inner.source.take() {
        match source.start(&mut controller).await {
            Ok(()) => inner.source = Some(source),
            Err(error) => {
                tracing::debug!(%error, "readable source failed to start");
                inner.error(error);
            }
        }
    }

    let mut pull_future: Option<PullFuture<Source>> = None;
    let mut cancel_future: Option<PlatformBoxFutureStatic<StreamResult<()>>> = None;
    let mut commands_closed = false;

    poll_fn(|cx| loop {
        let mut progressed = false;

        while let Poll::Ready(Some(msg)) = ctrl_rx.poll_next_unpin(cx) {
            inner.handle_controller_msg(msg);
        }

        while !commands_closed {
            match command_rx.poll_next_unpin(cx) {
                Poll::Ready(Some(cmd)) => inner.handle_command(cmd),
                Poll::Ready(None) => commands_closed = true,
                Poll::Pending => break,
            }
        }

        if let Some(fut) = cancel_future.as_mut() {
            if let Poll::Ready(result) = fut.as_mut().poll(cx) {
                cancel_future = None;
                inner.finish_cancel(result);
                progressed = true;
            }
        }

        if let Some(fut) = pull_future.as_mut() {
            if let Poll::Ready((source, result)) = fut.as_mut().poll(cx) {
                pull_future = None;
                inner.pulling = false;
                inner.pull_interrupt = None;
                inner.source = Some(source);
                if let Some(Err(error)) = result {
                    inner.error(error);
                }
                progressed = true;
            }
        }

        if cancel_future.is_none() && !inner.pulling && inner.pending_cancel.is_some() {
            let reason = inner.pending_cancel.take().flatten();
            match inner.source.take() {
                Some(mut source) => {
                    cancel_future = Some(Box::pin(async move { source.cancel(reason).await }));
                }
                None => inner.finish_cancel(Ok(())),
            }
            progressed = true;
        }

        if pull_future.is_none() && inner.should_pull() {
            if let Some(mut source) = inner.source.take() {
                inner.pulling = true;
                inner.needs_pull = false;
                let (interrupt_tx, interrupt_rx) = oneshot::channel::<()>();
                inner.pull_interrupt = Some(interrupt_tx);
                let mut controller = controller.clone();
                pull_future = Some(Box::pin(async move {
                    // A cancel interrupts the pull so the source can be handed to cancel().
                    let result = {
                        let pull = source.pull(&mut controller);
                        pin_mut!(pull);
                        match future::select(pull, interrupt_rx).await {
                            Either::Left((result, _)) => Some(result),
                            Either::Right(_) => None,
                        }
                    };
                    (source, result)
                }));
                progressed = true;
            }
        }

        if !progressed {
            if commands_closed && pull_future.is_none() && cancel_future.is_none() {
                return Poll::Ready(());
            }
            return Poll::Pending;
        }
    })
    .await;
}

// ----------- Builder Pattern Implementation -----------
pub struct ReadableStreamBuilder<T: MaybeSend + 'static, Source> {
    source: Source,
    strategy: BoxedStrategy<T>,
}

impl<T: MaybeSend + 'static, Source: ReadableSource<T>> ReadableStreamBuilder<T, Source> {
    fn new(source: Source) -> Self {
        Self {
            source,
            strategy: Box::new(CountQueuingStrategy::new(1)),
        }
    }

    pub fn strategy<S: QueuingStrategy<T> + MaybeSend + 'static>(mut self, s: S) -> Self {
        self.strategy = Box::new(s);
        self
    }

    /// Return stream + future without spawning
    pub fn prepare(self) -> (ReadableStream<T, Source, Unlocked>, impl Future<Output = ()>) {
        ReadableStream::new_inner(self.source, self.strategy)
    }

    /// Spawn the stream task with an owned spawner function
    pub fn spawn<F, R>(self, spawn_fn: F) -> ReadableStream<T, Source, Unlocked>
    where
        F: FnOnce(PlatformFuture<'static, ()>) -> R,
    {
        let (stream, fut) = self.prepare();
        spawn_fn(Box::pin(fut));
        stream
    }
}

impl<T: MaybeSend + 'static, Source: ReadableSource<T>> ReadableStream<T, Source, Unlocked> {
    /// Returns a builder for this readable stream
    pub fn builder(source: Source) -> ReadableStreamBuilder<T, Source> {
        ReadableStreamBuilder::new(source)
    }
}

impl<T: MaybeSend + 'static> ReadableStream<T, IteratorSource<std::vec::IntoIter<T>>, Unlocked> {
    /// Create from Vec - shortcut for ReadableStreamBuilder::from_vec()
    pub fn from_vec(vec: Vec<T>) -> ReadableStreamBuilder<T, IteratorSource<std::vec::IntoIter<T>>> {
        ReadableStreamBuilder::from_vec(vec)
    }
}

impl<T: MaybeSend + 'static, I> ReadableStream<T, IteratorSource<I>, Unlocked>
where
    I: Iterator<Item = T> + MaybeSend + 'static,
{
    /// Create from Iterator - shortcut for ReadableStreamBuilder::from_iterator()
    pub fn from_iterator(iter: I) -> ReadableStreamBuilder<T, IteratorSource<I>> {
        ReadableStreamBuilder::from_iterator(iter)
    }
}

impl<T: MaybeSend + 'static, S> ReadableStream<T, AsyncStreamSource<S>, Unlocked>
where
    S: Stream<Item = T> + Unpin + MaybeSend + 'static,
{
    /// Create from Stream - shortcut for ReadableStreamBuilder::from_stream()
    pub fn from_stream(stream: S) -> ReadableStreamBuilder<T, AsyncStreamSource<S>> {
        ReadableStreamBuilder::from_stream(stream)
    }
}

impl<T: MaybeSend + 'static> ReadableStreamBuilder<T, IteratorSource<std::vec::IntoIter<T>>> {
    pub fn from_vec(vec: Vec<T>) -> Self {
        Self::new(IteratorSource {
            iter: vec.into_iter(),
        })
    }
}

impl<T: MaybeSend + 'static, I> ReadableStreamBuilder<T, IteratorSource<I>>
where
    I: Iterator<Item = T> + MaybeSend + 'static,
{
    pub fn from_iterator(iter: I) -> Self {
        Self::new(IteratorSource { iter })
    }
}

impl<T: MaybeSend + 'static, S> ReadableStreamBuilder<T, AsyncStreamSource<S>>
where
    S: Stream<Item = T> + Unpin + MaybeSend + 'static,
{
    pub fn from_stream(stream: S) -> Self {
        Self::new(AsyncStreamSource { stream })
    }
}
