//! Pipe engine.
//!
//! Moves chunks from a [`ReadableStream`] into a [`WritableStream`] while
//! respecting the destination's backpressure. Five triggers can end a pipe:
//! the abort signal, the source erroring, the destination erroring, the source
//! closing and the destination closing. Each maps to a shutdown request, and
//! only the first request to arrive is honored.

use super::{
    abort::{AbortListener, AbortSignal},
    error::StreamError,
    readable::{ReadableStream, ReadableStreamDefaultReader, ReadableStreamState},
    writable::{WritableStream, WritableStreamDefaultWriter, WritableStreamState},
    StreamResult,
};
use crate::platform::{MaybeSend, PlatformBoxFutureStatic};
use futures::{
    future::{self, poll_fn, FutureExt, Shared},
    pin_mut, select_biased,
    task::AtomicWaker,
};
use parking_lot::Mutex;
use std::{
    future::Future,
    sync::atomic::{AtomicBool, Ordering},
    task::Poll,
};

/// Options controlling how a pipe propagates closure, errors and cancellation.
#[derive(Debug, Clone, Default)]
pub struct StreamPipeOptions {
    /// Leave the destination open when the source closes.
    pub prevent_close: bool,
    /// Do not abort the destination when the source errors or the pipe is aborted.
    pub prevent_abort: bool,
    /// Do not cancel the source when the destination errors, closes or the pipe is aborted.
    pub prevent_cancel: bool,
    /// Aborts the pipe when fired.
    pub signal: Option<AbortSignal>,
}

impl StreamPipeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prevent_close(mut self, prevent_close: bool) -> Self {
        self.prevent_close = prevent_close;
        self
    }

    pub fn with_prevent_abort(mut self, prevent_abort: bool) -> Self {
        self.prevent_abort = prevent_abort;
        self
    }

    pub fn with_prevent_cancel(mut self, prevent_cancel: bool) -> Self {
        self.prevent_cancel = prevent_cancel;
        self
    }

    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// Pipes `source` into `destination`.
///
/// Fails with [`StreamError::Locked`] and touches neither stream if either one
/// is already locked. Otherwise both streams stay locked until the pipe
/// settles, and are released before the returned future resolves:
///
/// * source closes: the destination is closed unless `prevent_close`, and the
///   pipe resolves `Ok` (or with the close error).
/// * source errors: the destination is aborted with that error unless
///   `prevent_abort`, and the pipe fails with it.
/// * destination errors: the source is cancelled with that error unless
///   `prevent_cancel`, and the pipe fails with it.
/// * destination closing or closed: the source is cancelled with
///   [`StreamError::DestinationClosed`] unless `prevent_cancel`, and the pipe
///   fails with that error.
/// * signal fired: the destination is aborted and the source cancelled
///   (subject to the matching options), and the pipe fails with the reason.
///
/// Writes already handed to the destination are allowed to finish before the
/// destination is closed or aborted. If a shutdown action itself fails, that
/// error becomes the pipe's outcome.
///
/// Dropping the returned future stops the pipe and releases both locks.
pub async fn pipe<T, Source, Sink>(
    source: &ReadableStream<T, Source>,
    destination: &WritableStream<T, Sink>,
    options: StreamPipeOptions,
) -> StreamResult<()>
where
    T: MaybeSend + 'static,
{
    if source.locked() || destination.locked() {
        tracing::debug!(
            source_locked = source.locked(),
            destination_locked = destination.locked(),
            "pipe refused: stream already locked"
        );
        return Err(StreamError::Locked);
    }

    let (_, reader) = source.get_reader()?;
    // a failure here drops the reader, which releases the source again
    let (_, writer) = destination.get_writer()?;

    PipeOperation::new(reader, writer, options).run().await
}

// ----------- Lifecycle Observation -----------

/// What the pipe needs to observe about either end.
trait StreamLifecycle {
    fn is_closed(&self) -> bool;
    fn is_errored(&self) -> bool;
    fn error(&self) -> StreamError;
    fn closed(&self) -> impl Future<Output = StreamResult<()>> + MaybeSend + '_;
}

impl<T: MaybeSend + 'static, Source> StreamLifecycle for ReadableStreamDefaultReader<T, Source> {
    fn is_closed(&self) -> bool {
        self.state() == ReadableStreamState::Closed
    }

    fn is_errored(&self) -> bool {
        self.state() == ReadableStreamState::Errored
    }

    fn error(&self) -> StreamError {
        self.stored_error().unwrap_or_else(|| "Stream is errored".into())
    }

    fn closed(&self) -> impl Future<Output = StreamResult<()>> + MaybeSend + '_ {
        ReadableStreamDefaultReader::closed(self)
    }
}

impl<T: MaybeSend + 'static, Sink> StreamLifecycle for WritableStreamDefaultWriter<T, Sink> {
    fn is_closed(&self) -> bool {
        self.state() == WritableStreamState::Closed
    }

    fn is_errored(&self) -> bool {
        self.state() == WritableStreamState::Errored
    }

    fn error(&self) -> StreamError {
        self.stored_error().unwrap_or_else(|| "Stream is errored".into())
    }

    fn closed(&self) -> impl Future<Output = StreamResult<()>> + MaybeSend + '_ {
        WritableStreamDefaultWriter::closed(self)
    }
}

/// Resolves with the stored error once `stream` is errored; never resolves if it closes.
async fn is_or_becomes_errored<S: StreamLifecycle>(stream: &S) -> StreamError {
    if stream.is_errored() {
        return stream.error();
    }
    match stream.closed().await {
        Err(error) => error,
        Ok(()) => future::pending().await,
    }
}

/// Resolves once `stream` is closed; never resolves if it errors.
async fn is_or_becomes_closed<S: StreamLifecycle>(stream: &S) {
    if stream.is_closed() {
        return;
    }
    if stream.closed().await.is_err() {
        future::pending::<()>().await;
    }
}

// ----------- Shutdown -----------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Aborted,
    SourceErrored,
    DestinationErrored,
    SourceClosed,
    DestinationClosed,
}

impl Trigger {
    fn from_source(self) -> bool {
        matches!(self, Trigger::SourceErrored | Trigger::SourceClosed)
    }
}

enum ShutdownAction {
    AbortDestination(StreamError),
    CancelSource(StreamError),
    CloseDestination,
    /// Both sub-actions run concurrently; each only if its stream is still live.
    AbortAndCancel {
        abort: bool,
        cancel: bool,
        reason: StreamError,
    },
}

struct ShutdownRequest {
    trigger: Trigger,
    action: Option<ShutdownAction>,
    /// The pipe outcome unless the action fails.
    outcome: StreamResult<()>,
}

/// The most recently issued write, tagged so a newer write can be told apart.
#[derive(Default)]
struct CurrentWrite {
    generation: u64,
    write: Option<Shared<PlatformBoxFutureStatic<()>>>,
}

struct PipeOperation<T: MaybeSend + 'static, Source, Sink> {
    reader: ReadableStreamDefaultReader<T, Source>,
    writer: WritableStreamDefaultWriter<T, Sink>,
    prevent_close: bool,
    prevent_abort: bool,
    prevent_cancel: bool,
    listener: Option<AbortListener>,
    shutting_down: AtomicBool,
    /// Set while the transfer loop holds a read that has not been written yet.
    reading: AtomicBool,
    read_settled: AtomicWaker,
    current_write: Mutex<CurrentWrite>,
}

impl<T: MaybeSend + 'static, Source, Sink> PipeOperation<T, Source, Sink> {
    fn new(
        reader: ReadableStreamDefaultReader<T, Source>,
        writer: WritableStreamDefaultWriter<T, Sink>,
        options: StreamPipeOptions,
    ) -> Self {
        Self {
            reader,
            writer,
            prevent_close: options.prevent_close,
            prevent_abort: options.prevent_abort,
            prevent_cancel: options.prevent_cancel,
            listener: options.signal.as_ref().map(AbortSignal::subscribe),
            shutting_down: AtomicBool::new(false),
            reading: AtomicBool::new(false),
            read_settled: AtomicWaker::new(),
            current_write: Mutex::new(CurrentWrite::default()),
        }
    }

    async fn run(self) -> StreamResult<()> {
        tracing::debug!(
            prevent_close = self.prevent_close,
            prevent_abort = self.prevent_abort,
            prevent_cancel = self.prevent_cancel,
            has_signal = self.listener.is_some(),
            "pipe started"
        );

        // Conditions that already hold are honored before any chunk moves.
        let immediate = self
            .watch_triggers()
            .now_or_never()
            .or_else(|| self.destination_closing());

        let outcome = match immediate {
            Some(request) => self.shutdown_once(request).await,
            None => self.pump().await,
        };
        self.finalize(outcome)
    }

    /// Runs the transfer loop until a trigger fires and its shutdown completes.
    async fn pump(&self) -> StreamResult<()> {
        let transfer = self.transfer_loop().fuse();
        let shutdown = async {
            let request = self.watch_triggers().await;
            // A chunk the reader already handed out precedes the close or error
            // that followed it, so it is written before shutdown begins.
            if request.trigger.from_source() {
                self.wait_for_read_to_settle().await;
            }
            self.shutdown_once(request).await
        }
        .fuse();
        pin_mut!(transfer, shutdown);

        loop {
            select_biased! {
                () = transfer => tracing::trace!("transfer loop finished"),
                outcome = shutdown => return outcome,
            }
        }
    }

    async fn transfer_loop(&self) {
        while !self.is_shutting_down() {
            if self.writer.ready().await.is_err() {
                return;
            }
            if self.is_shutting_down() {
                return;
            }
            self.reading.store(true, Ordering::SeqCst);
            // Errors and end of stream are picked up by the trigger watchers.
            let written = match self.reader.read().await {
                Ok(Some(chunk)) if !self.is_shutting_down() => {
                    self.record_write(self.writer.write(chunk));
                    true
                }
                _ => false,
            };
            self.reading.store(false, Ordering::SeqCst);
            self.read_settled.wake();
            if !written {
                return;
            }
        }
    }

    /// Resolves once the transfer loop is not holding an unwritten read.
    ///
    /// A read started after the source closed or errored yields no chunk, so
    /// only a read already outstanding when the trigger fired is waited for.
    async fn wait_for_read_to_settle(&self) {
        poll_fn(|cx| {
            if !self.reading.load(Ordering::SeqCst) {
                return Poll::Ready(());
            }
            self.read_settled.register(cx.waker());
            if self.reading.load(Ordering::SeqCst) {
                Poll::Pending
            } else {
                Poll::Ready(())
            }
        })
        .await
    }

    /// A failed write is not reported here; it errors the destination, which
    /// the destination watcher turns into a shutdown.
    fn record_write(&self, write: PlatformBoxFutureStatic<StreamResult<()>>) {
        let write: PlatformBoxFutureStatic<()> = Box::pin(write.map(|_| ()));
        let mut current = self.current_write.lock();
        current.generation += 1;
        current.write = Some(write.shared());
        tracing::trace!(generation = current.generation, "chunk written to destination");
    }

    async fn wait_for_writes_to_finish(&self) {
        loop {
            let (generation, write) = {
                let current = self.current_write.lock();
                (current.generation, current.write.clone())
            };
            if let Some(write) = write {
                write.await;
            }
            let unchanged = self.current_write.lock().generation == generation;
            if unchanged {
                return;
            }
        }
    }

    fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Waits for the first trigger. Polled in the order the triggers are checked.
    async fn watch_triggers(&self) -> ShutdownRequest {
        let aborted = async {
            match &self.listener {
                Some(listener) => listener.fired().await,
                None => future::pending().await,
            }
        }
        .fuse();
        let source_errored = is_or_becomes_errored(&self.reader).fuse();
        let destination_errored = is_or_becomes_errored(&self.writer).fuse();
        let source_closed = is_or_becomes_closed(&self.reader).fuse();
        pin_mut!(aborted, source_errored, destination_errored, source_closed);

        select_biased! {
            reason = aborted => self.on_aborted(reason),
            error = source_errored => self.on_source_errored(error),
            error = destination_errored => self.on_destination_errored(error),
            () = source_closed => self.on_source_closed(),
        }
    }

    /// Closing the destination is only checked at setup; afterwards the pipe
    /// holds the writer, so nobody else can start a close.
    fn destination_closing(&self) -> Option<ShutdownRequest> {
        (self.writer.close_queued_or_in_flight()
            || self.writer.state() == WritableStreamState::Closed)
            .then(|| self.on_destination_closed())
    }

    fn on_aborted(&self, reason: StreamError) -> ShutdownRequest {
        let abort = !self.prevent_abort;
        let cancel = !self.prevent_cancel;
        ShutdownRequest {
            trigger: Trigger::Aborted,
            action: (abort || cancel).then(|| ShutdownAction::AbortAndCancel {
                abort,
                cancel,
                reason: reason.clone(),
            }),
            outcome: Err(reason),
        }
    }

    fn on_source_errored(&self, error: StreamError) -> ShutdownRequest {
        ShutdownRequest {
            trigger: Trigger::SourceErrored,
            action: (!self.prevent_abort).then(|| ShutdownAction::AbortDestination(error.clone())),
            outcome: Err(error),
        }
    }

    fn on_destination_errored(&self, error: StreamError) -> ShutdownRequest {
        ShutdownRequest {
            trigger: Trigger::DestinationErrored,
            action: (!self.prevent_cancel).then(|| ShutdownAction::CancelSource(error.clone())),
            outcome: Err(error),
        }
    }

    fn on_source_closed(&self) -> ShutdownRequest {
        ShutdownRequest {
            trigger: Trigger::SourceClosed,
            action: (!self.prevent_close).then_some(ShutdownAction::CloseDestination),
            outcome: Ok(()),
        }
    }

    fn on_destination_closed(&self) -> ShutdownRequest {
        let error = StreamError::DestinationClosed;
        ShutdownRequest {
            trigger: Trigger::DestinationClosed,
            action: (!self.prevent_cancel).then(|| ShutdownAction::CancelSource(error.clone())),
            outcome: Err(error),
        }
    }

    async fn shutdown_once(&self, request: ShutdownRequest) -> StreamResult<()> {
        match self.shutdown(request).await {
            Some(outcome) => outcome,
            None => unreachable!("pipe shutdown requested twice"),
        }
    }

    /// Begins shutdown unless it has already begun, in which case `None` is
    /// returned and nothing happens.
    async fn shutdown(&self, request: ShutdownRequest) -> Option<StreamResult<()>> {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            tracing::trace!(trigger = ?request.trigger, "pipe already shutting down");
            return None;
        }
        tracing::debug!(trigger = ?request.trigger, "pipe shutting down");

        if self.writer.state() == WritableStreamState::Writable
            && !self.writer.close_queued_or_in_flight()
        {
            self.wait_for_writes_to_finish().await;
        }

        let ShutdownRequest {
            action, outcome, ..
        } = request;
        let Some(action) = action else {
            return Some(outcome);
        };
        match self.perform(action).await {
            Ok(()) => Some(outcome),
            Err(error) => {
                tracing::warn!(%error, "pipe shutdown action failed");
                Some(Err(error))
            }
        }
    }

    async fn perform(&self, action: ShutdownAction) -> StreamResult<()> {
        match action {
            ShutdownAction::AbortDestination(error) => self.writer.abort(Some(error)).await,
            ShutdownAction::CancelSource(error) => self.reader.cancel(Some(error)).await,
            ShutdownAction::CloseDestination => self.writer.close_with_error_propagation().await,
            ShutdownAction::AbortAndCancel {
                abort,
                cancel,
                reason,
            } => {
                let abort_destination = async {
                    if abort && self.writer.state() == WritableStreamState::Writable {
                        self.writer.abort(Some(reason.clone())).await
                    } else {
                        Ok(())
                    }
                };
                let cancel_source = async {
                    if cancel && self.reader.state() == ReadableStreamState::Readable {
                        self.reader.cancel(Some(reason.clone())).await
                    } else {
                        Ok(())
                    }
                };
                let (aborted, cancelled) = future::join(abort_destination, cancel_source).await;
                aborted.and(cancelled)
            }
        }
    }

    /// Releases the writer, then the reader, then detaches from the signal.
    fn finalize(self, outcome: StreamResult<()>) -> StreamResult<()> {
        let PipeOperation {
            reader,
            writer,
            listener,
            ..
        } = self;
        writer.release_lock();
        reader.release_lock();
        tracing::trace!("pipe released reader and writer locks");
        if let Some(listener) = listener {
            listener.detach();
        }

        match &outcome {
            Ok(()) => tracing::debug!("pipe finished"),
            Err(error) => tracing::debug!(%error, "pipe failed"),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streams::{
        test_util::local_test, CountQueuingStrategy, ReadableSource, ReadableStreamDefaultController,
        WritableSink, WritableStreamDefaultController,
    };
    use crate::platform::SharedPtr;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tracing_test::traced_test;

    #[derive(Clone, Default)]
    struct RecordingSink {
        written: SharedPtr<StdMutex<Vec<u32>>>,
        closed: SharedPtr<AtomicBool>,
        gate: Option<SharedPtr<Notify>>,
    }

    impl WritableSink<u32> for RecordingSink {
        async fn write(
            &mut self,
            chunk: u32,
            _controller: &mut WritableStreamDefaultController,
        ) -> StreamResult<()> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.written.lock().unwrap().push(chunk);
            Ok(())
        }

        async fn close(self) -> StreamResult<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct NeverSource;

    impl ReadableSource<u32> for NeverSource {
        async fn pull(
            &mut self,
            _controller: &mut ReadableStreamDefaultController<u32>,
        ) -> StreamResult<()> {
            future::pending::<()>().await;
            Ok(())
        }
    }

    fn operation(
        sink: RecordingSink,
    ) -> (
        PipeOperation<u32, NeverSource, RecordingSink>,
        ReadableStream<u32, NeverSource>,
        WritableStream<u32, RecordingSink>,
    ) {
        let source = ReadableStream::builder(NeverSource).spawn(tokio::task::spawn_local);
        let destination = WritableStream::builder(sink).spawn(tokio::task::spawn_local);
        let (_, reader) = source.get_reader().unwrap();
        let (_, writer) = destination.get_writer().unwrap();
        let op = PipeOperation::new(reader, writer, StreamPipeOptions::default());
        (op, source, destination)
    }

    #[tokio::test]
    async fn shutdown_runs_at_most_once() {
        local_test(|| async {
            let sink = RecordingSink::default();
            let (op, _source, destination) = operation(sink.clone());

            let first = op.shutdown(op.on_source_closed()).await;
            assert!(matches!(first, Some(Ok(()))));
            assert!(sink.closed.load(Ordering::SeqCst));

            let second = op.shutdown(op.on_destination_errored("late".into())).await;
            assert!(second.is_none());
            assert_eq!(op.reader.state(), ReadableStreamState::Readable);

            assert!(op.finalize(Ok(())).is_ok());
            assert!(!destination.locked());
        })
        .await;
    }

    #[tokio::test]
    async fn shutdown_waits_for_issued_writes() {
        local_test(|| async {
            let gate = SharedPtr::new(Notify::new());
            let sink = RecordingSink {
                gate: Some(gate.clone()),
                ..RecordingSink::default()
            };
            let (op, _source, _destination) = operation(sink.clone());

            op.record_write(op.writer.write(1));
            op.record_write(op.writer.write(2));

            let shutdown = op.shutdown(op.on_source_closed());
            pin_mut!(shutdown);
            assert!(tokio::time::timeout(Duration::from_millis(20), shutdown.as_mut())
                .await
                .is_err());
            assert!(sink.written.lock().unwrap().is_empty());

            gate.notify_one();
            tokio::time::sleep(Duration::from_millis(5)).await;
            gate.notify_one();
            assert!(matches!(shutdown.await, Some(Ok(()))));
            assert_eq!(*sink.written.lock().unwrap(), vec![1, 2]);
            assert!(sink.closed.load(Ordering::SeqCst));
        })
        .await;
    }

    #[tokio::test]
    async fn source_shutdown_waits_for_outstanding_read() {
        local_test(|| async {
            let (op, _source, _destination) = operation(RecordingSink::default());
            assert!(op.wait_for_read_to_settle().now_or_never().is_some());

            op.reading.store(true, Ordering::SeqCst);
            let settle = op.wait_for_read_to_settle();
            pin_mut!(settle);
            assert!(tokio::time::timeout(Duration::from_millis(20), settle.as_mut())
                .await
                .is_err());

            op.reading.store(false, Ordering::SeqCst);
            op.read_settled.wake();
            settle.await;
            assert!(!op.is_shutting_down());
        })
        .await;
    }

    #[tokio::test]
    async fn failed_action_replaces_outcome() {
        struct RefusingSink;

        impl WritableSink<u32> for RefusingSink {
            async fn write(
                &mut self,
                _chunk: u32,
                _controller: &mut WritableStreamDefaultController,
            ) -> StreamResult<()> {
                Ok(())
            }

            async fn close(self) -> StreamResult<()> {
                Err("close refused".into())
            }
        }

        local_test(|| async {
            let source = ReadableStream::from_vec(vec![1u32]).spawn(tokio::task::spawn_local);
            let destination = WritableStream::builder(RefusingSink).spawn(tokio::task::spawn_local);

            let err = source.pipe_to(&destination, None).await.unwrap_err();
            assert_eq!(err.to_string(), "close refused");
            assert!(!source.locked());
            assert!(!destination.locked());
        })
        .await;
    }

    #[tokio::test]
    async fn cancellation_skips_streams_that_are_no_longer_live() {
        local_test(|| async {
            let sink = RecordingSink::default();
            let (op, _source, destination) = operation(sink);

            // destination already errored: only the source is cancelled
            op.writer.abort(Some("gone".into())).await.unwrap();
            let request = op.on_aborted(StreamError::Aborted(None));
            let outcome = op.shutdown(request).await;
            assert!(matches!(outcome, Some(Err(StreamError::Aborted(None)))));
            assert_eq!(op.reader.state(), ReadableStreamState::Closed);
            assert_eq!(destination.stored_error().unwrap().to_string(), "gone");
        })
        .await;
    }

    #[tokio::test]
    async fn respects_destination_backpressure() {
        struct CountingSource {
            pulls: SharedPtr<std::sync::atomic::AtomicUsize>,
        }

        impl ReadableSource<u32> for CountingSource {
            async fn pull(
                &mut self,
                controller: &mut ReadableStreamDefaultController<u32>,
            ) -> StreamResult<()> {
                let n = self.pulls.fetch_add(1, Ordering::SeqCst);
                controller.enqueue(n as u32)
            }
        }

        local_test(|| async {
            let pulls = SharedPtr::new(std::sync::atomic::AtomicUsize::new(0));
            let gate = SharedPtr::new(Notify::new());
            let sink = RecordingSink {
                gate: Some(gate.clone()),
                ..RecordingSink::default()
            };
            let source = ReadableStream::builder(CountingSource {
                pulls: pulls.clone(),
            })
            .strategy(CountQueuingStrategy::new(0))
            .spawn(tokio::task::spawn_local);
            let destination = WritableStream::builder(sink.clone()).spawn(tokio::task::spawn_local);

            let piping =
                tokio::task::spawn_local(async move { source.pipe_to(&destination, None).await });

            tokio::time::sleep(Duration::from_millis(20)).await;
            // one chunk read and blocked in the sink; nothing else pulled
            assert_eq!(pulls.load(Ordering::SeqCst), 1);

            gate.notify_one();
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(pulls.load(Ordering::SeqCst), 2);
            assert_eq!(*sink.written.lock().unwrap(), vec![0]);

            piping.abort();
        })
        .await;
    }

    #[tokio::test]
    #[traced_test]
    async fn logs_shutdown_trigger() {
        local_test(|| async {
            let source = ReadableStream::from_vec(vec![1u32, 2]).spawn(tokio::task::spawn_local);
            let destination =
                WritableStream::builder(RecordingSink::default()).spawn(tokio::task::spawn_local);

            source.pipe_to(&destination, None).await.unwrap();
        })
        .await;

        assert!(logs_contain("pipe started"));
        assert!(logs_contain("SourceClosed"));
        assert!(logs_contain("pipe finished"));
    }
}
