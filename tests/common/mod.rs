#![allow(dead_code)]

use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use streams_pipe::{
    ReadableSource, ReadableStreamDefaultController, StreamError, StreamResult, WritableSink,
    WritableStreamDefaultController,
};
use tokio::sync::Notify;

pub async fn local_test<F, Fut>(f: F)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    let local = tokio::task::LocalSet::new();
    local.run_until(f()).await;
}

/// Shared record of everything a [`RecordingSink`] was asked to do.
#[derive(Clone, Default)]
pub struct SinkLog {
    pub written: Arc<Mutex<Vec<u32>>>,
    pub closed: Arc<AtomicBool>,
    pub abort_reason: Arc<Mutex<Option<String>>>,
    pub aborted: Arc<AtomicBool>,
    pub controller: Arc<Mutex<Option<WritableStreamDefaultController>>>,
}

impl SinkLog {
    pub fn written(&self) -> Vec<u32> {
        self.written.lock().unwrap().clone()
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    pub fn abort_reason(&self) -> Option<String> {
        self.abort_reason.lock().unwrap().clone()
    }

    /// The controller handed to the sink at start.
    pub fn controller(&self) -> WritableStreamDefaultController {
        self.controller.lock().unwrap().clone().unwrap()
    }
}

pub struct RecordingSink {
    pub log: SinkLog,
    /// When set, every write waits for a permit.
    pub gate: Option<Arc<Notify>>,
    /// Writes of this chunk fail.
    pub fail_on: Option<u32>,
    /// Abort runs but reports a failure.
    pub fail_abort: bool,
}

impl RecordingSink {
    pub fn new(log: SinkLog) -> Self {
        Self {
            log,
            gate: None,
            fail_on: None,
            fail_abort: false,
        }
    }
}

impl WritableSink<u32> for RecordingSink {
    async fn start(&mut self, controller: &mut WritableStreamDefaultController) -> StreamResult<()> {
        *self.log.controller.lock().unwrap() = Some(controller.clone());
        Ok(())
    }

    async fn write(
        &mut self,
        chunk: u32,
        _controller: &mut WritableStreamDefaultController,
    ) -> StreamResult<()> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_on == Some(chunk) {
            return Err(format!("write of {chunk} failed").into());
        }
        self.log.written.lock().unwrap().push(chunk);
        Ok(())
    }

    async fn close(self) -> StreamResult<()> {
        self.log.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn abort(&mut self, reason: Option<StreamError>) -> StreamResult<()> {
        self.log.aborted.store(true, Ordering::SeqCst);
        *self.log.abort_reason.lock().unwrap() = reason.map(|r| r.to_string());
        if self.fail_abort {
            return Err("abort failed".into());
        }
        Ok(())
    }
}

/// Shared record of a [`ScriptedSource`].
#[derive(Clone, Default)]
pub struct SourceLog {
    pub pulls: Arc<AtomicUsize>,
    pub cancel_reason: Arc<Mutex<Option<String>>>,
    pub canceled: Arc<AtomicBool>,
    pub controller: Arc<Mutex<Option<ReadableStreamDefaultController<u32>>>>,
}

impl SourceLog {
    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    pub fn was_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    pub fn cancel_reason(&self) -> Option<String> {
        self.cancel_reason.lock().unwrap().clone()
    }

    /// The controller handed to the source at start.
    pub fn controller(&self) -> ReadableStreamDefaultController<u32> {
        self.controller.lock().unwrap().clone().unwrap()
    }
}

/// What a [`ScriptedSource`] does on each pull once its chunks run out.
#[derive(Clone)]
pub enum Ending {
    Close,
    Error(String),
    /// Never produce anything more.
    Hang,
}

pub struct ScriptedSource {
    pub chunks: std::vec::IntoIter<u32>,
    pub ending: Ending,
    pub log: SourceLog,
    /// Cancel runs but reports a failure.
    pub fail_cancel: bool,
}

impl ScriptedSource {
    pub fn new(chunks: Vec<u32>, ending: Ending, log: SourceLog) -> Self {
        Self {
            chunks: chunks.into_iter(),
            ending,
            log,
            fail_cancel: false,
        }
    }
}

impl ReadableSource<u32> for ScriptedSource {
    async fn start(
        &mut self,
        controller: &mut ReadableStreamDefaultController<u32>,
    ) -> StreamResult<()> {
        *self.log.controller.lock().unwrap() = Some(controller.clone());
        Ok(())
    }

    async fn pull(
        &mut self,
        controller: &mut ReadableStreamDefaultController<u32>,
    ) -> StreamResult<()> {
        self.log.pulls.fetch_add(1, Ordering::SeqCst);
        if let Some(chunk) = self.chunks.next() {
            return controller.enqueue(chunk);
        }
        match &self.ending {
            Ending::Close => controller.close(),
            Ending::Error(message) => Err(message.as_str().into()),
            Ending::Hang => {
                futures::future::pending::<()>().await;
                Ok(())
            }
        }
    }

    async fn cancel(&mut self, reason: Option<StreamError>) -> StreamResult<()> {
        self.log.canceled.store(true, Ordering::SeqCst);
        *self.log.cancel_reason.lock().unwrap() = reason.map(|r| r.to_string());
        if self.fail_cancel {
            return Err("cancel failed".into());
        }
        Ok(())
    }
}
