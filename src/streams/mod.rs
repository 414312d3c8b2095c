pub mod abort;
pub mod error;
pub mod pipe;
pub mod readable;
pub mod writable;

#[cfg(test)]
mod test_util;

pub use abort::{AbortController, AbortListener, AbortSignal};
pub use error::StreamError;
pub use pipe::{pipe, StreamPipeOptions};
pub use readable::{
    AsyncStreamSource, IteratorSource, ReadableSource, ReadableStream, ReadableStreamBuilder,
    ReadableStreamDefaultController, ReadableStreamDefaultReader, ReadableStreamState,
};
pub use writable::{
    WritableSink, WritableStream, WritableStreamBuilder, WritableStreamDefaultController,
    WritableStreamDefaultWriter, WritableStreamState,
};

use crate::platform::SharedPtr;
use parking_lot::Mutex;
use std::task::Waker;

pub type StreamResult<T> = Result<T, StreamError>;

/// Type-level marker for unlocked streams
pub struct Unlocked;
/// Type-level marker for locked streams
pub struct Locked;

/// Generic queuing strategy trait
pub trait QueuingStrategy<T> {
    /// Return the size of the chunk
    fn size(&self, chunk: &T) -> usize;
    /// Return high water mark (desired max queue size)
    fn high_water_mark(&self) -> usize;
}

/// Count-based strategy
#[derive(Clone)]
pub struct CountQueuingStrategy {
    high_water_mark: usize,
}

impl CountQueuingStrategy {
    pub const fn new(high_water_mark: usize) -> Self {
        Self { high_water_mark }
    }
}

impl<T> QueuingStrategy<T> for CountQueuingStrategy {
    fn size(&self, _chunk: &T) -> usize {
        1
    }

    fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }
}

/// A set of wakers waiting on the same stream condition, deduplicated by `will_wake`.
#[derive(Clone, Default)]
pub(crate) struct WakerSet(SharedPtr<Mutex<Vec<Waker>>>);

impl WakerSet {
    pub(crate) fn new() -> Self {
        Self(SharedPtr::new(Mutex::new(Vec::new())))
    }

    pub(crate) fn register(&self, waker: &Waker) {
        let mut wakers = self.0.lock();
        if !wakers.iter().any(|w| w.will_wake(waker)) {
            wakers.push(waker.clone());
        }
    }

    /// Wake all registered wakers and clear the set.
    pub(crate) fn wake_all(&self) {
        let wakers: Vec<Waker> = self.0.lock().drain(..).collect();
        for waker in wakers {
            waker.wake();
        }
    }
}
