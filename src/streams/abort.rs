//! Cancellation token used to stop a pipe from the outside.

use super::error::StreamError;
use crate::platform::SharedPtr;
use parking_lot::RwLock;
use std::{
    fmt,
    future::Future,
    sync::atomic::{AtomicUsize, Ordering},
};
use tokio_util::sync::CancellationToken;

struct AbortState {
    token: CancellationToken,
    reason: RwLock<Option<StreamError>>,
    listeners: AtomicUsize,
}

/// Owner side of a cancellation token. Aborting is one-shot: the first reason wins.
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    pub fn new() -> Self {
        Self {
            signal: AbortSignal {
                state: SharedPtr::new(AbortState {
                    token: CancellationToken::new(),
                    reason: RwLock::new(None),
                    listeners: AtomicUsize::new(0),
                }),
            },
        }
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Fires the signal. A missing reason is recorded as `StreamError::Aborted(None)`.
    pub fn abort(&self, reason: Option<StreamError>) {
        let state = &self.signal.state;
        {
            let mut stored = state.reason.write();
            if stored.is_some() {
                return;
            }
            *stored = Some(reason.unwrap_or(StreamError::Aborted(None)));
        }
        tracing::debug!(listeners = self.signal.listener_count(), "abort signal fired");
        // the reason is stored first so every woken listener can read it
        state.token.cancel();
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation token.
#[derive(Clone)]
pub struct AbortSignal {
    state: SharedPtr<AbortState>,
}

impl AbortSignal {
    pub fn aborted(&self) -> bool {
        self.state.token.is_cancelled()
    }

    /// The abort reason, once the signal has fired.
    pub fn reason(&self) -> Option<StreamError> {
        if !self.aborted() {
            return None;
        }
        self.state.reason.read().clone()
    }

    /// Attaches a listener. It stays attached until detached or dropped.
    pub fn subscribe(&self) -> AbortListener {
        self.state.listeners.fetch_add(1, Ordering::SeqCst);
        AbortListener {
            signal: self.clone(),
        }
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.state.listeners.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.aborted())
            .field("reason", &self.reason())
            .finish()
    }
}

/// A registration on an [`AbortSignal`].
pub struct AbortListener {
    signal: AbortSignal,
}

impl AbortListener {
    /// Resolves with the abort reason once the signal fires.
    pub fn fired(&self) -> impl Future<Output = StreamError> + '_ {
        async move {
            self.signal.state.token.cancelled().await;
            self.signal
                .reason()
                .unwrap_or(StreamError::Aborted(None))
        }
    }

    pub fn detach(self) {}
}

impl Drop for AbortListener {
    fn drop(&mut self) {
        self.signal.state.listeners.fetch_sub(1, Ordering::SeqCst);
    }
}
