//! Delivery of "transition started" notifications.
//!
//! A caller that overrides the pending transition may register a
//! [`StartedCallback`]. At most one callback is outstanding at a time: a newer
//! override posts the previous callback before recording its own, so a
//! superseded caller is never left waiting.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

/// One-shot notification handle supplied by an override caller.
#[derive(Clone)]
pub struct StartedCallback {
    id: u64,
    notify: Arc<dyn Fn() + Send + Sync>,
}

impl StartedCallback {
    pub fn new(notify: impl Fn() + Send + Sync + 'static) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self {
            id: COUNTER.fetch_add(1, Ordering::Relaxed),
            notify: Arc::new(notify),
        }
    }

    /// Unique id for diagnostics.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Invoke the notification. Called by the delivery side, not the core.
    pub fn notify(&self) {
        (self.notify)();
    }
}

impl fmt::Debug for StartedCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartedCallback").field("id", &self.id).finish_non_exhaustive()
    }
}

impl PartialEq for StartedCallback {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Hands a callback to an asynchronous delivery mechanism.
///
/// Fire-and-forget: implementations must not block.
pub trait CallbackPoster: Send {
    fn post(&self, callback: StartedCallback);
}

impl CallbackPoster for Sender<StartedCallback> {
    fn post(&self, callback: StartedCallback) {
        let id = callback.id();
        if self.send(callback).is_err() {
            tracing::debug!(callback = id, "callback receiver gone, dropping notification");
        }
    }
}

/// Invokes callbacks synchronously on the posting thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlinePoster;

impl CallbackPoster for InlinePoster {
    fn post(&self, callback: StartedCallback) {
        callback.notify();
    }
}

/// Holds the single outstanding callback and posts it when superseded.
pub struct CallbackDispatcher {
    poster: Box<dyn CallbackPoster>,
    pending: Option<StartedCallback>,
}

impl CallbackDispatcher {
    pub fn new(poster: impl CallbackPoster + 'static) -> Self {
        Self {
            poster: Box::new(poster),
            pending: None,
        }
    }

    /// The callback waiting to be posted, if any.
    pub fn pending(&self) -> Option<&StartedCallback> {
        self.pending.as_ref()
    }

    /// Post the outstanding callback, if any, and clear it.
    pub fn flush(&mut self) {
        if let Some(callback) = self.pending.take() {
            tracing::debug!(callback = callback.id(), "posting transition started callback");
            self.poster.post(callback);
        }
    }

    /// Post any outstanding callback, then record `next` in its place.
    pub fn replace(&mut self, next: Option<StartedCallback>) {
        self.flush();
        self.pending = next;
    }
}

impl fmt::Debug for CallbackDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackDispatcher")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
