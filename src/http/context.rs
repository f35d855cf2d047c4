//! Request-scoped cancellation state
//!
//! A [`RequestContext`] travels with a request (in its extensions on the
//! server side, alongside the call on the client side). The request logger
//! only reads it after the work is done; it never enforces the deadline.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Why a request context ended
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("context canceled")]
    Canceled,

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Default)]
struct ContextInner {
    cause: Mutex<Option<ContextError>>,
    deadline: Option<Instant>,
    notify: Notify,
}

/// Cancellation and deadline state shared by every clone
///
/// The first terminal state wins: cancelling after the deadline has passed
/// still reports [`ContextError::DeadlineExceeded`], and a deadline passing
/// after an explicit cancel does not change the reported cause.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    inner: Arc<ContextInner>,
}

impl RequestContext {
    /// Context without a deadline
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                deadline: Some(deadline),
                ..ContextInner::default()
            }),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    pub fn cancel(&self) {
        self.cancel_with_cause(ContextError::Canceled);
    }

    /// End the context with `cause` unless it has already ended
    pub fn cancel_with_cause(&self, cause: ContextError) {
        {
            let mut slot = self.inner.cause.lock();
            if slot.is_none() {
                *slot = Some(if self.deadline_passed() {
                    ContextError::DeadlineExceeded
                } else {
                    cause
                });
            }
        }
        self.inner.notify.notify_waiters();
    }

    /// Why the context ended, or `None` while it is still live
    pub fn err(&self) -> Option<ContextError> {
        let mut slot = self.inner.cause.lock();
        if slot.is_none() && self.deadline_passed() {
            *slot = Some(ContextError::DeadlineExceeded);
        }
        slot.clone()
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Wait until the context is cancelled or its deadline passes
    pub async fn done(&self) -> ContextError {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(err) = self.err() {
                return err;
            }

            match self.inner.deadline {
                Some(deadline) => {
                    tokio::select! {
                        _ = &mut notified => {}
                        _ = tokio::time::sleep_until(deadline) => {}
                    }
                }
                None => notified.await,
            }
        }
    }

    fn deadline_passed(&self) -> bool {
        self.inner
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}
