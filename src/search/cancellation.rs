//! Cancellation token passed from the host into providers

use crate::providers::ProviderError;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct Signal {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cancellation token with an optional deadline.
///
/// Clones share the cancel signal, so cancelling any clone aborts every
/// request running under the others.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    signal: Arc<Signal>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// Token that only fires on an explicit `cancel()`
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that also fires once `timeout` has elapsed from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            signal: Arc::default(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.signal.cancelled.store(true, Ordering::SeqCst);
        self.signal.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel()` has been called on any clone
    pub async fn cancelled(&self) {
        loop {
            let notified = self.signal.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Run `fut` until it completes, the token is cancelled, or the deadline
    /// passes. The future is dropped on the latter two.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        if self.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ProviderError::Cancelled),
            _ = deadline => Err(ProviderError::DeadlineExceeded),
            result = fut => result,
        }
    }
}
