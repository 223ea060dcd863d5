//! Per-call cancellation and deadline.
//!
//! Every service operation runs its store call under a [`CallContext`]. If the
//! caller cancels the token or the deadline passes first, the store future is
//! dropped (which aborts the in-flight query and returns its pooled
//! connection) and the operation fails with [`CoreError::Canceled`].

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::store::StoreError;

#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never canceled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context bound to an existing cancellation token.
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Set a deadline `timeout` from now.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `op` to completion unless the context is canceled or expires.
    ///
    /// `what` names the operation in the cancellation message.
    pub async fn run<T, F>(&self, what: &str, op: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let expired = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                tracing::debug!(operation = what, "Store call canceled by caller");
                Err(CoreError::Canceled(format!("{what} was canceled")))
            }
            () = expired => {
                tracing::warn!(operation = what, "Store call exceeded its deadline");
                Err(CoreError::Canceled(format!("{what} exceeded its deadline")))
            }
            result = op => result.map_err(CoreError::from),
        }
    }
}
