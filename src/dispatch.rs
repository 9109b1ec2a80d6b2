//! Fire-and-forget execution with a single completion.
//!
//! An operation is spawned on the tokio runtime and the caller gets a
//! [`RequestHandle`] back immediately. The completion runs exactly once:
//! with the operation's result, or with the cancellation error if
//! [`RequestHandle::cancel`] wins the race.

use std::future::Future;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{DavError, NormalizedError};

/// Outcome of one dispatched operation, tagged with the account it ran for.
#[derive(Debug)]
pub struct Completion<T> {
    pub account: String,
    pub result: Result<T, DavError>,
}

impl<T> Completion<T> {
    pub fn normalized(&self) -> NormalizedError {
        NormalizedError::from_result(&self.result)
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Handle to an in-flight operation.
#[derive(Debug)]
pub struct RequestHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl RequestHandle {
    /// Abort the request. The completion still fires, once, with code `-999`
    /// unless the operation had already finished.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait until the completion has run.
    pub async fn wait(self) {
        if let Err(err) = self.join.await {
            debug!(error = %err, "dispatched operation did not run to completion");
        }
    }
}

/// Spawn `operation` and hand its outcome to `on_complete`.
pub fn spawn_with_callback<T, Fut, C>(account: String, operation: Fut, on_complete: C) -> RequestHandle
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, DavError>> + Send + 'static,
    C: FnOnce(Completion<T>) + Send + 'static,
{
    let token = CancellationToken::new();
    let child = token.clone();

    let join = tokio::spawn(async move {
        let result = tokio::select! {
            biased;
            _ = child.cancelled() => Err(DavError::cancelled()),
            result = operation => result,
        };
        if let Err(err) = &result {
            debug!(account = %account, code = err.code(), error = %err, "operation failed");
        }
        on_complete(Completion { account, result });
    });

    RequestHandle { token, join }
}

/// Like [`spawn_with_callback`], delivering the completion through a oneshot channel.
pub fn spawn_with_channel<T, Fut>(
    account: String,
    operation: Fut,
) -> (RequestHandle, oneshot::Receiver<Completion<T>>)
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, DavError>> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let handle = spawn_with_callback(account, operation, move |completion| {
        // Receiver dropped means nobody is listening any more.
        let _ = tx.send(completion);
    });
    (handle, rx)
}
