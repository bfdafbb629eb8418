//! Background dispatch - run work off the interactive task and post the result.
//!
//! Nothing here cancels in-flight work. If the consumer has gone away the
//! result is simply dropped.

use crate::error::{LingoError, Result};
use std::future::Future;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

/// Run `work` on the runtime and hand its result to `callback`
pub fn dispatch<T, F, C>(work: F, callback: C) -> JoinHandle<()>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
    C: FnOnce(Result<T>) + Send + 'static,
{
    tokio::spawn(async move {
        let result = work.await;
        callback(result);
    })
}

/// Async result slot: filled once by a background task
pub struct ResultSlot<T> {
    rx: oneshot::Receiver<Result<T>>,
    taken: bool,
}

impl<T: Send + 'static> ResultSlot<T> {
    pub fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            if tx.send(work.await).is_err() {
                debug!("Result slot dropped before the work finished");
            }
        });
        Self { rx, taken: false }
    }

    /// Non-blocking poll; `None` while the work is still running or after the result was taken
    pub fn try_take(&mut self) -> Option<Result<T>> {
        if self.taken {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.taken = true;
                Some(result)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.taken = true;
                Some(Err(LingoError::Cancelled))
            }
        }
    }

    /// Wait for the result
    pub async fn wait(self) -> Result<T> {
        if self.taken {
            return Err(LingoError::Cancelled);
        }
        self.rx.await.unwrap_or(Err(LingoError::Cancelled))
    }
}
