//! Handle to a value that is fetched while the page is already streaming.

use std::future::Future;

use tokio::task::JoinHandle;

/// A value that resolves at most once, after the handle was created.
///
/// The producing future runs on its own tokio task so it makes progress
/// while the handler renders and flushes the rest of the page. Resolving
/// yields `None` when the producer gave up on the value or the task died.
///
/// Dropping an unresolved handle aborts the task, so a client that
/// disconnects mid-stream does not leave a Shopify request running.
pub struct Deferred<T> {
    handle: JoinHandle<Option<T>>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Start producing the value in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Option<T>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }
}

impl<T> Deferred<T> {
    /// Whether awaiting [`resolve`](Self::resolve) would complete immediately.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the value.
    ///
    /// A producer that panicked or was cancelled resolves to `None`.
    pub async fn resolve(mut self) -> Option<T> {
        // Awaited by reference so an abandoned `resolve` still aborts via Drop
        (&mut self.handle).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Deferred task did not complete");
            None
        })
    }
}

impl<T> Drop for Deferred<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl<T> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn test_resolves_spawned_value() {
        let deferred = Deferred::spawn(async { Some(42) });
        assert_eq!(deferred.resolve().await, Some(42));
    }

    #[tokio::test]
    async fn test_resolves_producer_none() {
        let deferred: Deferred<u32> = Deferred::spawn(async { None });
        assert_eq!(deferred.resolve().await, None);
    }

    #[tokio::test]
    async fn test_does_not_block_creator() {
        let (tx, rx) = oneshot::channel::<u32>();
        let deferred = Deferred::spawn(async move { rx.await.ok() });

        // The creator keeps going while the producer waits
        assert!(!deferred.is_resolved());
        tx.send(7).unwrap();

        assert_eq!(deferred.resolve().await, Some(7));
    }

    #[tokio::test]
    async fn test_drop_aborts_producer() {
        let (tx, rx) = oneshot::channel::<()>();
        let deferred: Deferred<()> = Deferred::spawn(async move {
            let _tx = tx;
            std::future::pending::<()>().await;
            None
        });

        drop(deferred);

        // The sender is dropped with the aborted task
        let result = tokio::time::timeout(Duration::from_secs(1), rx).await.unwrap();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_panicking_producer_resolves_to_none() {
        let deferred: Deferred<u32> = Deferred::spawn(async { panic!("producer failed") });
        assert_eq!(deferred.resolve().await, None);
    }
}
