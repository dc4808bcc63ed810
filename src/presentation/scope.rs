//! Per-screen task scope
//!
//! Every asynchronous request a screen starts runs inside its
//! [`ScreenScope`]. Clearing or dropping the scope aborts whatever is still
//! running, so nothing is delivered after the screen goes away.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinSet;

/// Owns the tasks spawned on behalf of one screen
pub struct ScreenScope {
    handle: Handle,
    tasks: Mutex<JoinSet<()>>,
}

impl ScreenScope {
    /// Create a scope on the current runtime
    ///
    /// Must be called from within a tokio runtime context (a task, or a
    /// thread that entered the runtime with `Runtime::enter`).
    pub fn new() -> Self {
        Self {
            handle: Handle::current(),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Run a future on behalf of the screen
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        // Reap finished tasks so the set does not grow with the session
        while tasks.try_join_next().is_some() {}
        tasks.spawn_on(future, &self.handle);
    }

    /// Abort every outstanding task
    pub fn clear(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let pending = tasks.len();
        // Dropping a JoinSet aborts everything it still owns
        drop(std::mem::take(&mut *tasks));
        if pending > 0 {
            tracing::debug!(pending, "Screen scope cleared");
        }
    }

    /// Number of tasks not yet reaped
    pub fn pending(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for ScreenScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_spawned_task_runs() {
        let scope = ScreenScope::new();
        let (tx, rx) = tokio::sync::oneshot::channel();

        scope.spawn(async move {
            let _ = tx.send(42);
        });

        assert_eq!(rx.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_clear_aborts_pending_work() {
        let scope = ScreenScope::new();
        let finished = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&finished);
        scope.spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(scope.pending(), 1);

        scope.clear();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(!finished.load(Ordering::SeqCst));
        assert_eq!(scope.pending(), 0);
    }

    #[tokio::test]
    async fn test_drop_aborts_pending_work() {
        let finished = Arc::new(AtomicBool::new(false));

        {
            let scope = ScreenScope::new();
            let flag = Arc::clone(&finished);
            scope.spawn(async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                flag.store(true, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }
}
