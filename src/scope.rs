//! Cancellation of background requests owned by a view.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::debug;

/// Background tasks started on behalf of one view.
///
/// Results are stamped with [`generation`](Self::generation) when spawned;
/// after [`cancel`](Self::cancel) the generation moves on and stale results
/// fail [`is_current`](Self::is_current).
#[derive(Debug, Default)]
pub struct TaskScope {
    generation: u64,
    tasks: Vec<AbortHandle>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Spawn `future` on `handle` and track it. Returns the generation stamp.
    pub fn spawn<F>(&mut self, handle: &Handle, future: F) -> u64
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|task| !task.is_finished());
        let task = handle.spawn(future);
        self.tasks.push(task.abort_handle());
        self.generation
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Abort everything still running and invalidate outstanding stamps.
    pub fn cancel(&mut self) {
        let aborted = self.tasks.len();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.generation = self.generation.wrapping_add(1);
        if aborted > 0 {
            debug!("Cancelled {aborted} background task(s)");
        }
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_cancel_aborts_and_bumps_generation() {
        let mut scope = TaskScope::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let stamp = scope.spawn(&Handle::current(), async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let _ = tx.send(1);
        });
        assert!(scope.is_current(stamp));

        scope.cancel();

        // The aborted task drops its sender without sending.
        assert!(rx.await.is_err());
        assert!(!scope.is_current(stamp));
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_finished_task_result_is_current() {
        let mut scope = TaskScope::new();
        let (tx, rx) = oneshot::channel();

        let stamp = scope.spawn(&Handle::current(), async move {
            let _ = tx.send(7);
        });

        assert_eq!(rx.await.unwrap(), 7);
        assert!(scope.is_current(stamp));
    }

    #[tokio::test]
    async fn test_drop_aborts() {
        let (tx, rx) = oneshot::channel::<()>();
        {
            let mut scope = TaskScope::new();
            scope.spawn(&Handle::current(), async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                let _ = tx.send(());
            });
        }
        assert!(rx.await.is_err());
    }
}
