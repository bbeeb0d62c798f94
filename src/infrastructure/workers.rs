//! Background job execution

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::error;

/// Spawns scan executions as independent background tasks with a bound on
/// how many run concurrently.
///
/// Submission never waits: a job spawned while all permits are taken queues
/// on the semaphore inside its own task, so the HTTP caller returns as soon
/// as the job record exists. There is no cancellation; once a task acquires
/// a permit it runs to a terminal state.
pub struct JobRunner {
    semaphore: Arc<Semaphore>,
}

impl JobRunner {
    pub fn new(max_concurrent_jobs: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        }
    }

    pub fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let semaphore = self.semaphore.clone();
        tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!(error = %e, "Failed to acquire job concurrency permit");
                    return;
                }
            };
            task.await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_runner_executes_spawned_tasks() {
        let runner = JobRunner::new(2);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let counter = counter.clone();
            runner.spawn(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::timeout(Duration::from_secs(1), async {
            while counter.load(Ordering::SeqCst) < 5 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("all spawned tasks should run");
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let runner = JobRunner::new(1);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let running = running.clone();
            let peak = peak.clone();
            runner.spawn(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }
}
