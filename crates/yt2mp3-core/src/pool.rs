//! Fixed-size worker pool draining the shared queue

use crate::queue::{Job, WorkQueue};
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Outcome tallies for a pool run. Each worker keeps its own tally while it
/// runs; the totals are summed only after every worker has returned, so
/// nothing mutable is shared between workers besides the queue itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Spawn exactly `workers` tasks that each loop claim-then-handle until the
/// queue is empty, and wait for all of them.
///
/// No worker waits on another, there is no retry, and there is no
/// cancellation path; the run completes when the queue drains. The handler
/// returns whether its job succeeded.
pub async fn run_pool<H, Fut>(queue: Arc<WorkQueue>, workers: usize, handler: H) -> PoolSummary
where
    H: Fn(usize, Job) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    let workers = workers.max(1);
    let mut handles = Vec::with_capacity(workers);

    for worker_id in 0..workers {
        let queue = Arc::clone(&queue);
        let handler = handler.clone();
        handles.push(tokio::spawn(async move {
            let mut tally = PoolSummary::default();
            while let Some(job) = queue.claim() {
                if handler(worker_id, job).await {
                    tally.succeeded += 1;
                } else {
                    tally.failed += 1;
                }
            }
            debug!(
                "worker {} done ({} ok, {} failed)",
                worker_id, tally.succeeded, tally.failed
            );
            tally
        }));
    }

    let mut summary = PoolSummary::default();
    for joined in join_all(handles).await {
        if let Ok(tally) = joined {
            summary.succeeded += tally.succeeded;
            summary.failed += tally.failed;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_each_job_handled_exactly_once() {
        let urls: Vec<String> = (0..50).map(|i| format!("url-{}", i)).collect();
        let queue = Arc::new(WorkQueue::from_urls(urls.clone()));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handler = {
            let seen = Arc::clone(&seen);
            move |_worker: usize, job: Job| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(job.url);
                    true
                }
            }
        };

        let summary = run_pool(Arc::clone(&queue), 4, handler).await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 50);
        let distinct: HashSet<&String> = seen.iter().collect();
        assert_eq!(distinct.len(), 50);
        assert_eq!(summary.succeeded, 50);
        assert_eq!(summary.failed, 0);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_empty_queue_returns_immediately() {
        let queue = Arc::new(WorkQueue::new());
        let summary = run_pool(queue, 4, |_, _| async { true }).await;
        assert_eq!(summary, PoolSummary::default());
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_fatal() {
        let queue = Arc::new(WorkQueue::from_urls(
            (0..10).map(|i| format!("url-{}", i)).collect::<Vec<_>>(),
        ));

        // Every odd-numbered job fails; the pool still drains the queue.
        let handler = |_worker: usize, job: Job| async move {
            let n: usize = job.url.rsplit('-').next().unwrap().parse().unwrap();
            n % 2 == 0
        };

        let summary = run_pool(Arc::clone(&queue), 3, handler).await;
        assert_eq!(summary.succeeded, 5);
        assert_eq!(summary.failed, 5);
        assert!(queue.is_empty());
    }

    // Batch-shaped scenario: a text file with three distinct URLs plus a
    // duplicate and an off-platform link, drained by two workers, one
    // download failing. Everything is handled exactly once and the failure
    // stays a tally, not an abort.
    #[tokio::test]
    async fn test_extracted_batch_runs_to_completion() {
        let text = "\
            https://www.youtube.com/watch?v=aaa\n\
            https://www.youtube.com/watch?v=bbb\n\
            https://www.youtube.com/watch?v=aaa\n\
            https://vimeo.com/12345\n\
            https://youtu.be/ccc\n";
        let found = crate::urls::extract_from_text(text);
        assert_eq!(found.len(), 3);

        let queue = Arc::new(WorkQueue::from_urls(found));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handler = {
            let seen = Arc::clone(&seen);
            move |_worker: usize, job: Job| {
                let seen = Arc::clone(&seen);
                async move {
                    let failed = job.url.ends_with("bbb");
                    seen.lock().unwrap().push(job.url);
                    !failed
                }
            }
        };

        let summary = run_pool(queue, 2, handler).await;
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        let distinct: HashSet<&String> = seen.iter().collect();
        assert_eq!(distinct.len(), 3);
    }

    #[tokio::test]
    async fn test_more_workers_than_jobs() {
        let queue = Arc::new(WorkQueue::from_urls(vec!["only".to_string()]));
        let summary = run_pool(queue, 8, |_, _| async { true }).await;
        assert_eq!(summary.succeeded, 1);
    }
}
