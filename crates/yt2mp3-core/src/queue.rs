//! Shared work queue for batch downloads

use std::collections::VecDeque;
use std::sync::Mutex;

/// One URL waiting to be downloaded. Immutable once enqueued; owned by the
/// queue until claimed by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub url: String,
}

impl Job {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// FIFO of unclaimed jobs, shared by every pool worker.
///
/// `claim` pops under the lock, so a job is delivered to at most one worker
/// and none is skipped while the queue is non-empty. This is the only piece
/// of shared mutable state in the whole batch path. Constructed explicitly
/// and handed to the pool at spawn time; there is no ambient queue.
#[derive(Debug, Default)]
pub struct WorkQueue {
    jobs: Mutex<VecDeque<Job>>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_urls<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            jobs: Mutex::new(urls.into_iter().map(Job::new).collect()),
        }
    }

    pub fn push(&self, job: Job) {
        self.jobs.lock().unwrap().push_back(job);
    }

    /// Atomically take the next job. `None` means the queue is drained and
    /// the calling worker should exit.
    pub fn claim(&self) -> Option<Job> {
        self.jobs.lock().unwrap().pop_front()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
