use common::config::AppConfig;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

pub struct Queue {
    max_concurrent: usize,
    running: usize,
    waiting: VecDeque<Arc<Notify>>,
}

impl Queue {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent,
            running: 0,
            waiting: VecDeque::new(),
        }
    }

    /// Called when a build begins. Acquires a slot immediately or returns
    /// the notifier to wait on.
    pub fn try_acquire_slot(&mut self) -> Option<Arc<Notify>> {
        if self.running < self.max_concurrent {
            self.running += 1;
            None
        } else {
            let notify = Arc::new(Notify::new());
            self.waiting.push_back(notify.clone());
            Some(notify)
        }
    }

    /// Called when a build completes. Hands the freed slot to the oldest
    /// waiter, if any.
    pub fn release_slot(&mut self) {
        self.running = self.running.saturating_sub(1);

        if let Some(waiting_task) = self.waiting.pop_front() {
            self.running += 1;
            waiting_task.notify_one();
        }
    }
}

/// Bounds the number of grading builds in flight across the process.
///
/// Clones share the same queue, so every caller holding a clone competes
/// for the same slots.
pub struct RunQueue {
    queue: Arc<Mutex<Queue>>,
}

impl Clone for RunQueue {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl RunQueue {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Queue::new(max_concurrent))),
        }
    }

    /// Builds a queue sized by the configured build concurrency limit.
    pub fn from_config() -> Self {
        Self::new(AppConfig::global().max_concurrent_builds)
    }

    /// Runs `job` once a slot is free, releasing the slot when it finishes.
    pub async fn run<F, T>(&self, job: F) -> T
    where
        F: Future<Output = T>,
    {
        let maybe_notify = {
            let mut queue = self.queue.lock().await;
            queue.try_acquire_slot()
        };

        // Wait for a freed slot outside the mutex.
        if let Some(notify) = maybe_notify {
            notify.notified().await;
        }

        let result = job.await;

        {
            let mut queue = self.queue.lock().await;
            queue.release_slot();
        }

        result
    }
}
