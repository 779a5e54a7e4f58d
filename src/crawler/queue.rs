//! Frontier queue of URLs waiting to be fetched
//!
//! Only the coordinator's control loop touches the queue, so it carries no
//! synchronization of its own.

use std::collections::VecDeque;
use url::Url;

/// Default sizing hint for a fresh frontier
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// FIFO frontier; first-in, first-out order approximates a breadth-first crawl
#[derive(Debug)]
pub struct FrontierQueue {
    queue: VecDeque<Url>,
}

impl FrontierQueue {
    /// Creates an empty queue with room for `capacity` URLs before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, url: Url) {
        self.queue.push_back(url);
    }

    /// Removes and returns the head of the queue, or `None` when empty
    pub fn pop(&mut self) -> Option<Url> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for FrontierQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}
