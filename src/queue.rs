//! A bounded blocking queue
//!
//! Elements are handed over FIFO from any number of producers to a
//! consumer. The queue holds a fixed number of elements: adding to a full
//! queue fails right away instead of blocking, so producers can never
//! deadlock on a slow consumer. Polling an empty queue can wait for an
//! element up to a given timeout.
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Longest a waiting `poll_timeout` sleeps before checking the queue again
pub const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// `add` on a full queue; hands the rejected element back
#[derive(Error, Debug, PartialEq, Eq)]
#[error("queue is full (capacity: {capacity})")]
pub struct QueueFull<T> {
    pub capacity: usize,
    pub element: T,
}

impl<T> QueueFull<T> {
    pub fn into_inner(self) -> T {
        self.element
    }
}

pub struct BlockingQueue<T> {
    capacity: usize,
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

pub type SharedBlockingQueue<T> = Arc<BlockingQueue<T>>;

impl<T> BlockingQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            available: Condvar::new(),
        }
    }

    pub fn new_shared(capacity: usize) -> SharedBlockingQueue<T> {
        Arc::new(Self::new(capacity))
    }

    pub fn add(&self, element: T) -> Result<(), QueueFull<T>> {
        let mut items = self.items.lock();
        if self.capacity <= items.len() {
            return Err(QueueFull {
                capacity: self.capacity,
                element,
            });
        }
        items.push_back(element);
        drop(items);

        self.available.notify_one();
        Ok(())
    }

    /// Take the head of the queue, if there is one
    pub fn poll(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Take the head of the queue, waiting up to `timeout` for one to arrive
    ///
    /// Returns as soon as an element is available. The wait is a real
    /// suspension: woken up by `add`, and re-checking at least every
    /// [`POLL_INTERVAL`] regardless.
    pub fn poll_timeout(&self, timeout: Duration) -> Option<T> {
        // `None` deadline: too far in the future to represent, wait until an element shows up
        let deadline = Instant::now().checked_add(timeout);
        let mut items = self.items.lock();

        loop {
            if let Some(element) = items.pop_front() {
                return Some(element);
            }

            let wait = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if deadline <= now {
                        return None;
                    }
                    (deadline - now).min(POLL_INTERVAL)
                }
                None => POLL_INTERVAL,
            };

            self.available.wait_for(&mut items, wait);
        }
    }

    pub fn clear(&self) {
        self.items.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.len())
    }
}
