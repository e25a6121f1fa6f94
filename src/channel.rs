use crate::SpscQueue;
use std::sync::Arc;

/// Creates a bounded SPSC queue and splits it into its two endpoints.
///
/// This is the recommended door to [`SpscQueue`]: each side of the queue gets
/// exactly one handle, neither handle is `Clone`, and the mutating operations
/// take `&mut self`, so the single-producer/single-consumer precondition is
/// upheld by the type system instead of by caller discipline.
///
/// # Panics
///
/// Panics if `capacity` is zero.
///
/// # Example
///
/// ```
/// let (mut tx, mut rx) = tickring::spsc::<u64>(4);
///
/// assert!(tx.push(7));
/// assert_eq!(rx.pop(), Some(7));
/// assert_eq!(rx.pop(), None);
/// ```
pub fn spsc<T: Default>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    let queue = Arc::new(SpscQueue::new(capacity));
    (
        Producer {
            queue: Arc::clone(&queue),
        },
        Consumer { queue },
    )
}

/// Producing endpoint of an SPSC queue.
///
/// Owns the write side exclusively. Dropping the producer leaves any queued
/// values readable by the consumer; the storage is freed when the second
/// endpoint goes away.
pub struct Producer<T> {
    queue: Arc<SpscQueue<T>>,
}

impl<T: Default> Producer<T> {
    /// Attempts to enqueue `value`. Returns `false` if the queue is full.
    ///
    /// Never blocks; retry/backoff policy belongs to the caller.
    #[inline]
    pub fn push(&mut self, value: T) -> bool {
        self.queue.push(value)
    }
}

impl<T> Producer<T> {
    /// Advisory element count. See [`SpscQueue::len`].
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if the advisory count is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue capacity fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

// Note: Producer and Consumer intentionally do NOT implement Clone. A second
// handle on either side would put two writers on the same cursor, breaking
// the single-writer invariant that makes the queue lock-free.

/// Consuming endpoint of an SPSC queue.
pub struct Consumer<T> {
    queue: Arc<SpscQueue<T>>,
}

impl<T: Default> Consumer<T> {
    /// Attempts to dequeue an element. Returns `None` if the queue is empty.
    ///
    /// Never blocks; retry/backoff policy belongs to the caller.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop()
    }
}

impl<T> Consumer<T> {
    /// Advisory element count. See [`SpscQueue::len`].
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if the advisory count is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue capacity fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}
