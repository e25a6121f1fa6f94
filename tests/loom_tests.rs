//! Loom-based concurrency tests for the SPSC cursor protocol.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! Loom exhaustively explores thread interleavings, so the model below keeps
//! the state space tiny: the reserved-slot protocol at capacity 2 (3 internal
//! slots) with a handful of operations per thread.

#![cfg(feature = "loom")]

use loom::sync::atomic::{AtomicUsize, Ordering};
use loom::sync::Arc;
use loom::thread;
use std::cell::UnsafeCell;

/// Miniature replica of the queue's synchronization protocol.
///
/// Loom needs its own atomic types, so the protocol is restated here exactly
/// as `SpscQueue` implements it: wrapped cursors, one reserved slot, relaxed
/// self-cursor loads, acquire on the other side's cursor, release on publish.
struct LoomQueue {
    write: AtomicUsize,
    read: AtomicUsize,
    slots: UnsafeCell<[u64; 3]>,
}

unsafe impl Send for LoomQueue {}
unsafe impl Sync for LoomQueue {}

impl LoomQueue {
    fn new() -> Self {
        Self {
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
            slots: UnsafeCell::new([0; 3]),
        }
    }

    const SLOTS: usize = 3; // capacity 2 + reserved slot

    fn push(&self, value: u64) -> bool {
        let write = self.write.load(Ordering::Relaxed);
        let candidate = (write + 1) % Self::SLOTS;
        if candidate == self.read.load(Ordering::Acquire) {
            return false;
        }
        // SAFETY: candidate != read, so the consumer is not touching this slot
        unsafe {
            (*self.slots.get())[candidate] = value;
        }
        self.write.store(candidate, Ordering::Release);
        true
    }

    fn pop(&self) -> Option<u64> {
        let read = self.read.load(Ordering::Relaxed);
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }
        let candidate = (read + 1) % Self::SLOTS;
        // SAFETY: read != write, so this slot holds a published value
        let value = unsafe { (*self.slots.get())[candidate] };
        self.read.store(candidate, Ordering::Release);
        Some(value)
    }
}

/// Every interleaving delivers the pushed values in order, no duplicates.
#[test]
fn loom_spsc_fifo() {
    loom::model(|| {
        let queue = Arc::new(LoomQueue::new());
        let q = Arc::clone(&queue);

        let producer = thread::spawn(move || {
            let mut pushed = 0;
            for value in [10, 20, 30] {
                if q.push(value) {
                    pushed += 1;
                }
            }
            pushed
        });

        let mut received = Vec::new();
        // Bounded attempts keep the schedule space finite.
        for _ in 0..6 {
            if let Some(v) = queue.pop() {
                received.push(v);
            }
        }

        let pushed = producer.join().unwrap();
        assert!(received.len() <= pushed);
        // Whatever arrived is an in-order prefix of what was pushed.
        assert!(received
            .iter()
            .zip([10, 20, 30].iter())
            .all(|(got, want)| got == want));
    });
}

/// The reserved slot keeps the queue bounded: with no consumer running, a
/// third push always fails and both published values survive intact.
#[test]
fn loom_spsc_never_overfills() {
    loom::model(|| {
        let queue = Arc::new(LoomQueue::new());
        let q = Arc::clone(&queue);

        let producer = thread::spawn(move || {
            assert!(q.push(1));
            assert!(q.push(2));
            assert!(!q.push(3));
        });
        producer.join().unwrap();

        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);
    });
}

/// Full/empty transitions under true concurrency: a consumer freeing one slot
/// is eventually visible to the producer, and never prematurely.
#[test]
fn loom_spsc_full_then_free() {
    loom::model(|| {
        let queue = Arc::new(LoomQueue::new());
        queue.push(1);
        queue.push(2); // full

        let q = Arc::clone(&queue);
        let consumer = thread::spawn(move || q.pop());

        // May observe the queue full or one-free depending on the schedule,
        // but a success must land in the slot the consumer vacated.
        let pushed = queue.push(3);

        let popped = consumer.join().unwrap();
        assert_eq!(popped, Some(1));
        if pushed {
            assert_eq!(queue.pop(), Some(2));
            assert_eq!(queue.pop(), Some(3));
        } else {
            assert_eq!(queue.pop(), Some(2));
            assert_eq!(queue.pop(), None);
        }
    });
}
