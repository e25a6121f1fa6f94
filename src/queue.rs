use crate::invariants::{debug_assert_cursor_in_bounds, debug_assert_reserved_slot};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// This SPSC ring buffer uses wrapped indices with one reserved slot instead of
// unbounded sequence numbers:
//
// - The backing store holds `capacity + 1` slots. Each cursor names the slot
//   it most recently published (producer) or consumed (consumer) and wraps
//   modulo the internal slot count.
// - Empty  <=> read == write.
// - Full   <=> (write + 1) mod slots == read. The reserved slot is what makes
//   full and empty distinguishable with only two indices and no extra flag.
//
// ## Memory Ordering Protocol
//
// **Producer (`push`):**
// 1. Load `write` with Relaxed (only the producer stores it)
// 2. Compute candidate = (write + 1) mod slots
// 3. Load `read` with Acquire; candidate == read means full. When the check
//    passes, the Acquire guarantees the consumer's reads up through `read`
//    are visible, so the slot about to be overwritten is free to overwrite.
// 4. Store the value into the slot (plain, non-atomic write)
// 5. Store candidate into `write` with Release, publishing both the cursor
//    advance and the slot contents to the consumer's matching Acquire
//
// **Consumer (`pop`):**
// 1. Load `read` with Relaxed (only the consumer stores it)
// 2. Load `write` with Acquire; read == write means empty. When a value is
//    present, the Acquire pairs with the producer's Release, so the slot
//    contents are fully visible before being moved out.
// 3. Move the value out of slot (read + 1) mod slots
// 4. Store the new index into `read` with Release, publishing the free slot
//    back to the producer
//
// This pairing is the correctness floor: it must not be weakened on
// weakly-ordered architectures even though x86-64 tolerates less.
//
// ## Single-Writer Invariants
//
// - `write` and the slot at the candidate write index are mutated only by
//   the producer.
// - `read` and the slot at the candidate read index are mutated only by the
//   consumer.
// - `live` is the sole field both sides touch; it is advisory, never gates
//   push/pop, and may be observed stale relative to the cursors.
//
// =============================================================================

/// Bounded single-producer single-consumer ring queue.
///
/// `push` and `pop` are lock-free, wait-free O(1) operations that never block
/// and never retry internally. Overflow and underflow are reported through the
/// return value; any retry or backoff policy belongs to the caller.
///
/// The three hot fields are each wrapped in [`CachePadded`] so the producer
/// cursor, the consumer cursor, and the advisory counter land on separate
/// cache lines. Co-locating them would ping-pong a line between the two cores
/// on every operation without affecting correctness.
///
/// # Safety contract
///
/// At most one thread may call [`push`](Self::push) and at most one thread may
/// call [`pop`](Self::pop) at any given time. Violating this single-producer /
/// single-consumer discipline is **undefined behavior**: it is not detected at
/// runtime, because an owner-thread check would put synchronization back on
/// the hot path that the single-writer discipline exists to avoid. Use
/// [`spsc`](crate::spsc) for handles that enforce the discipline statically.
pub struct SpscQueue<T> {
    /// Index of the slot most recently published. Stored only by the producer.
    write: CachePadded<AtomicUsize>,
    /// Index of the slot most recently consumed. Stored only by the consumer.
    read: CachePadded<AtomicUsize>,
    /// Advisory element count, maintained independently of the cursors.
    live: CachePadded<AtomicUsize>,
    /// Backing store of `capacity + 1` slots, default-valued until first use.
    ///
    /// A slot's liveness is implied solely by its position relative to the two
    /// cursors; slots are not individually ownership-tracked. `Box<[_]>`
    /// rather than `Vec<_>` because the allocation is fixed at construction.
    slots: Box<[UnsafeCell<T>]>,
}

// Safety: the acquire/release cursor protocol transfers slot ownership between
// exactly one producer and one consumer; see the safety contract above.
unsafe impl<T: Send> Send for SpscQueue<T> {}
unsafe impl<T: Send> Sync for SpscQueue<T> {}

impl<T: Default> SpscQueue<T> {
    /// Creates a queue that holds up to `capacity` elements.
    ///
    /// Allocates `capacity + 1` slots once and never resizes; the extra slot
    /// is reserved so that full and empty remain distinguishable.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. A zero-capacity queue could never accept
    /// an element, so construction fails fast rather than producing a useless
    /// instance.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "SpscQueue capacity must be positive");

        let internal = capacity + 1;
        let mut slots = Vec::with_capacity(internal);
        slots.resize_with(internal, || UnsafeCell::new(T::default()));

        Self {
            write: CachePadded::new(AtomicUsize::new(0)),
            read: CachePadded::new(AtomicUsize::new(0)),
            live: CachePadded::new(AtomicUsize::new(0)),
            slots: slots.into_boxed_slice(),
        }
    }

    /// Attempts to enqueue `value`. Returns `false` if the queue is full.
    ///
    /// The queue is not mutated on failure; the rejected `value` is dropped
    /// with the call.
    ///
    /// Producer-only call site; see the type-level safety contract.
    #[inline]
    pub fn push(&self, value: T) -> bool {
        let write = self.write.load(Ordering::Relaxed);
        let candidate = self.advance(write);

        // Full check. The Acquire pairs with the consumer's Release store of
        // `read`: when it passes, the consumer is done with the candidate slot.
        if candidate == self.read.load(Ordering::Acquire) {
            return false;
        }

        debug_assert_cursor_in_bounds!("write", candidate, self.slots.len());
        debug_assert_reserved_slot!(candidate, self.read.load(Ordering::Relaxed));

        // SAFETY: candidate != read, so the consumer cannot be touching this
        // slot, and only this (single) producer writes slots at the write
        // cursor. The old placeholder value is dropped in place here.
        unsafe {
            *self.slots[candidate].get() = value;
        }

        // Publishes both the cursor advance and the slot write.
        self.write.store(candidate, Ordering::Release);
        self.live.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Attempts to dequeue an element. Returns `None` if the queue is empty.
    ///
    /// Consumer-only call site; see the type-level safety contract.
    #[inline]
    pub fn pop(&self) -> Option<T> {
        let read = self.read.load(Ordering::Relaxed);

        // Empty check. The Acquire pairs with the producer's Release store of
        // `write`: when a value is present, its slot contents are visible.
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }

        let candidate = self.advance(read);
        debug_assert_cursor_in_bounds!("read", candidate, self.slots.len());

        // SAFETY: read != write, so the candidate slot holds a published value
        // the producer will not touch until `read` advances past it. Taking
        // leaves the default placeholder behind; no destructor runs early.
        let value = unsafe { std::mem::take(&mut *self.slots[candidate].get()) };

        // Publishes the freed slot back to the producer.
        self.read.store(candidate, Ordering::Release);
        self.live.fetch_sub(1, Ordering::Relaxed);
        Some(value)
    }
}

impl<T> SpscQueue<T> {
    /// Returns the number of elements the queue can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Advances a cursor by one slot, wrapping at the internal slot count.
    #[inline]
    fn advance(&self, idx: usize) -> usize {
        (idx + 1) % self.slots.len()
    }

    /// Returns the advisory element count.
    ///
    /// Loaded with the strongest ordering, but still advisory: the counter is
    /// maintained independently of the cursors, never gates `push`/`pop`, and
    /// may momentarily disagree with a cursor-based view taken by the other
    /// thread (including transiently reading above `capacity`).
    #[inline]
    pub fn len(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Returns true if the advisory count is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// No Drop impl is needed: slots always hold a valid T (a live value or a
// default placeholder), so dropping the boxed slice drops everything still in
// flight between the cursors.
