use thiserror::Error;

/// Error types for pool operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Every slot is in use.
    #[error("pool is exhausted (capacity: {capacity})")]
    Exhausted {
        /// The fixed pool capacity.
        capacity: usize,
    },
    /// The handle points at a slot that holds no value (double free or stale
    /// handle).
    #[error("pool slot {index} is not in use")]
    NotInUse {
        /// Slot index named by the handle.
        index: usize,
    },
    /// The handle does not belong to this pool.
    #[error("pool handle {index} out of bounds (capacity: {capacity})")]
    OutOfBounds {
        /// Slot index named by the handle.
        index: usize,
        /// The fixed pool capacity.
        capacity: usize,
    },
}

/// Opaque handle naming a live slot in a [`MemPool`].
///
/// Handles are plain indices: cheap to copy and to hand through an
/// [`SpscQueue`](crate::SpscQueue), but only meaningful to the pool that
/// issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle(usize);

/// Fixed-capacity object pool with a linear free-slot scan.
///
/// All storage is allocated once at construction; `allocate` constructs a
/// value in a free slot and `deallocate` moves it back out, so a hot path
/// that stages values here before queueing them performs no heap allocation.
///
/// The pool is single-threaded. It is the allocation-side collaborator of the
/// SPSC queue, not a concurrent structure, and deliberately carries no
/// synchronization.
pub struct MemPool<T> {
    slots: Box<[Option<T>]>,
    /// Scan start for the next allocation. Points at the slot most recently
    /// allocated; the scan wraps modulo capacity.
    next_free: usize,
    len: usize,
}

impl<T> MemPool<T> {
    /// Creates a pool with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "MemPool capacity must be positive");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots: slots.into_boxed_slice(),
            next_free: 0,
            len: 0,
        }
    }

    /// Number of slots in the pool.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently in use.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no slot is in use.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if every slot is in use.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Places `value` into a free slot and returns its handle.
    ///
    /// Scans linearly from the last allocation point, wrapping around once.
    /// Fails with [`PoolError::Exhausted`] when no slot is free.
    pub fn allocate(&mut self, value: T) -> Result<PoolHandle, PoolError> {
        let capacity = self.capacity();
        for step in 0..capacity {
            let idx = (self.next_free + step) % capacity;
            if self.slots[idx].is_none() {
                self.slots[idx] = Some(value);
                self.next_free = idx;
                self.len += 1;
                return Ok(PoolHandle(idx));
            }
        }
        Err(PoolError::Exhausted { capacity })
    }

    /// Borrows the value behind `handle`, if the slot is live.
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    /// Mutably borrows the value behind `handle`, if the slot is live.
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// Frees the slot behind `handle` and returns the value it held.
    ///
    /// Fails with [`PoolError::OutOfBounds`] for a foreign handle and
    /// [`PoolError::NotInUse`] for a slot already freed.
    pub fn deallocate(&mut self, handle: PoolHandle) -> Result<T, PoolError> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(handle.0)
            .ok_or(PoolError::OutOfBounds {
                index: handle.0,
                capacity,
            })?;
        let value = slot.take().ok_or(PoolError::NotInUse { index: handle.0 })?;
        self.len -= 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Example {
        a: i64,
        b: char,
    }

    #[test]
    fn allocate_and_deallocate() {
        let mut pool = MemPool::new(2);
        let da = pool.allocate(1.0f64).unwrap();
        let db = pool.allocate(2.0f64).unwrap();
        assert!(pool.is_full());
        assert_eq!(pool.deallocate(da).unwrap(), 1.0);
        assert_eq!(pool.get(db), Some(&2.0));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn exhaustion_then_reuse_after_free() {
        let mut pool = MemPool::new(4);
        let mut handles = Vec::new();
        for _ in 0..4 {
            handles.push(pool.allocate(Example { a: 100, b: 'a' }).unwrap());
        }

        // Freeing one slot makes exactly one allocation possible again.
        pool.deallocate(handles[1]).unwrap();
        let reused = pool.allocate(Example { a: 200, b: 'b' }).unwrap();
        assert_eq!(reused, handles[1]);

        assert_eq!(
            pool.allocate(Example { a: 300, b: 'c' }),
            Err(PoolError::Exhausted { capacity: 4 })
        );
    }

    #[test]
    fn double_free_is_rejected() {
        let mut pool = MemPool::new(2);
        let h = pool.allocate(7u32).unwrap();
        assert_eq!(pool.deallocate(h), Ok(7));
        assert_eq!(pool.deallocate(h), Err(PoolError::NotInUse { index: 0 }));
    }

    #[test]
    fn foreign_handle_is_rejected() {
        let mut small = MemPool::<u8>::new(1);
        let mut large = MemPool::<u8>::new(8);
        let h = large.allocate(9).unwrap();
        let _ = large.allocate(10).unwrap();
        let foreign = large.allocate(11).unwrap();
        assert_eq!(small.deallocate(h), Err(PoolError::NotInUse { index: 0 }));
        assert_eq!(
            small.deallocate(foreign),
            Err(PoolError::OutOfBounds {
                index: 2,
                capacity: 1
            })
        );
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut pool = MemPool::new(1);
        let h = pool.allocate(Example { a: 1, b: 'x' }).unwrap();
        pool.get_mut(h).unwrap().a = 42;
        assert_eq!(pool.deallocate(h).unwrap(), Example { a: 42, b: 'x' });
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn zero_capacity_panics() {
        let _ = MemPool::<u8>::new(0);
    }
}
