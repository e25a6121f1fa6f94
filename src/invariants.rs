//! Debug assertion macros for ring cursor invariants.
//!
//! Only active in debug builds (`debug_assert!`), so there is zero overhead on
//! the release hot path.

/// Assert that a cursor stays inside the internal slot range.
///
/// **Invariant**: `0 <= cursor < capacity + 1` at all times.
macro_rules! debug_assert_cursor_in_bounds {
    ($name:literal, $idx:expr, $slots:expr) => {
        debug_assert!(
            $idx < $slots,
            "{} cursor {} escaped ring of {} slots",
            $name,
            $idx,
            $slots
        )
    };
}

/// Assert that a publish never lands the write cursor on the read cursor.
///
/// **Invariant**: the reserved slot is never claimed by both cursors at once;
/// that is what keeps full distinguishable from empty without extra state.
/// The consumer only ever moves `read` toward `write`, so once the full check
/// passes this holds until the producer publishes.
macro_rules! debug_assert_reserved_slot {
    ($candidate:expr, $read:expr) => {
        debug_assert!(
            $candidate != $read,
            "write cursor would land on read cursor at slot {}",
            $candidate
        )
    };
}

pub(crate) use debug_assert_cursor_in_bounds;
pub(crate) use debug_assert_reserved_slot;
