//! tickring - Bounded lock-free SPSC ring queue for latency-sensitive pipelines.
//!
//! The core is [`SpscQueue`], a fixed-capacity single-producer single-consumer
//! ring buffer that hands typed values between exactly two threads with no
//! locks and no blocking. Full and empty are disambiguated by one reserved
//! slot instead of an extra flag, cursors synchronize through a minimal
//! acquire/release protocol, and each hot field sits on its own cache line.
//!
//! # Key Features
//!
//! - Reserved-slot sizing: `capacity + 1` internal slots, no full/empty flag
//! - Non-blocking `push`/`pop` reporting overflow/underflow by return value
//! - Cache-padded cursors (no false sharing between producer and consumer)
//! - Safe split endpoints via [`spsc`] that enforce the SPSC discipline
//! - Collaborators for the surrounding pipeline: a fixed-capacity object
//!   pool ([`MemPool`]) and a core-pinning thread launcher
//!   ([`affinity::spawn_pinned`])
//!
//! # Example
//!
//! ```
//! let (mut tx, mut rx) = tickring::spsc::<u64>(1024);
//!
//! let producer = std::thread::spawn(move || {
//!     for i in 0..100 {
//!         while !tx.push(i) {
//!             std::hint::spin_loop(); // full: retry policy is the caller's
//!         }
//!     }
//! });
//!
//! let mut received = Vec::new();
//! while received.len() < 100 {
//!     if let Some(v) = rx.pop() {
//!         received.push(v);
//!     }
//! }
//!
//! producer.join().unwrap();
//! assert!(received.iter().copied().eq(0..100));
//! ```

pub mod affinity;
mod channel;
mod invariants;
mod pool;
mod queue;

pub use channel::{spsc, Consumer, Producer};
pub use pool::{MemPool, PoolError, PoolHandle};
pub use queue::SpscQueue;
