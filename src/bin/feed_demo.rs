//! # Simulated Market Feed Demo
//!
//! End-to-end pipeline exercising every collaborator in the crate:
//!
//! - A producer thread plays the role of the feed decoder, generating
//!   pseudo-random ticks and pushing them into a bounded SPSC queue.
//! - A consumer thread drains the queue and aggregates per-instrument stats.
//! - Both threads are launched through `affinity::spawn_pinned` and pinned to
//!   distinct cores when the machine has at least two available.
//! - Tick construction is staged through a `MemPool` so the hot loop performs
//!   no heap allocation.
//!
//! The real upstream feed is an opaque value source as far as the queue is
//! concerned; the generator here stands in for it.
//!
//! ## Running
//!
//! ```bash
//! cargo run --bin feed_demo --release             # defaults
//! cargo run --bin feed_demo --release -- 65536 5000000
//! #                                      ^queue   ^ticks
//! ```

use crossbeam_utils::Backoff;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tickring::affinity::{available_cores, spawn_pinned};
use tickring::{spsc, MemPool};

/// One decoded market-data update. `Default` supplies the queue's slot
/// placeholder.
#[derive(Debug, Clone, Copy, Default)]
struct Tick {
    instrument: u32,
    price: f64,
    quantity: u32,
    seq: u64,
}

const INSTRUMENTS: u32 = 8;

fn main() {
    let mut args = std::env::args().skip(1);
    let queue_capacity: usize = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(64 * 1024);
    let tick_count: u64 = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(1_000_000);

    let cores = available_cores();
    let (producer_core, consumer_core) = match cores.as_slice() {
        [a, b, ..] => (Some(*a), Some(*b)),
        _ => (None, None),
    };

    println!("tickring feed demo");
    println!("==================\n");
    println!("Configuration:");
    println!("  Queue capacity: {}", queue_capacity);
    println!("  Ticks: {}", tick_count);
    println!("  Producer core: {:?}", producer_core);
    println!("  Consumer core: {:?}\n", consumer_core);

    let (mut tx, mut rx) = spsc::<Tick>(queue_capacity);
    let start = Instant::now();

    let producer = spawn_pinned("feed-producer", producer_core, move || {
        let mut rng = StdRng::seed_from_u64(42);
        // Ticks are built in the pool and moved out on push, keeping the
        // loop free of allocator traffic.
        let mut staging = MemPool::<Tick>::new(16);
        let mut full_retries = 0u64;

        for seq in 0..tick_count {
            let handle = staging
                .allocate(Tick {
                    instrument: rng.gen_range(0..INSTRUMENTS),
                    price: 100.0 + rng.gen::<f64>(),
                    quantity: rng.gen_range(1..1_000),
                    seq,
                })
                .expect("staging pool sized for one tick in flight");
            let tick = staging
                .deallocate(handle)
                .expect("tick was just allocated");

            let backoff = Backoff::new();
            while !tx.push(tick) {
                full_retries += 1;
                backoff.snooze();
            }
        }
        full_retries
    })
    .expect("failed to launch producer");

    let consumer = spawn_pinned("feed-consumer", consumer_core, move || {
        let mut last_price = [0.0f64; INSTRUMENTS as usize];
        let mut volume = [0u64; INSTRUMENTS as usize];
        let mut next_seq = 0u64;

        while next_seq < tick_count {
            let backoff = Backoff::new();
            let tick = loop {
                match rx.pop() {
                    Some(tick) => break tick,
                    None => backoff.snooze(),
                }
            };
            assert_eq!(tick.seq, next_seq, "feed replayed out of order");
            next_seq += 1;
            last_price[tick.instrument as usize] = tick.price;
            volume[tick.instrument as usize] += u64::from(tick.quantity);
        }
        (last_price, volume)
    })
    .expect("failed to launch consumer");

    let full_retries = producer.join().expect("producer panicked");
    let (last_price, volume) = consumer.join().expect("consumer panicked");
    let elapsed = start.elapsed();

    println!("Results:");
    for i in 0..INSTRUMENTS as usize {
        println!(
            "  instrument {}: last price {:.4}, volume {}",
            i, last_price[i], volume[i]
        );
    }
    println!("\nThroughput:");
    println!("  {} ticks in {:.3}s", tick_count, elapsed.as_secs_f64());
    println!(
        "  {:.1}M ticks/sec",
        tick_count as f64 / elapsed.as_secs_f64() / 1e6
    );
    println!("  producer full-queue retries: {}", full_retries);
}
