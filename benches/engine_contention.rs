//! Benchmark suite for the wallet engine under contention
//!
//! Compares uncontended throughput against workloads where many threads
//! fight over the same wallet and the optimistic retry path does real
//! work.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use rust_decimal::Decimal;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use wallet_engine::{
    InMemoryDirectory, LimitPolicy, RetryPolicy, TransactionLedger, UserDirectory, WalletEngine,
    WalletLimits, WalletStore,
};

fn main() {
    divan::main();
}

/// Limits wide enough that no benchmark operation is rejected
fn bench_limits() -> WalletLimits {
    WalletLimits::new(
        Decimal::ONE,
        Decimal::new(10_000, 0),
        Decimal::new(10_000_000, 0),
    )
}

/// Engine with a large zero-backoff retry budget and seeded wallets
fn build_engine(owners: &[u64]) -> Arc<WalletEngine> {
    let store = Arc::new(WalletStore::new());
    let ledger = Arc::new(TransactionLedger::new());
    let directory = Arc::new(InMemoryDirectory::new());
    for &owner in owners {
        directory.register(owner);
        let mut wallet = store.get_or_create(owner, chrono::Utc::now().date_naive());
        wallet.balance = Decimal::new(1_000_000, 0);
        store.commit(&wallet).expect("seeding cannot conflict");
    }

    let engine = WalletEngine::new(
        Arc::clone(&store),
        ledger,
        directory as Arc<dyn UserDirectory>,
        LimitPolicy::new(bench_limits()),
        RetryPolicy::new(1_000, Duration::ZERO),
    );

    Arc::new(engine)
}

/// 1,000 loads into one wallet from a single thread
#[divan::bench]
fn sequential_loads() {
    let engine = build_engine(&[1]);

    for i in 0..1_000 {
        engine
            .load_money(1, Decimal::ONE, &format!("txn-{}", i))
            .expect("uncontended load cannot fail");
    }
}

/// 1,000 loads split across four threads hammering one wallet
#[divan::bench]
fn contended_loads() {
    let engine = build_engine(&[1]);

    let mut handles = vec![];
    for t in 0..4 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for i in 0..250 {
                engine
                    .load_money(1, Decimal::ONE, &format!("txn-{}-{}", t, i))
                    .expect("retry budget covers the contention");
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

/// 1,000 loads across four threads and four independent wallets
#[divan::bench]
fn partitioned_loads() {
    let engine = build_engine(&[1, 2, 3, 4]);

    let mut handles = vec![];
    for owner in 1..=4u64 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for i in 0..250 {
                engine
                    .load_money(owner, Decimal::ONE, &format!("txn-{}-{}", owner, i))
                    .expect("independent wallets cannot conflict");
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

/// Reciprocal transfers between two wallets from two threads
#[divan::bench]
fn reciprocal_transfers() {
    let engine = build_engine(&[1, 2]);

    let mut handles = vec![];
    for (sender, recipient) in [(1u64, 2u64), (2u64, 1u64)] {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for i in 0..250 {
                engine
                    .transfer_money(
                        sender,
                        recipient,
                        Decimal::ONE,
                        &format!("txn-{}-{}", sender, i),
                    )
                    .expect("retry budget covers the contention");
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}
