//! Concurrent access tests
//!
//! A single `BankService` is shared behind an `Arc` and hammered from
//! several threads. Every read-modify-write must be serialised: no loan,
//! transfer or registration may be lost, and money is neither created nor
//! destroyed by transfers.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;
use tempfile::TempDir;

use rust_decimal::Decimal;
use serde_json::json;

use pinbank_core::adapters::demo::generate_demo_accounts;
use pinbank_core::adapters::duckdb::DuckDbStore;
use pinbank_core::adapters::json_file::JsonFileStore;
use pinbank_core::domain::ledger;
use pinbank_core::ports::KeyValueStore;
use pinbank_core::BankService;

/// Number of concurrent threads for stress tests.
const THREAD_COUNT: usize = 6;

/// Number of iterations per thread
const ITERATIONS_PER_THREAD: usize = 5;

fn shared_bank(temp_dir: &TempDir) -> Arc<BankService> {
    let store = DuckDbStore::new(&temp_dir.path().join("bank.duckdb")).unwrap();
    let bank = BankService::new(Arc::new(store));
    bank.seed(&generate_demo_accounts()).unwrap();
    Arc::new(bank)
}

/// Spawn THREAD_COUNT threads that start together and run `work`
fn run_threads<F>(work: F) -> usize
where
    F: Fn(usize) -> Result<(), String> + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let work = Arc::new(work);
    let error_count = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let barrier = Arc::clone(&barrier);
            let work = Arc::clone(&work);
            let error_count = Arc::clone(&error_count);
            thread::spawn(move || {
                barrier.wait();
                let start = Instant::now();
                if let Err(e) = work(thread_id) {
                    eprintln!("Thread {}: {}", thread_id, e);
                    error_count.fetch_add(1, Ordering::SeqCst);
                }
                println!("Thread {}: done in {:?}", thread_id, start.elapsed());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    error_count.load(Ordering::SeqCst)
}

/// Loans from many threads on one session must all be recorded
#[test]
fn test_concurrent_loans_are_not_lost() {
    let temp_dir = TempDir::new().unwrap();
    let bank = shared_bank(&temp_dir);
    let session = bank.login("user1", 1111).unwrap();

    let worker_bank = Arc::clone(&bank);
    let worker_session = session.clone();
    let errors = run_threads(move |_| {
        for _ in 0..ITERATIONS_PER_THREAD {
            worker_bank
                .loan(&worker_session, Decimal::from(10))
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    });
    assert_eq!(errors, 0);

    let account = bank.account(&session).unwrap();
    let loans = (THREAD_COUNT * ITERATIONS_PER_THREAD) as i64;
    assert_eq!(account.transactions.len() as i64, 5 + loans);
    assert_eq!(ledger::balance(&account).unwrap(), Decimal::from(1500 + 10 * loans));
}

/// Concurrent transfers move money without creating or destroying any
#[test]
fn test_concurrent_transfers_conserve_money() {
    let temp_dir = TempDir::new().unwrap();
    let bank = shared_bank(&temp_dir);
    let total_before: Decimal = bank
        .accounts()
        .unwrap()
        .iter()
        .map(|a| ledger::balance(a).unwrap())
        .sum();
    let session = bank.login("user3", 3333).unwrap();

    let worker_bank = Arc::clone(&bank);
    let worker_session = session.clone();
    let errors = run_threads(move |thread_id| {
        let to = if thread_id % 2 == 0 { 123456 } else { 234567 };
        for _ in 0..ITERATIONS_PER_THREAD {
            worker_bank
                .transfer(&worker_session, to, Decimal::new(2550, 2))
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    });
    assert_eq!(errors, 0);

    let accounts = bank.accounts().unwrap();
    let total_after: Decimal = accounts.iter().map(|a| ledger::balance(a).unwrap()).sum();
    assert_eq!(total_after, total_before);

    let emily = accounts.iter().find(|a| a.user_name == "user3").unwrap();
    let sent = Decimal::new(2550, 2) * Decimal::from((THREAD_COUNT * ITERATIONS_PER_THREAD) as i64);
    assert_eq!(ledger::balance(emily).unwrap(), Decimal::from(2600) - sent);
}

/// Concurrent registrations get distinct account numbers and all land in the index
#[test]
fn test_concurrent_registrations() {
    let temp_dir = TempDir::new().unwrap();
    let bank = shared_bank(&temp_dir);

    let worker_bank = Arc::clone(&bank);
    let errors = run_threads(move |thread_id| {
        for i in 0..ITERATIONS_PER_THREAD {
            let user_name = format!("t{}u{}", thread_id, i);
            worker_bank
                .register("Thread User", &user_name, 1234)
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    });
    assert_eq!(errors, 0);

    let accounts = bank.accounts().unwrap();
    assert_eq!(accounts.len(), 3 + THREAD_COUNT * ITERATIONS_PER_THREAD);

    let numbers: HashSet<u32> = accounts.iter().map(|a| a.account_number).collect();
    assert_eq!(numbers.len(), accounts.len());
}

/// Separate JsonFileStore instances on one file must not lose each other's writes
#[test]
fn test_json_store_instances_share_file_safely() {
    let temp_dir = TempDir::new().unwrap();
    let path = Arc::new(temp_dir.path().join("shared.json"));

    let worker_path = Arc::clone(&path);
    let errors = run_threads(move |thread_id| {
        let store = JsonFileStore::new(&worker_path).map_err(|e| e.to_string())?;
        for i in 0..ITERATIONS_PER_THREAD {
            store
                .set(&format!("t{}:{}", thread_id, i), &json!({ "i": i }))
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    });
    assert_eq!(errors, 0);

    let store = JsonFileStore::new(&path).unwrap();
    for thread_id in 0..THREAD_COUNT {
        for i in 0..ITERATIONS_PER_THREAD {
            let value = store.get(&format!("t{}:{}", thread_id, i)).unwrap();
            assert_eq!(value, Some(json!({ "i": i })));
        }
    }
}
