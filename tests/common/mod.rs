#![allow(dead_code)]

use std::sync::Mutex;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use tenant_ledger::{
    config::ConfigManager,
    ledger::{Charge, ChargeStatus, Period, TenantId},
    storage::JsonStore,
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated store and config manager backed by a unique directory.
pub fn setup_test_env() -> (JsonStore, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let store = JsonStore::new(base.join("store")).expect("create json store");
    let config_manager = ConfigManager::with_path(base.join("config.json"));
    (store, config_manager)
}

pub fn period(year: i32, month: &str) -> Period {
    Period::new(year, month).expect("valid period")
}

/// Rent of 10,000 for January to March 2024: January settled and paid, February
/// part-settled, March untouched.
pub fn three_month_rent(tenant: &TenantId) -> Vec<Charge> {
    vec![
        Charge::rent(tenant.clone(), period(2024, "January"), dec!(10000))
            .with_settled(dec!(10000))
            .with_status(ChargeStatus::Paid),
        Charge::rent(tenant.clone(), period(2024, "February"), dec!(10000))
            .with_settled(dec!(4000)),
        Charge::rent(tenant.clone(), period(2024, "March"), dec!(10000))
            .with_settled(Decimal::ZERO),
    ]
}

/// Every ordering of `items`, generated with Heap's algorithm.
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.clone());
            return;
        }
        heap(k - 1, items, out);
        for i in 0..k - 1 {
            if k % 2 == 0 {
                items.swap(i, k - 1);
            } else {
                items.swap(0, k - 1);
            }
            heap(k - 1, items, out);
        }
    }

    let mut working = items.to_vec();
    let mut out = Vec::new();
    heap(working.len(), &mut working, &mut out);
    out
}
