use std::{str::FromStr, sync::Arc, thread};

use factcache::{
    factorial::compute,
    storage::{storage::Storage, NumericStore},
};
use num_bigint::BigUint;

const FACTORIAL_100: &str = "93326215443944152681699238856266700490715968264381621468592963895217599993229915608941463976156518286253697920827223758251185210916864000000000000000000000000";

#[test]
fn many_threads_same_index() {
    let store = Arc::new(Storage::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || compute(100, store.as_ref()))
        })
        .collect();

    let want = BigUint::from_str(FACTORIAL_100).unwrap();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), want);
    }
    assert_eq!(store.get(100), Some(want));
    assert_eq!(store.len(), 101);
}

#[test]
fn many_threads_mixed_indices() {
    let store = Storage::new();

    let handles: Vec<_> = (0..32u64)
        .map(|i| {
            let store = store.clone();
            let n = (i * 7) % 60;
            thread::spawn(move || (n, compute(n, &store)))
        })
        .collect();

    for handle in handles {
        let (n, got) = handle.join().unwrap();
        let fresh = compute(n, &Storage::new());
        assert_eq!(got, fresh, "{}!", n);
    }

    for key in store.keys() {
        let stored = store.get(key).unwrap();
        let want = if key == 0 {
            BigUint::from(1u32)
        } else {
            store.get(key - 1).unwrap() * key
        };
        assert_eq!(stored, want, "{}!", key);
    }
}

/// A store wrapper that counts writes, standing in for any other store.
#[derive(Debug, Default)]
struct CountingStore {
    inner: Storage,
    writes: std::sync::atomic::AtomicUsize,
}

impl NumericStore for CountingStore {
    fn get(&self, key: u64) -> Option<BigUint> {
        self.inner.get(key)
    }

    fn set(&self, key: u64, value: &BigUint) {
        self.writes
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inner.set(key, value);
    }
}

#[test]
fn engine_accepts_any_store() {
    let store = CountingStore::default();

    assert_eq!(compute(6, &store), BigUint::from(720u32));
    assert_eq!(store.writes.load(std::sync::atomic::Ordering::SeqCst), 6);

    assert_eq!(compute(6, &store), BigUint::from(720u32));
    assert_eq!(store.writes.load(std::sync::atomic::Ordering::SeqCst), 6);
}
