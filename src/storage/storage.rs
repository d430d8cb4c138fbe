use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, PoisonError, RwLock,
    },
};

use num_bigint::BigUint;
use tracing::{debug, trace};

use super::{FactorialStorage, NumericStore, StoreStats};

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct Storage {
    cc: FactorialStorage,
    counters: Arc<Counters>,
}

impl Storage {
    /// Creates a store holding only the base case `0! = 1`.
    pub fn new() -> Self {
        let cc = Arc::new(RwLock::new(HashMap::<u64, BigUint>::from([(
            0,
            BigUint::from(1u32),
        )])));
        debug!("storage initialized with base case 0! = 1");

        Self {
            cc,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.cc.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<u64> {
        let mut keys: Vec<u64> = self
            .cc
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            entries: self.len(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl NumericStore for Storage {
    fn get(&self, key: u64) -> Option<BigUint> {
        // A writer only ever inserts a complete value, so a poisoned map is still consistent.
        let found = self
            .cc
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        match &found {
            Some(value) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                trace!(key, %value, "retrieved from storage");
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
            }
        }

        found
    }

    fn set(&self, key: u64, value: &BigUint) {
        self.cc
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.clone());
        self.counters.writes.fetch_add(1, Ordering::Relaxed);
        trace!(key, %value, "stored in storage");
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn new_storage_holds_base_case() {
        let store = Storage::new();

        assert_eq!(store.get(0), Some(BigUint::from(1u32)));
        assert_eq!(store.keys(), vec![0]);
        assert!(!store.is_empty());
    }

    #[test]
    fn missing_key_reports_none() {
        let store = Storage::new();

        assert_eq!(store.get(42), None);
        assert_eq!(store.stats().misses, 1);
        assert_eq!(store.stats().hits, 0);
    }

    #[test]
    fn set_keeps_its_own_copy() {
        let store = Storage::new();
        let mut value = BigUint::from(6u32);

        store.set(3, &value);
        value *= 1000u32;

        assert_eq!(store.get(3), Some(BigUint::from(6u32)));
    }

    #[test]
    fn returned_value_does_not_alias_entry() {
        let store = Storage::new();
        store.set(4, &BigUint::from(24u32));

        let mut fetched = store.get(4).unwrap();
        fetched += 1u32;

        assert_eq!(store.get(4), Some(BigUint::from(24u32)));
    }

    #[test]
    fn clones_share_the_same_map() {
        let store = Storage::new();
        let other = store.clone();

        other.set(2, &BigUint::from(2u32));

        assert_eq!(store.get(2), Some(BigUint::from(2u32)));
        assert_eq!(store.stats().writes, 1);
    }

    #[test]
    fn concurrent_writers_and_readers() {
        let store = Storage::new();

        let handles: Vec<_> = (1..=8u64)
            .map(|key| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.set(key, &BigUint::from(key));
                        assert_eq!(store.get(key), Some(BigUint::from(key)));
                        assert_eq!(store.get(0), Some(BigUint::from(1u32)));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 9);
        assert_eq!(store.stats().writes, 800);
    }
}
