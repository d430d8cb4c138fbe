use std::{collections::HashMap, fmt::Debug, sync::Arc, sync::RwLock};

use num_bigint::BigUint;

type FactorialStorage = Arc<RwLock<HashMap<u64, BigUint>>>;

pub mod storage;

/// Counters collected by a store since it was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
}

/// Shared index -> value mapping consulted by the factorial engine.
///
/// `get` takes a shared lock and hands back an owned copy; `set` takes the
/// exclusive lock and stores a copy of `value`. Neither removes entries or
/// fails.
pub trait NumericStore: Send + Sync + Debug {
    fn get(&self, key: u64) -> Option<BigUint>;
    fn set(&self, key: u64, value: &BigUint);
}
