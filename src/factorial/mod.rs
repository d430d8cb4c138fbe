//! Memoizing factorial over a shared [`NumericStore`].
//!
//! The lookup and the write-back are separate store operations. Two callers
//! racing on the same uncached index can both compute it and both store it;
//! the stored value is the same either way.

use num_bigint::BigUint;
use tracing::debug;

use crate::storage::NumericStore;

/// Returns `n!`, reading from and filling `store`.
///
/// Every index between the nearest cached one and `n` ends up cached. The
/// descent is a loop rather than a recursion so stack use does not grow with `n`.
pub fn compute<S: NumericStore + ?Sized>(n: u64, store: &S) -> BigUint {
    if let Some(value) = store.get(n) {
        debug!(n, "cache hit");
        return value;
    }

    debug!(n, "calculating factorial");

    let mut base = n;
    let mut value = loop {
        if base <= 1 {
            let one = BigUint::from(1u32);
            store.set(base, &one);
            break one;
        }
        base -= 1;
        if let Some(found) = store.get(base) {
            break found;
        }
    };

    for i in base + 1..=n {
        value *= i;
        store.set(i, &value);
    }

    debug!(n, from = base, "stored factorial");
    value
}
