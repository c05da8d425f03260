//! Named monotonic counters persisted through the key-value store.

use std::rc::Rc;

use common::GardenResult;
use store::KeyValueStore;

/// Read/increment access to the named gameplay counters.
///
/// Counters are created lazily at zero and only ever move upward; nothing
/// in the garden decrements one.
pub struct CounterRegistry {
    store: Rc<dyn KeyValueStore>,
}

impl CounterRegistry {
    /// Creates a registry over `store`.
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current value of an integer counter, zero when unset.
    pub fn get(&self, key: &str) -> i64 {
        self.store.read_i64(key, 0)
    }

    /// Current value of a decimal counter, zero when unset.
    pub fn get_decimal(&self, key: &str) -> f64 {
        self.store.read_f64(key, 0.0)
    }

    /// Adds one to an integer counter and returns the new value.
    pub fn increment(&self, key: &str) -> GardenResult<i64> {
        let next = self.get(key) + 1;
        self.store.write(key, &next.to_string())?;
        Ok(next)
    }

    /// Adds `delta` to a decimal counter and returns the new total.
    pub fn add(&self, key: &str, delta: f64) -> GardenResult<f64> {
        let next = self.get_decimal(key) + delta;
        self.store.write(key, &next.to_string())?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{keys, MemoryStore};

    fn registry() -> CounterRegistry {
        CounterRegistry::new(Rc::new(MemoryStore::new()))
    }

    #[test]
    fn unset_counters_read_zero() {
        let counters = registry();
        assert_eq!(counters.get(keys::WATERING_COUNT), 0);
        assert!(counters.get_decimal(keys::TOTAL_RECHARGE).abs() < f64::EPSILON);
    }

    #[test]
    fn increment_returns_new_value() {
        let counters = registry();
        assert_eq!(counters.increment(keys::WATERING_COUNT).unwrap(), 1);
        assert_eq!(counters.increment(keys::WATERING_COUNT).unwrap(), 2);
        assert_eq!(counters.get(keys::WATERING_COUNT), 2);
    }

    #[test]
    fn decimal_add_accumulates() {
        let counters = registry();
        counters.add(keys::TOTAL_RECHARGE, 6.0).unwrap();
        let total = counters.add(keys::TOTAL_RECHARGE, 30.5).unwrap();
        assert!((total - 36.5).abs() < f64::EPSILON);
    }

    #[test]
    fn registries_share_a_store() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let a = CounterRegistry::new(Rc::clone(&store));
        let b = CounterRegistry::new(store);
        a.increment(keys::GIFT_COUNT).unwrap();
        assert_eq!(b.get(keys::GIFT_COUNT), 1);
    }
}
