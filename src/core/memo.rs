// src/core/memo.rs
//
// Argument-keyed memoization with an optional time-to-live. The lock is not
// held while a value is computed, so two threads may race to fill the same
// key; the last writer wins.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub struct Memo<K, V> {
    ttl: Option<Duration>,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Entries expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl: Some(ttl), entries: Mutex::new(HashMap::new()) }
    }

    /// Entries live as long as the memo.
    pub fn forever() -> Self {
        Self { ttl: None, entries: Mutex::new(HashMap::new()) }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, (Instant, V)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn fresh(&self, stored_at: Instant) -> bool {
        match self.ttl {
            Some(ttl) => stored_at.elapsed() < ttl,
            None => true,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some((at, v)) if self.fresh(*at) => Some(v.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.lock().insert(key, (Instant::now(), value));
    }

    /// Return the memoized value or compute, store and return it.
    /// Errors are passed through and never stored.
    pub fn get_or_try_insert_with<E, F>(&self, key: &K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(v) = self.get(key) {
            return Ok(v);
        }
        let v = compute()?;
        self.insert(key.clone(), v.clone());
        Ok(v)
    }

    pub fn invalidate(&self, key: &K) {
        self.lock().remove(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
