//! Optional caches for compiled patterns and locale text lookups.
//!
//! Nothing in the engine needs a cache to be correct. Formatters are cheap
//! to clone, so a cache hands out clones of what it built.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use tempora_chrono::{Chronology, DateTimeFieldType, Locale};

use crate::element::TextLookup;
use crate::error::Result;
use crate::formatter::Formatter;
use crate::pattern;

/// Compiled patterns kept by [`PatternCache::new`].
pub const DEFAULT_PATTERN_CAPACITY: usize = 500;

/// Text lookups kept by [`TextLookupCache::new`].
pub const DEFAULT_TEXT_CAPACITY: usize = 128;

struct Entries<K, V> {
    map: HashMap<K, V>,
    order: VecDeque<K>,
}

/// A thread-safe map holding at most `capacity` entries. When full, the
/// oldest entry is evicted.
pub struct BoundedCache<K, V> {
    capacity: usize,
    entries: RwLock<Entries<K, V>>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(Entries {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.map.get(key).cloned()
    }

    /// Inserts `value` unless `key` is already present, and returns the
    /// value now cached for `key`.
    pub fn insert(&self, key: K, value: V) -> V {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = entries.map.get(&key) {
            return existing.clone();
        }
        while entries.map.len() >= self.capacity {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            debug!("evicting cache entry {oldest:?}");
            entries.map.remove(&oldest);
        }
        entries.order.push_back(key.clone());
        entries.map.insert(key, value.clone());
        value
    }

    /// Returns the cached value for `key`, building it with `build` on a
    /// miss. The lock is not held while building, so two threads may build
    /// the same entry; the first one inserted wins.
    ///
    /// # Errors
    /// Whatever `build` returns; failures are not cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        build: impl FnOnce() -> std::result::Result<V, E>,
    ) -> std::result::Result<V, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        debug!("cache miss for {key:?}");
        let value = build()?;
        Ok(self.insert(key, value))
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.map.clear();
        entries.order.clear();
    }
}

impl<K, V> fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.entries.read().unwrap_or_else(PoisonError::into_inner).map.len();
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .field("len", &len)
            .finish()
    }
}

/// Pattern strings to compiled formatters.
#[derive(Debug)]
pub struct PatternCache {
    formatters: BoundedCache<String, Formatter>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PATTERN_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            formatters: BoundedCache::new(capacity),
        }
    }

    /// Compiles `pattern`, or returns the formatter compiled for it earlier.
    ///
    /// # Errors
    /// `IllegalPattern` when the pattern does not compile.
    pub fn for_pattern(&self, pattern: &str) -> Result<Formatter> {
        self.formatters
            .get_or_try_insert_with(pattern.to_string(), || pattern::compile(pattern))
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Text lookups keyed by locale and field. Fields with no text form are
/// cached as `None`.
#[derive(Debug)]
pub struct TextLookupCache {
    lookups: BoundedCache<(Locale, DateTimeFieldType), Option<Arc<TextLookup>>>,
}

impl TextLookupCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TEXT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lookups: BoundedCache::new(capacity),
        }
    }

    pub fn get_or_build(
        &self,
        chronology: &dyn Chronology,
        field_type: DateTimeFieldType,
        locale: &Locale,
    ) -> Option<Arc<TextLookup>> {
        let key = (locale.clone(), field_type);
        let built: std::result::Result<_, std::convert::Infallible> =
            self.lookups.get_or_try_insert_with(key, || {
                Ok(TextLookup::build(chronology, field_type, locale).map(Arc::new))
            });
        match built {
            Ok(lookup) => lookup,
            Err(never) => match never {},
        }
    }

    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }
}

impl Default for TextLookupCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_entry_is_evicted() {
        let cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn first_insert_wins() {
        let cache = BoundedCache::new(4);
        assert_eq!(cache.insert("a", 1), 1);
        assert_eq!(cache.insert("a", 2), 1);
    }

    #[test]
    fn build_failures_are_not_cached() {
        let cache: BoundedCache<&str, i32> = BoundedCache::new(4);
        let failed: std::result::Result<i32, &str> = cache.get_or_try_insert_with("k", || Err("nope"));
        assert!(failed.is_err());
        assert!(cache.is_empty());
    }
}
