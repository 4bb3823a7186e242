//! ChainedTable: string-keyed separate chaining over an entry arena.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash::{DefaultKeyHasher, KeyHasher};
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Entry<V> {
    key: Box<str>,
    value: V,
    next: Option<DefaultKey>, // successor in the bucket chain
}

/// Hash table with separate chaining and `&str` keys.
///
/// The table owns a private copy of every key. Values are caller handles:
/// whatever `V` refers to stays the caller's responsibility, and the handle
/// comes back out through [`delete`](Self::delete), a failed
/// [`insert`](Self::insert), or the [`destroy_with`](Self::destroy_with)
/// callback.
pub struct ChainedTable<V, H = DefaultKeyHasher> {
    hasher: H,
    buckets: Vec<Option<DefaultKey>>, // chain heads
    entries: SlotMap<DefaultKey, Entry<V>>,
    max_load_factor: f64,
}

/// A rejected insert. Carries the value back so the caller keeps ownership.
pub struct InsertError<V> {
    error: TableError,
    value: V,
}

impl<V> InsertError<V> {
    pub fn kind(&self) -> TableError {
        self.error
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn into_parts(self) -> (TableError, V) {
        (self.error, self.value)
    }
}

impl<V> fmt::Debug for InsertError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<V> fmt::Display for InsertError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insert failed: {}", self.error)
    }
}

impl<V> std::error::Error for InsertError<V> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Snapshot of chain distribution, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableStats {
    pub len: usize,
    pub capacity: usize,
    pub load_factor: f64,
    pub empty_buckets: usize,
    pub longest_chain: usize,
}

impl<V> ChainedTable<V> {
    /// Empty table with the default configuration and hasher.
    pub fn new() -> Self {
        Self::with_hasher(TableConfig::default().initial_capacity, DefaultKeyHasher::default())
    }
}

impl<V> Default for ChainedTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn alloc_buckets(n: usize) -> Result<Vec<Option<DefaultKey>>, TableError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(n)?;
    buckets.resize(n, None);
    Ok(buckets)
}

fn copy_key(key: &str) -> Result<Box<str>, TableError> {
    let mut owned = String::new();
    owned.try_reserve_exact(key.len())?;
    owned.push_str(key);
    Ok(owned.into_boxed_str())
}

#[inline]
fn bucket_index<H: KeyHasher>(hasher: &H, key: &str, capacity: usize) -> usize {
    (hasher.hash_key(key.as_bytes()) % capacity as u64) as usize
}

impl<V, H: KeyHasher> ChainedTable<V, H> {
    /// Infallible constructor. Allocation failure aborts, as with `Vec`.
    pub fn with_hasher(capacity: usize, hasher: H) -> Self {
        Self {
            hasher,
            buckets: vec![None; capacity.max(1)],
            entries: SlotMap::new(),
            max_load_factor: crate::config::DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    /// Allocates `capacity` empty buckets (at least one).
    pub fn try_new(capacity: usize, hasher: H) -> Result<Self, TableError> {
        Self::with_config(TableConfig::new().with_initial_capacity(capacity), hasher)
    }

    pub fn with_config(config: TableConfig, hasher: H) -> Result<Self, TableError> {
        config.validate()?;
        let buckets = alloc_buckets(config.bucket_count()).inspect_err(|_| {
            tracing::warn!(capacity = config.bucket_count(), "bucket array allocation failed");
        })?;
        Ok(Self {
            hasher,
            buckets,
            entries: SlotMap::new(),
            max_load_factor: config.max_load_factor,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    fn bucket_of(&self, key: &str) -> usize {
        bucket_index(&self.hasher, key, self.buckets.len())
    }

    fn find(&self, key: &str) -> Option<DefaultKey> {
        let mut cur = self.buckets[self.bucket_of(key)];
        while let Some(k) = cur {
            let e = &self.entries[k];
            if *e.key == *key {
                return Some(k);
            }
            cur = e.next;
        }
        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).map(|k| &self.entries[k].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.find(key)?;
        Some(&mut self.entries[k].value)
    }

    /// Inserts a new entry at the head of its chain.
    ///
    /// Fails with `DuplicateKey` if `key` is present (the stored value is
    /// kept). Before placing the entry, the bucket array doubles when the
    /// pre-insert load factor exceeds the maximum. A failure after growth
    /// keeps the grown array. On any failure the value is handed back
    /// inside the error.
    pub fn insert(&mut self, key: &str, value: V) -> Result<(), InsertError<V>> {
        if self.find(key).is_some() {
            return Err(InsertError {
                error: TableError::DuplicateKey,
                value,
            });
        }
        match self.prepare_insert(key) {
            Ok(owned) => {
                let idx = self.bucket_of(key);
                let k = self.entries.insert(Entry {
                    key: owned,
                    value,
                    next: self.buckets[idx],
                });
                self.buckets[idx] = Some(k);
                Ok(())
            }
            Err(error) => Err(InsertError { error, value }),
        }
    }

    // Grows if needed and copies the key; everything fallible happens here,
    // before the entry is linked.
    fn prepare_insert(&mut self, key: &str) -> Result<Box<str>, TableError> {
        if self.len() as f64 > self.max_load_factor * self.capacity() as f64 {
            self.grow()?;
        }
        copy_key(key).inspect_err(|_| {
            tracing::warn!(key_len = key.len(), "key copy allocation failed");
        })
    }

    /// Doubles the bucket array and relinks every entry into it. Entries
    /// are moved head-first, so chain order comes out reversed.
    fn grow(&mut self) -> Result<(), TableError> {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow)?;
        let fresh = alloc_buckets(new_capacity).inspect_err(|_| {
            tracing::warn!(new_capacity, "bucket array allocation failed during growth");
        })?;

        let old = core::mem::replace(&mut self.buckets, fresh);
        for head in old {
            let mut cur = head;
            while let Some(k) = cur {
                let e = &mut self.entries[k];
                cur = e.next;
                let idx = bucket_index(&self.hasher, &e.key, new_capacity);
                e.next = self.buckets[idx];
                self.buckets[idx] = Some(k);
            }
        }

        tracing::debug!(
            old_capacity,
            new_capacity,
            len = self.entries.len(),
            "grew bucket array"
        );
        Ok(())
    }

    /// Unlinks the entry for `key` and returns its value. The key copy is
    /// freed; disposing of the value is up to the caller.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        let idx = self.bucket_of(key);
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.buckets[idx];
        while let Some(k) = cur {
            let e = &self.entries[k];
            if *e.key == *key {
                break;
            }
            prev = cur;
            cur = e.next;
        }

        let entry = self.entries.remove(cur?)?;
        match prev {
            None => self.buckets[idx] = entry.next,
            Some(p) => self.entries[p].next = entry.next,
        }
        Some(entry.value)
    }

    /// Tears the table down, handing every value to `cleanup` exactly once.
    pub fn destroy_with<F>(mut self, mut cleanup: F)
    where
        F: FnMut(V),
    {
        let released = self.release(&mut cleanup);
        tracing::trace!(released, "table destroyed");
    }

    /// Tears the table down, dropping the value handles without a callback.
    pub fn destroy(self) {
        self.destroy_with(drop)
    }

    fn release<F: FnMut(V)>(&mut self, cleanup: &mut F) -> usize {
        let mut released = 0;
        for bucket in self.buckets.iter_mut() {
            let mut cur = bucket.take();
            while let Some(k) = cur {
                let Some(Entry { key, value, next }) = self.entries.remove(k) else {
                    break;
                };
                cur = next;
                cleanup(value);
                drop(key);
                released += 1;
            }
        }
        self.buckets = Vec::new();
        released
    }

    pub fn stats(&self) -> TableStats {
        let mut empty_buckets = 0;
        let mut longest_chain = 0;
        for &head in &self.buckets {
            let mut n = 0;
            let mut cur = head;
            while let Some(k) = cur {
                n += 1;
                cur = self.entries[k].next;
            }
            if n == 0 {
                empty_buckets += 1;
            }
            longest_chain = longest_chain.max(n);
        }
        TableStats {
            len: self.len(),
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            empty_buckets,
            longest_chain,
        }
    }

    /// Walks every chain and checks placement and counts.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut seen = 0;
        for (i, &head) in self.buckets.iter().enumerate() {
            let mut cur = head;
            while let Some(k) = cur {
                let e = self.entries.get(k).expect("chain links a live entry");
                assert_eq!(
                    bucket_index(&self.hasher, &e.key, self.buckets.len()),
                    i,
                    "entry {:?} in the wrong bucket",
                    e.key
                );
                seen += 1;
                cur = e.next;
            }
        }
        assert_eq!(seen, self.entries.len(), "every entry is on exactly one chain");
    }
}

impl<V, H> fmt::Debug for ChainedTable<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedTable")
            .field("len", &self.entries.len())
            .field("capacity", &self.buckets.len())
            .finish_non_exhaustive()
    }
}
