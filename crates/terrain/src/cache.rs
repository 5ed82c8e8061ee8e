use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::tile::TileKey;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBudget {
    pub max_bytes: usize,
}

impl MemoryBudget {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Residency {
    /// Requested from a provider, no data yet.
    Requested,
    Resident,
    Evicted,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    residency: Residency,
    value: Option<V>,
    bytes: usize,
    last_used_tick: u64,
    pin_count: u32,
}

/// Tile data cache with a byte budget.
///
/// - Entries live in a `BTreeMap` so traversal order is stable.
/// - Eviction is LRU by `last_used_tick`, ties broken by key ordering.
/// - Evicted entries keep their slot so a later request is cheap to track.
#[derive(Debug)]
pub struct TileCache<V> {
    budget: MemoryBudget,
    used_bytes: usize,
    tick: u64,
    entries: BTreeMap<TileKey, CacheEntry<V>>,
}

impl<V> TileCache<V> {
    pub fn new(budget: MemoryBudget) -> Self {
        Self {
            budget,
            used_bytes: 0,
            tick: 0,
            entries: BTreeMap::new(),
        }
    }

    pub fn budget(&self) -> MemoryBudget {
        self.budget
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self, key: &TileKey) -> Option<Residency> {
        self.entries.get(key).map(|e| e.residency)
    }

    /// Records that data for `key` has been asked for. Returns `false` when
    /// the tile is already resident or in flight.
    pub fn request(&mut self, key: TileKey) -> bool {
        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.entry(key).or_insert_with(|| CacheEntry {
            residency: Residency::Evicted,
            value: None,
            bytes: 0,
            last_used_tick: tick,
            pin_count: 0,
        });
        entry.last_used_tick = tick;
        if entry.residency == Residency::Evicted {
            entry.residency = Residency::Requested;
            true
        } else {
            false
        }
    }

    /// Keys waiting on data, oldest request first.
    pub fn pending(&self) -> Vec<TileKey> {
        let mut keys: Vec<(u64, TileKey)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.residency == Residency::Requested)
            .map(|(k, e)| (e.last_used_tick, *k))
            .collect();
        keys.sort();
        keys.into_iter().map(|(_, k)| k).collect()
    }

    /// Stores `value` and evicts least recently used entries until the cache
    /// fits its budget again. Returns the evicted keys.
    pub fn insert(&mut self, key: TileKey, value: V, bytes: usize) -> Result<Vec<TileKey>, CacheError> {
        if bytes > self.budget.max_bytes {
            return Err(CacheError::BudgetExceeded {
                requested: bytes,
                max: self.budget.max_bytes,
            });
        }

        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.entry(key).or_insert_with(|| CacheEntry {
            residency: Residency::Evicted,
            value: None,
            bytes: 0,
            last_used_tick: tick,
            pin_count: 0,
        });

        if entry.residency == Residency::Resident {
            self.used_bytes = self.used_bytes.saturating_sub(entry.bytes);
        }

        entry.value = Some(value);
        entry.bytes = bytes;
        entry.residency = Residency::Resident;
        entry.last_used_tick = tick;
        self.used_bytes += bytes;

        self.evict_as_needed(Some(&key))
    }

    /// Resident value for `key`, marking it recently used.
    pub fn get(&mut self, key: &TileKey) -> Option<&V> {
        self.tick += 1;
        let entry = self.entries.get_mut(key)?;
        entry.last_used_tick = self.tick;
        entry.value.as_ref()
    }

    /// Like [`TileCache::get`] without touching the LRU order.
    pub fn peek(&self, key: &TileKey) -> Option<&V> {
        self.entries.get(key).and_then(|e| e.value.as_ref())
    }

    pub fn pin(&mut self, key: &TileKey) -> Result<(), CacheError> {
        let entry = self.entries.get_mut(key).ok_or(CacheError::UnknownKey(*key))?;
        entry.pin_count = entry.pin_count.saturating_add(1);
        Ok(())
    }

    pub fn unpin(&mut self, key: &TileKey) -> Result<(), CacheError> {
        let entry = self.entries.get_mut(key).ok_or(CacheError::UnknownKey(*key))?;
        entry.pin_count = entry.pin_count.saturating_sub(1);
        Ok(())
    }

    pub fn evict(&mut self, key: &TileKey) -> Result<(), CacheError> {
        let entry = self.entries.get_mut(key).ok_or(CacheError::UnknownKey(*key))?;
        if entry.residency == Residency::Resident {
            self.used_bytes = self.used_bytes.saturating_sub(entry.bytes);
        }
        entry.value = None;
        entry.bytes = 0;
        entry.residency = Residency::Evicted;
        Ok(())
    }

    fn evict_as_needed(&mut self, protected: Option<&TileKey>) -> Result<Vec<TileKey>, CacheError> {
        let mut evicted = Vec::new();
        while self.used_bytes > self.budget.max_bytes {
            let pick = |exclude: Option<&TileKey>| {
                self.entries
                    .iter()
                    .filter(|(k, e)| {
                        e.residency == Residency::Resident
                            && e.pin_count == 0
                            && exclude.map(|p| p != *k).unwrap_or(true)
                    })
                    .min_by(|(ka, ea), (kb, eb)| {
                        ea.last_used_tick
                            .cmp(&eb.last_used_tick)
                            .then_with(|| ka.cmp(kb))
                    })
                    .map(|(k, _)| *k)
            };

            // The entry just inserted goes last, unless everything else is pinned.
            let Some(key) = pick(protected).or_else(|| pick(None)) else {
                return Err(CacheError::NoEvictableEntries);
            };

            self.evict(&key)?;
            evicted.push(key);
        }
        Ok(evicted)
    }
}
