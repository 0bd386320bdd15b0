//! In-memory repository
//!
//! BTreeMap-based store with RwLock for concurrency.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::{Result, StatsError};
use crate::stats::{Counter, StatRecord};
use super::StatsRepository;

/// Process-local statistics store
#[derive(Debug, Default)]
pub struct MemoryRepository {
    records: RwLock<BTreeMap<String, StatRecord>>,
}

impl MemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Run `f` against the addressed record under the write lock
    fn with_record<T>(&self, player_id: &str, f: impl FnOnce(&mut StatRecord) -> T) -> Result<T> {
        let mut records = self.records.write();
        let record = records
            .get_mut(player_id)
            .ok_or_else(|| StatsError::NotFound(player_id.to_string()))?;
        Ok(f(record))
    }
}

impl StatsRepository for MemoryRepository {
    fn exists(&self, player_id: &str) -> Result<bool> {
        Ok(self.records.read().contains_key(player_id))
    }

    fn insert(&self, record: &StatRecord) -> Result<()> {
        record.check_counters()?;
        match self.records.write().entry(record.player_id.clone()) {
            Entry::Occupied(_) => Err(StatsError::DuplicateKey(record.player_id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    fn replace(&self, player_id: &str, record: &StatRecord) -> Result<()> {
        record.check_counters()?;
        self.with_record(player_id, |stored| {
            *stored = StatRecord {
                player_id: player_id.to_string(),
                ..record.clone()
            };
        })
    }

    fn append_ip_address(&self, player_id: &str, ip: &str) -> Result<usize> {
        self.with_record(player_id, |stored| {
            stored.ip_addresses.push(ip.to_string());
            stored.ip_addresses.len()
        })
    }

    fn increment(&self, player_id: &str, counter: Counter, delta: u64) -> Result<()> {
        self.with_record(player_id, |stored| {
            let field = counter.field_mut(stored);
            *field = Counter::saturating_add(*field, delta);
        })
    }

    fn set_last_played(&self, player_id: &str, epoch_seconds: i64) -> Result<()> {
        self.with_record(player_id, |stored| stored.last_played = epoch_seconds)
    }

    fn get(&self, player_id: &str) -> Result<StatRecord> {
        self.records
            .read()
            .get(player_id)
            .cloned()
            .ok_or_else(|| StatsError::NotFound(player_id.to_string()))
    }

    fn ensure_exists(&self, player_id: &str) -> Result<bool> {
        match self.records.write().entry(player_id.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(StatRecord::new(player_id));
                Ok(true)
            }
        }
    }
}
