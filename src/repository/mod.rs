//! Repository Module
//!
//! Persistence boundary for player statistics.
//!
//! ## Responsibilities
//! - Keyed create / replace / read of whole records
//! - Atomic field-level mutations (counter increments, ip append)
//! - Uniqueness of player ids
//!
//! ## Backends
//! - `MemoryRepository`: BTreeMap behind a RwLock, for tests and dry runs
//! - `SqliteRepository`: one `player_stats` table, the production store

mod memory;
mod sqlite;

pub use memory::MemoryRepository;
pub use sqlite::SqliteRepository;

use crate::error::Result;
use crate::stats::{Counter, StatRecord};

/// Storage operations the dispatcher relies on, all keyed by player id
pub trait StatsRepository {
    /// Whether a record exists for the player
    fn exists(&self, player_id: &str) -> Result<bool>;

    /// Create a record. Fails with `DuplicateKey` if the id is taken.
    fn insert(&self, record: &StatRecord) -> Result<()>;

    /// Overwrite every mutable field of the addressed record.
    ///
    /// The stored id is `player_id`, whatever `record.player_id` says.
    /// Fails with `NotFound` if absent.
    fn replace(&self, player_id: &str, record: &StatRecord) -> Result<()>;

    /// Append one address to the ip history and return the new length.
    /// Fails with `NotFound` if absent.
    fn append_ip_address(&self, player_id: &str, ip: &str) -> Result<usize>;

    /// `counter = counter + delta`, as one atomic update.
    /// Fails with `NotFound` if absent.
    fn increment(&self, player_id: &str, counter: Counter, delta: u64) -> Result<()>;

    /// Overwrite the last-played timestamp. Fails with `NotFound` if absent.
    fn set_last_played(&self, player_id: &str, epoch_seconds: i64) -> Result<()>;

    /// Fetch a record. Fails with `NotFound` if absent.
    fn get(&self, player_id: &str) -> Result<StatRecord>;

    /// Create a zeroed record unless one exists. Returns true if created.
    ///
    /// Backends override this with an atomic create-if-absent.
    fn ensure_exists(&self, player_id: &str) -> Result<bool> {
        if self.exists(player_id)? {
            return Ok(false);
        }
        self.insert(&StatRecord::new(player_id))?;
        Ok(true)
    }
}
