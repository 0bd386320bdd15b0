//! SQLite repository
//!
//! ## Table Layout
//! ```text
//! player_stats
//! ┌────────────┬──────────────┬────────┬───────────┬─────────────┬───────────┬─────────────┐
//! │ player_id  │ ip_addresses │ deaths │ scp_kills │ human_kills │ play_time │ last_played │
//! │ TEXT (PK)  │ BLOB         │ INT    │ INT       │ INT         │ INT       │ INT         │
//! └────────────┴──────────────┴────────┴───────────┴─────────────┴───────────┴─────────────┘
//! ```
//!
//! `ip_addresses` holds the bincode encoding of the address list.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};

use crate::error::{Result, StatsError};
use crate::stats::{Counter, StatRecord, COUNTER_MAX};
use super::StatsRepository;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS player_stats (
    player_id    TEXT PRIMARY KEY NOT NULL,
    ip_addresses BLOB NOT NULL,
    deaths       INTEGER NOT NULL DEFAULT 0 CHECK (deaths >= 0),
    scp_kills    INTEGER NOT NULL DEFAULT 0 CHECK (scp_kills >= 0),
    human_kills  INTEGER NOT NULL DEFAULT 0 CHECK (human_kills >= 0),
    play_time    INTEGER NOT NULL DEFAULT 0 CHECK (play_time >= 0),
    last_played  INTEGER NOT NULL DEFAULT 0
);
";

/// Raw column values of one row, before range checks
type RawRow = (String, Vec<u8>, i64, i64, i64, i64, i64);

/// Statistics store backed by a single SQLite connection
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StatsError::StorageUnavailable(format!("cannot open {}: {}", path.display(), e))
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(storage_error)?;

        tracing::debug!("Opened sqlite database at {}", path.display());
        Self::init(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(storage_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored records
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM player_stats", [], |row| row.get(0))
            .map_err(storage_error)?;
        from_sql_int("count", count)
    }

    /// Fail with `NotFound` when an UPDATE touched no row
    fn expect_row(player_id: &str, changed: usize) -> Result<()> {
        if changed == 0 {
            return Err(StatsError::NotFound(player_id.to_string()));
        }
        Ok(())
    }
}

impl StatsRepository for SqliteRepository {
    fn exists(&self, player_id: &str) -> Result<bool> {
        let found = self
            .conn
            .lock()
            .query_row(
                "SELECT 1 FROM player_stats WHERE player_id = ?1",
                params![player_id],
                |_| Ok(()),
            )
            .optional()
            .map_err(storage_error)?;
        Ok(found.is_some())
    }

    fn insert(&self, record: &StatRecord) -> Result<()> {
        record.check_counters()?;
        let ips = encode_ips(&record.ip_addresses)?;
        self.conn
            .lock()
            .execute(
                "INSERT INTO player_stats
                     (player_id, ip_addresses, deaths, scp_kills, human_kills, play_time, last_played)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.player_id,
                    ips,
                    to_sql_int("deaths", record.deaths)?,
                    to_sql_int("scp_kills", record.scp_kills)?,
                    to_sql_int("human_kills", record.human_kills)?,
                    to_sql_int("play_time", record.play_time_seconds)?,
                    record.last_played,
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref err, _)
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    StatsError::DuplicateKey(record.player_id.clone())
                }
                other => storage_error(other),
            })?;
        Ok(())
    }

    fn replace(&self, player_id: &str, record: &StatRecord) -> Result<()> {
        record.check_counters()?;
        let ips = encode_ips(&record.ip_addresses)?;
        let changed = self
            .conn
            .lock()
            .execute(
                "UPDATE player_stats
                 SET ip_addresses = ?1, deaths = ?2, scp_kills = ?3, human_kills = ?4,
                     play_time = ?5, last_played = ?6
                 WHERE player_id = ?7",
                params![
                    ips,
                    to_sql_int("deaths", record.deaths)?,
                    to_sql_int("scp_kills", record.scp_kills)?,
                    to_sql_int("human_kills", record.human_kills)?,
                    to_sql_int("play_time", record.play_time_seconds)?,
                    record.last_played,
                    player_id,
                ],
            )
            .map_err(storage_error)?;
        Self::expect_row(player_id, changed)
    }

    fn append_ip_address(&self, player_id: &str, ip: &str) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(storage_error)?;

        let stored: Vec<u8> = tx
            .query_row(
                "SELECT ip_addresses FROM player_stats WHERE player_id = ?1",
                params![player_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_error)?
            .ok_or_else(|| StatsError::NotFound(player_id.to_string()))?;

        let mut ips = decode_ips(&stored)?;
        ips.push(ip.to_string());

        tx.execute(
            "UPDATE player_stats SET ip_addresses = ?1 WHERE player_id = ?2",
            params![encode_ips(&ips)?, player_id],
        )
        .map_err(storage_error)?;
        tx.commit().map_err(storage_error)?;

        Ok(ips.len())
    }

    fn increment(&self, player_id: &str, counter: Counter, delta: u64) -> Result<()> {
        // Column names come from a closed enum, never from the wire.
        // The CASE keeps the sum inside the INTEGER range; SQLite would
        // otherwise promote the column to REAL.
        let sql = format!(
            "UPDATE player_stats
             SET {col} = CASE WHEN {col} > ?1 - ?2 THEN ?1 ELSE {col} + ?2 END
             WHERE player_id = ?3",
            col = counter.column()
        );
        let delta = to_sql_int(counter.column(), delta.min(COUNTER_MAX))?;
        let changed = self
            .conn
            .lock()
            .execute(&sql, params![i64::MAX, delta, player_id])
            .map_err(storage_error)?;
        Self::expect_row(player_id, changed)
    }

    fn set_last_played(&self, player_id: &str, epoch_seconds: i64) -> Result<()> {
        let changed = self
            .conn
            .lock()
            .execute(
                "UPDATE player_stats SET last_played = ?1 WHERE player_id = ?2",
                params![epoch_seconds, player_id],
            )
            .map_err(storage_error)?;
        Self::expect_row(player_id, changed)
    }

    fn get(&self, player_id: &str) -> Result<StatRecord> {
        let raw: Option<RawRow> = self
            .conn
            .lock()
            .query_row(
                "SELECT player_id, ip_addresses, deaths, scp_kills, human_kills, play_time, last_played
                 FROM player_stats WHERE player_id = ?1",
                params![player_id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                    ))
                },
            )
            .optional()
            .map_err(storage_error)?;

        let (player_id, ips, deaths, scp_kills, human_kills, play_time, last_played) =
            raw.ok_or_else(|| StatsError::NotFound(player_id.to_string()))?;

        Ok(StatRecord {
            player_id,
            ip_addresses: decode_ips(&ips)?,
            deaths: from_sql_int("deaths", deaths)?,
            scp_kills: from_sql_int("scp_kills", scp_kills)?,
            human_kills: from_sql_int("human_kills", human_kills)?,
            play_time_seconds: from_sql_int("play_time", play_time)?,
            last_played,
        })
    }

    fn ensure_exists(&self, player_id: &str) -> Result<bool> {
        let changed = self
            .conn
            .lock()
            .execute(
                "INSERT OR IGNORE INTO player_stats (player_id, ip_addresses) VALUES (?1, ?2)",
                params![player_id, encode_ips(&[])?],
            )
            .map_err(storage_error)?;
        Ok(changed == 1)
    }
}

// =============================================================================
// Column conversions
// =============================================================================

fn storage_error(e: rusqlite::Error) -> StatsError {
    StatsError::StorageUnavailable(e.to_string())
}

fn encode_ips(ips: &[String]) -> Result<Vec<u8>> {
    bincode::serialize(ips).map_err(|e| StatsError::Serialization(e.to_string()))
}

fn decode_ips(bytes: &[u8]) -> Result<Vec<String>> {
    bincode::deserialize(bytes).map_err(|e| StatsError::Serialization(e.to_string()))
}

/// SQLite integers are signed 64-bit
fn to_sql_int(column: &str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| {
        StatsError::BadArguments(format!("{} value {} exceeds storage range", column, value))
    })
}

fn from_sql_int(column: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        StatsError::Serialization(format!("stored {} is negative: {}", column, value))
    })
}
