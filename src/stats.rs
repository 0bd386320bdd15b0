//! Player statistics model

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

/// Largest value a counter can hold (the SQL integer range)
pub const COUNTER_MAX: u64 = i64::MAX as u64;

/// One player's accumulated statistics
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatRecord {
    /// Unique player identifier (primary key)
    pub player_id: String,

    /// Observed network addresses, oldest first. Append-only, may repeat.
    pub ip_addresses: Vec<String>,

    pub deaths: u64,
    pub scp_kills: u64,
    pub human_kills: u64,

    /// Total play time across sessions
    pub play_time_seconds: u64,

    /// Unix timestamp of the last session, overwritten on each update
    pub last_played: i64,
}

impl StatRecord {
    /// Create a zeroed record for a player seen for the first time
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            ..Self::default()
        }
    }

    /// Fail with `BadArguments` if any counter is above `COUNTER_MAX`
    pub fn check_counters(&self) -> Result<()> {
        for counter in Counter::ALL {
            let value = counter.get(self);
            if value > COUNTER_MAX {
                return Err(StatsError::BadArguments(format!(
                    "{} value {} exceeds storage range",
                    counter.column(),
                    value
                )));
            }
        }
        Ok(())
    }

    /// Total kills of either kind
    pub fn total_kills(&self) -> u64 {
        self.scp_kills.saturating_add(self.human_kills)
    }

    /// Kills per death. A player with no deaths reports their kill count.
    pub fn kill_death_ratio(&self) -> f64 {
        let deaths = self.deaths.max(1);
        self.total_kills() as f64 / deaths as f64
    }
}

/// Counters that are only ever incremented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Deaths,
    ScpKills,
    HumanKills,
    PlayTime,
}

impl Counter {
    pub const ALL: [Counter; 4] = [
        Counter::Deaths,
        Counter::ScpKills,
        Counter::HumanKills,
        Counter::PlayTime,
    ];

    /// Column holding this counter in the relational store
    pub fn column(self) -> &'static str {
        match self {
            Counter::Deaths => "deaths",
            Counter::ScpKills => "scp_kills",
            Counter::HumanKills => "human_kills",
            Counter::PlayTime => "play_time",
        }
    }

    pub fn get(self, record: &StatRecord) -> u64 {
        match self {
            Counter::Deaths => record.deaths,
            Counter::ScpKills => record.scp_kills,
            Counter::HumanKills => record.human_kills,
            Counter::PlayTime => record.play_time_seconds,
        }
    }

    /// Add `delta` to `current`, saturating at `COUNTER_MAX`
    pub fn saturating_add(current: u64, delta: u64) -> u64 {
        current.saturating_add(delta).min(COUNTER_MAX)
    }

    /// Mutable access to the matching field of an in-memory record
    pub fn field_mut(self, record: &mut StatRecord) -> &mut u64 {
        match self {
            Counter::Deaths => &mut record.deaths,
            Counter::ScpKills => &mut record.scp_kills,
            Counter::HumanKills => &mut record.human_kills,
            Counter::PlayTime => &mut record.play_time_seconds,
        }
    }
}
