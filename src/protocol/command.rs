//! Command definitions
//!
//! Represents frames and commands received from the game server.

use crate::stats::{Counter, StatRecord};
use super::payload::encode_stat_payload;

/// A decoded but not yet interpreted protocol line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// First token of the line
    pub command: String,

    /// Remaining tokens, in order
    pub args: Vec<String>,
}

/// Every command the protocol understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Insert,
    Check,
    Update,
    AddIpAddress,
    AddDeaths,
    AddScpKills,
    AddHumanKills,
    AddPlayTime,
    SetLastPlayed,
}

impl CommandType {
    pub const ALL: [CommandType; 9] = [
        CommandType::Insert,
        CommandType::Check,
        CommandType::Update,
        CommandType::AddIpAddress,
        CommandType::AddDeaths,
        CommandType::AddScpKills,
        CommandType::AddHumanKills,
        CommandType::AddPlayTime,
        CommandType::SetLastPlayed,
    ];

    /// Look up a command by its wire name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Wire name of the command
    pub fn name(self) -> &'static str {
        match self {
            CommandType::Insert => "Insert",
            CommandType::Check => "Check",
            CommandType::Update => "Update",
            CommandType::AddIpAddress => "AddIpAddress",
            CommandType::AddDeaths => "AddDeaths",
            CommandType::AddScpKills => "AddScpKills",
            CommandType::AddHumanKills => "AddHumanKills",
            CommandType::AddPlayTime => "AddPlayTime",
            CommandType::SetLastPlayed => "SetLastPlayed",
        }
    }

    /// Minimum number of positional arguments
    pub fn required_args(self) -> usize {
        match self {
            CommandType::Insert | CommandType::Check => 1,
            _ => 2,
        }
    }
}

/// A fully decoded command, ready to run against a repository
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a record from a full payload
    Insert { record: StatRecord },

    /// Create a zeroed record unless one exists
    Check { player_id: String },

    /// Overwrite every mutable field of an existing record
    Update { player_id: String, record: StatRecord },

    /// Append one address to the ip history
    AddIpAddress { player_id: String, ip: String },

    /// Add to one of the monotonic counters
    Increment { player_id: String, counter: Counter, delta: u64 },

    /// Overwrite the last-played timestamp
    SetLastPlayed { player_id: String, epoch_seconds: i64 },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Insert { .. } => CommandType::Insert,
            Command::Check { .. } => CommandType::Check,
            Command::Update { .. } => CommandType::Update,
            Command::AddIpAddress { .. } => CommandType::AddIpAddress,
            Command::Increment { counter, .. } => match counter {
                Counter::Deaths => CommandType::AddDeaths,
                Counter::ScpKills => CommandType::AddScpKills,
                Counter::HumanKills => CommandType::AddHumanKills,
                Counter::PlayTime => CommandType::AddPlayTime,
            },
            Command::SetLastPlayed { .. } => CommandType::SetLastPlayed,
        }
    }

    /// Player the command addresses
    pub fn player_id(&self) -> &str {
        match self {
            Command::Insert { record } => &record.player_id,
            Command::Check { player_id }
            | Command::Update { player_id, .. }
            | Command::AddIpAddress { player_id, .. }
            | Command::Increment { player_id, .. }
            | Command::SetLastPlayed { player_id, .. } => player_id,
        }
    }

    /// Encode as a protocol line, without the trailing newline
    pub fn encode(&self) -> String {
        let name = self.command_type().name();
        match self {
            Command::Insert { record } => format!("{} {}", name, encode_stat_payload(record)),
            Command::Check { player_id } => format!("{} {}", name, player_id),
            Command::Update { player_id, record } => {
                format!("{} {} {}", name, player_id, encode_stat_payload(record))
            }
            Command::AddIpAddress { player_id, ip } => format!("{} {} {}", name, player_id, ip),
            Command::Increment { player_id, delta, .. } => {
                format!("{} {} {}", name, player_id, delta)
            }
            Command::SetLastPlayed { player_id, epoch_seconds } => {
                format!("{} {} {}", name, player_id, epoch_seconds)
            }
        }
    }
}
