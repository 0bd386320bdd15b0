//! Dispatcher Module
//!
//! Turns decoded frames into typed commands and runs them against a
//! repository.
//!
//! ## Responsibilities
//! - Resolve the command name against the closed command table
//! - Check argument counts; extra arguments are ignored
//! - Decode numeric arguments tolerantly (invalid → 0)
//! - Apply the command and report what changed

use crate::error::{Result, StatsError};
use crate::protocol::{decode_stat_payload, decode_tolerant, Command, CommandType, Frame, Outcome};
use crate::repository::StatsRepository;
use crate::stats::Counter;

/// Routes commands to a repository
pub struct Dispatcher<R> {
    repository: R,
}

impl<R: StatsRepository> Dispatcher<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Decode a frame and apply it
    pub fn dispatch(&self, frame: &Frame) -> Result<Outcome> {
        let command = parse_command(frame)?;
        self.execute(command)
    }

    /// Apply an already decoded command
    pub fn execute(&self, command: Command) -> Result<Outcome> {
        match command {
            Command::Insert { record } => {
                self.repository.insert(&record)?;
                Ok(Outcome::Inserted)
            }
            Command::Check { player_id } => {
                if self.repository.ensure_exists(&player_id)? {
                    Ok(Outcome::Created)
                } else {
                    Ok(Outcome::AlreadyPresent)
                }
            }
            Command::Update { player_id, record } => {
                self.repository.replace(&player_id, &record)?;
                Ok(Outcome::Replaced)
            }
            Command::AddIpAddress { player_id, ip } => {
                let history_len = self.repository.append_ip_address(&player_id, &ip)?;
                Ok(Outcome::IpAppended { history_len })
            }
            Command::Increment { player_id, counter, delta } => {
                self.repository.increment(&player_id, counter, delta)?;
                Ok(Outcome::Incremented)
            }
            Command::SetLastPlayed { player_id, epoch_seconds } => {
                self.repository.set_last_played(&player_id, epoch_seconds)?;
                Ok(Outcome::LastPlayedSet)
            }
        }
    }

    /// Access the underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }
}

/// Resolve a frame into a typed command
pub fn parse_command(frame: &Frame) -> Result<Command> {
    let ty = CommandType::from_name(&frame.command)
        .ok_or_else(|| StatsError::UnknownCommand(frame.command.clone()))?;

    let args = &frame.args;
    if args.len() < ty.required_args() {
        return Err(StatsError::BadArguments(format!(
            "{} expects {} argument(s), got {}",
            ty.name(),
            ty.required_args(),
            args.len()
        )));
    }

    let player_id = || args[0].clone();

    let command = match ty {
        CommandType::Insert => Command::Insert {
            record: decode_stat_payload(&args[0])?,
        },
        CommandType::Check => Command::Check {
            player_id: player_id(),
        },
        CommandType::Update => Command::Update {
            player_id: player_id(),
            record: decode_stat_payload(&args[1])?,
        },
        CommandType::AddIpAddress => Command::AddIpAddress {
            player_id: player_id(),
            ip: args[1].clone(),
        },
        CommandType::AddDeaths => increment(player_id(), Counter::Deaths, &args[1]),
        CommandType::AddScpKills => increment(player_id(), Counter::ScpKills, &args[1]),
        CommandType::AddHumanKills => increment(player_id(), Counter::HumanKills, &args[1]),
        CommandType::AddPlayTime => increment(player_id(), Counter::PlayTime, &args[1]),
        CommandType::SetLastPlayed => Command::SetLastPlayed {
            player_id: player_id(),
            epoch_seconds: decode_tolerant("epochSeconds", &args[1]),
        },
    };

    Ok(command)
}

fn increment(player_id: String, counter: Counter, raw: &str) -> Command {
    Command::Increment {
        player_id,
        counter,
        delta: decode_tolerant(counter.column(), raw),
    }
}
