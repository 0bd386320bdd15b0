//! Protocol Module
//!
//! Defines the line protocol spoken by the game server.
//!
//! ## Frame Format
//! ```text
//! <Command> <arg1> [arg2 ...]\n
//! ```
//!
//! ### Commands
//! - Insert        <payload>
//! - Check         <playerId>
//! - Update        <playerId> <payload>
//! - AddIpAddress  <playerId> <ip>
//! - AddDeaths     <playerId> <n>
//! - AddScpKills   <playerId> <n>
//! - AddHumanKills <playerId> <n>
//! - AddPlayTime   <playerId> <seconds>
//! - SetLastPlayed <playerId> <epochSeconds>
//!
//! ### Payload
//! ```text
//! playerId,ip1;ip2;...,deaths,scpKills,humanKills,playTimeSeconds,lastPlayedEpoch
//! ```
//!
//! There are no responses: the feed is one-way.

mod command;
mod outcome;
mod codec;
mod payload;

pub use command::{Command, CommandType, Frame};
pub use outcome::Outcome;
pub use codec::{decode_line, read_frame, write_frame, MAX_FRAME_LEN};
pub use payload::{decode_stat_payload, decode_tolerant, encode_stat_payload, PAYLOAD_FIELDS};
