//! Stat payload codec
//!
//! ```text
//! playerId,ip1;ip2;...,deaths,scpKills,humanKills,playTimeSeconds,lastPlayedEpoch
//! ```

use std::str::FromStr;

use crate::error::{Result, StatsError};
use crate::stats::StatRecord;

/// Number of comma-separated subfields in a payload
pub const PAYLOAD_FIELDS: usize = 7;

const FIELD_SEPARATOR: char = ',';
const IP_SEPARATOR: &str = ";";

/// Decode a stat payload into a record.
///
/// Numeric subfields that do not parse decode to zero.
pub fn decode_stat_payload(field: &str) -> Result<StatRecord> {
    let parts: Vec<&str> = field.split(FIELD_SEPARATOR).collect();
    if parts.len() != PAYLOAD_FIELDS {
        return Err(StatsError::MalformedCommand(format!(
            "stat payload: expected {} fields, got {}",
            PAYLOAD_FIELDS,
            parts.len()
        )));
    }

    let ip_addresses = if parts[1].is_empty() {
        Vec::new()
    } else {
        parts[1].split(IP_SEPARATOR).map(str::to_string).collect()
    };

    Ok(StatRecord {
        player_id: parts[0].to_string(),
        ip_addresses,
        deaths: decode_tolerant("deaths", parts[2]),
        scp_kills: decode_tolerant("scpKills", parts[3]),
        human_kills: decode_tolerant("humanKills", parts[4]),
        play_time_seconds: decode_tolerant("playTime", parts[5]),
        last_played: decode_tolerant("lastPlayed", parts[6]),
    })
}

/// Encode a record in payload form
pub fn encode_stat_payload(record: &StatRecord) -> String {
    let ips = record.ip_addresses.join(IP_SEPARATOR);
    format!(
        "{},{},{},{},{},{},{}",
        record.player_id,
        ips,
        record.deaths,
        record.scp_kills,
        record.human_kills,
        record.play_time_seconds,
        record.last_played
    )
}

/// Parse an integer token, substituting zero when it is not a valid `T`.
///
/// Counters are unsigned, so a negative token also decodes to zero.
pub fn decode_tolerant<T>(field: &str, raw: &str) -> T
where
    T: FromStr + Default,
{
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(field, raw, "invalid integer, substituting 0");
            T::default()
        }
    }
}
