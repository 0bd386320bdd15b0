//! Protocol codec
//!
//! Line framing and tokenizing for the wire protocol.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────┬───┬────────┬───┬────────┬─────┬────┐
//! │ Command  │ ␠ │  Arg1  │ ␠ │  Arg2  │ ... │ \n │
//! └──────────┴───┴────────┴───┴────────┴─────┴────┘
//! ```
//!
//! Tokens are separated by exactly one space. Payload arguments carry their
//! own comma/semicolon structure (see `payload`).

use std::io::{BufRead, Read, Write};

use crate::error::{Result, StatsError};
use super::Frame;

/// Frame terminator
pub const FRAME_DELIMITER: u8 = b'\n';

/// Token separator within a frame
pub const ARG_SEPARATOR: char = ' ';

/// Longest frame accepted, excluding the `\r\n` or `\n` terminator (64 KB)
pub const MAX_FRAME_LEN: usize = 64 * 1024;

// =============================================================================
// Line Decoding
// =============================================================================

/// Split a frame into its command name and positional arguments
pub fn decode_line(raw: &str) -> Result<Frame> {
    if raw.is_empty() {
        return Err(StatsError::MalformedCommand("empty frame".to_string()));
    }

    let mut tokens = raw.split(ARG_SEPARATOR);
    let command = tokens.next().unwrap_or_default().to_string();
    if command.is_empty() {
        return Err(StatsError::MalformedCommand(format!(
            "frame starts with a separator: {:?}",
            raw
        )));
    }

    Ok(Frame {
        command,
        args: tokens.map(str::to_string).collect(),
    })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read the next complete frame from a stream
///
/// Returns the line without its delimiter (a trailing `\r` is dropped too),
/// or `None` once the stream ends. A fragment not terminated before end of
/// stream is discarded. Oversized frames are skipped up to the next delimiter
/// and reported as `MalformedCommand`; the stream stays usable.
pub fn read_frame<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    // Room for the frame plus an optional `\r` and the delimiter
    let limit = MAX_FRAME_LEN + 2;
    let mut line = Vec::new();
    let read = reader
        .by_ref()
        .take(limit as u64)
        .read_until(FRAME_DELIMITER, &mut line)?;

    if read == 0 {
        return Ok(None);
    }

    if line.last() != Some(&FRAME_DELIMITER) {
        if line.len() == limit {
            if !skip_past_delimiter(reader)? {
                return Ok(None);
            }
            return Err(oversized());
        }

        tracing::debug!(bytes = line.len(), "discarding unterminated trailing frame");
        return Ok(None);
    }

    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }

    if line.len() > MAX_FRAME_LEN {
        return Err(oversized());
    }

    Ok(Some(line))
}

fn oversized() -> StatsError {
    StatsError::MalformedCommand(format!("frame exceeds {} bytes", MAX_FRAME_LEN))
}

/// Consume bytes up to and including the next delimiter.
///
/// Returns false if the stream ended first.
fn skip_past_delimiter<R: BufRead>(reader: &mut R) -> Result<bool> {
    loop {
        let (found, used) = {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(false);
            }
            match buf.iter().position(|&b| b == FRAME_DELIMITER) {
                Some(pos) => (true, pos + 1),
                None => (false, buf.len()),
            }
        };
        reader.consume(used);
        if found {
            return Ok(true);
        }
    }
}

/// Write a frame to a stream, appending the delimiter
pub fn write_frame<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    if line.contains(FRAME_DELIMITER as char) {
        return Err(StatsError::MalformedCommand(
            "frame contains an embedded newline".to_string(),
        ));
    }
    writer.write_all(line.as_bytes())?;
    writer.write_all(&[FRAME_DELIMITER])?;
    writer.flush()?;
    Ok(())
}
