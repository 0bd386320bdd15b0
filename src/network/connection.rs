//! Connection Handler
//!
//! Drives the single feed connection from the game server.
//!
//! ```text
//! Connected ──► ReadingFrame ──► Dispatching ─┐
//!                   ▲  │                      │
//!                   │  └──► Closed            │
//!                   └─────────────────────────┘
//! ```

use std::io::{BufRead, BufReader};
use std::net::TcpStream;

use crate::dispatcher::Dispatcher;
use crate::error::{Result, StatsError};
use crate::protocol::{decode_line, read_frame};
use crate::repository::StatsRepository;

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    ReadingFrame,
    Dispatching,
    Closed,
}

/// Counters for one connection's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Complete frames read, including ones that failed
    pub frames: u64,

    /// Frames whose command was applied
    pub applied: u64,

    /// Frames rejected by the codec, the dispatcher or storage
    pub failed: u64,
}

/// Handles the feed connection
pub struct Connection<R, S> {
    /// Frame source (buffered)
    reader: R,

    /// Command router owning the repository
    dispatcher: Dispatcher<S>,

    /// Peer address for logging
    peer_addr: String,

    state: ConnectionState,
    summary: LoopSummary,
}

impl<S: StatsRepository> Connection<BufReader<TcpStream>, S> {
    /// Wrap an established TCP stream
    pub fn from_stream(stream: TcpStream, dispatcher: Dispatcher<S>) -> Self {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        Self::new(BufReader::new(stream), dispatcher, peer_addr)
    }
}

impl<R: BufRead, S: StatsRepository> Connection<R, S> {
    /// Create a connection over any buffered reader
    pub fn new(reader: R, dispatcher: Dispatcher<S>, peer_addr: impl Into<String>) -> Self {
        Self {
            reader,
            dispatcher,
            peer_addr: peer_addr.into(),
            state: ConnectionState::Connected,
            summary: LoopSummary::default(),
        }
    }

    /// Process frames until the stream ends or fails
    ///
    /// Per-command failures are logged and skipped. Only transport errors and
    /// end of stream stop the loop; both leave the connection `Closed`.
    pub fn run(&mut self) -> LoopSummary {
        tracing::debug!("Connection established with {}", self.peer_addr);

        while self.state != ConnectionState::Closed {
            self.step();
        }

        tracing::info!(
            frames = self.summary.frames,
            applied = self.summary.applied,
            failed = self.summary.failed,
            "Connection with {} closed",
            self.peer_addr
        );
        self.summary
    }

    /// Read and handle at most one frame
    pub fn step(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.state = ConnectionState::ReadingFrame;

        let line = match read_frame(&mut self.reader) {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::debug!("Feed {} reached end of stream", self.peer_addr);
                self.state = ConnectionState::Closed;
                return;
            }
            Err(e) if e.is_transport() => {
                tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                self.state = ConnectionState::Closed;
                return;
            }
            Err(e) => {
                // Oversized frame, already skipped.
                self.summary.frames += 1;
                self.summary.failed += 1;
                tracing::warn!("Rejected frame from {}: {}", self.peer_addr, e);
                return;
            }
        };

        self.summary.frames += 1;
        self.state = ConnectionState::Dispatching;

        if self.handle_line(&line) {
            self.summary.applied += 1;
        } else {
            self.summary.failed += 1;
        }
        self.state = ConnectionState::ReadingFrame;
    }

    /// Decode and dispatch one line, logging any failure. True if applied.
    fn handle_line(&self, line: &[u8]) -> bool {
        let text = match std::str::from_utf8(line) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Frame from {} is not valid UTF-8: {}", self.peer_addr, e);
                return false;
            }
        };

        let frame = match decode_line(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Rejected frame from {}: {}", self.peer_addr, e);
                return false;
            }
        };

        tracing::trace!("Received frame from {}: {:?}", self.peer_addr, frame);

        match self.dispatcher.dispatch(&frame) {
            Ok(outcome) => {
                tracing::debug!(command = %frame.command, %outcome, "applied");
                true
            }
            Err(e) => {
                tracing::warn!(command = %frame.command, "Failed to apply command: {}", e);
                false
            }
        }
    }

    /// Current loop state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Counters so far
    pub fn summary(&self) -> LoopSummary {
        self.summary
    }

    pub fn dispatcher(&self) -> &Dispatcher<S> {
        &self.dispatcher
    }

    pub fn into_dispatcher(self) -> Dispatcher<S> {
        self.dispatcher
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Connect to the feed at `addr`
pub fn connect(addr: &str) -> Result<TcpStream> {
    let stream = TcpStream::connect(addr).map_err(|e| {
        StatsError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot connect to {}: {}", addr, e),
        ))
    })?;
    stream.set_nodelay(true)?;
    Ok(stream)
}
