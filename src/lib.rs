//! # scpstats
//!
//! Player statistics backend for a multiplayer game server:
//! - Line-based command feed over one persistent TCP connection
//! - Idempotent player creation, additive counters, append-only ip history
//! - SQLite persistence (in-memory store for tests and dry runs)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Game Server (event feed)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  "AddDeaths alice 2\n"
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Connection Loop                           │
//! │                (one frame at a time)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │            Codec  ──►  Dispatcher                           │
//! │     (frame, payload)   (command table, tolerant decode)     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   SQLite    │          │   Memory    │
//!   │ Repository  │          │ Repository  │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod stats;
pub mod protocol;
pub mod repository;
pub mod dispatcher;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StatsError, Result};
pub use config::{Config, StorageBackend};
pub use stats::{Counter, StatRecord, COUNTER_MAX};
pub use dispatcher::Dispatcher;
pub use repository::{MemoryRepository, SqliteRepository, StatsRepository};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of scpstats
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
