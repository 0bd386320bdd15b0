//! Network Module
//!
//! Outbound feed connection to the game server.
//!
//! ## Architecture
//! - One connection, opened by us, never reconnected
//! - One read loop on the calling thread
//! - Commands applied strictly in arrival order

mod connection;

pub use connection::{connect, Connection, ConnectionState, LoopSummary};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::repository::StatsRepository;

/// Connect to the configured feed and process it until it closes
///
/// Connection failure is returned; everything after that is handled by the
/// loop and summarized.
pub fn serve<S: StatsRepository>(config: &Config, repository: S) -> Result<LoopSummary> {
    let addr = config.feed_addr();
    let stream = connect(&addr)?;
    tracing::info!("Connected to feed at {}", addr);

    let mut connection = Connection::from_stream(stream, Dispatcher::new(repository));
    Ok(connection.run())
}
