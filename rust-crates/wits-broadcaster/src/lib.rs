//! Paced multi-client WITS Level 0 replay server
//!
//! Serves a pre-loaded sequence of drilling records over TCP as WITS0
//! frames, one frame per record, to every connected client. Downstream
//! consumers can be exercised against recorded rig data without a live
//! rig connection.
//!
//! # Behavior
//!
//! - One frame every `1 / speed` seconds (fixed sleep, no drift correction)
//! - Playback pauses while no client is connected; no records are skipped
//! - Frames fan out to all clients; a failed write drops only that client
//! - Clients are never read from except to notice disconnects
//! - After the last record the server stays up but sends nothing, unless
//!   loop replay is enabled
//!
//! # Example Usage
//!
//! ```no_run
//! use wits_broadcaster::{ReplayServer, ServerConfig};
//! use wits_protocol::CanonicalRecord;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let records = vec![CanonicalRecord::default(); 10];
//!     let config = ServerConfig::default().port(10001).speed(10.0);
//!
//!     let server = ReplayServer::new(records, config)?;
//!     server
//!         .serve(tokio::time::sleep(std::time::Duration::from_secs(60)))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod playback;
pub mod server;
mod shutdown;

// Re-exports
pub use client::{BroadcastOutcome, ClientRegistry};
pub use config::ServerConfig;
pub use error::{BroadcasterError, Result};
pub use playback::{Advance, Playback};
pub use server::{ReplayServer, ReplayStats};
