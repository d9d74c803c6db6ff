//! WITS replay application library
//!
//! Configuration and command-line handling for the `wits-replay` binary,
//! exposed for integration testing.

pub mod cli;
pub mod config;

pub use cli::Cli;
pub use config::ReplayConfig;
