//! Core - configuration and assembled runtime state
//!
//! - [`Config`] - environment-driven configuration
//! - [`PosState`] - store, order manager, archive and live feeds wired together

pub mod config;
pub mod state;

pub use config::Config;
pub use state::PosState;
