// Sitewatch - Website Change Monitor
// Fetches a single page, fingerprints its visible text, and notifies a
// Discord webhook when the content changes between runs.

pub mod cli;
pub mod clock;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod fingerprint;
pub mod monitor;
pub mod notify;
pub mod state;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use config::Config;
pub use monitor::{run_check, Outcome};
pub use state::{MonitorState, StateStore};
