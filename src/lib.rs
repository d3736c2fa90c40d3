//! SOC Dashboard: a security-operations console for the terminal
//!
//! A themed portfolio workstation that plays a boot sequence, streams a
//! simulated threat feed, answers a small command vocabulary and takes
//! messages through a contact form with a scripted "encryption" delay.
//!
//! Nothing here scans, encrypts or transmits anything. Every security
//! behavior is a timed visual simulation.
//!
//! # Architecture
//!
//! - `dashboard` - Controller state, virtual-time scheduler, components
//! - `tui` - Terminal user interface with ratatui
//! - `data` - Feed items, sections, message templates
//! - `config` - Portfolio content and operator profile

pub mod config;
pub mod dashboard;
pub mod data;
pub mod tui;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use data::*;

/// Dashboard version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for startup paths
pub type Result<T> = anyhow::Result<T>;

/// Custom error types
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Audio output unavailable: {0}")]
    Audio(String),
}
