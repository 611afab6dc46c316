//! Shared types, error model, and configuration for kbload.
//!
//! This crate is the foundation depended on by all other kbload crates.
//! It provides:
//! - [`KbLoadError`] — the unified error type
//! - Domain types ([`LoadRequest`], [`KbEntry`], [`KbRecord`], [`KbId`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DatabaseConfig, LoaderConfig, config_dir, config_file_path, load_config,
    load_config_from,
};
pub use error::{KbLoadError, Result};
pub use types::{DEFAULT_DELIMITER, KbEntry, KbId, KbRecord, LoadRequest};
