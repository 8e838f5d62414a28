//! SDK Error Types
//!
//! The taxonomy lives in `netx-core`; the SDK re-exports it so callers only
//! depend on this crate.

pub use netx_core::error::{NetxError, Result};

/// Map a configuration source failure into the client taxonomy
pub(crate) fn config_error(e: config::ConfigError) -> NetxError {
    NetxError::Configuration(format!("Failed to load settings: {}", e))
}
