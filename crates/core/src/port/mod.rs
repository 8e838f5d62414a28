// Port Layer - Interfaces for external dependencies

pub mod authenticator;
pub mod nonce_provider; // For deterministic testing
pub mod transport;

// Re-exports
pub use authenticator::Authenticator;
pub use nonce_provider::{NonceProvider, RandomNonceProvider};
pub use transport::{HttpGet, HttpPost, HttpReply, Transport};
