// NetX Core - Envelope, Session Lifecycle & Ports
// NO HTTP dependencies (transport is implemented in netx-infra-http)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{RpcExecutor, SessionStore};
pub use error::{NetxError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
