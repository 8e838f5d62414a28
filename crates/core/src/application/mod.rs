// Application Layer - session lifecycle and call execution

pub mod executor;
pub mod session_store;

pub use executor::RpcExecutor;
pub use session_store::SessionStore;
