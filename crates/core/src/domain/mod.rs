// Domain Layer - credentials, session pair, RPC envelope

pub mod credentials;
pub mod envelope;
pub mod session;

pub use credentials::Credentials;
pub use envelope::{RpcRequest, RpcResponse, AUTHENTICATE_METHOD, GET_SELF_METHOD};
pub use session::{Session, User};
