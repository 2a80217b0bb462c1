//! Admin session backed by an external bridge program.
//!
//! Every session operation runs the bridge once as
//! `<program> [args…] <op> [operand]`, with the kit location and credentials
//! passed through the environment. Standard output is the answer; a non-zero
//! exit turns standard error into the error message.
mod config;
pub use config::{
    BridgeConfig, DEFAULT_BRIDGE_PROGRAM, DEFAULT_CALL_TIMEOUT, ENV_ADMIN_PASSWORD,
    ENV_ADMIN_STARTUP, ENV_ADMIN_USER, ENV_ADMIN_WORKSPACE,
};

mod op;

mod session;
pub use session::{BridgeSession, connect};
