#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Agent Runtime Contract (C5).

mod agent_runtime;
pub mod ports;

pub use agent_runtime::AgentRuntime;
pub use ports::{AgentHandle, PortFuture};
