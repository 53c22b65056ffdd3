#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Multi-agent coordination core: the contract protocol, DNA compliance
//! engine, and priority-scheduled EventBus that mediate handoffs across the
//! fixed project-manager / game-designer / developer / test-engineer /
//! qa-tester / quality-reviewer pipeline.

pub mod cli;
pub mod config;
pub mod contract;
pub mod dna;
pub mod error;
pub mod eventbus;
pub mod protocol;
pub mod runtime;
pub mod validator;

pub use contract::{AgentType, Contract, ContractFields, DnaComplianceBlock, Priority};
pub use error::{CoreError, Result};
pub use eventbus::EventBus;
pub use runtime::{AgentHandle, AgentRuntime};
