#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! The hexagonal port boundary through which the EventBus invokes an agent
//! without depending on its concrete type. Futures are hand-boxed rather
//! than pulling in `async-trait` — the same manual-`Pin<Box<dyn Future>>`
//! shape the orchestrator's own ports module uses.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use crate::contract::{AgentType, Contract};
use crate::error::Result;

pub type PortFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Every agent implementation provides this. See §6.1.
pub trait AgentHandle: Send + Sync {
    fn agent_type(&self) -> AgentType;

    /// Consumes one contract, produces the next. May fail with any error
    /// kind in §7; the runtime wrapper (C5) is responsible for turning a
    /// failure into a scheduler-visible `fail()`.
    fn process_contract<'a>(&'a self, input: Contract) -> PortFuture<'a, Contract>;

    /// Checks one declared quality gate against the produced deliverables.
    /// Returns `Ok(None)` when this agent does not recognize `gate_name` —
    /// the runtime treats that as a pass with a logged warning rather than a
    /// failure, since gate identifiers are opaque and agent-owned.
    fn check_quality_gate<'a>(
        &'a self,
        gate_name: &'a str,
        deliverables: &'a BTreeMap<String, serde_json::Value>,
    ) -> PortFuture<'a, Option<bool>>;
}
