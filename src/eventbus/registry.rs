#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::contract::AgentType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Available,
    Busy,
    Offline,
}

impl AgentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }
}

/// One registered agent instance. See §3.4.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRegistryEntry {
    pub agent_id: String,
    pub agent_type: AgentType,
    pub status: AgentStatus,
    pub current_work_id: Option<String>,
    pub capabilities: BTreeSet<String>,
    pub last_heartbeat: Option<chrono::DateTime<chrono::Utc>>,
}

impl AgentRegistryEntry {
    #[must_use]
    pub fn new(agent_id: String, agent_type: AgentType, capabilities: BTreeSet<String>) -> Self {
        Self {
            agent_id,
            agent_type,
            status: AgentStatus::Available,
            current_work_id: None,
            capabilities,
            last_heartbeat: Some(chrono::Utc::now()),
        }
    }
}
