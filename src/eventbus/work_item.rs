#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contract::{AgentType, Contract, Priority};
use crate::error::CoreError;

/// The EventBus's internal record of a scheduled handoff. See §3.3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl WorkStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for WorkStatus {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "inProgress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::InvalidContractShape(format!("unknown work status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub work_id: String,
    pub story_id: String,
    pub source_agent: AgentType,
    pub target_agent: AgentType,
    pub contract: Contract,
    pub priority: Priority,
    pub status: WorkStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub error_message: Option<String>,
    pub retry_count: u32,
    pub max_retries: u32,
}

impl WorkItem {
    #[must_use]
    pub fn new(work_id: String, contract: Contract, priority: Priority, max_retries: u32) -> Self {
        Self {
            work_id,
            story_id: contract.story_id.clone(),
            source_agent: contract.source_agent,
            target_agent: contract.target_agent,
            contract,
            priority,
            status: WorkStatus::Pending,
            created_at: chrono::Utc::now(),
            started_at: None,
            completed_at: None,
            error_message: None,
            retry_count: 0,
            max_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_exactly_completed_failed_cancelled() {
        assert!(WorkStatus::Completed.is_terminal());
        assert!(WorkStatus::Failed.is_terminal());
        assert!(WorkStatus::Cancelled.is_terminal());
        assert!(!WorkStatus::Pending.is_terminal());
        assert!(!WorkStatus::InProgress.is_terminal());
    }

    #[test]
    fn round_trips_through_str() {
        for s in [
            WorkStatus::Pending,
            WorkStatus::InProgress,
            WorkStatus::Completed,
            WorkStatus::Failed,
            WorkStatus::Cancelled,
        ] {
            let parsed = WorkStatus::try_from(s.as_str()).map(|p| p.as_str());
            assert_eq!(parsed, Ok(s.as_str()));
        }
    }

    #[test]
    fn serde_wire_value_is_camel_case_not_all_lowercase() {
        let cases = [
            (WorkStatus::Pending, "\"pending\""),
            (WorkStatus::InProgress, "\"inProgress\""),
            (WorkStatus::Completed, "\"completed\""),
            (WorkStatus::Failed, "\"failed\""),
            (WorkStatus::Cancelled, "\"cancelled\""),
        ];
        for (status, wire) in cases {
            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, wire);
            let back: WorkStatus = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, status);
            assert_eq!(back.as_str(), status.as_str());
        }
    }
}
