#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Every participant a contract can name as `sourceAgent`/`targetAgent`.
///
/// `Github` and `System` are originator aliases: they may only ever appear as
/// a `sourceAgent`, never as a `targetAgent`. Field names on the contract are
/// camelCase, but enum values themselves are snake_case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Github,
    System,
    ProjectManager,
    GameDesigner,
    Developer,
    TestEngineer,
    QaTester,
    QualityReviewer,
}

impl AgentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::System => "system",
            Self::ProjectManager => "project_manager",
            Self::GameDesigner => "game_designer",
            Self::Developer => "developer",
            Self::TestEngineer => "test_engineer",
            Self::QaTester => "qa_tester",
            Self::QualityReviewer => "quality_reviewer",
        }
    }

    /// Originator aliases may source a chain but can never be a handoff target.
    #[must_use]
    pub const fn is_originator_alias(self) -> bool {
        matches!(self, Self::Github | Self::System)
    }

    /// The one legal downstream agent for this source, per the closed
    /// sequence table, or `None` if this agent has no outbound transition
    /// (there is none in this pipeline: `quality_reviewer` loops back to
    /// `project_manager`).
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Github | Self::System => Some(Self::ProjectManager),
            Self::ProjectManager => Some(Self::GameDesigner),
            Self::GameDesigner => Some(Self::Developer),
            Self::Developer => Some(Self::TestEngineer),
            Self::TestEngineer => Some(Self::QaTester),
            Self::QaTester => Some(Self::QualityReviewer),
            Self::QualityReviewer => Some(Self::ProjectManager),
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for AgentType {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "github" => Ok(Self::Github),
            "system" => Ok(Self::System),
            "project_manager" => Ok(Self::ProjectManager),
            "game_designer" => Ok(Self::GameDesigner),
            "developer" => Ok(Self::Developer),
            "test_engineer" => Ok(Self::TestEngineer),
            "qa_tester" => Ok(Self::QaTester),
            "quality_reviewer" => Ok(Self::QualityReviewer),
            other => Err(CoreError::InvalidContractShape(format!(
                "unknown agent type '{other}'"
            ))),
        }
    }
}
