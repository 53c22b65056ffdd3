#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! DNA Compliance Engine (C3): nine-principle policy scoring, specialized
//! per agent.

pub mod agents;
pub mod artifact;
pub mod principles;
pub mod thresholds;

pub use artifact::Artifact;
pub use thresholds::{DeveloperThresholds, GameDesignerThresholds, TestEngineerThresholds, ToneVocabulary};

use std::collections::BTreeMap;

use crate::contract::{AgentType, DnaValidationResult};

/// Every tunable the six per-agent engines draw on. A hosting binary may
/// override any of these per story; the defaults are the budgets §4.3.2
/// states.
#[derive(Debug, Clone, Default)]
pub struct DnaEngineConfig {
    pub developer: DeveloperThresholds,
    pub game_designer: GameDesignerThresholds,
    pub test_engineer: TestEngineerThresholds,
    pub tone: ToneVocabulary,
}

/// Dispatches to the correct per-agent engine (§4.3.3). `agent_type` is
/// expected to be one of the six real pipeline agents — `Github`/`System`
/// never run a `processContract` and so never reach this dispatcher in
/// practice; they fall back to the neutral project-manager evaluation rather
/// than panicking on an unreachable match arm.
#[must_use]
pub fn evaluate_for_agent(
    agent_type: AgentType,
    artifact: &Artifact,
    config: &DnaEngineConfig,
    upstream_metrics: &[BTreeMap<String, f64>],
) -> DnaValidationResult {
    match agent_type {
        AgentType::ProjectManager | AgentType::Github | AgentType::System => {
            agents::evaluate_project_manager(artifact, &config.tone)
        }
        AgentType::GameDesigner => {
            agents::evaluate_game_designer(artifact, &config.game_designer, &config.tone)
        }
        AgentType::Developer => agents::evaluate_developer(artifact, &config.developer, &config.tone),
        AgentType::TestEngineer => {
            agents::evaluate_test_engineer(artifact, &config.test_engineer, &config.tone)
        }
        AgentType::QaTester => agents::evaluate_qa_tester(artifact, &config.tone),
        AgentType::QualityReviewer => agents::evaluate_quality_reviewer(
            artifact,
            &config.developer,
            &config.tone,
            upstream_metrics,
        ),
    }
}
