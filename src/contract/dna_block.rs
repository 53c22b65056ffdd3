#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// The five design-level DNA principles, carried as a flat boolean block so a
/// structurally-minimal contract (all fields present, no extensions) is still
/// valid — see the validator's version-tolerance requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignPrinciplesValidation {
    pub pedagogical_value: bool,
    pub policy_to_practice: bool,
    pub time_respect: bool,
    pub holistic_thinking: bool,
    pub professional_tone: bool,
}

impl DesignPrinciplesValidation {
    #[must_use]
    pub const fn all_true() -> Self {
        Self {
            pedagogical_value: true,
            policy_to_practice: true,
            time_respect: true,
            holistic_thinking: true,
            professional_tone: true,
        }
    }
}

/// The four architecture-level DNA principles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureCompliance {
    pub api_first: bool,
    pub stateless_backend: bool,
    pub separation_of_concerns: bool,
    pub simplicity_first: bool,
}

impl ArchitectureCompliance {
    #[must_use]
    pub const fn all_true() -> Self {
        Self {
            api_first: true,
            stateless_backend: true,
            separation_of_concerns: true,
            simplicity_first: true,
        }
    }
}

/// The per-agent scored assessment that rides alongside the nine booleans.
/// Keyed by agent in the wire format as `<agent>DnaValidation`; stored here
/// as a plain field since the contract already knows which agent produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnaValidationResult {
    pub design: DesignPrinciplesValidation,
    pub architecture: ArchitectureCompliance,
    pub design_scores: [f64; 5],
    pub architecture_scores: [f64; 4],
    pub overall_compliant: bool,
    pub overall_score: f64,
    pub violations: Vec<String>,
    pub recommendations: Vec<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub quality_reviewer_metrics: std::collections::BTreeMap<String, f64>,
}

/// The nine-boolean block every contract must carry. Everything else in the
/// DNA picture (scores, violations, per-agent metrics) is additive and only
/// appears once an agent runtime has actually produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnaComplianceBlock {
    pub design_principles_validation: DesignPrinciplesValidation,
    pub architecture_compliance: ArchitectureCompliance,
}

impl DnaComplianceBlock {
    #[must_use]
    pub const fn all_true() -> Self {
        Self {
            design_principles_validation: DesignPrinciplesValidation::all_true(),
            architecture_compliance: ArchitectureCompliance::all_true(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn all_true_block_round_trips_through_json() {
        let block = DnaComplianceBlock::all_true();
        let json = serde_json::to_string(&block).expect("serialize");
        let back: DnaComplianceBlock = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(block, back);
    }
}
