#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! The contract model (C1): an immutable value object carried between agents,
//! plus the builder operations (`build`, `derive`) that produce one.

mod agent_type;
mod dna_block;
mod priority;

pub use agent_type::AgentType;
pub use dna_block::{
    ArchitectureCompliance, DesignPrinciplesValidation, DnaComplianceBlock, DnaValidationResult,
};
pub use priority::Priority;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};

/// Free-form payload carried inside `InputRequirements`/`OutputSpecifications`.
/// A `BTreeMap` keeps JSON key order deterministic, mirroring the plain dicts
/// the originating Python contracts pass around.
pub type Payload = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRequirements {
    #[serde(default)]
    pub required_files: Vec<String>,
    #[serde(default)]
    pub required_data: Payload,
    #[serde(default)]
    pub required_validations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpecifications {
    #[serde(default)]
    pub deliverable_files: Vec<String>,
    #[serde(default)]
    pub deliverable_data: Payload,
    #[serde(default)]
    pub validation_criteria: Payload,
}

/// The atomic handoff message. Immutable once constructed — there is no
/// public mutator; a new contract is always produced via [`Contract::derive`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub contract_version: String,
    pub story_id: String,
    pub source_agent: AgentType,
    pub target_agent: AgentType,
    pub dna_compliance: DnaComplianceBlock,
    pub input_requirements: InputRequirements,
    pub output_specifications: OutputSpecifications,
    #[serde(default)]
    pub quality_gates: Vec<String>,
    #[serde(default)]
    pub handoff_criteria: Vec<String>,
    /// Present once an agent runtime has scored the artifact; absent on a
    /// freshly built/derived contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dna_validation: Option<DnaValidationResult>,
    /// Every `<agent>DnaValidation` assessment attached so far in this
    /// story's chain, keyed by the producing agent (§3.2). Carried forward
    /// unchanged by `derive`; only an agent runtime (via
    /// [`Contract::with_dna_result`]) ever adds to it. This is what lets the
    /// quality reviewer's engine aggregate upstream agents' own
    /// `qualityReviewerMetrics` digests (§4.3.3) without the core needing any
    /// side-channel storage.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dna_history: BTreeMap<String, DnaValidationResult>,
}

pub const CONTRACT_VERSION: &str = "1.0";

/// All the fields required to build a fresh contract from scratch (e.g. by an
/// originator adapter). `dna_validation` is never set at construction time —
/// it is populated only by an agent runtime after the fact.
pub struct ContractFields {
    pub story_id: String,
    pub source_agent: AgentType,
    pub target_agent: AgentType,
    pub dna_compliance: DnaComplianceBlock,
    pub input_requirements: InputRequirements,
    pub output_specifications: OutputSpecifications,
    pub quality_gates: Vec<String>,
    pub handoff_criteria: Vec<String>,
}

fn check_traceability(story_id: &str, paths: &[String]) -> Result<()> {
    for path in paths {
        if !path.contains(story_id) {
            return Err(CoreError::StoryIdTraceabilityError {
                story_id: story_id.to_string(),
                path: path.clone(),
            });
        }
    }
    Ok(())
}

impl Contract {
    /// Builds a fresh contract. Fails with `InvalidContractShape` if
    /// `story_id` is empty, or `StoryIdTraceabilityError` if any declared
    /// file path omits the story id.
    pub fn build(fields: ContractFields) -> Result<Self> {
        if fields.story_id.trim().is_empty() {
            return Err(CoreError::InvalidContractShape("storyId must not be empty".into()));
        }
        check_traceability(&fields.story_id, &fields.input_requirements.required_files)?;
        check_traceability(&fields.story_id, &fields.output_specifications.deliverable_files)?;

        Ok(Self {
            contract_version: CONTRACT_VERSION.to_string(),
            story_id: fields.story_id,
            source_agent: fields.source_agent,
            target_agent: fields.target_agent,
            dna_compliance: fields.dna_compliance,
            input_requirements: fields.input_requirements,
            output_specifications: fields.output_specifications,
            quality_gates: fields.quality_gates,
            handoff_criteria: fields.handoff_criteria,
            dna_validation: None,
            dna_history: BTreeMap::new(),
        })
    }

    /// Attaches an agent runtime's computed DNA assessment: becomes the
    /// contract's latest `dna_validation` and folds into the accumulating
    /// `dna_history`, keyed by `agent`. Only [`crate::runtime::AgentRuntime`]
    /// calls this, after confirming `result.overall_compliant` — a
    /// non-compliant result is never attached, it fails the work instead
    /// (§4.3.3).
    #[must_use]
    pub(crate) fn with_dna_result(mut self, agent: AgentType, result: DnaValidationResult) -> Self {
        self.dna_history.insert(agent.as_str().to_string(), result.clone());
        self.dna_validation = Some(result);
        self
    }

    /// Produces the next contract in a chain: `storyId` carries forward
    /// unchanged, `sourceAgent` becomes `self.targetAgent`, and the caller
    /// supplies the new `targetAgent` plus whatever else changed. Any file
    /// path in the patch's requirements/specifications must still contain
    /// `self.story_id`.
    pub fn derive(&self, target_agent: AgentType, patch: DerivePatch) -> Result<Self> {
        let input_requirements = patch.input_requirements.unwrap_or_else(|| InputRequirements {
            required_files: Vec::new(),
            required_data: Payload::new(),
            required_validations: Vec::new(),
        });
        let output_specifications = patch.output_specifications.unwrap_or_else(|| OutputSpecifications {
            deliverable_files: Vec::new(),
            deliverable_data: Payload::new(),
            validation_criteria: Payload::new(),
        });

        check_traceability(&self.story_id, &input_requirements.required_files)?;
        check_traceability(&self.story_id, &output_specifications.deliverable_files)?;

        Ok(Self {
            contract_version: CONTRACT_VERSION.to_string(),
            story_id: self.story_id.clone(),
            source_agent: self.target_agent,
            target_agent,
            dna_compliance: patch.dna_compliance.unwrap_or(self.dna_compliance),
            input_requirements,
            output_specifications,
            quality_gates: patch.quality_gates.unwrap_or_default(),
            handoff_criteria: patch.handoff_criteria.unwrap_or_default(),
            dna_validation: None,
            dna_history: self.dna_history.clone(),
        })
    }
}

/// The subset of a contract's fields a downstream agent actually changes when
/// producing the next handoff; everything else carries forward from `derive`.
#[derive(Default)]
pub struct DerivePatch {
    pub dna_compliance: Option<DnaComplianceBlock>,
    pub input_requirements: Option<InputRequirements>,
    pub output_specifications: Option<OutputSpecifications>,
    pub quality_gates: Option<Vec<String>>,
    pub handoff_criteria: Option<Vec<String>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn minimal_fields(story_id: &str) -> ContractFields {
        ContractFields {
            story_id: story_id.to_string(),
            source_agent: AgentType::ProjectManager,
            target_agent: AgentType::GameDesigner,
            dna_compliance: DnaComplianceBlock::all_true(),
            input_requirements: InputRequirements {
                required_files: vec![],
                required_data: Payload::new(),
                required_validations: vec![],
            },
            output_specifications: OutputSpecifications {
                deliverable_files: vec![],
                deliverable_data: Payload::new(),
                validation_criteria: Payload::new(),
            },
            quality_gates: vec![],
            handoff_criteria: vec![],
        }
    }

    #[test]
    fn build_rejects_empty_story_id() {
        let err = Contract::build(minimal_fields("")).unwrap_err();
        assert_eq!(err.code(), crate::error::code::INVALID_CONTRACT_SHAPE);
    }

    #[test]
    fn build_rejects_untraceable_file_paths() {
        let mut fields = minimal_fields("STORY-1");
        fields.output_specifications.deliverable_files = vec!["docs/unrelated.md".into()];
        let err = Contract::build(fields).unwrap_err();
        assert_eq!(err.code(), crate::error::code::STORY_ID_TRACEABILITY);
    }

    #[test]
    fn derive_carries_story_id_and_bumps_source() {
        let c = Contract::build(minimal_fields("STORY-1")).unwrap();
        let next = c
            .derive(AgentType::Developer, DerivePatch::default())
            .unwrap();
        assert_eq!(next.story_id, "STORY-1");
        assert_eq!(next.source_agent, AgentType::GameDesigner);
        assert_eq!(next.target_agent, AgentType::Developer);
    }

    #[test]
    fn derive_rejects_untraceable_patch_paths() {
        let c = Contract::build(minimal_fields("STORY-1")).unwrap();
        let patch = DerivePatch {
            output_specifications: Some(OutputSpecifications {
                deliverable_files: vec!["build/out.json".into()],
                deliverable_data: Payload::new(),
                validation_criteria: Payload::new(),
            }),
            ..Default::default()
        };
        let err = c.derive(AgentType::Developer, patch).unwrap_err();
        assert_eq!(err.code(), crate::error::code::STORY_ID_TRACEABILITY);
    }

    #[test]
    fn serializes_camel_case_field_names() {
        let c = Contract::build(minimal_fields("STORY-1")).unwrap();
        let json = serde_json::to_value(&c).expect("serialize");
        assert!(json.get("storyId").is_some());
        assert!(json.get("sourceAgent").is_some());
        assert!(json.get("dnaCompliance").is_some());
    }
}
