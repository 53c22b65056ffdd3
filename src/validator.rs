#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Contract Validator (C2): structural validation plus sequence validation.
//!
//! Unlike most of the core's operations, [`validate`] never raises — it
//! returns a [`ValidationReport`] so callers can distinguish "this contract
//! is invalid" from "something went wrong trying to check it".

use std::collections::BTreeMap;

use crate::contract::{AgentType, Contract};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }
}

/// The closed set of legal `(source, target)` transitions. Originator
/// aliases may only target `project_manager`; every other pair follows the
/// fixed six-agent pipeline.
#[must_use]
pub fn is_legal_transition(source: AgentType, target: AgentType) -> bool {
    match source {
        AgentType::Github | AgentType::System => target == AgentType::ProjectManager,
        other => other.next() == Some(target),
    }
}

/// As [`is_legal_transition`], but checked against a caller-supplied
/// transition table rather than the compiled-in default. This is what lets
/// `EventBusConfig::valid_agent_sequences` (§6.5) actually override the
/// pipeline: originator aliases still may only target `project_manager`
/// (that rule is not itself overridable), every other pair is looked up in
/// `table`.
#[must_use]
pub fn is_legal_transition_in(table: &BTreeMap<AgentType, AgentType>, source: AgentType, target: AgentType) -> bool {
    match source {
        AgentType::Github | AgentType::System => target == AgentType::ProjectManager,
        other => table.get(&other) == Some(&target),
    }
}

/// Structural + sequence validation against the default transition table.
/// Accumulates every violation found rather than short-circuiting on the
/// first, so a caller gets a complete picture of what is wrong with a
/// rejected contract.
#[must_use]
pub fn validate(contract: &Contract) -> ValidationReport {
    validate_report(contract, is_legal_transition(contract.source_agent, contract.target_agent))
}

/// As [`validate`], but the sequence check is evaluated against `table`
/// instead of the compiled-in default — the EventBus uses this so a
/// configured `valid_agent_sequences` override (§6.5) is honored everywhere
/// a contract is validated, not just at the `delegate` gate.
#[must_use]
pub fn validate_with_sequences(contract: &Contract, table: &BTreeMap<AgentType, AgentType>) -> ValidationReport {
    validate_report(
        contract,
        is_legal_transition_in(table, contract.source_agent, contract.target_agent),
    )
}

fn validate_report(contract: &Contract, sequence_ok: bool) -> ValidationReport {
    let mut report = ValidationReport::default();

    if contract.story_id.trim().is_empty() {
        report.push("storyId must not be empty");
    }
    if contract.target_agent.is_originator_alias() {
        report.push("targetAgent must not be an originator alias (github/system)");
    }
    if !sequence_ok {
        report.push(format!(
            "illegal transition: {} -> {}",
            contract.source_agent, contract.target_agent
        ));
    }

    for path in &contract.input_requirements.required_files {
        if !path.contains(&contract.story_id) {
            report.push(format!("required file '{path}' lacks storyId traceability"));
        }
    }
    for path in &contract.output_specifications.deliverable_files {
        if !path.contains(&contract.story_id) {
            report.push(format!("deliverable file '{path}' lacks storyId traceability"));
        }
    }

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::contract::{
        Contract, ContractFields, DnaComplianceBlock, InputRequirements, OutputSpecifications,
        Payload,
    };

    fn base_contract() -> Contract {
        Contract::build(ContractFields {
            story_id: "STORY-1".into(),
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
        })
        .expect("valid base contract")
    }

    #[test]
    fn accepts_minimal_valid_contract() {
        assert!(validate(&base_contract()).ok());
    }

    #[test]
    fn rejects_illegal_sequence() {
        let mut c = base_contract();
        c.source_agent = AgentType::ProjectManager;
        c.target_agent = AgentType::TestEngineer;
        let report = validate(&c);
        assert!(!report.ok());
        assert!(report.errors.iter().any(|e| e.contains("illegal transition")));
    }

    #[test]
    fn github_may_only_target_project_manager() {
        assert!(is_legal_transition(AgentType::Github, AgentType::ProjectManager));
        assert!(!is_legal_transition(AgentType::Github, AgentType::Developer));
    }

    #[test]
    fn full_pipeline_sequence_is_legal() {
        let pipeline = [
            (AgentType::ProjectManager, AgentType::GameDesigner),
            (AgentType::GameDesigner, AgentType::Developer),
            (AgentType::Developer, AgentType::TestEngineer),
            (AgentType::TestEngineer, AgentType::QaTester),
            (AgentType::QaTester, AgentType::QualityReviewer),
            (AgentType::QualityReviewer, AgentType::ProjectManager),
        ];
        for (src, tgt) in pipeline {
            assert!(is_legal_transition(src, tgt), "{src} -> {tgt} should be legal");
        }
    }

    #[test]
    fn rejects_file_path_missing_story_id() {
        let mut c = base_contract();
        c.output_specifications.deliverable_files = vec!["docs/plan.md".into()];
        let report = validate(&c);
        assert!(!report.ok());
        assert!(report.errors.iter().any(|e| e.contains("traceability")));
    }

    #[test]
    fn custom_table_can_permit_a_transition_the_default_forbids() {
        let mut table = BTreeMap::new();
        table.insert(AgentType::ProjectManager, AgentType::TestEngineer);
        assert!(is_legal_transition_in(&table, AgentType::ProjectManager, AgentType::TestEngineer));
        assert!(!is_legal_transition(AgentType::ProjectManager, AgentType::TestEngineer));
    }

    #[test]
    fn custom_table_still_restricts_originator_aliases_to_project_manager() {
        let table = BTreeMap::new();
        assert!(!is_legal_transition_in(&table, AgentType::Github, AgentType::Developer));
        assert!(is_legal_transition_in(&table, AgentType::Github, AgentType::ProjectManager));
    }

    #[test]
    fn validate_with_sequences_honors_custom_table() {
        let mut table = BTreeMap::new();
        table.insert(AgentType::ProjectManager, AgentType::TestEngineer);
        let mut c = base_contract();
        c.target_agent = AgentType::TestEngineer;
        assert!(validate_with_sequences(&c, &table).ok());
        assert!(!validate(&c).ok());
    }
}
