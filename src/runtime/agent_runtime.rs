#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Agent Runtime Contract (C5): wraps `processContract` with pre/post C2
//! validation and ordered quality-gate checks. The EventBus never invokes an
//! agent directly — it always goes through [`AgentRuntime::run`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::contract::Contract;
use crate::dna::{self, Artifact, DnaEngineConfig};
use crate::error::{CoreError, Result};
use crate::runtime::ports::AgentHandle;
use crate::validator;

pub struct AgentRuntime {
    handle: Arc<dyn AgentHandle>,
    dna_config: DnaEngineConfig,
}

impl AgentRuntime {
    /// Wraps `handle`, scoring every invocation against the default DNA
    /// engine thresholds (§4.3.2's stated budgets). Use
    /// [`AgentRuntime::with_config`] to override them per story.
    #[must_use]
    pub fn new(handle: Arc<dyn AgentHandle>) -> Self {
        Self::with_config(handle, DnaEngineConfig::default())
    }

    #[must_use]
    pub fn with_config(handle: Arc<dyn AgentHandle>, dna_config: DnaEngineConfig) -> Self {
        Self { handle, dna_config }
    }

    /// Runs the full pipeline contract around one agent invocation:
    /// validate input, call `processContract`, score the output against the
    /// agent's DNA engine and inject `<agent>DnaValidation`, validate the
    /// output, then walk its declared quality gates in order, short-circuiting
    /// on the first failure.
    pub async fn run(&self, input: Contract) -> Result<Contract> {
        let pre = validator::validate(&input);
        if !pre.ok() {
            return Err(CoreError::InvalidContractShape(pre.errors.join("; ")));
        }

        let agent_type = self.handle.agent_type();
        debug!(story_id = %input.story_id, agent = %agent_type, "invoking agent");
        let output = self.handle.process_contract(input).await?;

        let artifact = Artifact::from_payload(&output.output_specifications.deliverable_data);
        let upstream_metrics: Vec<BTreeMap<String, f64>> = output
            .dna_history
            .values()
            .map(|r| r.quality_reviewer_metrics.clone())
            .collect();
        let dna_result = dna::evaluate_for_agent(agent_type, &artifact, &self.dna_config, &upstream_metrics);
        if !dna_result.overall_compliant {
            warn!(agent = %agent_type, violations = ?dna_result.violations, "dna compliance failed, blocking handoff");
            return Err(CoreError::DnaComplianceError { violations: dna_result.violations });
        }
        let output = output.with_dna_result(agent_type, dna_result);

        let post = validator::validate(&output);
        if !post.ok() {
            return Err(CoreError::InvalidContractShape(post.errors.join("; ")));
        }

        for gate in &output.quality_gates {
            let deliverables = &output.output_specifications.deliverable_data;
            match self.handle.check_quality_gate(gate, deliverables).await? {
                Some(true) => {}
                Some(false) => {
                    return Err(CoreError::QualityGateError { gate: gate.clone() });
                }
                None => {
                    warn!(gate = %gate, "unrecognized quality gate, passing by default");
                }
            }
        }

        Ok(output)
    }
}
