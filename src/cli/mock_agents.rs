#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! A trivial [`AgentHandle`] that always succeeds, used only by `contract-bus
//! demo` to exercise the EventBus end-to-end without a real content
//! generator attached.

use std::collections::BTreeMap;

use crate::contract::{AgentType, Contract, DerivePatch, OutputSpecifications, Payload};
use crate::runtime::ports::{AgentHandle, PortFuture};

pub struct EchoMockAgent {
    agent_type: AgentType,
}

impl EchoMockAgent {
    #[must_use]
    pub const fn new(agent_type: AgentType) -> Self {
        Self { agent_type }
    }
}

/// A trivially DNA-compliant stand-in deliverable: plain domain-bearing
/// prose and no complexity/UX figures to exceed. A real content generator
/// would populate this from whatever it actually produced.
fn echo_output_specifications() -> OutputSpecifications {
    let mut deliverable_data = Payload::new();
    deliverable_data.insert(
        "artifact".to_string(),
        serde_json::json!({
            "narrativeText": "This is a requirement. It is a deliverable. It meets the specification. It satisfies the stakeholder.",
        }),
    );
    OutputSpecifications {
        deliverable_files: vec![],
        deliverable_data,
        validation_criteria: Payload::new(),
    }
}

impl AgentHandle for EchoMockAgent {
    fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    fn process_contract<'a>(&'a self, input: Contract) -> PortFuture<'a, Contract> {
        Box::pin(async move {
            let target = input.target_agent.next().unwrap_or(AgentType::ProjectManager);
            input.derive(
                target,
                DerivePatch {
                    output_specifications: Some(echo_output_specifications()),
                    ..Default::default()
                },
            )
        })
    }

    fn check_quality_gate<'a>(
        &'a self,
        _gate_name: &'a str,
        _deliverables: &'a BTreeMap<String, serde_json::Value>,
    ) -> PortFuture<'a, Option<bool>> {
        Box::pin(async move { Ok(Some(true)) })
    }
}
