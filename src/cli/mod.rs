#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Thin CLI front door around the coordination core. Demonstration plumbing,
//! not a product requirement: it stands up an [`EventBus`], registers mock
//! agents, and drives `delegate`/`dispatch`/`status` from the command line,
//! emitting [`ProtocolEnvelope`] JSON on stdout.

mod args;
mod mock_agents;

pub use args::{ensure_no_unknown_flags, suggest_commands, CliError};

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config;
use crate::contract::{AgentType, Priority};
use crate::eventbus::EventBus;
use crate::protocol::ProtocolEnvelope;
use mock_agents::EchoMockAgent;

/// Runs one CLI invocation against a freshly constructed, demo-populated
/// `EventBus` and prints its JSON envelope to stdout. Returns the process
/// exit code.
pub async fn run(args: &[String]) -> i32 {
    let rid = uuid::Uuid::new_v4().to_string();

    let Some(command) = args.get(1) else {
        print_usage();
        return 1;
    };

    match command.as_str() {
        "doctor" => {
            println!("{}", json(&ProtocolEnvelope::success(rid, serde_json::json!({"status": "ready"}))));
            0
        }
        "demo" => run_demo(rid).await,
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        other => {
            let suggestions = suggest_commands(other);
            eprintln!("unknown command '{other}'. did you mean: {suggestions:?}?");
            1
        }
    }
}

async fn run_demo(rid: String) -> i32 {
    let config = config::load_config(None);
    let (bus, _rx) = EventBus::new(config);

    if let Err(e) = bus
        .register_agent(
            "game-designer-1",
            AgentType::GameDesigner,
            Arc::new(EchoMockAgent::new(AgentType::GameDesigner)),
            BTreeSet::new(),
        )
        .await
    {
        eprintln!("registration failed: {e}");
        return 1;
    }

    let Ok(contract) = crate::contract::Contract::build(crate::contract::ContractFields {
        story_id: "STORY-DEMO-1".to_string(),
        source_agent: AgentType::ProjectManager,
        target_agent: AgentType::GameDesigner,
        dna_compliance: crate::contract::DnaComplianceBlock::all_true(),
        input_requirements: crate::contract::InputRequirements {
            required_files: vec![],
            required_data: crate::contract::Payload::new(),
            required_validations: vec![],
        },
        output_specifications: crate::contract::OutputSpecifications {
            deliverable_files: vec![],
            deliverable_data: crate::contract::Payload::new(),
            validation_criteria: crate::contract::Payload::new(),
        },
        quality_gates: vec![],
        handoff_criteria: vec![],
    }) else {
        eprintln!("failed to build demo contract");
        return 1;
    };

    let work_id = match bus.delegate(contract, Priority::High).await {
        Ok(id) => id,
        Err(e) => {
            eprintln!("delegate failed: {e}");
            return 1;
        }
    };

    bus.dispatch().await;
    for _ in 0..50 {
        if let Some(item) = bus.get_work_status(&work_id).await {
            if item.status.is_terminal() {
                break;
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let status = bus.get_work_status(&work_id).await;
    println!("{}", json(&ProtocolEnvelope::success(rid, status)));
    0
}

fn json<D: serde::Serialize>(envelope: &ProtocolEnvelope<D>) -> String {
    serde_json::to_string(envelope).unwrap_or_else(|_| "{\"ok\":false}".to_string())
}

fn print_usage() {
    eprintln!("contract-bus [doctor|demo|help]");
}
