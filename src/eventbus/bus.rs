#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::config::EventBusConfig;
use crate::contract::{AgentType, Contract, Priority};
use crate::error::{CoreError, Result};
use crate::eventbus::registry::{AgentRegistryEntry, AgentStatus};
use crate::eventbus::work_item::{WorkItem, WorkStatus};
use crate::runtime::{AgentHandle, AgentRuntime};
use crate::validator;

/// Snapshot returned by `getQueueStatus`. See §4.4.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStatus {
    pub pending: usize,
    pub active: usize,
    pub completed: usize,
    pub registered_agents: usize,
    pub available_agents: usize,
    pub busy_agents: usize,
    pub offline_agents: usize,
    pub agent_types: BTreeMap<String, usize>,
}

/// A best-effort informational event. See §6.4.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedEvent {
    pub event_type: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub agent_id: Option<String>,
    pub event_data: BTreeMap<String, serde_json::Value>,
}

struct SchedulerState {
    queue: Vec<WorkItem>,
    active: HashMap<String, WorkItem>,
    completed: HashMap<String, WorkItem>,
    agents: HashMap<String, AgentRegistryEntry>,
    handles: HashMap<String, Arc<dyn AgentHandle>>,
    next_work_seq: u64,
}

impl SchedulerState {
    fn new() -> Self {
        Self {
            queue: Vec::new(),
            active: HashMap::new(),
            completed: HashMap::new(),
            agents: HashMap::new(),
            handles: HashMap::new(),
            next_work_seq: 0,
        }
    }

    fn story_in_flight(&self, story_id: &str) -> bool {
        self.active.values().any(|w| w.story_id == story_id)
    }

    /// Priority-ordered insert: ascending priority rank, ties broken by
    /// insertion order (stable `created_at`).
    fn enqueue(&mut self, item: WorkItem) {
        let pos = self
            .queue
            .iter()
            .position(|existing| existing.priority.rank() > item.priority.rank())
            .unwrap_or(self.queue.len());
        self.queue.insert(pos, item);
    }

    fn next_work_id(&mut self) -> String {
        self.next_work_seq += 1;
        format!("WORK-{}-{:03}", chrono::Utc::now().timestamp_millis(), self.next_work_seq)
    }

    fn find_available_agent(&self, agent_type: AgentType) -> Option<String> {
        self.agents
            .values()
            .find(|a| a.agent_type == agent_type && a.status == AgentStatus::Available)
            .map(|a| a.agent_id.clone())
    }
}

/// The coordinator: agent registry + priority work queue + state machine.
/// Cheaply cloneable — all mutable state lives behind a single internal
/// `Mutex` shared via `Arc`, the single-logical-writer model §5 requires.
#[derive(Clone)]
pub struct EventBus {
    config: EventBusConfig,
    state: Arc<Mutex<SchedulerState>>,
    publish_tx: mpsc::UnboundedSender<PublishedEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new(config: EventBusConfig) -> (Self, mpsc::UnboundedReceiver<PublishedEvent>) {
        let (publish_tx, publish_rx) = mpsc::unbounded_channel();
        (
            Self {
                config,
                state: Arc::new(Mutex::new(SchedulerState::new())),
                publish_tx,
            },
            publish_rx,
        )
    }

    /// Registers an agent instance. Idempotent on a duplicate `agent_id` of
    /// the same type: re-registering simply refreshes its heartbeat.
    pub async fn register_agent(
        &self,
        agent_id: impl Into<String>,
        agent_type: AgentType,
        handle: Arc<dyn AgentHandle>,
        capabilities: BTreeSet<String>,
    ) -> Result<()> {
        let agent_id = agent_id.into();
        let mut state = self.state.lock().await;
        if let Some(existing) = state.agents.get_mut(&agent_id) {
            if existing.agent_type != agent_type {
                return Err(CoreError::EventBusError(format!(
                    "agent '{agent_id}' already registered as a different agent type"
                )));
            }
            existing.last_heartbeat = Some(chrono::Utc::now());
            return Ok(());
        }
        state.handles.insert(agent_id.clone(), handle);
        state
            .agents
            .insert(agent_id.clone(), AgentRegistryEntry::new(agent_id.clone(), agent_type, capabilities));
        info!(agent_id = %agent_id, agent_type = %agent_type, "agent registered");
        Ok(())
    }

    /// Unregisters an agent, cancelling any in-progress work of theirs first.
    pub async fn unregister_agent(&self, agent_id: &str) -> bool {
        let current_work_id = {
            let state = self.state.lock().await;
            state.agents.get(agent_id).and_then(|a| a.current_work_id.clone())
        };
        if let Some(work_id) = current_work_id {
            let _ = self.cancel_work(&work_id, "Agent unregistered").await;
        }
        let mut state = self.state.lock().await;
        let removed = state.agents.remove(agent_id).is_some();
        state.handles.remove(agent_id);
        if removed {
            info!(agent_id = %agent_id, "agent unregistered");
        }
        removed
    }

    /// Validates and enqueues `contract` as a new work item, returning its
    /// `workId`. A second item for a `storyId` already in flight is queued
    /// but held back from dispatch until the first completes (§5 ordering
    /// guarantee), enforced in `dispatch`.
    pub async fn delegate(&self, contract: Contract, priority: Priority) -> Result<String> {
        if !validator::is_legal_transition_in(
            &self.config.valid_agent_sequences,
            contract.source_agent,
            contract.target_agent,
        ) {
            return Err(CoreError::InvalidSequenceError {
                source: contract.source_agent.as_str().to_string(),
                target: contract.target_agent.as_str().to_string(),
            });
        }
        let report = validator::validate_with_sequences(&contract, &self.config.valid_agent_sequences);
        if !report.ok() {
            return Err(CoreError::InvalidContractShape(report.errors.join("; ")));
        }

        let mut state = self.state.lock().await;
        let work_id = state.next_work_id();
        let item = WorkItem::new(work_id.clone(), contract, priority, 3);
        state.enqueue(item);
        info!(work_id = %work_id, "work delegated");
        Ok(work_id)
    }

    /// Dispatches as many pending items as `maxConcurrentWork` and agent
    /// availability allow, spawning each agent invocation as an independent
    /// task. Returns the `workId`s actually dispatched this call.
    pub async fn dispatch(&self) -> Vec<String> {
        let mut dispatched = Vec::new();
        loop {
            let next = {
                let mut state = self.state.lock().await;
                if state.active.len() >= self.config.max_concurrent_work {
                    break;
                }
                let candidate_idx = state.queue.iter().position(|item| {
                    !state.story_in_flight(&item.story_id) && state.find_available_agent(item.target_agent).is_some()
                });
                let Some(idx) = candidate_idx else { break };
                let mut item = state.queue.remove(idx);
                let agent_id = match state.find_available_agent(item.target_agent) {
                    Some(id) => id,
                    None => {
                        state.enqueue(item);
                        break;
                    }
                };
                if let Some(agent) = state.agents.get_mut(&agent_id) {
                    agent.status = AgentStatus::Busy;
                    agent.current_work_id = Some(item.work_id.clone());
                }
                item.status = WorkStatus::InProgress;
                item.started_at = Some(chrono::Utc::now());
                let handle = state.handles.get(&agent_id).cloned();
                state.active.insert(item.work_id.clone(), item.clone());
                Some((item, agent_id, handle))
            };

            let Some((item, _agent_id, handle)) = next else { break };
            let Some(handle) = handle else {
                warn!(work_id = %item.work_id, "dispatched item has no registered handle, failing");
                self.fail(&item.work_id, CoreError::EventBusError("no handle for agent".into())).await;
                continue;
            };

            dispatched.push(item.work_id.clone());
            let bus = self.clone();
            let work_id = item.work_id.clone();
            let contract = item.contract.clone();
            tokio::spawn(async move {
                let runtime = AgentRuntime::new(handle);
                match runtime.run(contract).await {
                    Ok(output) => bus.complete(&work_id, output).await,
                    Err(e) => bus.fail(&work_id, e).await,
                }
            });
        }
        dispatched
    }

    /// Records completion, frees the agent, archives the item, and — unless
    /// the output has no outbound transition — re-delegates it.
    pub async fn complete(&self, work_id: &str, output_contract: Contract) {
        let item = {
            let mut state = self.state.lock().await;
            // Cancellation moves an in-progress item straight to the
            // completed archive and frees its agent (see `cancel_work`), so
            // a cancelled item is never found in `active` here — its output
            // is dropped simply because there is nothing left to update.
            let Some(mut item) = state.active.remove(work_id) else {
                warn!(work_id = %work_id, "complete() called on unknown/already-finished work item");
                return;
            };
            if let Some(agent_id) = state.agents.iter().find(|(_, a)| a.current_work_id.as_deref() == Some(work_id)).map(|(id, _)| id.clone()) {
                if let Some(agent) = state.agents.get_mut(&agent_id) {
                    agent.status = AgentStatus::Available;
                    agent.current_work_id = None;
                }
            }
            item.status = WorkStatus::Completed;
            item.completed_at = Some(chrono::Utc::now());
            item.contract = output_contract;
            state.completed.insert(work_id.to_string(), item.clone());
            item
        };
        info!(work_id = %work_id, "work completed");

        if !item.contract.target_agent.is_originator_alias() {
            if let Err(e) = self.delegate(item.contract.clone(), item.priority).await {
                error!(work_id = %work_id, error = %e, "failed to re-delegate completed work's output");
            }
        }
    }

    /// Records a failure. Retries (re-enqueuing at original priority) if the
    /// error is retryable and the item has retries remaining; otherwise
    /// terminal `failed`.
    pub async fn fail(&self, work_id: &str, error: CoreError) {
        let mut state = self.state.lock().await;
        let Some(mut item) = state.active.remove(work_id) else {
            warn!(work_id = %work_id, "fail() called on unknown/already-finished work item");
            return;
        };
        if let Some(agent_id) = state.agents.iter().find(|(_, a)| a.current_work_id.as_deref() == Some(work_id)).map(|(id, _)| id.clone()) {
            if let Some(agent) = state.agents.get_mut(&agent_id) {
                agent.status = AgentStatus::Available;
                agent.current_work_id = None;
            }
        }

        item.error_message = Some(error.to_string());
        if error.is_retryable() && item.retry_count < item.max_retries {
            item.retry_count += 1;
            item.status = WorkStatus::Pending;
            item.started_at = None;
            warn!(work_id = %work_id, retry_count = item.retry_count, "work failed, retrying");
            state.enqueue(item);
        } else {
            item.status = WorkStatus::Failed;
            item.completed_at = Some(chrono::Utc::now());
            error!(work_id = %work_id, error = %error, "work failed terminally");
            state.completed.insert(work_id.to_string(), item);
        }
    }

    /// Cancels a pending or in-progress work item. Returns `false` for an
    /// unknown or already-terminal `work_id`.
    pub async fn cancel_work(&self, work_id: &str, reason: &str) -> bool {
        let mut state = self.state.lock().await;

        if let Some(idx) = state.queue.iter().position(|w| w.work_id == work_id) {
            let mut item = state.queue.remove(idx);
            item.status = WorkStatus::Cancelled;
            item.error_message = Some(reason.to_string());
            item.completed_at = Some(chrono::Utc::now());
            state.completed.insert(work_id.to_string(), item);
            info!(work_id = %work_id, "pending work cancelled");
            return true;
        }

        if let Some(mut item) = state.active.remove(work_id) {
            if let Some(agent_id) = state
                .agents
                .iter()
                .find(|(_, a)| a.current_work_id.as_deref() == Some(work_id))
                .map(|(id, _)| id.clone())
            {
                if let Some(agent) = state.agents.get_mut(&agent_id) {
                    agent.status = AgentStatus::Available;
                    agent.current_work_id = None;
                }
            }
            item.status = WorkStatus::Cancelled;
            item.error_message = Some(reason.to_string());
            item.completed_at = Some(chrono::Utc::now());
            state.completed.insert(work_id.to_string(), item);
            info!(work_id = %work_id, "in-progress work cancelled");
            return true;
        }

        false
    }

    /// Looks up a work item's current snapshot: pending queue, then active
    /// map, then completed archive.
    pub async fn get_work_status(&self, work_id: &str) -> Option<WorkItem> {
        let state = self.state.lock().await;
        state
            .queue
            .iter()
            .find(|w| w.work_id == work_id)
            .or_else(|| state.active.get(work_id))
            .or_else(|| state.completed.get(work_id))
            .cloned()
    }

    pub async fn get_queue_status(&self) -> QueueStatus {
        let state = self.state.lock().await;
        let mut agent_types: BTreeMap<String, usize> = BTreeMap::new();
        let mut available = 0;
        let mut busy = 0;
        let mut offline = 0;
        for agent in state.agents.values() {
            *agent_types.entry(agent.agent_type.as_str().to_string()).or_insert(0) += 1;
            match agent.status {
                AgentStatus::Available => available += 1,
                AgentStatus::Busy => busy += 1,
                AgentStatus::Offline => offline += 1,
            }
        }
        QueueStatus {
            pending: state.queue.len(),
            active: state.active.len(),
            completed: state.completed.len(),
            registered_agents: state.agents.len(),
            available_agents: available,
            busy_agents: busy,
            offline_agents: offline,
            agent_types,
        }
    }

    /// Best-effort informational fan-out. Never mutates scheduler state;
    /// a full/closed receiver is silently ignored.
    pub fn publish(&self, event_type: impl Into<String>, event_data: BTreeMap<String, serde_json::Value>, agent_id: Option<String>) {
        let event = PublishedEvent {
            event_type: event_type.into(),
            timestamp: chrono::Utc::now(),
            agent_id,
            event_data,
        };
        if self.publish_tx.send(event).is_err() {
            debug!("publish: no subscriber listening, event dropped");
        }
    }

    /// Forces a terminal `WorkTimeoutError` failure on any in-progress item
    /// whose `startedAt` predates `workTimeoutMinutes` ago. Returns the
    /// `workId`s swept.
    pub async fn sweep_timeouts(&self) -> Vec<String> {
        let cutoff = chrono::Utc::now() - chrono::Duration::minutes(i64::try_from(self.config.work_timeout_minutes).unwrap_or(i64::MAX));
        let timed_out: Vec<String> = {
            let state = self.state.lock().await;
            state
                .active
                .values()
                .filter(|w| w.started_at.is_some_and(|started| started < cutoff))
                .map(|w| w.work_id.clone())
                .collect()
        };
        for work_id in &timed_out {
            self.fail(
                work_id,
                CoreError::WorkTimeoutError {
                    work_id: work_id.clone(),
                    minutes: self.config.work_timeout_minutes,
                },
            )
            .await;
        }
        timed_out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::contract::{ContractFields, DnaComplianceBlock, InputRequirements, OutputSpecifications, Payload};
    use crate::runtime::ports::PortFuture;

    /// A `deliverableData["artifact"]` payload that clears every DNA
    /// principle regardless of which agent scores it.
    fn compliant_output_specifications() -> OutputSpecifications {
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

    struct EchoAgent(AgentType);

    impl AgentHandle for EchoAgent {
        fn agent_type(&self) -> AgentType {
            self.0
        }

        fn process_contract<'a>(&'a self, input: Contract) -> PortFuture<'a, Contract> {
            Box::pin(async move {
                let target = input.target_agent.next().unwrap_or(AgentType::ProjectManager);
                input.derive(
                    target,
                    crate::contract::DerivePatch {
                        output_specifications: Some(compliant_output_specifications()),
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

    fn contract_for(story_id: &str, target: AgentType) -> Contract {
        Contract::build(ContractFields {
            story_id: story_id.to_string(),
            source_agent: AgentType::ProjectManager,
            target_agent: target,
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
        .expect("valid contract")
    }

    #[tokio::test]
    async fn delegate_rejects_illegal_sequence() {
        let (bus, _rx) = EventBus::new(EventBusConfig::default());
        let contract = contract_for("STORY-1", AgentType::TestEngineer);
        let err = bus.delegate(contract, Priority::Medium).await.unwrap_err();
        assert_eq!(err.code(), crate::error::code::INVALID_SEQUENCE);
    }

    #[tokio::test]
    async fn delegate_honors_configured_sequence_override() {
        let mut config = EventBusConfig::default();
        config.valid_agent_sequences.insert(AgentType::ProjectManager, AgentType::TestEngineer);
        let (bus, _rx) = EventBus::new(config);
        let contract = contract_for("STORY-OVERRIDE", AgentType::TestEngineer);
        let work_id = bus.delegate(contract, Priority::Medium).await.unwrap();
        assert!(!work_id.is_empty());
    }

    #[tokio::test]
    async fn happy_path_single_hop_completes_and_redelegates() {
        let (bus, _rx) = EventBus::new(EventBusConfig::default());
        bus.register_agent("gd-1", AgentType::GameDesigner, Arc::new(EchoAgent(AgentType::GameDesigner)), BTreeSet::new())
            .await
            .unwrap();

        let work_id = bus
            .delegate(contract_for("STORY-T-1", AgentType::GameDesigner), Priority::High)
            .await
            .unwrap();

        let status = bus.get_work_status(&work_id).await.unwrap();
        assert_eq!(status.status, WorkStatus::Pending);

        bus.dispatch().await;
        // Give the spawned task a moment to complete and re-delegate.
        for _ in 0..50 {
            if bus.get_queue_status().await.pending > 0 || bus.get_work_status(&work_id).await.map(|w| w.status) == Some(WorkStatus::Completed) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let final_status = bus.get_work_status(&work_id).await.unwrap();
        assert_eq!(final_status.status, WorkStatus::Completed);
        let queue_status = bus.get_queue_status().await;
        assert_eq!(queue_status.pending, 1, "completed output should have been re-delegated");
    }

    #[tokio::test]
    async fn priority_ordering_serves_high_before_low() {
        let (bus, _rx) = EventBus::new(EventBusConfig::default());
        let low = bus.delegate(contract_for("STORY-A", AgentType::GameDesigner), Priority::Low).await.unwrap();
        let high = bus.delegate(contract_for("STORY-B", AgentType::GameDesigner), Priority::High).await.unwrap();
        let medium = bus.delegate(contract_for("STORY-C", AgentType::GameDesigner), Priority::Medium).await.unwrap();

        let state = bus.state.lock().await;
        let ids: Vec<&str> = state.queue.iter().map(|w| w.work_id.as_str()).collect();
        assert_eq!(ids, vec![high.as_str(), medium.as_str(), low.as_str()]);
    }

    #[tokio::test]
    async fn cancel_pending_work_archives_as_cancelled() {
        let (bus, _rx) = EventBus::new(EventBusConfig::default());
        let work_id = bus.delegate(contract_for("STORY-X", AgentType::GameDesigner), Priority::Medium).await.unwrap();
        assert!(bus.cancel_work(&work_id, "aborted").await);
        let status = bus.get_work_status(&work_id).await.unwrap();
        assert_eq!(status.status, WorkStatus::Cancelled);
        assert_eq!(status.error_message.as_deref(), Some("aborted"));
        assert!(!bus.cancel_work(&work_id, "again").await, "second cancel must return false");
    }

    #[tokio::test]
    async fn unregister_frees_in_progress_agent() {
        let (bus, _rx) = EventBus::new(EventBusConfig::default());
        bus.register_agent("gd-1", AgentType::GameDesigner, Arc::new(EchoAgent(AgentType::GameDesigner)), BTreeSet::new())
            .await
            .unwrap();
        bus.delegate(contract_for("STORY-Z", AgentType::GameDesigner), Priority::Medium).await.unwrap();
        bus.dispatch().await;
        assert!(bus.unregister_agent("gd-1").await);
        assert!(!bus.unregister_agent("gd-1").await);
    }
}
