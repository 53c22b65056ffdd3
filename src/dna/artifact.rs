#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// The measurable surface of whatever an agent produced, extracted from its
/// output contract for DNA scoring. Agents populate only the fields relevant
/// to what they build; unpopulated fields read as "nothing to measure" and
/// the corresponding principle passes through neutral rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Every human-readable string produced (descriptions, UI copy, docs),
    /// concatenated for text-analysis principles.
    #[serde(default)]
    pub narrative_text: String,
    /// Learning objectives the story declared upstream, for coverage scoring.
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    /// UI element count per screen (GameDesigner).
    #[serde(default)]
    pub ui_elements_per_screen: Vec<u32>,
    /// Interaction steps to complete the flow (GameDesigner).
    #[serde(default)]
    pub interaction_steps: Option<u32>,
    /// Navigation depth (GameDesigner).
    #[serde(default)]
    pub navigation_depth: Option<u32>,
    /// Estimated completion time in minutes (GameDesigner).
    #[serde(default)]
    pub estimated_minutes: Option<f64>,
    /// Cyclomatic complexity per UI component (Developer).
    #[serde(default)]
    pub component_complexities: Vec<u32>,
    /// Cyclomatic complexity per API endpoint (Developer).
    #[serde(default)]
    pub endpoint_complexities: Vec<u32>,
    /// Cyclomatic complexity per function (Developer).
    #[serde(default)]
    pub function_complexities: Vec<u32>,
    /// Maximum nesting depth observed across produced code (Developer).
    #[serde(default)]
    pub max_nesting_depth: Option<u32>,
    /// Line count of the largest produced file (Developer).
    #[serde(default)]
    pub max_file_lines: Option<u32>,
    /// Declared API endpoint paths (Developer/QaTester).
    #[serde(default)]
    pub endpoint_paths: Vec<String>,
    /// Raw source text for stateless/separation-of-concerns scanning.
    #[serde(default)]
    pub backend_source: String,
    #[serde(default)]
    pub ui_source: String,
    /// Per-suite wall time in minutes: (unit, integration, end_to_end).
    #[serde(default)]
    pub suite_minutes: Option<(f64, f64, f64)>,
    /// Test code complexity samples (TestEngineer).
    #[serde(default)]
    pub test_complexities: Vec<u32>,
}

impl Artifact {
    /// Extracts the measurable surface an agent attached to its output under
    /// the reserved `"artifact"` deliverable-data key. Absent or malformed
    /// data degrades to `Artifact::default()` — every principle fed by it
    /// then reads as "nothing produced yet" per the missing-field edge policy
    /// (§4.3.4), not as a validation exception.
    #[must_use]
    pub fn from_payload(payload: &std::collections::BTreeMap<String, serde_json::Value>) -> Self {
        payload
            .get("artifact")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}
