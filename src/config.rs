#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Layered configuration for the [`crate::eventbus::EventBus`]: explicit
//! defaults, overridable by a small `key = value` text file, overridable in
//! turn by environment variables. Precedence is env wins over file, file
//! wins over the compiled-in default.

use std::collections::BTreeMap;
use std::env;

use crate::contract::AgentType;

/// Construction-time options recognized by the EventBus. See §6.5.
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    pub max_concurrent_work: usize,
    pub work_timeout_minutes: u64,
    pub valid_agent_sequences: BTreeMap<AgentType, AgentType>,
}

fn default_sequences() -> BTreeMap<AgentType, AgentType> {
    use AgentType::{Developer, GameDesigner, ProjectManager, QaTester, QualityReviewer, TestEngineer};
    let mut map = BTreeMap::new();
    map.insert(ProjectManager, GameDesigner);
    map.insert(GameDesigner, Developer);
    map.insert(Developer, TestEngineer);
    map.insert(TestEngineer, QaTester);
    map.insert(QaTester, QualityReviewer);
    map.insert(QualityReviewer, ProjectManager);
    map
}

// `AgentType` has no natural total order beyond declaration order; a `BTreeMap`
// key still needs `Ord`, so we derive it structurally via discriminant.
impl PartialOrd for AgentType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for AgentType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            max_concurrent_work: 10,
            work_timeout_minutes: 60,
            valid_agent_sequences: default_sequences(),
        }
    }
}

/// Hand-rolled `key = value` parser for the optional config file — no
/// external config crate, since the file format is two integers wide.
fn parse_config_content(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// Loads an [`EventBusConfig`], applying (in increasing precedence):
/// 1. compiled-in defaults,
/// 2. the optional `file_content` (e.g. read from `.eventbus/config.toml`-like text),
/// 3. `EVENTBUS_MAX_CONCURRENT_WORK` / `EVENTBUS_WORK_TIMEOUT_MINUTES` environment variables.
#[must_use]
pub fn load_config(file_content: Option<&str>) -> EventBusConfig {
    let mut config = EventBusConfig::default();

    if let Some(content) = file_content {
        let parsed = parse_config_content(content);
        if let Some(v) = parsed.get("max_concurrent_work").and_then(|s| s.parse().ok()) {
            config.max_concurrent_work = v;
        }
        if let Some(v) = parsed.get("work_timeout_minutes").and_then(|s| s.parse().ok()) {
            config.work_timeout_minutes = v;
        }
    }

    if let Ok(v) = env::var("EVENTBUS_MAX_CONCURRENT_WORK") {
        if let Ok(parsed) = v.parse() {
            config.max_concurrent_work = parsed;
        }
    }
    if let Ok(v) = env::var("EVENTBUS_WORK_TIMEOUT_MINUTES") {
        if let Ok(parsed) = v.parse() {
            config.work_timeout_minutes = parsed;
        }
    }

    config
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = EventBusConfig::default();
        assert_eq!(config.max_concurrent_work, 10);
        assert_eq!(config.work_timeout_minutes, 60);
        assert_eq!(config.valid_agent_sequences.len(), 6);
    }

    #[test]
    fn file_content_overrides_default() {
        let config = load_config(Some("max_concurrent_work = 25\nwork_timeout_minutes = 120\n"));
        assert_eq!(config.max_concurrent_work, 25);
        assert_eq!(config.work_timeout_minutes, 120);
    }

    #[test]
    fn parse_config_content_skips_comments_and_blank_lines() {
        let parsed = parse_config_content("# comment\n\nmax_concurrent_work = 5\n");
        assert_eq!(parsed.get("max_concurrent_work"), Some(&"5".to_string()));
        assert_eq!(parsed.len(), 1);
    }
}
