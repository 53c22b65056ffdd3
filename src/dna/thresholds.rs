#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Tunable thresholds for the DNA engine's rules. Defaults are drawn from the
//! complexity/time budgets the upstream developer and game-designer
//! principles specify; a hosting binary may override them per story.

#[derive(Debug, Clone, Copy)]
pub struct DeveloperThresholds {
    pub max_component_complexity: u32,
    pub max_api_complexity: u32,
    pub max_function_complexity: u32,
    pub max_nesting_depth: u32,
    pub max_file_lines: u32,
}

impl Default for DeveloperThresholds {
    fn default() -> Self {
        Self {
            max_component_complexity: 10,
            max_api_complexity: 8,
            max_function_complexity: 5,
            max_nesting_depth: 3,
            max_file_lines: 200,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GameDesignerThresholds {
    pub max_ui_elements_per_screen: u32,
    pub max_interaction_steps: u32,
    pub max_navigation_depth: u32,
    pub max_estimated_minutes: f64,
}

impl Default for GameDesignerThresholds {
    fn default() -> Self {
        Self {
            max_ui_elements_per_screen: 8,
            max_interaction_steps: 5,
            max_navigation_depth: 3,
            max_estimated_minutes: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TestEngineerThresholds {
    pub max_unit_minutes: f64,
    pub max_integration_minutes: f64,
    pub max_end_to_end_minutes: f64,
    pub max_total_minutes: f64,
}

impl Default for TestEngineerThresholds {
    fn default() -> Self {
        Self {
            max_unit_minutes: 2.0,
            max_integration_minutes: 5.0,
            max_end_to_end_minutes: 8.0,
            max_total_minutes: 10.0,
        }
    }
}

/// `ProfessionalTone`'s vocabulary sets. The originating rule set hardcoded a
/// single organization's house style; here it is a configurable pair of term
/// lists so any deployment can supply its own domain/informal vocabulary.
#[derive(Debug, Clone)]
pub struct ToneVocabulary {
    pub domain_terms: Vec<String>,
    pub forbidden_terms: Vec<String>,
    pub max_grade_level: f64,
}

impl Default for ToneVocabulary {
    fn default() -> Self {
        Self {
            domain_terms: vec![
                "requirement".into(),
                "acceptance criteria".into(),
                "stakeholder".into(),
                "deliverable".into(),
                "specification".into(),
            ],
            forbidden_terms: vec![
                "kinda".into(),
                "gonna".into(),
                "whatever".into(),
                "super duper".into(),
                "lol".into(),
            ],
            max_grade_level: 8.0,
        }
    }
}
