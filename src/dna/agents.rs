#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Per-agent DNA engines (C3). Each function evaluates the nine principles
//! against an [`Artifact`], but only the principles that agent's work can
//! actually speak to are allowed to fail `overallCompliant` — the rest pass
//! through neutral (`true`, score `5.0`), per the applicable-principle
//! subsets each agent's own validator enforces upstream.

use std::collections::BTreeMap;

use crate::contract::{ArchitectureCompliance, DesignPrinciplesValidation, DnaValidationResult};
use crate::dna::artifact::Artifact;
use crate::dna::principles::{
    bounded_cost_score, business_logic_marker_count, clamp_score, coverage_score,
    endpoint_paths_are_api_first, estimate_reading_grade, has_unjustified_state_indicator,
    mean_complexity, professional_tone_score,
};
use crate::dna::thresholds::{DeveloperThresholds, GameDesignerThresholds, TestEngineerThresholds, ToneVocabulary};

const NEUTRAL_SCORE: f64 = 5.0;

struct ScoredPrinciples {
    design: DesignPrinciplesValidation,
    architecture: ArchitectureCompliance,
    design_scores: [f64; 5],
    architecture_scores: [f64; 4],
    violations: Vec<String>,
    recommendations: Vec<String>,
}

impl ScoredPrinciples {
    fn neutral() -> Self {
        Self {
            design: DesignPrinciplesValidation::all_true(),
            architecture: ArchitectureCompliance::all_true(),
            design_scores: [NEUTRAL_SCORE; 5],
            architecture_scores: [NEUTRAL_SCORE; 4],
            violations: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

/// Weighted composition fixed at design 60% / architecture 30% / agent
/// extension 10%, per the closed composition rule every agent shares.
fn compose(
    scored: ScoredPrinciples,
    required_compliant: bool,
    extension_score: f64,
    quality_reviewer_metrics: BTreeMap<String, f64>,
) -> DnaValidationResult {
    let design_mean = scored.design_scores.iter().sum::<f64>() / scored.design_scores.len() as f64;
    let architecture_mean =
        scored.architecture_scores.iter().sum::<f64>() / scored.architecture_scores.len() as f64;
    let overall_score = clamp_score(0.6 * design_mean + 0.3 * architecture_mean + 0.1 * extension_score);

    DnaValidationResult {
        design: scored.design,
        architecture: scored.architecture,
        design_scores: scored.design_scores,
        architecture_scores: scored.architecture_scores,
        overall_compliant: required_compliant,
        overall_score,
        violations: scored.violations,
        recommendations: scored.recommendations,
        timestamp: chrono::Utc::now(),
        quality_reviewer_metrics,
    }
}

/// `ProjectManager`: owns the three narrative design principles plus a
/// story-breakdown time-box check. No architecture principle is this agent's
/// concern — a PM produces no code or UI, so architecture passes through
/// neutral.
#[must_use]
pub fn evaluate_project_manager(artifact: &Artifact, tone: &ToneVocabulary) -> DnaValidationResult {
    let mut scored = ScoredPrinciples::neutral();

    let (pedagogical_ok, pedagogical_score) =
        coverage_score(&artifact.learning_objectives, &artifact.narrative_text);
    scored.design.pedagogical_value = pedagogical_ok;
    scored.design_scores[0] = pedagogical_score;
    if !pedagogical_ok {
        scored.violations.push("story breakdown under-references declared learning objectives".into());
        scored.recommendations.push("reference each learning objective explicitly in the story breakdown".into());
    }

    let (tone_ok, tone_score, tone_violations) = professional_tone_score(
        &artifact.narrative_text,
        &tone.domain_terms.iter().map(String::as_str).collect::<Vec<_>>(),
        &tone.forbidden_terms.iter().map(String::as_str).collect::<Vec<_>>(),
        tone.max_grade_level,
    );
    scored.design.professional_tone = tone_ok;
    scored.design_scores[4] = tone_score;
    scored.violations.extend(tone_violations);

    let (time_ok, time_score) = bounded_cost_score(
        artifact.estimated_minutes.unwrap_or(0.0),
        GameDesignerThresholds::default().max_estimated_minutes * 3.0,
    );
    scored.design.time_respect = time_ok;
    scored.design_scores[2] = time_score;
    if !time_ok {
        scored.violations.push("story scope exceeds the project manager's time-box budget".into());
    }

    // PolicyToPractice / HolisticThinking: narrative principles with no
    // independent measurable signal beyond coverage and tone; they track the
    // pedagogical/tone compliance already computed.
    scored.design.policy_to_practice = pedagogical_ok;
    scored.design_scores[1] = pedagogical_score;
    scored.design.holistic_thinking = tone_ok;
    scored.design_scores[3] = tone_score;

    let required_compliant =
        scored.design.pedagogical_value && scored.design.policy_to_practice && scored.design.holistic_thinking
            && scored.design.professional_tone && scored.design.time_respect;

    compose(scored, required_compliant, NEUTRAL_SCORE, BTreeMap::new())
}

/// `GameDesigner`: UX-bounded time respect plus the narrative principles;
/// architecture passes through neutral (no backend/API surface yet).
#[must_use]
pub fn evaluate_game_designer(
    artifact: &Artifact,
    thresholds: &GameDesignerThresholds,
    tone: &ToneVocabulary,
) -> DnaValidationResult {
    let mut scored = ScoredPrinciples::neutral();

    let max_elements = artifact.ui_elements_per_screen.iter().copied().max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let (elements_ok, elements_score) = bounded_cost_score(f64::from(max_elements), f64::from(thresholds.max_ui_elements_per_screen));
    #[allow(clippy::cast_precision_loss)]
    let (steps_ok, steps_score) = bounded_cost_score(
        f64::from(artifact.interaction_steps.unwrap_or(0)),
        f64::from(thresholds.max_interaction_steps),
    );
    #[allow(clippy::cast_precision_loss)]
    let (depth_ok, depth_score) = bounded_cost_score(
        f64::from(artifact.navigation_depth.unwrap_or(0)),
        f64::from(thresholds.max_navigation_depth),
    );
    let (time_ok, time_score) =
        bounded_cost_score(artifact.estimated_minutes.unwrap_or(0.0), thresholds.max_estimated_minutes);

    let time_respect_ok = elements_ok && steps_ok && depth_ok && time_ok;
    let time_respect_score = [elements_score, steps_score, depth_score, time_score]
        .iter()
        .sum::<f64>()
        / 4.0;
    scored.design.time_respect = time_respect_ok;
    scored.design_scores[2] = clamp_score(time_respect_score);
    if !time_respect_ok {
        scored.violations.push("screen exceeds UX time-respect budget (elements/steps/depth/minutes)".into());
        scored.recommendations.push("simplify the flow: fewer elements, steps, or navigation depth".into());
    }

    let (pedagogical_ok, pedagogical_score) =
        coverage_score(&artifact.learning_objectives, &artifact.narrative_text);
    scored.design.pedagogical_value = pedagogical_ok;
    scored.design_scores[0] = pedagogical_score;

    let (tone_ok, tone_score, tone_violations) = professional_tone_score(
        &artifact.narrative_text,
        &tone.domain_terms.iter().map(String::as_str).collect::<Vec<_>>(),
        &tone.forbidden_terms.iter().map(String::as_str).collect::<Vec<_>>(),
        tone.max_grade_level,
    );
    scored.design.professional_tone = tone_ok;
    scored.design_scores[4] = tone_score;
    scored.violations.extend(tone_violations);

    scored.design.holistic_thinking = pedagogical_ok && tone_ok;
    scored.design_scores[3] = clamp_score((pedagogical_score + tone_score) / 2.0);

    let required_compliant = time_respect_ok && pedagogical_ok && tone_ok && scored.design.holistic_thinking;

    compose(scored, required_compliant, NEUTRAL_SCORE, BTreeMap::new())
}

/// `Developer`: the code-shaped principles (time respect via complexity
/// budgets, the four architecture principles, and code-documentation tone).
/// Narrative principles owned upstream pass through neutral.
#[must_use]
pub fn evaluate_developer(
    artifact: &Artifact,
    thresholds: &DeveloperThresholds,
    tone: &ToneVocabulary,
) -> DnaValidationResult {
    let mut scored = ScoredPrinciples::neutral();

    let component_mean = mean_complexity(&artifact.component_complexities);
    let api_mean = mean_complexity(&artifact.endpoint_complexities);
    let function_max = artifact.function_complexities.iter().copied().max().unwrap_or(0);
    let nesting = artifact.max_nesting_depth.unwrap_or(0);
    let file_lines = artifact.max_file_lines.unwrap_or(0);

    let component_ok = component_mean <= f64::from(thresholds.max_component_complexity);
    let api_ok = api_mean <= f64::from(thresholds.max_api_complexity);
    let function_ok = function_max <= thresholds.max_function_complexity;
    let nesting_ok = nesting <= thresholds.max_nesting_depth;
    let lines_ok = file_lines <= thresholds.max_file_lines;

    let time_respect_ok = component_ok && api_ok && function_ok && nesting_ok && lines_ok;
    if !time_respect_ok {
        scored.violations.push("code exceeds a complexity or size budget (component/api/function/nesting/file-lines)".into());
        scored.recommendations.push("split large functions/files and reduce branching depth".into());
    }
    let (_, component_score) = bounded_cost_score(component_mean, f64::from(thresholds.max_component_complexity));
    let (_, api_score) = bounded_cost_score(api_mean, f64::from(thresholds.max_api_complexity));
    let (_, function_score) = bounded_cost_score(f64::from(function_max), f64::from(thresholds.max_function_complexity));
    scored.design.time_respect = time_respect_ok;
    scored.design_scores[2] = clamp_score((component_score + api_score + function_score) / 3.0);

    let (tone_ok, tone_score, tone_violations) = professional_tone_score(
        &artifact.narrative_text,
        &tone.domain_terms.iter().map(String::as_str).collect::<Vec<_>>(),
        &tone.forbidden_terms.iter().map(String::as_str).collect::<Vec<_>>(),
        tone.max_grade_level,
    );
    scored.design.professional_tone = tone_ok;
    scored.design_scores[4] = tone_score;
    scored.violations.extend(tone_violations);

    let has_ui = !artifact.ui_elements_per_screen.is_empty() || !artifact.ui_source.is_empty();
    let api_first_ok = !has_ui || (!artifact.endpoint_paths.is_empty() && endpoint_paths_are_api_first(&artifact.endpoint_paths));
    scored.architecture.api_first = api_first_ok;
    scored.architecture_scores[0] = if api_first_ok { NEUTRAL_SCORE } else { 1.0 };
    if !api_first_ok {
        scored.violations.push("UI present without a conforming /api/-prefixed endpoint".into());
    }

    let stateless_ok = !has_unjustified_state_indicator(&artifact.backend_source);
    scored.architecture.stateless_backend = stateless_ok;
    scored.architecture_scores[1] = if stateless_ok { NEUTRAL_SCORE } else { 1.0 };
    if !stateless_ok {
        scored.violations.push("backend source contains an unjustified mutable-state indicator".into());
    }

    let marker_count = business_logic_marker_count(&artifact.ui_source);
    let separation_ok = marker_count <= 2;
    scored.architecture.separation_of_concerns = separation_ok;
    scored.architecture_scores[2] = if separation_ok { NEUTRAL_SCORE } else { clamp_score(5.0 - f64::from(u32::try_from(marker_count).unwrap_or(u32::MAX))) };
    if !separation_ok {
        scored.violations.push("UI layer contains business-logic markers beyond the two-marker allowance".into());
    }

    let all_complexities: Vec<u32> = artifact
        .component_complexities
        .iter()
        .chain(artifact.endpoint_complexities.iter())
        .chain(artifact.function_complexities.iter())
        .copied()
        .collect();
    let overall_mean_complexity = mean_complexity(&all_complexities);
    let simplicity_ok = overall_mean_complexity <= 8.0;
    scored.architecture.simplicity_first = simplicity_ok;
    let (_, simplicity_score) = bounded_cost_score(overall_mean_complexity, 8.0);
    scored.architecture_scores[3] = simplicity_score;
    if !simplicity_ok {
        scored.violations.push("mean cyclomatic complexity exceeds the simplicity-first budget of 8".into());
    }

    let mut metrics = BTreeMap::new();
    metrics.insert("average_component_complexity".to_string(), component_mean);
    metrics.insert("average_api_complexity".to_string(), api_mean);

    let required_compliant =
        time_respect_ok && api_first_ok && stateless_ok && separation_ok && simplicity_ok && tone_ok;

    compose(scored, required_compliant, simplicity_score, metrics)
}

/// `TestEngineer`: suite wall-time budget and test-code simplicity.
#[must_use]
pub fn evaluate_test_engineer(
    artifact: &Artifact,
    thresholds: &TestEngineerThresholds,
    tone: &ToneVocabulary,
) -> DnaValidationResult {
    let mut scored = ScoredPrinciples::neutral();

    let (unit, integration, e2e) = artifact.suite_minutes.unwrap_or((0.0, 0.0, 0.0));
    let total = unit + integration + e2e;
    let unit_ok = unit <= thresholds.max_unit_minutes;
    let integration_ok = integration <= thresholds.max_integration_minutes;
    let e2e_ok = e2e <= thresholds.max_end_to_end_minutes;
    let total_ok = total <= thresholds.max_total_minutes;
    let time_respect_ok = unit_ok && integration_ok && e2e_ok && total_ok;
    let (_, total_score) = bounded_cost_score(total, thresholds.max_total_minutes);
    scored.design.time_respect = time_respect_ok;
    scored.design_scores[2] = total_score;
    if !time_respect_ok {
        scored.violations.push("test suite exceeds its wall-time budget".into());
        scored.recommendations.push("parallelize suites once total wall time exceeds 3 minutes".into());
    }

    let test_mean_complexity = mean_complexity(&artifact.test_complexities);
    let simplicity_ok = test_mean_complexity <= 8.0;
    scored.architecture.simplicity_first = simplicity_ok;
    let (_, simplicity_score) = bounded_cost_score(test_mean_complexity, 8.0);
    scored.architecture_scores[3] = simplicity_score;
    if !simplicity_ok {
        scored.violations.push("test code mean complexity exceeds the simplicity-first budget".into());
    }

    let (tone_ok, tone_score, tone_violations) = professional_tone_score(
        &artifact.narrative_text,
        &tone.domain_terms.iter().map(String::as_str).collect::<Vec<_>>(),
        &tone.forbidden_terms.iter().map(String::as_str).collect::<Vec<_>>(),
        tone.max_grade_level,
    );
    scored.design.professional_tone = tone_ok;
    scored.design_scores[4] = tone_score;
    scored.violations.extend(tone_violations);

    let mut metrics = BTreeMap::new();
    metrics.insert("test_effectiveness".to_string(), total_score);

    let required_compliant = time_respect_ok && simplicity_ok && tone_ok;

    compose(scored, required_compliant, simplicity_score, metrics)
}

/// `QaTester`: re-checks (does not re-own) whatever architecture principles
/// the artifact under test declares endpoints/components for, plus the
/// narrative principles relevant to reviewing a finished feature.
#[must_use]
pub fn evaluate_qa_tester(artifact: &Artifact, tone: &ToneVocabulary) -> DnaValidationResult {
    let mut scored = ScoredPrinciples::neutral();

    let (pedagogical_ok, pedagogical_score) =
        coverage_score(&artifact.learning_objectives, &artifact.narrative_text);
    scored.design.pedagogical_value = pedagogical_ok;
    scored.design_scores[0] = pedagogical_score;

    let (tone_ok, tone_score, tone_violations) = professional_tone_score(
        &artifact.narrative_text,
        &tone.domain_terms.iter().map(String::as_str).collect::<Vec<_>>(),
        &tone.forbidden_terms.iter().map(String::as_str).collect::<Vec<_>>(),
        tone.max_grade_level,
    );
    scored.design.professional_tone = tone_ok;
    scored.design_scores[4] = tone_score;
    scored.violations.extend(tone_violations);
    scored.design.holistic_thinking = pedagogical_ok && tone_ok;
    scored.design_scores[3] = clamp_score((pedagogical_score + tone_score) / 2.0);

    let has_endpoints = !artifact.endpoint_paths.is_empty();
    if has_endpoints {
        let api_first_ok = endpoint_paths_are_api_first(&artifact.endpoint_paths);
        scored.architecture.api_first = api_first_ok;
        scored.architecture_scores[0] = if api_first_ok { NEUTRAL_SCORE } else { 1.0 };
        if !api_first_ok {
            scored.violations.push("declared endpoints under test are not /api/-prefixed".into());
        }
    }

    let required_compliant = pedagogical_ok && tone_ok && scored.design.holistic_thinking
        && (!has_endpoints || scored.architecture.api_first);

    compose(scored, required_compliant, NEUTRAL_SCORE, BTreeMap::new())
}

/// `QualityReviewer`: the final gate. All nine principles are this agent's
/// concern, and its `qualityReviewerMetrics` digest is the canonical one
/// downstream tooling consults.
#[must_use]
pub fn evaluate_quality_reviewer(
    artifact: &Artifact,
    developer_thresholds: &DeveloperThresholds,
    tone: &ToneVocabulary,
    upstream_metrics: &[BTreeMap<String, f64>],
) -> DnaValidationResult {
    let developer_pass = evaluate_developer(artifact, developer_thresholds, tone);
    let pm_pass = evaluate_project_manager(artifact, tone);

    let mut scored = ScoredPrinciples {
        design: pm_pass.design,
        architecture: developer_pass.architecture,
        design_scores: pm_pass.design_scores,
        architecture_scores: developer_pass.architecture_scores,
        violations: [pm_pass.violations, developer_pass.violations].concat(),
        recommendations: [pm_pass.recommendations, developer_pass.recommendations].concat(),
    };
    scored.design.time_respect = pm_pass.design.time_respect && developer_pass.design.time_respect;

    let required_compliant = scored.design.pedagogical_value
        && scored.design.policy_to_practice
        && scored.design.time_respect
        && scored.design.holistic_thinking
        && scored.design.professional_tone
        && scored.architecture.api_first
        && scored.architecture.stateless_backend
        && scored.architecture.separation_of_concerns
        && scored.architecture.simplicity_first;

    let mut metrics = BTreeMap::new();
    for upstream in upstream_metrics {
        for (key, value) in upstream {
            metrics.insert(key.clone(), *value);
        }
    }
    let average_architecture_score =
        scored.architecture_scores.iter().sum::<f64>() / scored.architecture_scores.len() as f64;
    metrics.insert("overall_architecture_score".to_string(), average_architecture_score);
    metrics.insert(
        "documentation_quality".to_string(),
        clamp_score(5.0 - estimate_reading_grade(&artifact.narrative_text) / 4.0),
    );

    compose(scored, required_compliant, average_architecture_score, metrics)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn clean_artifact() -> Artifact {
        Artifact {
            narrative_text: "This story covers resource management and budgeting for the district office, with clear acceptance criteria and stakeholder sign-off as the deliverable.".into(),
            learning_objectives: vec!["resource management".into(), "budgeting".into()],
            ..Artifact::default()
        }
    }

    #[test]
    fn project_manager_neutral_on_architecture() {
        let result = evaluate_project_manager(&clean_artifact(), &ToneVocabulary::default());
        assert!(result.architecture.api_first);
        assert!((result.architecture_scores[0] - NEUTRAL_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn developer_flags_oversized_function() {
        let mut artifact = Artifact::default();
        artifact.function_complexities = vec![20];
        artifact.narrative_text = "clean documented handler".into();
        let result = evaluate_developer(&artifact, &DeveloperThresholds::default(), &ToneVocabulary::default());
        assert!(!result.design.time_respect);
        assert!(!result.overall_compliant);
    }

    #[test]
    fn developer_requires_api_prefixed_endpoints_when_ui_present() {
        let mut artifact = Artifact::default();
        artifact.ui_elements_per_screen = vec![3];
        artifact.endpoint_paths = vec!["/v1/stories".into()];
        artifact.narrative_text = "documented component".into();
        let result = evaluate_developer(&artifact, &DeveloperThresholds::default(), &ToneVocabulary::default());
        assert!(!result.architecture.api_first);
    }

    #[test]
    fn test_engineer_flags_suite_over_budget() {
        let mut artifact = Artifact::default();
        artifact.suite_minutes = Some((5.0, 10.0, 10.0));
        let result = evaluate_test_engineer(&artifact, &TestEngineerThresholds::default(), &ToneVocabulary::default());
        assert!(!result.design.time_respect);
        assert!(!result.overall_compliant);
    }

    #[test]
    fn quality_reviewer_aggregates_upstream_metrics() {
        let mut upstream = BTreeMap::new();
        upstream.insert("average_component_complexity".to_string(), 4.0);
        let result = evaluate_quality_reviewer(
            &clean_artifact(),
            &DeveloperThresholds::default(),
            &ToneVocabulary::default(),
            std::slice::from_ref(&upstream),
        );
        assert_eq!(result.quality_reviewer_metrics.get("average_component_complexity"), Some(&4.0));
        assert!(result.quality_reviewer_metrics.contains_key("overall_architecture_score"));
    }

    #[test]
    fn scores_always_within_scale() {
        let result = evaluate_project_manager(&clean_artifact(), &ToneVocabulary::default());
        for score in result.design_scores.iter().chain(result.architecture_scores.iter()) {
            assert!((1.0..=5.0).contains(score));
        }
    }
}
