#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Pure scoring primitives shared by every agent's DNA engine. Each function
//! is deterministic on its inputs and clamps its result to `[1.0, 5.0]`.

/// Clamp any raw score into the DNA engine's fixed `[1.0, 5.0]` scale.
#[must_use]
pub fn clamp_score(raw: f64) -> f64 {
    raw.clamp(1.0, 5.0)
}

/// `TimeRespect` bound check: score 5.0 at or under budget, degrading
/// linearly to 1.0 at double budget or beyond.
#[must_use]
pub fn bounded_cost_score(actual: f64, budget: f64) -> (bool, f64) {
    if budget <= 0.0 {
        return (actual <= 0.0, if actual <= 0.0 { 5.0 } else { 1.0 });
    }
    let compliant = actual <= budget;
    let ratio = actual / budget;
    let raw = 5.0 - 4.0 * (ratio - 1.0).max(0.0);
    (compliant, clamp_score(raw))
}

/// `PedagogicalValue`-style coverage score: fraction of declared objectives
/// actually referenced in the artifact text, scaled onto `[1.0, 5.0]`.
#[must_use]
pub fn coverage_score(objectives: &[String], haystack: &str) -> (bool, f64) {
    if objectives.is_empty() {
        return (true, 5.0);
    }
    let haystack_lower = haystack.to_lowercase();
    let hits = objectives
        .iter()
        .filter(|obj| haystack_lower.contains(&obj.to_lowercase()))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let fraction = hits as f64 / objectives.len() as f64;
    let raw = 1.0 + 4.0 * fraction;
    (fraction >= 0.8, clamp_score(raw))
}

/// `ProfessionalTone`: presence of domain terms, absence of forbidden casual
/// terms, and a naive reading-grade estimate. `domain_terms`/`forbidden_terms`
/// matching is case-insensitive; reported violations preserve original casing
/// of the offending fragment.
#[must_use]
pub fn professional_tone_score(
    text: &str,
    domain_terms: &[&str],
    forbidden_terms: &[&str],
    max_grade_level: f64,
) -> (bool, f64, Vec<String>) {
    let lower = text.to_lowercase();
    let mut violations = Vec::new();

    let domain_hits = domain_terms.iter().filter(|t| lower.contains(&t.to_lowercase())).count();
    let has_domain_presence = domain_terms.is_empty() || domain_hits > 0;
    if !has_domain_presence {
        violations.push("no domain terminology present".to_string());
    }

    let mut casual_hits = 0usize;
    for term in forbidden_terms {
        if lower.contains(&term.to_lowercase()) {
            casual_hits += 1;
            violations.push(format!("informal term detected: '{term}'"));
        }
    }

    let grade = estimate_reading_grade(text);
    let grade_ok = grade <= max_grade_level;
    if !grade_ok {
        violations.push(format!("reading grade level {grade:.1} exceeds cap {max_grade_level:.1}"));
    }

    let compliant = has_domain_presence && casual_hits == 0 && grade_ok;
    #[allow(clippy::cast_precision_loss)]
    let domain_component = if domain_terms.is_empty() { 1.0 } else { (domain_hits as f64 / domain_terms.len() as f64).min(1.0) };
    #[allow(clippy::cast_precision_loss)]
    let casual_penalty = (casual_hits as f64) * 0.75;
    let grade_component = if grade_ok { 1.0 } else { (max_grade_level / grade).min(1.0) };
    let raw = 1.0 + 4.0 * (0.5 * domain_component + 0.5 * grade_component) - casual_penalty;

    (compliant, clamp_score(raw), violations)
}

/// A deliberately simple Flesch-Kincaid-style estimate: average sentence
/// length and average syllable-per-word count (vowel-group heuristic), not a
/// linguistically rigorous analyzer — sufficient to rank "plain" vs "dense"
/// text for the reading-grade cap.
#[must_use]
pub fn estimate_reading_grade(text: &str) -> f64 {
    let sentences = text.split(['.', '!', '?']).filter(|s| !s.trim().is_empty()).count().max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len().max(1);
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    #[allow(clippy::cast_precision_loss)]
    let words_per_sentence = word_count as f64 / sentences as f64;
    #[allow(clippy::cast_precision_loss)]
    let syllables_per_word = syllables as f64 / word_count as f64;

    (0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59).max(0.0)
}

fn count_syllables(word: &str) -> usize {
    let mut count = 0;
    let mut prev_was_vowel = false;
    for ch in word.to_lowercase().chars() {
        let is_vowel = matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !prev_was_vowel {
            count += 1;
        }
        prev_was_vowel = is_vowel;
    }
    count.max(1)
}

/// `SeparationOfConcerns`: counts occurrences of business-logic marker
/// keywords inside what should be presentation-only source.
#[must_use]
pub fn business_logic_marker_count(source: &str) -> usize {
    const MARKERS: &[&str] = &["validate", "process", "calculate", "transform"];
    let lower = source.to_lowercase();
    MARKERS.iter().map(|m| lower.matches(m).count()).sum()
}

/// `StatelessBackend`: detects mutable-state indicators unless an explicit
/// stateless justification marker is present alongside them.
#[must_use]
pub fn has_unjustified_state_indicator(source: &str) -> bool {
    const INDICATORS: &[&str] = &["session", "cache", "static mut", "lazy_static", "once_cell"];
    const JUSTIFICATION_MARKER: &str = "stateless-justified";
    let lower = source.to_lowercase();
    if lower.contains(JUSTIFICATION_MARKER) {
        return false;
    }
    INDICATORS.iter().any(|i| lower.contains(i))
}

/// `ApiFirst`: every declared endpoint path must begin with `/api/`.
#[must_use]
pub fn endpoint_paths_are_api_first(paths: &[String]) -> bool {
    paths.iter().all(|p| p.starts_with("/api/"))
}

/// Mean cyclomatic complexity across a set of measured units, used by
/// `SimplicityFirst`.
#[must_use]
pub fn mean_complexity(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let sum: u32 = values.iter().sum();
    #[allow(clippy::cast_precision_loss)]
    {
        f64::from(sum) / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_cost_at_budget_scores_five() {
        let (ok, score) = bounded_cost_score(10.0, 10.0);
        assert!(ok);
        assert!((score - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bounded_cost_over_budget_is_not_compliant_and_clamped() {
        let (ok, score) = bounded_cost_score(100.0, 10.0);
        assert!(!ok);
        assert!((1.0..5.0).contains(&score));
        assert!((score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn coverage_score_empty_objectives_is_trivially_compliant() {
        let (ok, score) = coverage_score(&[], "anything");
        assert!(ok);
        assert!((score - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn coverage_score_counts_case_insensitive_hits() {
        let objectives = vec!["Resource Management".to_string(), "Budgeting".to_string()];
        let (ok, score) = coverage_score(&objectives, "this screen teaches resource management basics");
        assert!(!ok);
        assert!(score > 1.0 && score < 5.0);
    }

    #[test]
    fn professional_tone_flags_forbidden_terms() {
        let (ok, _score, violations) =
            professional_tone_score("yeah this is kinda whatever honestly", &["governance"], &["kinda", "whatever"], 20.0);
        assert!(!ok);
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn endpoint_paths_require_api_prefix() {
        assert!(endpoint_paths_are_api_first(&["/api/v1/stories".to_string()]));
        assert!(!endpoint_paths_are_api_first(&["/v1/stories".to_string()]));
    }

    #[test]
    fn state_indicator_suppressed_by_justification_marker() {
        assert!(has_unjustified_state_indicator("uses a session cache"));
        assert!(!has_unjustified_state_indicator("uses a session cache // stateless-justified"));
    }

    #[test]
    fn mean_complexity_of_empty_is_zero() {
        assert!((mean_complexity(&[]) - 0.0).abs() < f64::EPSILON);
    }
}
