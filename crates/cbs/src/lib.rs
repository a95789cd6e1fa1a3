//! Confidence-Based Scoring (CBS) for sentinel case reports.
//!
//! The scorer estimates outbreak likelihood for a single report from three
//! signals:
//!
//! - **Symptom weight (W)** — a priority-ordered cascade of clinical symptom
//!   categories; the first matching category wins.
//! - **Temporal velocity (T)** — how many reports the same organization has
//!   filed in the trailing 24 hours, bucketed into tiers.
//! - **Patient volume (S)** — the reported patient count, bucketed into tiers.
//!
//! A critical hemorrhagic presentation (fever plus a hemorrhage/bleeding
//! indicator) bypasses the composite entirely and pins the score to 1.0.
//!
//! Scoring is a pure function: no I/O, no clock reads, deterministic for a
//! given input. The caller is responsible for producing the recent-report
//! count; a count of zero yields the conservative baseline velocity tier, so
//! callers whose recency lookup failed can simply pass zero.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};

/// Bypass reason recorded when the critical hemorrhagic rule fires.
pub const CRITICAL_HEMORRHAGIC: &str = "CRITICAL_HEMORRHAGIC";

/// Factor weights of the composite score.
const WEIGHT_SYMPTOM: f64 = 0.40;
const WEIGHT_TEMPORAL: f64 = 0.35;
const WEIGHT_VOLUME: f64 = 0.25;

/// Result of scoring one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Confidence-Based Score in [0.00, 1.00], two-decimal precision.
    pub cbs: f64,
    /// `ceil(cbs * 10)`, clamped to [1, 10].
    pub severity_index: u8,
    /// Symptom weight used for the composite (or 1.0 on bypass).
    pub symptom_weight: f64,
    /// Set if and only if the critical bypass fired.
    pub bypass_reason: Option<String>,
}

/// Score a report.
///
/// `symptoms` is the reported symptom list (case-insensitive; an empty list
/// is legal and falls through to the default weight tier). `recent_report_count`
/// is the number of reports the submitting organization filed in the trailing
/// 24 hours, including this one.
#[must_use]
pub fn score(symptoms: &[String], patient_count: u32, recent_report_count: u32) -> ScoreResult {
    let symptoms: Vec<String> = symptoms.iter().map(|s| s.to_lowercase()).collect();
    let weight = symptom_weight(&symptoms);

    // Critical bypass: temporal and volume factors are not evaluated.
    if (weight - 1.0).abs() < f64::EPSILON {
        return ScoreResult {
            cbs: 1.0,
            severity_index: 10,
            symptom_weight: 1.0,
            bypass_reason: Some(CRITICAL_HEMORRHAGIC.to_string()),
        };
    }

    let temporal = temporal_velocity(recent_report_count);
    let volume = volume_score(patient_count);

    // Every factor product is an exact multiple of 0.001, so the composite is
    // assembled in integer thousandths. Half-up rounding to two decimals and
    // the severity == ceil(cbs * 10) invariant are then exact, free of float
    // noise (0.325 must round to 0.33, not 0.32).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let thousandths = ((weight * WEIGHT_SYMPTOM * 1000.0).round()
        + (temporal * WEIGHT_TEMPORAL * 1000.0).round()
        + (volume * WEIGHT_VOLUME * 1000.0).round())
    .clamp(0.0, 1000.0) as u32;
    let hundredths = (thousandths + 5) / 10;
    let severity_index = ((hundredths + 9) / 10).clamp(1, 10) as u8;

    ScoreResult {
        cbs: f64::from(hundredths) / 100.0,
        severity_index,
        symptom_weight: weight,
        bypass_reason: None,
    }
}

/// Evaluate the symptom-category cascade. Priority order is significant:
/// the first matching category determines the weight.
fn symptom_weight(symptoms: &[String]) -> f64 {
    let has = |term: &str| symptoms.iter().any(|s| s == term);
    let has_any = |terms: &[&str]| {
        symptoms
            .iter()
            .any(|s| terms.iter().any(|t| s.contains(t)))
    };

    let fever = has("fever");
    let hemorrhagic = has_any(&["hemorrhage", "bleeding"]);
    let neurological = has_any(&["seizure", "confusion", "paralysis"]);
    let respiratory = has_any(&["cough", "breath", "respiratory"]);
    let enteric = has("vomiting") && has_any(&["diarrhea", "diarrhoea"]);

    if fever && hemorrhagic {
        1.0
    } else if fever && neurological {
        0.9
    } else if fever && respiratory {
        0.7
    } else if enteric {
        0.6
    } else if fever {
        0.4
    } else if respiratory {
        0.3
    } else {
        0.2
    }
}

/// Tiered velocity signal from the trailing-24h report count.
fn temporal_velocity(recent_report_count: u32) -> f64 {
    if recent_report_count >= 10 {
        1.0
    } else if recent_report_count >= 5 {
        0.8
    } else {
        0.3
    }
}

/// Tiered signal from the reported patient count.
fn volume_score(patient_count: u32) -> f64 {
    if patient_count >= 20 {
        1.0
    } else if patient_count >= 10 {
        0.8
    } else {
        0.4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symptoms(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_critical_hemorrhagic_bypass() {
        let result = score(&symptoms(&["fever", "hemorrhage"]), 5, 0);
        assert!((result.cbs - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.severity_index, 10);
        assert!((result.symptom_weight - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.bypass_reason.as_deref(), Some(CRITICAL_HEMORRHAGIC));
    }

    #[test]
    fn test_bypass_ignores_volume_and_velocity() {
        // Same critical symptoms with wildly different counts must score
        // identically.
        let low = score(&symptoms(&["fever", "internal bleeding"]), 1, 0);
        let high = score(&symptoms(&["fever", "internal bleeding"]), 500, 50);
        assert_eq!(low, high);
        assert!((low.cbs - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bypass_requires_fever() {
        let result = score(&symptoms(&["hemorrhage"]), 5, 0);
        assert!(result.bypass_reason.is_none());
        assert!((result.symptom_weight - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_symptom_cascade_priority() {
        let cases: &[(&[&str], f64)] = &[
            (&["fever", "bleeding"], 1.0),
            (&["fever", "seizure"], 0.9),
            (&["fever", "confusion"], 0.9),
            (&["fever", "cough"], 0.7),
            (&["fever", "shortness of breath"], 0.7),
            (&["vomiting", "diarrhea"], 0.6),
            (&["vomiting", "diarrhoea"], 0.6),
            (&["fever"], 0.4),
            (&["cough"], 0.3),
            (&["respiratory distress"], 0.3),
            (&["rash"], 0.2),
            (&[], 0.2),
        ];

        for (list, expected) in cases {
            let result = score(&symptoms(list), 1, 0);
            assert!(
                (result.symptom_weight - expected).abs() < f64::EPSILON,
                "weight for {list:?}: got {}, want {expected}",
                result.symptom_weight
            );
        }
    }

    #[test]
    fn test_neurological_outranks_respiratory() {
        // Priority 2 must win over priority 3 when both indicators are present.
        let result = score(&symptoms(&["fever", "seizure", "cough"]), 1, 0);
        assert!((result.symptom_weight - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_symptoms_are_case_insensitive() {
        let result = score(&symptoms(&["Fever", "HEMORRHAGE"]), 1, 0);
        assert_eq!(result.bypass_reason.as_deref(), Some(CRITICAL_HEMORRHAGIC));
    }

    #[test]
    fn test_vomiting_requires_exact_token() {
        // "vomiting blood" is not the enteric cluster's exact "vomiting" token.
        let result = score(&symptoms(&["vomiting blood", "diarrhea"]), 1, 0);
        assert!((result.symptom_weight - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_baseline_composite_rounds_half_up() {
        // W=0.3, T=0.3, S=0.4 -> 0.12 + 0.105 + 0.1 = 0.325 -> 0.33 half-up.
        let result = score(&symptoms(&["cough"]), 3, 0);
        assert!((result.cbs - 0.33).abs() < f64::EPSILON);
        assert_eq!(result.severity_index, 4);
        assert!(result.bypass_reason.is_none());
    }

    #[test]
    fn test_temporal_tiers() {
        let base = score(&symptoms(&["fever"]), 1, 0);
        let mid = score(&symptoms(&["fever"]), 1, 5);
        let high = score(&symptoms(&["fever"]), 1, 10);

        // W=0.4, S=0.4: T=0.3 -> 0.365 -> 0.37 (half-up); T=0.8 -> 0.54;
        // T=1.0 -> 0.61.
        assert!((base.cbs - 0.37).abs() < f64::EPSILON);
        assert!((mid.cbs - 0.54).abs() < f64::EPSILON);
        assert!((high.cbs - 0.61).abs() < f64::EPSILON);

        // Just below each threshold stays in the lower tier.
        assert_eq!(score(&symptoms(&["fever"]), 1, 4), base);
        assert_eq!(score(&symptoms(&["fever"]), 1, 9), mid);
    }

    #[test]
    fn test_volume_tiers() {
        let base = score(&symptoms(&["fever"]), 9, 0);
        let mid = score(&symptoms(&["fever"]), 10, 0);
        let high = score(&symptoms(&["fever"]), 20, 0);

        // W=0.4, T=0.3: S=0.4 -> 0.37; S=0.8 -> 0.465 -> 0.47 (half-up);
        // S=1.0 -> 0.515 -> 0.52 (half-up).
        assert!((base.cbs - 0.37).abs() < f64::EPSILON);
        assert!((mid.cbs - 0.47).abs() < f64::EPSILON);
        assert!((high.cbs - 0.52).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invariants_over_input_sweep() {
        let symptom_sets: Vec<Vec<String>> = vec![
            symptoms(&[]),
            symptoms(&["fever"]),
            symptoms(&["cough"]),
            symptoms(&["fever", "cough"]),
            symptoms(&["fever", "confusion"]),
            symptoms(&["vomiting", "diarrhea"]),
            symptoms(&["fever", "bleeding"]),
        ];

        for set in &symptom_sets {
            for patients in [1, 5, 10, 19, 20, 100] {
                for recent in [0, 4, 5, 9, 10, 40] {
                    let result = score(set, patients, recent);

                    assert!(result.cbs >= 0.0 && result.cbs <= 1.0);
                    assert!((1..=10).contains(&result.severity_index));

                    // Two-decimal precision.
                    let hundredths = (result.cbs * 100.0).round();
                    assert!((result.cbs - hundredths / 100.0).abs() < 1e-9);

                    // severity == ceil(cbs * 10), computed on the hundredths.
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let expected = ((hundredths as u32 + 9) / 10).clamp(1, 10) as u8;
                    assert_eq!(result.severity_index, expected);

                    // Bypass reason iff weight is 1.0.
                    assert_eq!(
                        result.bypass_reason.is_some(),
                        (result.symptom_weight - 1.0).abs() < f64::EPSILON
                    );
                }
            }
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let set = symptoms(&["fever", "cough"]);
        let first = score(&set, 12, 6);
        for _ in 0..10 {
            assert_eq!(score(&set, 12, 6), first);
        }
    }

    #[test]
    fn test_result_serializes_with_snake_case_fields() {
        let result = score(&symptoms(&["fever", "hemorrhage"]), 5, 0);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["cbs"], 1.0);
        assert_eq!(json["severity_index"], 10);
        assert_eq!(json["bypass_reason"], "CRITICAL_HEMORRHAGIC");
    }
}
