// ============================================
// Lead Scoring Engine
// ============================================
//
// Calculates priority scores (0-100) using a weighted algorithm.
//
// Formula:
//     score = (value * 0.35) + (urgency * 0.25) + (tier * 0.20) +
//             (budget * 0.15) + (strategic * 0.05)
//
// Higher scores = higher priority in the queue. Scoring never fails:
// out-of-range or missing inputs are normalized to defaults rather than
// rejected.

use crate::models::{ClientTier, Lead};
use serde::Serialize;

/// Weight for the monetary-value sub-score
pub const WEIGHT_VALUE: f64 = 0.35;
/// Weight for the urgency sub-score
pub const WEIGHT_URGENCY: f64 = 0.25;
/// Weight for the client-tier sub-score
pub const WEIGHT_TIER: f64 = 0.20;
/// Weight for the budget-confirmed sub-score
pub const WEIGHT_BUDGET: f64 = 0.15;
/// Weight for the strategic-fit sub-score
pub const WEIGHT_STRATEGIC: f64 = 0.05;

/// Monetary thresholds, evaluated highest first
const VALUE_THRESHOLDS: [(f64, i32); 5] = [
    (100_000.0, 100),
    (50_000.0, 80),
    (20_000.0, 60),
    (5_000.0, 40),
    (0.0, 20),
];

/// The five business attributes the score is derived from
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub estimated_value: f64,
    pub urgency_level: i32,
    pub client_tier: &'a str,
    pub budget_confirmed: bool,
    pub strategic_fit: bool,
}

impl<'a> From<&'a Lead> for ScoreInputs<'a> {
    fn from(lead: &'a Lead) -> Self {
        Self {
            estimated_value: lead.estimated_value,
            urgency_level: lead.urgency_level,
            client_tier: &lead.client_tier,
            budget_confirmed: lead.budget_confirmed,
            strategic_fit: lead.strategic_fit,
        }
    }
}

/// One weighted component of the score breakdown
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreComponent {
    pub score: i32,
    pub weight: f64,
}

/// Detailed score breakdown for explainability and debugging
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub value: ScoreComponent,
    pub urgency: ScoreComponent,
    pub tier: ScoreComponent,
    pub budget: ScoreComponent,
    pub strategic: ScoreComponent,
    pub total: i32,
}

/// Calculate the overall priority score for a lead
pub fn calculate_score(inputs: &ScoreInputs<'_>) -> i32 {
    let total = score_value(inputs.estimated_value) as f64 * WEIGHT_VALUE
        + score_urgency(inputs.urgency_level) as f64 * WEIGHT_URGENCY
        + score_tier(inputs.client_tier) as f64 * WEIGHT_TIER
        + score_budget(inputs.budget_confirmed) as f64 * WEIGHT_BUDGET
        + score_strategic(inputs.strategic_fit) as f64 * WEIGHT_STRATEGIC;

    (total.round() as i32).clamp(0, 100)
}

/// Compute the same sub-scores the scoring operation uses, plus the total
pub fn score_breakdown(inputs: &ScoreInputs<'_>) -> ScoreBreakdown {
    ScoreBreakdown {
        value: ScoreComponent {
            score: score_value(inputs.estimated_value),
            weight: WEIGHT_VALUE,
        },
        urgency: ScoreComponent {
            score: score_urgency(inputs.urgency_level),
            weight: WEIGHT_URGENCY,
        },
        tier: ScoreComponent {
            score: score_tier(inputs.client_tier),
            weight: WEIGHT_TIER,
        },
        budget: ScoreComponent {
            score: score_budget(inputs.budget_confirmed),
            weight: WEIGHT_BUDGET,
        },
        strategic: ScoreComponent {
            score: score_strategic(inputs.strategic_fit),
            weight: WEIGHT_STRATEGIC,
        },
        total: calculate_score(inputs),
    }
}

/// Convert monetary value to a sub-score via the threshold table
fn score_value(value: f64) -> i32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    for (threshold, score) in VALUE_THRESHOLDS {
        if value >= threshold {
            return score;
        }
    }
    0
}

/// Convert urgency level (1-5) to a sub-score; absent levels fall back to
/// the scale midpoint
fn score_urgency(level: i32) -> i32 {
    if level <= 0 {
        return 60;
    }
    level.clamp(1, 5) * 20
}

/// Convert client tier to a sub-score; unrecognized tiers score as "new"
fn score_tier(tier: &str) -> i32 {
    match ClientTier::from_str(tier) {
        Some(ClientTier::Strategic) => 100,
        Some(ClientTier::Existing) => 70,
        Some(ClientTier::New) | None => 40,
    }
}

fn score_budget(confirmed: bool) -> i32 {
    if confirmed {
        100
    } else {
        0
    }
}

fn score_strategic(fit: bool) -> i32 {
    if fit {
        100
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(
        estimated_value: f64,
        urgency_level: i32,
        client_tier: &str,
        budget_confirmed: bool,
        strategic_fit: bool,
    ) -> ScoreInputs<'_> {
        ScoreInputs {
            estimated_value,
            urgency_level,
            client_tier,
            budget_confirmed,
            strategic_fit,
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum = WEIGHT_VALUE + WEIGHT_URGENCY + WEIGHT_TIER + WEIGHT_BUDGET + WEIGHT_STRATEGIC;
        assert!((sum - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_minimal_lead_scores_23() {
        // value=0 -> 0, urgency=3 -> 60, tier=new -> 40, budget/strategic -> 0
        // total = 60*0.25 + 40*0.20 = 15 + 8 = 23
        let score = calculate_score(&inputs(0.0, 3, "new", false, false));
        assert_eq!(score, 23);
    }

    #[test]
    fn test_maximal_lead_scores_100() {
        let score = calculate_score(&inputs(150_000.0, 5, "strategic", true, true));
        assert_eq!(score, 100);
    }

    #[test]
    fn test_determinism() {
        let i = inputs(42_000.0, 4, "existing", true, false);
        let first = calculate_score(&i);
        for _ in 0..10 {
            assert_eq!(calculate_score(&i), first);
        }
    }

    #[test]
    fn test_breakdown_total_matches_score() {
        let cases = [
            inputs(0.0, 0, "", false, false),
            inputs(4_999.0, 1, "new", false, true),
            inputs(20_000.0, 3, "existing", true, false),
            inputs(99_999.0, 5, "strategic", true, true),
            inputs(1_000_000.0, 2, "unknown-tier", false, false),
        ];
        for i in cases {
            let breakdown = score_breakdown(&i);
            assert_eq!(breakdown.total, calculate_score(&i));
        }
    }

    #[test]
    fn test_score_always_in_bounds() {
        let adversarial = [
            inputs(f64::MAX, i32::MAX, "strategic", true, true),
            inputs(f64::NEG_INFINITY, i32::MIN, "garbage", false, false),
            inputs(f64::NAN, 0, "", false, false),
            inputs(-500.0, 7, "existing", true, true),
        ];
        for i in adversarial {
            let score = calculate_score(&i);
            assert!((0..=100).contains(&score), "score {} out of bounds", score);
        }
    }

    #[test]
    fn test_value_thresholds() {
        assert_eq!(score_value(0.0), 0);
        assert_eq!(score_value(-1.0), 0);
        assert_eq!(score_value(f64::NAN), 0);
        assert_eq!(score_value(0.01), 20);
        assert_eq!(score_value(4_999.99), 20);
        assert_eq!(score_value(5_000.0), 40);
        assert_eq!(score_value(20_000.0), 60);
        assert_eq!(score_value(50_000.0), 80);
        assert_eq!(score_value(100_000.0), 100);
        assert_eq!(score_value(2_000_000.0), 100);
    }

    #[test]
    fn test_value_monotonic_across_thresholds() {
        let points = [0.0, 1.0, 5_000.0, 20_000.0, 50_000.0, 100_000.0, 1e9];
        let scores: Vec<i32> = points.iter().map(|v| score_value(*v)).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_urgency_scale() {
        assert_eq!(score_urgency(1), 20);
        assert_eq!(score_urgency(2), 40);
        assert_eq!(score_urgency(3), 60);
        assert_eq!(score_urgency(4), 80);
        assert_eq!(score_urgency(5), 100);
        // Out-of-band levels clamp rather than reject
        assert_eq!(score_urgency(9), 100);
        // Missing level falls back to the scale midpoint
        assert_eq!(score_urgency(0), 60);
        assert_eq!(score_urgency(-3), 60);
    }

    #[test]
    fn test_urgency_monotonic_in_band() {
        let scores: Vec<i32> = (1..=5).map(score_urgency).collect();
        assert!(scores.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_tier_ordering() {
        assert_eq!(score_tier("strategic"), 100);
        assert_eq!(score_tier("existing"), 70);
        assert_eq!(score_tier("new"), 40);
        assert_eq!(score_tier("platinum"), 40);
        assert_eq!(score_tier(""), 40);
        assert!(score_tier("strategic") >= score_tier("existing"));
        assert!(score_tier("existing") >= score_tier("new"));
    }
}
