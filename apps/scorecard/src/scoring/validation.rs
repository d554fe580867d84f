use serde::{Deserialize, Serialize};

use crate::models::settings::{PersonalityCategoryWeights, ScoringWeights};

const REQUIRED_TOTAL: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightValidation {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl WeightValidation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn invalid(message: String) -> Self {
        Self {
            is_valid: false,
            error: Some(message),
        }
    }
}

/// Validates the five scoring category weights.
///
/// PASS conditions:
/// - every field is within 0 – 100
/// - the fields sum to exactly 100 (no tolerance)
pub fn validate_scoring_weights(weights: &ScoringWeights) -> WeightValidation {
    validate_weight_fields(
        "Weights",
        &[
            ("skillMatch", weights.skill_match),
            ("personalityFit", weights.personality_fit),
            ("experience", weights.experience),
            ("education", weights.education),
            ("profileQuality", weights.profile_quality),
        ],
    )
}

/// Same rules as [`validate_scoring_weights`], applied to the personality categories.
pub fn validate_personality_category_weights(
    weights: &PersonalityCategoryWeights,
) -> WeightValidation {
    validate_weight_fields(
        "Personality category weights",
        &[
            ("openness", weights.openness),
            ("conscientiousness", weights.conscientiousness),
            ("extraversion", weights.extraversion),
            ("agreeableness", weights.agreeableness),
            ("emotionalStability", weights.emotional_stability),
        ],
    )
}

fn validate_weight_fields(label: &str, fields: &[(&str, f64)]) -> WeightValidation {
    for &(name, value) in fields {
        if !value.is_finite() || !(0.0..=REQUIRED_TOTAL).contains(&value) {
            return WeightValidation::invalid(format!(
                "{label}: '{name}' must be between 0 and 100 (got {value})"
            ));
        }
    }

    let total: f64 = fields.iter().map(|&(_, v)| v).sum();
    if total != REQUIRED_TOTAL {
        return WeightValidation::invalid(format!(
            "{label} must sum to 100 (current total: {total})"
        ));
    }

    WeightValidation::valid()
}
