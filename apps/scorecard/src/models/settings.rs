use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::validation::{
    validate_personality_category_weights, validate_scoring_weights, WeightValidation,
};

/// Category weights for the overall score, in percent. Must sum to exactly 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub skill_match: f64,
    pub personality_fit: f64,
    pub experience: f64,
    pub education: f64,
    pub profile_quality: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill_match: 35.0,
            personality_fit: 25.0,
            experience: 20.0,
            education: 10.0,
            profile_quality: 10.0,
        }
    }
}

/// Weights of the personality categories inside `personality_fit`. Must sum to exactly 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityCategoryWeights {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub emotional_stability: f64,
}

impl Default for PersonalityCategoryWeights {
    fn default() -> Self {
        Self {
            openness: 20.0,
            conscientiousness: 30.0,
            extraversion: 15.0,
            agreeableness: 20.0,
            emotional_stability: 15.0,
        }
    }
}

/// Bonus added for each education level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EducationBonuses {
    pub high_school: f64,
    pub associate: f64,
    pub bachelor: f64,
    pub master: f64,
    pub doctorate: f64,
}

impl Default for EducationBonuses {
    fn default() -> Self {
        Self {
            high_school: 0.0,
            associate: 2.0,
            bachelor: 5.0,
            master: 8.0,
            doctorate: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringModifiers {
    pub certification_bonus: f64,
    pub max_certification_bonus: f64,
    pub experience_multiplier: f64,
    pub profile_completeness_multiplier: f64,
    #[serde(default)]
    pub education_bonuses: EducationBonuses,
}

impl Default for ScoringModifiers {
    fn default() -> Self {
        Self {
            certification_bonus: 2.0,
            max_certification_bonus: 10.0,
            experience_multiplier: 1.0,
            profile_completeness_multiplier: 1.0,
            education_bonuses: EducationBonuses::default(),
        }
    }
}

/// Scoring configuration. `job_id == None` is the global default every job
/// without its own override falls back to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    pub weights: ScoringWeights,
    pub personality_weights: PersonalityCategoryWeights,
    #[serde(default)]
    pub modifiers: ScoringModifiers,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl ScoringPreferences {
    pub fn is_global(&self) -> bool {
        self.job_id.is_none()
    }
}

/// Partial settings body for PUT. Absent blocks are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<ScoringWeights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality_weights: Option<PersonalityCategoryWeights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<ScoringModifiers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ScoringSettingsUpdate {
    /// Validates every weight block present in the update; first failure wins.
    pub fn validate(&self) -> WeightValidation {
        if let Some(weights) = &self.weights {
            let result = validate_scoring_weights(weights);
            if !result.is_valid {
                return result;
            }
        }
        if let Some(weights) = &self.personality_weights {
            let result = validate_personality_category_weights(weights);
            if !result.is_valid {
                return result;
            }
        }
        WeightValidation::valid()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub settings: ScoringPreferences,
}

/// Job-scoped lookup. `settings` is the job's own row when one exists;
/// `effective_settings` is what scoring actually uses for the job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSettingsResponse {
    #[serde(default)]
    pub settings: Option<ScoringPreferences>,
    #[serde(default)]
    pub is_job_specific: bool,
    #[serde(default)]
    pub effective_settings: Option<ScoringPreferences>,
}

impl JobSettingsResponse {
    /// The settings that apply to the job, whether overridden or inherited.
    pub fn resolved(self) -> Option<ScoringPreferences> {
        self.effective_settings.or(self.settings)
    }
}
