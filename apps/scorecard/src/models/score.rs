use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::settings::ScoringWeights;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Weighted sub-scores behind an overall score.
///
/// The five named components are each bounded to 0 – 100 before weighting.
/// `certification_bonus` is additive on top and capped only by the
/// `max_certification_bonus` modifier. `raw_total` is the sum before the
/// backend normalizes it into `overall_score`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub skill_match: f64,
    pub personality_fit: f64,
    pub experience: f64,
    pub education: f64,
    pub profile_quality: f64,
    #[serde(default)]
    pub certification_bonus: f64,
    #[serde(default)]
    pub raw_total: f64,
}

impl ScoreBreakdown {
    pub fn components(&self) -> [(&'static str, f64); 5] {
        [
            ("skillMatch", self.skill_match),
            ("personalityFit", self.personality_fit),
            ("experience", self.experience),
            ("education", self.education),
            ("profileQuality", self.profile_quality),
        ]
    }

    /// Named components outside 0 – 100. The certification bonus is never reported.
    pub fn out_of_range_components(&self) -> Vec<&'static str> {
        self.components()
            .into_iter()
            .filter(|(_, v)| !(0.0..=100.0).contains(v))
            .map(|(name, _)| name)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreConfidence {
    pub level: ConfidenceLevel,
    #[serde(default)]
    pub factors: Vec<String>,
}

/// A signed contribution to the overall score ("+8 strong Rust background").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributingFactor {
    pub factor: String,
    pub impact: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ContributingFactor {
    pub fn is_positive(&self) -> bool {
        self.impact > 0.0
    }
}

/// A single predictive-success evaluation. Never mutated after it is returned;
/// recalculating produces a new value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub candidate_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub overall_score: f64,
    pub breakdown: ScoreBreakdown,
    pub confidence: ScoreConfidence,
    #[serde(default)]
    pub factors: Vec<ContributingFactor>,
    pub calculated_at: DateTime<Utc>,
}

/// A past score snapshot. Sparse payloads decode: every field but `score` defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights_used: Option<ScoringWeights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub score: ScoreResult,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistoryResponse {
    #[serde(default)]
    pub history: Vec<ScoreHistoryEntry>,
    #[serde(default)]
    pub candidate_id: Option<String>,
    #[serde(default)]
    pub total_entries: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn breakdown() -> ScoreBreakdown {
        ScoreBreakdown {
            skill_match: 82.0,
            personality_fit: 70.0,
            experience: 65.0,
            education: 90.0,
            profile_quality: 55.0,
            certification_bonus: 6.0,
            raw_total: 78.5,
        }
    }

    #[test]
    fn test_score_result_decodes_camel_case_payload() {
        let raw = json!({
            "candidateId": "c1",
            "jobId": "j9",
            "jobTitle": "Backend Engineer",
            "overallScore": 77,
            "breakdown": {
                "skillMatch": 82, "personalityFit": 70, "experience": 65,
                "education": 90, "profileQuality": 55,
                "certificationBonus": 6, "rawTotal": 78.5
            },
            "confidence": { "level": "medium", "factors": ["Sparse work history"] },
            "factors": [
                { "factor": "Strong Rust background", "impact": 8 },
                { "factor": "No references", "impact": -3, "description": "Profile lists none" }
            ],
            "calculatedAt": "2026-03-02T10:15:00Z"
        });
        let score: ScoreResult = serde_json::from_value(raw).unwrap();
        assert_eq!(score.candidate_id, "c1");
        assert_eq!(score.job_title.as_deref(), Some("Backend Engineer"));
        assert_eq!(score.overall_score, 77.0);
        assert_eq!(score.confidence.level, ConfidenceLevel::Medium);
        assert_eq!(score.breakdown, breakdown());
        assert!(score.factors[0].is_positive());
        assert!(!score.factors[1].is_positive());
    }

    #[test]
    fn test_sparse_history_entry_decodes() {
        let entry: ScoreHistoryEntry = serde_json::from_value(json!({ "score": 72 })).unwrap();
        assert_eq!(entry.score, 72.0);
        assert!(entry.breakdown.is_none());
        assert!(entry.calculated_at.is_none());
    }

    #[test]
    fn test_certification_bonus_not_range_checked() {
        let mut b = breakdown();
        b.certification_bonus = 140.0;
        assert!(b.out_of_range_components().is_empty());
    }

    #[test]
    fn test_out_of_range_component_reported() {
        let mut b = breakdown();
        b.experience = 101.0;
        b.education = -1.0;
        assert_eq!(b.out_of_range_components(), vec!["experience", "education"]);
    }
}
