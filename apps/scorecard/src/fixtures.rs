//! Sample wire payloads shared by the unit tests.

use serde_json::{json, Value};

use crate::models::{AiInsights, ScoreHistoryEntry, ScoreResult, ScoringPreferences};

pub fn score_json(candidate_id: &str, job_id: Option<&str>, overall: f64) -> Value {
    json!({
        "candidateId": candidate_id,
        "jobId": job_id,
        "jobTitle": job_id.map(|_| "Backend Engineer"),
        "overallScore": overall,
        "breakdown": {
            "skillMatch": 80, "personalityFit": 70, "experience": 60,
            "education": 90, "profileQuality": 50,
            "certificationBonus": 4, "rawTotal": overall
        },
        "confidence": { "level": "high", "factors": ["Complete profile"] },
        "factors": [{ "factor": "Relevant certifications", "impact": 4 }],
        "calculatedAt": "2026-05-01T09:00:00Z"
    })
}

pub fn score(candidate_id: &str, overall: f64) -> ScoreResult {
    serde_json::from_value(score_json(candidate_id, None, overall)).expect("valid score fixture")
}

pub fn history_entry(score: f64) -> ScoreHistoryEntry {
    serde_json::from_value(json!({
        "id": format!("h-{score}"),
        "score": score,
        "calculatedAt": "2026-04-01T09:00:00Z"
    }))
    .expect("valid history fixture")
}

pub fn insights_json(summary: &str) -> Value {
    json!({
        "summary": summary,
        "strengths": ["Systems design"],
        "developmentAreas": ["Stakeholder communication"],
        "cultureFit": "Thrives in small autonomous teams",
        "recommendations": ["Pair with a product-minded lead"],
        "generatedAt": "2026-05-01T09:05:00Z"
    })
}

pub fn insights(summary: &str) -> AiInsights {
    serde_json::from_value(insights_json(summary)).expect("valid insights fixture")
}

pub fn settings_json(job_id: Option<&str>) -> Value {
    json!({
        "id": job_id.map_or("global".to_string(), |j| format!("settings-{j}")),
        "jobId": job_id,
        "weights": {
            "skillMatch": 35, "personalityFit": 25, "experience": 20,
            "education": 10, "profileQuality": 10
        },
        "personalityWeights": {
            "openness": 20, "conscientiousness": 30, "extraversion": 15,
            "agreeableness": 20, "emotionalStability": 15
        },
        "modifiers": {
            "certificationBonus": 2, "maxCertificationBonus": 10,
            "experienceMultiplier": 1, "profileCompletenessMultiplier": 1,
            "educationBonuses": {
                "highSchool": 0, "associate": 2, "bachelor": 5, "master": 8, "doctorate": 10
            }
        },
        "isActive": true
    })
}

pub fn settings(job_id: Option<&str>) -> ScoringPreferences {
    serde_json::from_value(settings_json(job_id)).expect("valid settings fixture")
}
