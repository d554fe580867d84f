use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// LLM-generated qualitative assessment of a candidate.
/// Regeneration replaces the whole value; nothing is merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiInsights {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub development_areas: Vec<String>,
    #[serde(default)]
    pub culture_fit: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInsightsRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<&'a str>,
}

/// `insights` is null when nothing has been generated for the candidate yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    #[serde(default)]
    pub insights: Option<AiInsights>,
    #[serde(default)]
    pub candidate_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_request_omits_missing_job() {
        let body = serde_json::to_value(GenerateInsightsRequest { job_id: None }).unwrap();
        assert_eq!(body, json!({}));
        let body = serde_json::to_value(GenerateInsightsRequest { job_id: Some("j1") }).unwrap();
        assert_eq!(body, json!({ "jobId": "j1" }));
    }

    #[test]
    fn test_null_insights_decode_as_none() {
        let resp: InsightsResponse =
            serde_json::from_value(json!({ "success": true, "insights": null, "candidateId": "c1" }))
                .unwrap();
        assert!(resp.insights.is_none());
        assert_eq!(resp.candidate_id.as_deref(), Some("c1"));
    }
}
