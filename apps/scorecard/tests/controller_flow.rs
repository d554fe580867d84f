//! End-to-end controller behavior against a mocked scoring backend.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scorecard::{ApiClient, ControllerOptions, ScoreController};

fn controller(server: &MockServer, options: ControllerOptions) -> ScoreController {
    let api = ApiClient::new(&server.uri(), Some("integration".to_string()), Duration::from_secs(5))
        .expect("client builds");
    ScoreController::new(Arc::new(api), options)
}

fn score_body(candidate_id: &str, overall: f64) -> Value {
    json!({
        "success": true,
        "score": {
            "candidateId": candidate_id,
            "overallScore": overall,
            "breakdown": {
                "skillMatch": 75, "personalityFit": 68, "experience": 70,
                "education": 80, "profileQuality": 60
            },
            "confidence": { "level": "medium", "factors": [] },
            "factors": [],
            "calculatedAt": "2026-06-10T12:00:00Z"
        }
    })
}

#[tokio::test]
async fn test_auto_fetch_history_on_mount() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/candidates/c1/success-score/history"))
        .and(query_param_is_missing("limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "history": [{ "score": 72 }],
            "candidateId": "c1",
            "totalEntries": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctl = controller(
        &server,
        ControllerOptions::for_candidate("c1").with_auto_fetch_history(true),
    );
    ctl.mount().await;

    let state = ctl.state();
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].score, 72.0);
    assert!(state.history_error.is_none());
    assert!(state.score.is_none());
}

#[tokio::test]
async fn test_refresh_with_missing_insights_and_failing_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/candidates/c2/success-score"))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_body("c2", 66.0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/candidates/c2/success-score/history"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "History unavailable"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/candidates/c2/success-score/insights"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "No insights found"
        })))
        .mount(&server)
        .await;

    let ctl = controller(&server, ControllerOptions::for_candidate("c2"));
    ctl.refresh().await;

    let state = ctl.state();
    assert_eq!(state.score.as_ref().map(|s| s.overall_score), Some(66.0));
    assert!(state.error.is_none());
    assert_eq!(state.history_error.as_deref(), Some("History unavailable"));
    assert!(state.insights.is_none());
    assert!(state.insights_error.is_none());
}

#[tokio::test]
async fn test_late_response_after_unmount_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/candidates/c3/success-score/history"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "history": [{ "score": 50 }] }))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let ctl = controller(&server, ControllerOptions::for_candidate("c3"));
    let mut spy = ctl.subscribe();

    let pending = tokio::spawn({
        let ctl = ctl.clone();
        async move { ctl.fetch_history(None).await }
    });

    spy.changed().await.expect("loading flag committed");
    assert!(spy.borrow_and_update().is_loading_history);

    ctl.unmount();
    pending.await.expect("fetch task completes");

    assert!(!spy.has_changed().expect("controller still owns the sender"));
    assert!(ctl.state().history.is_empty());
}

#[tokio::test]
async fn test_job_without_override_resolves_to_global_defaults() {
    let server = MockServer::start().await;
    let global = json!({
        "jobId": null,
        "weights": {
            "skillMatch": 35, "personalityFit": 25, "experience": 20,
            "education": 10, "profileQuality": 10
        },
        "personalityWeights": {
            "openness": 20, "conscientiousness": 30, "extraversion": 15,
            "agreeableness": 20, "emotionalStability": 15
        },
        "isActive": true
    });
    Mock::given(method("GET"))
        .and(path("/settings/scoring/job/j8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "settings": null,
            "isJobSpecific": false,
            "effectiveSettings": global
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctl = controller(&server, ControllerOptions::for_candidate("c4").with_job("j8"));
    ctl.fetch_settings(None).await;

    let state = ctl.state();
    let settings = state.settings.expect("effective settings surfaced");
    assert!(settings.is_global());
    assert_eq!(settings.weights.skill_match, 35.0);
    assert!(!state.settings_are_job_specific);
    assert!(state.settings_error.is_none());
}
