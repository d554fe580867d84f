//! Score Controller — per-candidate source of truth for score, history,
//! insights and effective scoring settings.
//!
//! Flow: view creates controller → mount() (optional auto calculate / history)
//!       → operations call `ScoringApi` → results committed to `ScoreState`
//!       → subscribers observe the new snapshot → unmount() freezes state.
//!
//! Operations never return errors. Every failure is written into the error
//! slot of the concern that issued it.

pub mod state;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::api_client::ScoringApi;
use crate::errors::ApiError;
use crate::models::{AiInsights, ScoreResult, ScoringPreferences, ScoringSettingsUpdate};

pub use state::{Concern, ScoreState};

const SCORE_FAILED: &str = "Failed to calculate score";
const HISTORY_FAILED: &str = "Failed to fetch score history";
const GENERATE_INSIGHTS_FAILED: &str = "Failed to generate insights";
const FETCH_INSIGHTS_FAILED: &str = "Failed to fetch insights";
const SETTINGS_FAILED: &str = "Failed to fetch scoring settings";
const SAVE_SETTINGS_FAILED: &str = "Failed to save scoring settings";
const RESET_SETTINGS_FAILED: &str = "Failed to reset job scoring settings";

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    pub candidate_id: String,
    pub job_id: Option<String>,
    /// Calculate a score once on the first `mount()`.
    pub auto_calculate: bool,
    /// Fetch score history once on the first `mount()`.
    pub auto_fetch_history: bool,
}

impl ControllerOptions {
    pub fn for_candidate(candidate_id: impl Into<String>) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            ..Default::default()
        }
    }

    pub fn with_job(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn with_auto_calculate(mut self, enabled: bool) -> Self {
        self.auto_calculate = enabled;
        self
    }

    pub fn with_auto_fetch_history(mut self, enabled: bool) -> Self {
        self.auto_fetch_history = enabled;
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Controller
// ────────────────────────────────────────────────────────────────────────────

struct Inner {
    api: Arc<dyn ScoringApi>,
    options: ControllerOptions,
    state: watch::Sender<ScoreState>,
    /// Cleared by `unmount()`; checked under the state lock before every commit.
    alive: AtomicBool,
    mounted: AtomicBool,
}

/// Cheap to clone; all clones share one state and one owner lifetime.
///
/// Requests on the same concern are neither queued nor de-duplicated: whichever
/// response lands last is what the state shows.
#[derive(Clone)]
pub struct ScoreController {
    inner: Arc<Inner>,
}

impl ScoreController {
    pub fn new(api: Arc<dyn ScoringApi>, options: ControllerOptions) -> Self {
        let (state, _) = watch::channel(ScoreState::default());
        Self {
            inner: Arc::new(Inner {
                api,
                options,
                state,
                alive: AtomicBool::new(true),
                mounted: AtomicBool::new(false),
            }),
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.inner.options
    }

    /// Clone of the current snapshot.
    pub fn state(&self) -> ScoreState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScoreState> {
        self.inner.state.subscribe()
    }

    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    /// Runs the configured auto operations. Only the first call does anything.
    pub async fn mount(&self) {
        if self.inner.mounted.swap(true, Ordering::AcqRel) {
            return;
        }
        let options = &self.inner.options;
        info!(
            candidate_id = %options.candidate_id,
            job_id = ?options.job_id,
            auto_calculate = options.auto_calculate,
            auto_fetch_history = options.auto_fetch_history,
            "Score controller mounted"
        );

        let calculate = async {
            if options.auto_calculate {
                self.calculate_score(None).await;
            }
        };
        let history = async {
            if options.auto_fetch_history {
                self.fetch_history(None).await;
            }
        };
        tokio::join!(calculate, history);
    }

    /// Stops all further state updates. Responses still in flight are dropped
    /// when they arrive.
    pub fn unmount(&self) {
        // Taken under the state lock so no commit can straddle the flip.
        let alive = &self.inner.alive;
        self.inner.state.send_if_modified(|_| {
            alive.store(false, Ordering::Release);
            false
        });
        info!(candidate_id = %self.inner.options.candidate_id, "Score controller unmounted");
    }

    /// Applies `update` unless the owner has unmounted. Returns whether it was applied.
    fn commit(&self, update: impl FnOnce(&mut ScoreState)) -> bool {
        let alive = &self.inner.alive;
        let applied = self.inner.state.send_if_modified(|state| {
            if !alive.load(Ordering::Acquire) {
                return false;
            }
            update(state);
            state.revision += 1;
            true
        });
        if !applied {
            debug!("Owner unmounted; discarding state update");
        }
        applied
    }

    fn require_candidate(&self) -> Result<String, ApiError> {
        let candidate_id = &self.inner.options.candidate_id;
        if candidate_id.trim().is_empty() {
            return Err(ApiError::Validation("Candidate ID is required".to_string()));
        }
        Ok(candidate_id.clone())
    }

    /// Override, else the configured job, else none. Blank ids count as absent.
    fn resolve_job(&self, override_job_id: Option<&str>) -> Option<String> {
        let non_blank = |j: &str| -> Option<String> {
            let j = j.trim();
            (!j.is_empty()).then(|| j.to_string())
        };
        override_job_id
            .and_then(non_blank)
            .or_else(|| self.inner.options.job_id.as_deref().and_then(non_blank))
    }

    /// Records a failure that happened before anything was marked as loading.
    fn fail(&self, concern: Concern, err: &ApiError, default: &str) {
        self.fail_settled(concern, err, default, |_| {});
    }

    /// Clears the operation's loading flag and records the error in one commit.
    fn fail_settled(
        &self,
        concern: Concern,
        err: &ApiError,
        default: &str,
        settle: impl FnOnce(&mut ScoreState),
    ) {
        let message = err.user_message(default);
        warn!(?concern, "{default}: {err}");
        self.commit(|s| {
            settle(s);
            s.set_error(concern, Some(message));
        });
    }

    // ────────────────────────────────────────────────────────────────────────
    // Score
    // ────────────────────────────────────────────────────────────────────────

    /// Requests a fresh score. On failure the previous score stays in place.
    #[instrument(skip(self), fields(candidate_id = %self.inner.options.candidate_id))]
    pub async fn calculate_score(&self, override_job_id: Option<&str>) -> Option<ScoreResult> {
        let candidate_id = match self.require_candidate() {
            Ok(id) => id,
            Err(e) => {
                self.fail(Concern::Score, &e, SCORE_FAILED);
                return None;
            }
        };
        let job_id = self.resolve_job(override_job_id);

        self.commit(|s| {
            s.is_calculating = true;
            s.error = None;
        });

        match self
            .inner
            .api
            .calculate_score(&candidate_id, job_id.as_deref())
            .await
        {
            Ok(score) => {
                debug!("Score calculated: {}", score.overall_score);
                let committed = score.clone();
                self.commit(move |s| {
                    s.score = Some(committed);
                    s.is_calculating = false;
                    s.error = None;
                });
                Some(score)
            }
            Err(e) => {
                self.fail_settled(Concern::Score, &e, SCORE_FAILED, |s| {
                    s.is_calculating = false;
                });
                None
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // History
    // ────────────────────────────────────────────────────────────────────────

    /// Replaces the history with the backend's list; no incremental merge.
    #[instrument(skip(self), fields(candidate_id = %self.inner.options.candidate_id))]
    pub async fn fetch_history(&self, limit: Option<u32>) {
        let candidate_id = match self.require_candidate() {
            Ok(id) => id,
            Err(e) => return self.fail(Concern::History, &e, HISTORY_FAILED),
        };

        self.commit(|s| {
            s.is_loading_history = true;
            s.history_error = None;
        });

        match self.inner.api.score_history(&candidate_id, limit).await {
            Ok(history) => {
                debug!("Loaded {} history entries", history.len());
                self.commit(move |s| {
                    s.history = history;
                    s.is_loading_history = false;
                    s.history_error = None;
                });
            }
            Err(e) => {
                self.fail_settled(Concern::History, &e, HISTORY_FAILED, |s| {
                    s.is_loading_history = false;
                });
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Insights
    // ────────────────────────────────────────────────────────────────────────

    /// Asks the backend to generate new insights, replacing any current ones.
    #[instrument(skip(self), fields(candidate_id = %self.inner.options.candidate_id))]
    pub async fn generate_insights(&self, override_job_id: Option<&str>) -> Option<AiInsights> {
        let candidate_id = match self.require_candidate() {
            Ok(id) => id,
            Err(e) => {
                self.fail(Concern::Insights, &e, GENERATE_INSIGHTS_FAILED);
                return None;
            }
        };
        let job_id = self.resolve_job(override_job_id);

        self.commit(|s| {
            s.is_generating_insights = true;
            s.insights_error = None;
        });

        match self
            .inner
            .api
            .generate_insights(&candidate_id, job_id.as_deref())
            .await
        {
            Ok(insights) => {
                let committed = insights.clone();
                self.commit(move |s| {
                    s.insights = Some(committed);
                    s.is_generating_insights = false;
                    s.insights_error = None;
                });
                Some(insights)
            }
            Err(e) => {
                self.fail_settled(Concern::Insights, &e, GENERATE_INSIGHTS_FAILED, |s| {
                    s.is_generating_insights = false;
                });
                None
            }
        }
    }

    /// Reads existing insights. "Not generated yet" (404 or a null payload) is
    /// an empty state, not an error.
    #[instrument(skip(self), fields(candidate_id = %self.inner.options.candidate_id))]
    pub async fn fetch_insights(&self) {
        let candidate_id = match self.require_candidate() {
            Ok(id) => id,
            Err(e) => return self.fail(Concern::Insights, &e, FETCH_INSIGHTS_FAILED),
        };

        self.commit(|s| {
            s.is_loading_insights = true;
            s.insights_error = None;
        });

        let result = match self.inner.api.get_insights(&candidate_id).await {
            Err(e) if e.is_not_found() => {
                debug!("No insights generated yet");
                Ok(None)
            }
            other => other,
        };

        match result {
            Ok(insights) => {
                self.commit(move |s| {
                    s.insights = insights;
                    s.is_loading_insights = false;
                    s.insights_error = None;
                });
            }
            Err(e) => {
                self.fail_settled(Concern::Insights, &e, FETCH_INSIGHTS_FAILED, |s| {
                    s.is_loading_insights = false;
                });
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Settings
    // ────────────────────────────────────────────────────────────────────────

    /// Loads the effective settings: job-scoped when a job id resolves, global otherwise.
    #[instrument(skip(self))]
    pub async fn fetch_settings(&self, override_job_id: Option<&str>) {
        let job_id = self.resolve_job(override_job_id);

        self.commit(|s| {
            s.is_loading_settings = true;
            s.settings_error = None;
        });

        let result = match job_id.as_deref() {
            Some(job_id) => self.inner.api.job_settings(job_id).await.and_then(|resp| {
                let job_specific = resp.is_job_specific;
                if !job_specific {
                    debug!(job_id, "Job has no override; using global defaults");
                }
                resp.resolved()
                    .map(|settings| (settings, job_specific))
                    .ok_or_else(|| ApiError::Rejected {
                        message: Some(format!("No effective scoring settings for job {job_id}")),
                    })
            }),
            None => self
                .inner
                .api
                .global_settings()
                .await
                .map(|settings| (settings, false)),
        };

        match result {
            Ok((settings, job_specific)) => {
                self.commit(move |s| {
                    s.settings = Some(settings);
                    s.settings_are_job_specific = job_specific;
                    s.is_loading_settings = false;
                    s.settings_error = None;
                });
            }
            Err(e) => {
                self.fail_settled(Concern::Settings, &e, SETTINGS_FAILED, |s| {
                    s.is_loading_settings = false;
                });
            }
        }
    }

    /// Validates and saves a partial settings update. Invalid weights block the
    /// save entirely; nothing is sent.
    #[instrument(skip(self, update))]
    pub async fn save_settings(
        &self,
        update: ScoringSettingsUpdate,
        override_job_id: Option<&str>,
    ) -> Option<ScoringPreferences> {
        let validation = update.validate();
        if !validation.is_valid {
            let message = validation
                .error
                .unwrap_or_else(|| "Invalid scoring weights".to_string());
            self.fail(Concern::Settings, &ApiError::Validation(message), SAVE_SETTINGS_FAILED);
            return None;
        }
        let job_id = self.resolve_job(override_job_id);

        self.commit(|s| {
            s.is_loading_settings = true;
            s.settings_error = None;
        });

        let result = match job_id.as_deref() {
            Some(job_id) => self.inner.api.update_job_settings(job_id, &update).await,
            None => self.inner.api.update_global_settings(&update).await,
        };

        match result {
            Ok(saved) => {
                info!(job_id = ?job_id, "Scoring settings saved");
                let committed = saved.clone();
                let job_specific = job_id.is_some();
                self.commit(move |s| {
                    s.settings = Some(committed);
                    s.settings_are_job_specific = job_specific;
                    s.is_loading_settings = false;
                    s.settings_error = None;
                });
                Some(saved)
            }
            Err(e) => {
                self.fail_settled(Concern::Settings, &e, SAVE_SETTINGS_FAILED, |s| {
                    s.is_loading_settings = false;
                });
                None
            }
        }
    }

    /// Drops the job's override and reloads what now applies (the global default).
    #[instrument(skip(self))]
    pub async fn reset_job_settings(&self, override_job_id: Option<&str>) -> bool {
        let Some(job_id) = self.resolve_job(override_job_id) else {
            let err = ApiError::Validation("Job ID is required to reset job settings".to_string());
            self.fail(Concern::Settings, &err, RESET_SETTINGS_FAILED);
            return false;
        };

        self.commit(|s| {
            s.is_loading_settings = true;
            s.settings_error = None;
        });

        match self.inner.api.delete_job_settings(&job_id).await {
            Ok(message) => {
                info!(%job_id, "Job scoring settings removed: {}", message.unwrap_or_default());
                self.fetch_settings(Some(&job_id)).await;
                true
            }
            Err(e) => {
                self.fail_settled(Concern::Settings, &e, RESET_SETTINGS_FAILED, |s| {
                    s.is_loading_settings = false;
                });
                false
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Aggregate
    // ────────────────────────────────────────────────────────────────────────

    pub fn clear_error(&self) {
        self.commit(ScoreState::clear_errors);
    }

    /// Score, history and insights in parallel; returns once all three settle.
    pub async fn refresh(&self) {
        tokio::join!(
            self.calculate_score(None),
            self.fetch_history(None),
            self.fetch_insights(),
        );
        info!(candidate_id = %self.inner.options.candidate_id, "Refresh finished");
    }
}
