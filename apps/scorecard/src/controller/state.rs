use serde::Serialize;

use crate::models::{AiInsights, ScoreHistoryEntry, ScoreResult, ScoringPreferences};

/// The four independently tracked concerns of a candidate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concern {
    Score,
    History,
    Insights,
    Settings,
}

/// Snapshot of everything a candidate view renders.
///
/// Each concern owns its value, loading flag and error slot; an operation on one
/// concern never writes another concern's fields.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
    /// Bumped once per applied commit.
    #[serde(skip)]
    pub revision: u64,

    pub score: Option<ScoreResult>,
    pub is_calculating: bool,
    pub error: Option<String>,

    pub history: Vec<ScoreHistoryEntry>,
    pub is_loading_history: bool,
    pub history_error: Option<String>,

    pub insights: Option<AiInsights>,
    pub is_generating_insights: bool,
    /// Set while existing insights are being read (no generation).
    pub is_loading_insights: bool,
    pub insights_error: Option<String>,

    /// Effective settings: the job override if one exists, else the global default.
    pub settings: Option<ScoringPreferences>,
    pub settings_are_job_specific: bool,
    pub is_loading_settings: bool,
    pub settings_error: Option<String>,
}

impl ScoreState {
    pub fn error_for(&self, concern: Concern) -> Option<&str> {
        match concern {
            Concern::Score => self.error.as_deref(),
            Concern::History => self.history_error.as_deref(),
            Concern::Insights => self.insights_error.as_deref(),
            Concern::Settings => self.settings_error.as_deref(),
        }
    }

    pub fn is_loading(&self, concern: Concern) -> bool {
        match concern {
            Concern::Score => self.is_calculating,
            Concern::History => self.is_loading_history,
            Concern::Insights => self.is_generating_insights || self.is_loading_insights,
            Concern::Settings => self.is_loading_settings,
        }
    }

    pub(crate) fn set_error(&mut self, concern: Concern, message: Option<String>) {
        match concern {
            Concern::Score => self.error = message,
            Concern::History => self.history_error = message,
            Concern::Insights => self.insights_error = message,
            Concern::Settings => self.settings_error = message,
        }
    }

    pub(crate) fn clear_errors(&mut self) {
        self.error = None;
        self.history_error = None;
        self.insights_error = None;
        self.settings_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_slots_are_independent() {
        let mut state = ScoreState::default();
        state.set_error(Concern::History, Some("timeout".to_string()));
        assert_eq!(state.error_for(Concern::History), Some("timeout"));
        assert_eq!(state.error_for(Concern::Score), None);
        assert_eq!(state.error_for(Concern::Insights), None);
        assert_eq!(state.error_for(Concern::Settings), None);
    }

    #[test]
    fn test_insights_loading_covers_read_and_generate() {
        let mut state = ScoreState::default();
        assert!(!state.is_loading(Concern::Insights));
        state.is_loading_insights = true;
        assert!(state.is_loading(Concern::Insights));
        state.is_loading_insights = false;
        state.is_generating_insights = true;
        assert!(state.is_loading(Concern::Insights));
    }

    #[test]
    fn test_clear_errors_keeps_loading_flags() {
        let mut state = ScoreState {
            is_calculating: true,
            error: Some("a".to_string()),
            settings_error: Some("b".to_string()),
            ..Default::default()
        };
        state.clear_errors();
        assert!(state.error.is_none());
        assert!(state.settings_error.is_none());
        assert!(state.is_calculating);
    }
}
