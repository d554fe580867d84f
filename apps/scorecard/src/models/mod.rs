pub mod insights;
pub mod score;
pub mod settings;

pub use insights::AiInsights;
pub use score::{ScoreHistoryEntry, ScoreResult};
pub use settings::{
    PersonalityCategoryWeights, ScoringPreferences, ScoringSettingsUpdate, ScoringWeights,
};
