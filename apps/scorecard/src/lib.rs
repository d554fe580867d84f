//! Client-side half of the predictive-success scoring feature: a typed client for
//! the scoring backend and a per-candidate controller that tracks score, history,
//! AI insights and scoring settings with independent loading and error state.

pub mod api_client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
pub mod scoring;

#[cfg(test)]
pub(crate) mod fixtures;

pub use api_client::{ApiClient, ScoringApi};
pub use controller::{Concern, ControllerOptions, ScoreController, ScoreState};
pub use errors::ApiError;
