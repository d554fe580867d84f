// Client-side checks on scoring configuration. Score computation itself is
// owned by the backend; nothing here derives or caches a score.

pub mod validation;

pub use validation::{
    validate_personality_category_weights, validate_scoring_weights, WeightValidation,
};
