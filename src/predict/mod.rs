//! Bounded prediction from a feature vector.
//!
//! - artifact slots, the regressor/loader traits and the JSON loader (`artifact`)
//! - the model/fallback state machine with its model cache (`engine`)
//! - the deterministic heuristic (`fallback`)

pub mod artifact;
pub mod engine;
pub mod fallback;

pub use artifact::{FsModelLoader, LinearQuantileModel, ModelLoader, ModelSlot, QuantileRegressor};
pub use engine::{ModelPair, PredictionEngine};
pub use fallback::{FallbackBand, fallback_bounds};
