pub mod config;
pub mod join;
pub mod pipeline;
pub mod ranking;
pub mod recalibrate;
pub mod resolver;
pub mod validation;

pub use config::*;
pub use join::{join_winners, ScoredRace};
pub use pipeline::{load_inputs, run_pipeline, PipelineInputs, PipelineOutput};
pub use ranking::{score_ranking, ReferenceBand, RiderScores, ScoredRider};
pub use recalibrate::{recalibrate, Recalibration, ScoreBand};
pub use resolver::{resolve, Resolution, ScoreIndex};
pub use validation::validate_scoring;

/// Round half away from zero to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
