use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use super::ranking::ScoredRider;
use crate::tables::HistoricalRace;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRace {
    #[serde(flatten)]
    pub race: HistoricalRace,
    pub raw_score: Option<f64>,   // None when the winner is not ranked
    pub final_score: Option<f64>, // None until recalibrated, or when outside the band
}

/// Left-join races onto rider scores by winner name.
///
/// Names are compared exactly after trimming. When a rider appears twice in
/// the ranking the first (best ranked) row wins, so the output always has one
/// row per input race.
pub fn join_winners(races: &[HistoricalRace], riders: &[ScoredRider]) -> Vec<ScoredRace> {
    let mut by_name: HashMap<&str, f64> = HashMap::with_capacity(riders.len());
    for rider in riders {
        by_name
            .entry(rider.entry.rider_name.trim())
            .or_insert(rider.raw_score);
    }

    let joined: Vec<ScoredRace> = races
        .iter()
        .map(|race| ScoredRace {
            race: race.clone(),
            raw_score: by_name.get(race.winner_name.trim()).copied(),
            final_score: None,
        })
        .collect();

    debug!(
        "{} of {} race winners found in ranking",
        joined.iter().filter(|r| r.raw_score.is_some()).count(),
        joined.len()
    );
    joined
}
