use std::collections::HashSet;

use log::{debug, warn};
use serde::Serialize;

use super::config::RecalibrationPolicy;
use super::join::ScoredRace;
use super::round2;

/// Min and max raw score over the comparison subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBand {
    pub min: f64,
    pub max: f64,
}

impl ScoreBand {
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recalibration {
    pub races: Vec<ScoredRace>,
    /// `None` when the comparison subset was empty; every final score is then absent.
    pub band: Option<ScoreBand>,
    pub subset_size: usize,
}

/// Raw scores of the races `policy` puts in the comparison subset.
pub fn comparison_subset(races: &[ScoredRace], policy: &RecalibrationPolicy) -> Vec<f64> {
    let named: Option<HashSet<&str>> = match policy {
        RecalibrationPolicy::RestrictedToNamedList { races } => {
            Some(races.iter().map(|name| name.trim()).collect())
        }
        _ => None,
    };

    races
        .iter()
        .filter_map(|race| {
            let raw = race.raw_score?;
            let selected = match policy {
                RecalibrationPolicy::All => true,
                RecalibrationPolicy::PositiveOnly => raw > 0.0,
                RecalibrationPolicy::RestrictedToNamedList { .. } => {
                    raw > 0.0
                        && named
                            .as_ref()
                            .is_some_and(|names| names.contains(race.race.race_name.trim()))
                }
            };
            selected.then_some(raw)
        })
        .collect()
}

/// Min-max rescale raw scores onto 0-10 relative to the comparison subset.
///
/// Rows without a positive raw score never get a final score. Results are
/// clamped to 0-10, which only matters for rows outside a restricted subset.
pub fn recalibrate(races: &[ScoredRace], policy: &RecalibrationPolicy) -> Recalibration {
    let subset = comparison_subset(races, policy);
    let band = subset.iter().copied().fold(None, |band: Option<ScoreBand>, raw| {
        Some(match band {
            None => ScoreBand { min: raw, max: raw },
            Some(b) => ScoreBand {
                min: b.min.min(raw),
                max: b.max.max(raw),
            },
        })
    });

    match band {
        None => warn!(
            "comparison subset is empty under '{}' policy; no race can be scored",
            policy.label()
        ),
        Some(b) => debug!(
            "recalibrating over {} races, raw band {}..{}",
            subset.len(),
            b.min,
            b.max
        ),
    }

    let races = races
        .iter()
        .map(|race| ScoredRace {
            final_score: band.and_then(|b| final_score(race.raw_score, b)),
            ..race.clone()
        })
        .collect();

    Recalibration {
        races,
        band,
        subset_size: subset.len(),
    }
}

fn final_score(raw: Option<f64>, band: ScoreBand) -> Option<f64> {
    let raw = raw.filter(|r| *r > 0.0)?;
    if band.is_degenerate() {
        return Some(10.0);
    }
    let scaled = round2(10.0 * (raw - band.min) / (band.max - band.min));
    Some(scaled.clamp(0.0, 10.0))
}
