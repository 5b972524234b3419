use log::debug;
use serde::Serialize;

use super::config::ScoringMode;
use super::round2;
use crate::error::PipelineError;
use crate::tables::{RankingEntry, RankingTable};

/// Positions spanned by the reference team's riders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceBand {
    pub best_position: usize,
    pub worst_position: usize,
}

impl ReferenceBand {
    /// Min and max position of riders whose trimmed team name equals `team`.
    pub fn locate(ranking: &RankingTable, team: &str) -> Result<Self, PipelineError> {
        let team = team.trim();
        let mut positions = ranking
            .entries
            .iter()
            .filter(|e| e.team_name.trim() == team)
            .map(|e| e.position);

        let first = positions
            .next()
            .ok_or_else(|| PipelineError::ReferenceTeamNotFound {
                team: team.to_string(),
            })?;
        let (best_position, worst_position) =
            positions.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));

        Ok(Self {
            best_position,
            worst_position,
        })
    }

    /// 10 ahead of the band, 0 behind it, linear decay inside.
    pub fn raw_score(&self, position: usize) -> f64 {
        if position < self.best_position {
            return 10.0;
        }
        if position > self.worst_position {
            return 0.0;
        }
        if self.best_position == self.worst_position {
            return 10.0;
        }
        let offset = (position - self.best_position) as f64;
        let width = (self.worst_position - self.best_position) as f64;
        round2(10.0 * (1.0 - offset / width))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRider {
    #[serde(flatten)]
    pub entry: RankingEntry,
    pub raw_score: f64,
}

/// Scored riders plus the band they were anchored to, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RiderScores {
    pub riders: Vec<ScoredRider>,
    pub band: Option<ReferenceBand>,
}

/// Score every rider, in ranking order.
pub fn score_ranking(
    ranking: &RankingTable,
    mode: ScoringMode,
    reference_team: &str,
) -> Result<RiderScores, PipelineError> {
    match mode {
        ScoringMode::ReferenceTeam => {
            let band = ReferenceBand::locate(ranking, reference_team)?;
            debug!(
                "reference team '{}' spans positions {}..={}",
                reference_team.trim(),
                band.best_position,
                band.worst_position
            );
            let riders = score_with(ranking, |p| band.raw_score(p));
            Ok(RiderScores {
                riders,
                band: Some(band),
            })
        }
        ScoringMode::Absolute => {
            let n = ranking.len();
            let riders = score_with(ranking, |p| absolute_score(p, n));
            Ok(RiderScores { riders, band: None })
        }
    }
}

/// Position score across the whole table: first rider 10, last rider 0.
pub fn absolute_score(position: usize, len: usize) -> f64 {
    if len <= 1 {
        return 10.0;
    }
    let remaining = len.saturating_sub(position + 1) as f64;
    round2(10.0 * remaining / (len - 1) as f64)
}

fn score_with<F>(ranking: &RankingTable, score: F) -> Vec<ScoredRider>
where
    F: Fn(usize) -> f64,
{
    ranking
        .entries
        .iter()
        .map(|entry| ScoredRider {
            entry: entry.clone(),
            raw_score: score(entry.position),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cofidis_table() -> RankingTable {
        RankingTable::from_rows(vec![
            ("A", "TeamX", 0.0),
            ("B", "Cofidis", 0.0),
            ("C", "Cofidis", 0.0),
            ("D", "TeamY", 0.0),
        ])
    }

    fn score_of(scores: &RiderScores, rider: &str) -> f64 {
        scores
            .riders
            .iter()
            .find(|r| r.entry.rider_name == rider)
            .map(|r| r.raw_score)
            .unwrap()
    }

    #[test]
    fn test_reference_band_scenario() {
        let scores = score_ranking(&cofidis_table(), ScoringMode::ReferenceTeam, "Cofidis").unwrap();
        assert_eq!(
            scores.band,
            Some(ReferenceBand {
                best_position: 1,
                worst_position: 2
            })
        );
        assert_eq!(score_of(&scores, "A"), 10.0);
        assert_eq!(score_of(&scores, "B"), 10.0);
        assert_eq!(score_of(&scores, "C"), 0.0);
        assert_eq!(score_of(&scores, "D"), 0.0);
    }

    #[test]
    fn test_order_preserved() {
        let scores = score_ranking(&cofidis_table(), ScoringMode::ReferenceTeam, "Cofidis").unwrap();
        let names: Vec<&str> = scores
            .riders
            .iter()
            .map(|r| r.entry.rider_name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_team_name_is_trimmed() {
        let table = RankingTable::from_rows(vec![("A", " Cofidis ", 0.0), ("B", "X", 0.0)]);
        let band = ReferenceBand::locate(&table, "Cofidis  ").unwrap();
        assert_eq!(band.best_position, 0);
    }

    #[test]
    fn test_reference_team_not_found() {
        let err = score_ranking(&cofidis_table(), ScoringMode::ReferenceTeam, "Lotto").unwrap_err();
        assert!(matches!(err, PipelineError::ReferenceTeamNotFound { ref team } if team == "Lotto"));
    }

    #[test]
    fn test_outside_band_is_capped() {
        let band = ReferenceBand {
            best_position: 10,
            worst_position: 20,
        };
        for p in 0..10 {
            assert_eq!(band.raw_score(p), 10.0);
        }
        for p in 21..40 {
            assert_eq!(band.raw_score(p), 0.0);
        }
    }

    #[test]
    fn test_monotonic_decay_within_band() {
        let band = ReferenceBand {
            best_position: 3,
            worst_position: 17,
        };
        let scores: Vec<f64> = (3..=17).map(|p| band.raw_score(p)).collect();
        assert_eq!(scores[0], 10.0);
        assert_eq!(*scores.last().unwrap(), 0.0);
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_linear_interior_rounded() {
        let band = ReferenceBand {
            best_position: 0,
            worst_position: 3,
        };
        assert_eq!(band.raw_score(1), 6.67);
        assert_eq!(band.raw_score(2), 3.33);
    }

    #[test]
    fn test_single_member_band() {
        let band = ReferenceBand {
            best_position: 5,
            worst_position: 5,
        };
        assert_eq!(band.raw_score(4), 10.0);
        assert_eq!(band.raw_score(5), 10.0);
        assert_eq!(band.raw_score(6), 0.0);
    }

    #[test]
    fn test_absolute_mode() {
        let scores = score_ranking(&cofidis_table(), ScoringMode::Absolute, "ignored").unwrap();
        assert!(scores.band.is_none());
        assert_eq!(score_of(&scores, "A"), 10.0);
        assert_eq!(score_of(&scores, "B"), 6.67);
        assert_eq!(score_of(&scores, "C"), 3.33);
        assert_eq!(score_of(&scores, "D"), 0.0);
    }

    #[test]
    fn test_absolute_single_rider() {
        assert_eq!(absolute_score(0, 1), 10.0);
    }
}
