use std::fmt;

use serde::Serialize;

use super::join::ScoredRace;

/// Outcome of looking up a race name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Resolution {
    Scored(f64),
    /// No historical race name contains the query.
    NotFound,
    /// Races matched, but none has a final score.
    Unscored,
}

impl Resolution {
    pub fn value(&self) -> Option<f64> {
        match self {
            Resolution::Scored(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Scored(v) => write!(f, "{}", v),
            Resolution::NotFound => f.write_str("not found"),
            Resolution::Unscored => f.write_str("unscored"),
        }
    }
}

/// Trim and case-fold a race name or query.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Race names normalized once, for repeated substring lookups.
pub struct ScoreIndex<'a> {
    entries: Vec<(String, &'a ScoredRace)>,
}

impl<'a> ScoreIndex<'a> {
    pub fn new(races: &'a [ScoredRace]) -> Self {
        let entries = races
            .iter()
            .map(|race| (normalize_name(&race.race.race_name), race))
            .collect();
        Self { entries }
    }

    /// Every race whose normalized name contains the normalized query.
    pub fn matches(&self, query: &str) -> Vec<&'a ScoredRace> {
        let needle = normalize_name(query);
        self.entries
            .iter()
            .filter(|(name, _)| name.contains(&needle))
            .map(|(_, race)| *race)
            .collect()
    }

    /// Highest final score among matches; ties between editions go to the hardest.
    pub fn resolve(&self, query: &str) -> Resolution {
        let matches = self.matches(query);
        if matches.is_empty() {
            return Resolution::NotFound;
        }
        matches
            .iter()
            .filter_map(|race| race.final_score)
            .fold(None, |best: Option<f64>, score| {
                Some(best.map_or(score, |b| b.max(score)))
            })
            .map_or(Resolution::Unscored, Resolution::Scored)
    }
}

pub fn resolve(races: &[ScoredRace], query: &str) -> Resolution {
    ScoreIndex::new(races).resolve(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::HistoricalRace;

    fn race(name: &str, raw: Option<f64>, final_score: Option<f64>) -> ScoredRace {
        ScoredRace {
            race: HistoricalRace::new("01.01", name, "W", "1.1"),
            raw_score: raw,
            final_score,
        }
    }

    #[test]
    fn test_highest_score_wins() {
        let races = vec![
            race("Tour de France", Some(8.0), Some(9.0)),
            race("Tour of Britain", Some(3.0), Some(3.0)),
        ];
        assert_eq!(resolve(&races, "Tour"), Resolution::Scored(9.0));
    }

    #[test]
    fn test_tie_break_across_editions() {
        let races = vec![
            race("Paris - Nice", Some(5.0), Some(6.0)),
            race("Paris - Nice", Some(7.0), Some(8.5)),
        ];
        assert_eq!(resolve(&races, "paris - nice"), Resolution::Scored(8.5));
    }

    #[test]
    fn test_query_is_trimmed_and_case_folded() {
        let races = vec![race("  Tour de France ", Some(8.0), Some(9.0))];
        assert_eq!(resolve(&races, "  TOUR DE "), Resolution::Scored(9.0));
    }

    #[test]
    fn test_not_found() {
        let races = vec![race("Tour de France", Some(8.0), Some(9.0))];
        assert_eq!(resolve(&races, "Giro"), Resolution::NotFound);
        assert_eq!(resolve(&[], "Giro"), Resolution::NotFound);
    }

    #[test]
    fn test_unscored_when_winner_unranked() {
        let races = vec![race("Tour de Langkawi", None, None)];
        assert_eq!(resolve(&races, "Langkawi"), Resolution::Unscored);
    }

    #[test]
    fn test_unscored_rows_ignored_when_others_scored() {
        let races = vec![
            race("GP Denain", None, None),
            race("GP Denain", Some(4.0), Some(2.5)),
        ];
        assert_eq!(resolve(&races, "Denain"), Resolution::Scored(2.5));
    }

    #[test]
    fn test_index_matches() {
        let races = vec![
            race("Tour de France", None, None),
            race("Tour of Britain", None, None),
            race("Paris - Roubaix", None, None),
        ];
        let index = ScoreIndex::new(&races);
        assert_eq!(index.matches("tour").len(), 2);
        assert_eq!(index.matches("roubaix")[0].race.race_name, "Paris - Roubaix");
    }

    #[test]
    fn test_display_and_json() {
        assert_eq!(Resolution::Scored(8.45).to_string(), "8.45");
        assert_eq!(Resolution::NotFound.to_string(), "not found");
        assert_eq!(Resolution::Unscored.to_string(), "unscored");
        assert_eq!(
            serde_json::to_string(&Resolution::Scored(8.5)).unwrap(),
            r#"{"status":"scored","value":8.5}"#
        );
        assert_eq!(
            serde_json::to_string(&Resolution::NotFound).unwrap(),
            r#"{"status":"not_found"}"#
        );
    }
}
