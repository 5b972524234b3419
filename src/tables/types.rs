use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub position: usize, // 0-based row order, authoritative over any Rank column
    pub rider_name: String,
    pub team_name: String,
    pub points: f64,
}

/// Ranking rows in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingTable {
    pub entries: Vec<RankingEntry>,
}

impl RankingTable {
    /// Build a table from (rider, team, points) rows, assigning positions by order.
    pub fn from_rows<I, R, T>(rows: I) -> Self
    where
        I: IntoIterator<Item = (R, T, f64)>,
        R: Into<String>,
        T: Into<String>,
    {
        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(position, (rider, team, points))| RankingEntry {
                position,
                rider_name: rider.into(),
                team_name: team.into(),
                points,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalRace {
    pub date: String,
    pub race_name: String,
    pub winner_name: String,
    pub class: String,
}

impl HistoricalRace {
    pub fn new(date: &str, race_name: &str, winner_name: &str, class: &str) -> Self {
        Self {
            date: date.to_string(),
            race_name: race_name.to_string(),
            winner_name: winner_name.to_string(),
            class: class.to_string(),
        }
    }
}

/// Upcoming race names offered to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceCatalog {
    pub names: Vec<String>,
}

impl RaceCatalog {
    /// Unique names, sorted ascending.
    pub fn options(&self) -> Vec<String> {
        let mut options: Vec<String> = self
            .names
            .iter()
            .filter(|n| !n.is_empty())
            .cloned()
            .collect();
        options.sort();
        options.dedup();
        options
    }
}
