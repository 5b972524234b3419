use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the input tables live. File names are relative to `dir`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub ranking: String,
    pub results: String,
    pub catalog: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            ranking: "PCS_Ranking_Completo.csv".to_string(),
            results: "calendario_uci_2025.csv".to_string(),
            catalog: "upcoming_races_cofidis.csv".to_string(),
        }
    }
}

impl DataConfig {
    pub fn ranking_path(&self) -> PathBuf {
        self.dir.join(&self.ranking)
    }

    pub fn results_path(&self) -> PathBuf {
        self.dir.join(&self.results)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(&self.catalog)
    }
}

/// Optional persistence of the scored tables.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub write_intermediate: bool,
    /// Defaults to the data directory
    pub dir: Option<PathBuf>,
    pub ranking_scores: String,
    pub race_scores: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_intermediate: false,
            dir: None,
            ranking_scores: "PCS_Ranking_Con_Nota.csv".to_string(),
            race_scores: "calendario_uci_2025_con_notas.csv".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn ranking_scores_path(&self, data: &DataConfig) -> PathBuf {
        self.dir.as_ref().unwrap_or(&data.dir).join(&self.ranking_scores)
    }

    pub fn race_scores_path(&self, data: &DataConfig) -> PathBuf {
        self.dir.as_ref().unwrap_or(&data.dir).join(&self.race_scores)
    }
}

impl Config {
    /// Scoring section with defaults applied when absent.
    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }
}
