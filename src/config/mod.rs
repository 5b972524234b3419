pub mod init;
mod schema;

pub use schema::{Config, DataConfig, OutputConfig};

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/race-difficulty/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("race-difficulty")
}

/// Get the default config file path (~/.config/race-difficulty/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path and
///   falls back to built-in defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        debug!(
            "no config at {}; using built-in defaults",
            config_path.display()
        );
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))
}

pub fn parse_config(yaml: &str) -> Result<Config> {
    let config: Config = serde_saphyr::from_str(yaml)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{RecalibrationPolicy, ScoringMode};

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
data:
  dir: /srv/pcs
  ranking: ranking.csv
  results: results.csv
  catalog: upcoming.csv
scoring:
  reference_team: Cofidis
  mode: reference_team
  recalibration:
    policy: positive_only
output:
  write_intermediate: true
  race_scores: scored.csv
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.data.ranking_path(), PathBuf::from("/srv/pcs/ranking.csv"));
        assert_eq!(config.data.catalog_path(), PathBuf::from("/srv/pcs/upcoming.csv"));
        let scoring = config.effective_scoring();
        assert_eq!(scoring.mode(), ScoringMode::ReferenceTeam);
        assert_eq!(scoring.policy(), RecalibrationPolicy::PositiveOnly);
        assert!(config.output.write_intermediate);
        assert_eq!(
            config.output.race_scores_path(&config.data),
            PathBuf::from("/srv/pcs/scored.csv")
        );
        assert_eq!(
            config.output.ranking_scores_path(&config.data),
            PathBuf::from("/srv/pcs/PCS_Ranking_Con_Nota.csv")
        );
    }

    #[test]
    fn test_partial_data_section_keeps_defaults() {
        let config = parse_config("data:\n  dir: elsewhere\n").unwrap();
        assert_eq!(config.data.dir, PathBuf::from("elsewhere"));
        assert_eq!(config.data.ranking, "PCS_Ranking_Completo.csv");
        assert!(config.scoring.is_none());
        assert_eq!(config.effective_scoring(), crate::scoring::ScoringConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse_config("queries: []\n").is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(dir.path().join("missing.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "scoring:\n  reference_team: Lotto\n").unwrap();
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.effective_scoring().reference_team(), "Lotto");
    }
}
