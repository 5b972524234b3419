use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config, DataConfig, OutputConfig};
use crate::scoring::{RecalibrationPolicy, ScoringConfig, ScoringMode, DEFAULT_REFERENCE_TEAM};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn normalize_choice(input: &str) -> String {
    input.trim().to_lowercase().replace('-', "_")
}

fn is_restricted_choice(input: &str) -> bool {
    matches!(
        normalize_choice(input).as_str(),
        "restricted" | "restricted_to_named_list"
    )
}

/// Parse a scoring mode answer ("reference_team"/"team" or "absolute").
pub fn parse_mode_choice(input: &str) -> Result<ScoringMode, String> {
    match normalize_choice(input).as_str() {
        "reference_team" | "team" => Ok(ScoringMode::ReferenceTeam),
        "absolute" => Ok(ScoringMode::Absolute),
        other => Err(format!("unknown mode '{}'", other)),
    }
}

/// Parse a recalibration policy answer. `races` is a comma-separated list,
/// only used by the restricted policy.
pub fn parse_policy_choice(input: &str, races: &str) -> Result<RecalibrationPolicy, String> {
    if is_restricted_choice(input) {
        let names: Vec<String> = races
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err("restricted policy needs at least one race name".to_string());
        }
        return Ok(RecalibrationPolicy::RestrictedToNamedList { races: names });
    }
    match normalize_choice(input).as_str() {
        "all" => Ok(RecalibrationPolicy::All),
        "positive_only" | "positive" => Ok(RecalibrationPolicy::PositiveOnly),
        other => Err(format!("unknown policy '{}'", other)),
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Race Difficulty Configuration Wizard");
    println!("====================================");
    println!();

    // 1. Input tables
    let data_defaults = DataConfig::default();
    println!("The ranking, race results and race catalog are read as CSV files from one directory.");
    let dir = prompt_with_default("Data directory", &data_defaults.dir.display().to_string())?;
    let data = if prompt_yes_no("Use the default file names?", true)? {
        DataConfig {
            dir: PathBuf::from(dir),
            ..data_defaults
        }
    } else {
        DataConfig {
            dir: PathBuf::from(dir),
            ranking: prompt_with_default("Ranking file", &data_defaults.ranking)?,
            results: prompt_with_default("Race results file", &data_defaults.results)?,
            catalog: prompt_with_default("Race catalog file", &data_defaults.catalog)?,
        }
    };

    // 2. Scoring
    println!();
    println!("Riders ranked ahead of the reference team's best rider score 10,");
    println!("riders behind its worst rider score 0. 'absolute' scores the whole ranking instead.");
    let mode = loop {
        let input = prompt_with_default("Scoring mode (reference_team/absolute)", "reference_team")?;
        match parse_mode_choice(&input) {
            Ok(mode) => break mode,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };
    let reference_team = if mode == ScoringMode::ReferenceTeam {
        loop {
            let team = prompt_with_default("Reference team", DEFAULT_REFERENCE_TEAM)?;
            if !team.trim().is_empty() {
                break Some(team);
            }
            println!("  Reference team is required.");
        }
    } else {
        None
    };

    println!();
    println!("Final scores are stretched over the races in the comparison subset:");
    println!("  all            -- every race whose winner is ranked");
    println!("  positive_only  -- skip races whose winner scored 0");
    println!("  restricted     -- positive_only, limited to the races you name");
    let recalibration = loop {
        let input = prompt_with_default("Recalibration policy", "positive_only")?;
        let races = if is_restricted_choice(&input) {
            prompt("  Race names (comma-separated): ")?
        } else {
            String::new()
        };
        match parse_policy_choice(&input, &races) {
            Ok(policy) => break policy,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 3. Output
    println!();
    let write_intermediate =
        prompt_yes_no("Save the scored ranking and race tables after each run?", false)?;

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        data,
        scoring: Some(ScoringConfig {
            reference_team,
            mode: Some(mode),
            recalibration: Some(recalibration),
        }),
        output: OutputConfig {
            write_intermediate,
            ..OutputConfig::default()
        },
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `race-difficulty races` to list upcoming races.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_choice() {
        assert_eq!(parse_mode_choice("absolute"), Ok(ScoringMode::Absolute));
        assert_eq!(parse_mode_choice(" Reference-Team "), Ok(ScoringMode::ReferenceTeam));
        assert!(parse_mode_choice("fuzzy").is_err());
    }

    #[test]
    fn test_parse_policy_choice() {
        assert_eq!(parse_policy_choice("all", ""), Ok(RecalibrationPolicy::All));
        assert_eq!(
            parse_policy_choice("positive-only", ""),
            Ok(RecalibrationPolicy::PositiveOnly)
        );
        assert_eq!(
            parse_policy_choice("restricted", "Paris - Nice, ,Tour de France"),
            Ok(RecalibrationPolicy::RestrictedToNamedList {
                races: vec!["Paris - Nice".to_string(), "Tour de France".to_string()],
            })
        );
        assert!(parse_policy_choice("restricted", " , ").is_err());
        assert!(parse_policy_choice("median", "").is_err());
    }

    #[test]
    fn test_wizard_config_serializes() {
        let config = Config {
            data: DataConfig::default(),
            scoring: Some(ScoringConfig::default()),
            output: OutputConfig::default(),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed = crate::config::parse_config(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
