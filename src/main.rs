use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

use race_difficulty::config::Config;
use race_difficulty::scoring::{self, PipelineOutput, RecalibrationPolicy, ScoringConfig};
use race_difficulty::PipelineError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_SCORING: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List upcoming races from the catalog (default if no subcommand)
    Races,
    /// Show the difficulty score of one race
    Score {
        /// Race name, matched case-insensitively as a substring
        race: Option<String>,

        /// Pick the race by its number in `races` instead (1-based)
        #[arg(long, conflicts_with = "race")]
        index: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every scored historical race
    Table {
        /// Tab-separated output for scripting
        #[arg(long, conflicts_with = "json")]
        tsv: bool,

        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Create a config file interactively
    Init,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PolicyArg {
    All,
    PositiveOnly,
    Restricted,
}

#[derive(Parser, Debug)]
#[command(name = "race-difficulty")]
#[command(about = "Estimate race difficulty from last edition's winner and a reference team", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/race-difficulty/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory holding the input tables
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Team whose ranked riders anchor the score band
    #[arg(long, global = true)]
    reference_team: Option<String>,

    /// Comparison subset used for recalibration
    #[arg(long, value_enum, global = true)]
    policy: Option<PolicyArg>,

    /// Races for the restricted policy (repeatable)
    #[arg(long = "compare-race", global = true)]
    compare_races: Vec<String>,

    /// Save the scored ranking and race tables
    #[arg(long, global = true)]
    write_intermediate: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Merge command-line overrides into the loaded configuration.
fn apply_overrides(cli: &Cli, mut config: Config) -> Config {
    if let Some(ref dir) = cli.data_dir {
        config.data.dir = dir.clone();
    }
    if cli.write_intermediate {
        config.output.write_intermediate = true;
    }

    let mut scoring = config.effective_scoring();
    if let Some(ref team) = cli.reference_team {
        scoring.reference_team = Some(team.clone());
    }
    if let Some(policy) = cli.policy {
        scoring.recalibration = Some(resolve_policy(policy, &cli.compare_races, &scoring));
    }
    config.scoring = Some(scoring);
    config
}

/// Restricted reuses the configured race list unless races are given on the command line.
fn resolve_policy(
    policy: PolicyArg,
    compare_races: &[String],
    scoring: &ScoringConfig,
) -> RecalibrationPolicy {
    match policy {
        PolicyArg::All => RecalibrationPolicy::All,
        PolicyArg::PositiveOnly => RecalibrationPolicy::PositiveOnly,
        PolicyArg::Restricted => {
            let races = if compare_races.is_empty() {
                match scoring.policy() {
                    RecalibrationPolicy::RestrictedToNamedList { races } => races,
                    _ => Vec::new(),
                }
            } else {
                compare_races.to_vec()
            };
            RecalibrationPolicy::RestrictedToNamedList { races }
        }
    }
}

fn exit_code_for(err: &PipelineError) -> i32 {
    if err.is_input_error() {
        EXIT_INPUT
    } else {
        EXIT_SCORING
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    // Init writes the config, so it must not require one
    if let Some(Commands::Init) = cli.command {
        run_init(cli.config.as_deref());
    }

    let config_path = cli.config.as_ref().map(PathBuf::from);
    let config = match race_difficulty::config::load_config(config_path) {
        Ok(c) => apply_overrides(&cli, c),
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let scoring_config = config.effective_scoring();
    if let Err(errors) = scoring::validate_scoring(&scoring_config) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    debug!(
        "mode {:?}, reference team '{}', policy {}",
        scoring_config.mode(),
        scoring_config.reference_team(),
        scoring_config.policy().label()
    );

    let use_colors = race_difficulty::output::should_use_colors();
    let command = cli.command.unwrap_or(Commands::Races);

    let race_options = || match race_difficulty::tables::load_catalog(&config.data.catalog_path()) {
        Ok(catalog) => catalog.options(),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_code_for(&e));
        }
    };

    match command {
        Commands::Races => {
            let options = race_options();
            println!(
                "{}",
                race_difficulty::output::format_race_options(&options, use_colors)
            );
        }
        Commands::Score { race, index, json } => {
            let query = match (race, index) {
                (Some(race), _) => race,
                (None, Some(index)) => {
                    let options = race_options();
                    if index < 1 || index > options.len() {
                        eprintln!(
                            "Invalid index {}. Must be between 1 and {}.",
                            index,
                            options.len()
                        );
                        std::process::exit(EXIT_CONFIG);
                    }
                    options[index - 1].clone()
                }
                (None, None) => {
                    eprintln!("Give a race name or --index N (see `race-difficulty races`).");
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let output = run(&config, &scoring_config);
            let resolution = output.resolve(&query);
            if json {
                let body = serde_json::json!({ "race": query, "result": resolution });
                println!("{}", body);
            } else {
                println!(
                    "{}",
                    race_difficulty::output::format_resolution(&query, &resolution, use_colors)
                );
                if cli.verbose {
                    eprintln!("{}", race_difficulty::output::format_band(&output.recalibration));
                }
            }
        }
        Commands::Table { tsv, json } => {
            let output = run(&config, &scoring_config);
            if json {
                match serde_json::to_string_pretty(output.races()) {
                    Ok(body) => println!("{}", body),
                    Err(e) => {
                        eprintln!("Failed to serialize races: {}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                }
            } else if tsv {
                println!("{}", race_difficulty::output::format_tsv(output.races()));
            } else {
                println!(
                    "{}",
                    race_difficulty::output::format_scored_table(output.races(), use_colors)
                );
                println!();
                println!("{}", race_difficulty::output::format_band(&output.recalibration));
            }
        }
        Commands::Init => run_init(cli.config.as_deref()),
    }

    debug!("finished in {:?}", start_time.elapsed());
    std::process::exit(EXIT_SUCCESS);
}

fn run_init(config_path: Option<&str>) -> ! {
    if let Err(e) = race_difficulty::config::init::run_init_wizard(config_path.map(PathBuf::from)) {
        eprintln!("Init failed: {:#}", e);
        std::process::exit(EXIT_CONFIG);
    }
    std::process::exit(EXIT_SUCCESS);
}

/// Load the tables and score them, exiting on fatal pipeline errors.
fn run(config: &Config, scoring_config: &ScoringConfig) -> PipelineOutput {
    let result = scoring::load_inputs(&config.data)
        .and_then(|inputs| scoring::run_pipeline(&inputs, scoring_config));
    let output = match result {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_code_for(&e));
        }
    };

    if config.output.write_intermediate {
        let rider_path = config.output.ranking_scores_path(&config.data);
        let race_path = config.output.race_scores_path(&config.data);
        if let Err(e) = output.persist(&rider_path, &race_path) {
            // scores are still valid, only the saved copy is missing
            warn!("Failed to save scored tables: {:#}", e);
        }
    } else {
        info!("scored {} historical races", output.races().len());
    }
    output
}
