use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{Recalibration, Resolution, ScoredRace};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format an optional score with two decimals, "-" when absent
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.2}", s),
        None => "-".to_string(),
    }
}

/// Numbered list of upcoming race names (1-based)
pub fn format_race_options(options: &[String], use_colors: bool) -> String {
    if options.is_empty() {
        return "No upcoming races found.".to_string();
    }

    options
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let index_str = format!("{:>3}.", idx + 1);
            if use_colors {
                format!("{} {}", index_str.dimmed(), name)
            } else {
                format!("{} {}", index_str, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Banner shown after resolving one race
pub fn format_resolution(race: &str, resolution: &Resolution, use_colors: bool) -> String {
    let rule = "=".repeat(40);
    let value = resolution.to_string();
    let value = if use_colors {
        match resolution {
            Resolution::Scored(_) => value.bold().green().to_string(),
            Resolution::NotFound => value.red().to_string(),
            Resolution::Unscored => value.yellow().to_string(),
        }
    } else {
        value
    };
    format!("{rule}\nRACE: {race}\nDIFFICULTY: {value}\n{rule}")
}

/// One-line summary of the comparison band used for recalibration
pub fn format_band(recalibration: &Recalibration) -> String {
    match recalibration.band {
        Some(band) => format!(
            "Comparison band: {:.2} - {:.2} raw ({} races)",
            band.min, band.max, recalibration.subset_size
        ),
        None => "Comparison band: empty (no race can be scored)".to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format scored races as a table: Index, Final, Raw, Race, Winner.
/// No headers; index is 1-based, scores are right-aligned.
pub fn format_scored_table(races: &[ScoredRace], use_colors: bool) -> String {
    if races.is_empty() {
        return "No historical races found.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 4;
    let score_width = 6;
    let separator = "  ";

    races
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>3}.", idx + 1);
            let final_str = format!("{:>width$}", format_score(scored.final_score), width = score_width);
            let raw_str = format!("{:>width$}", format_score(scored.raw_score), width = score_width);

            let winner = &scored.race.winner_name;
            let fixed_width =
                index_width + 1 + score_width * 2 + separator.len() * 3 + winner.chars().count();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&scored.race.race_name, width - fixed_width)
                }
                Some(_) => truncate_name(&scored.race.race_name, 20),
                None => scored.race.race_name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    final_str.bold(),
                    separator,
                    raw_str.dimmed(),
                    separator,
                    name,
                    separator,
                    winner.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, final_str, separator, raw_str, separator, name, separator, winner
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format scored races as tab-separated values for scripting
/// Columns: final_score, raw_score, race, winner, class (no headers, no colors)
pub fn format_tsv(races: &[ScoredRace]) -> String {
    races
        .iter()
        .map(|scored| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                scored.final_score.map(|s| s.to_string()).unwrap_or_default(),
                scored.raw_score.map(|s| s.to_string()).unwrap_or_default(),
                scored.race.race_name,
                scored.race.winner_name,
                scored.race.class
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoreBand;
    use crate::tables::HistoricalRace;

    fn sample_race(name: &str, raw: Option<f64>, final_score: Option<f64>) -> ScoredRace {
        ScoredRace {
            race: HistoricalRace::new("19.07", name, "Pogacar Tadej", "2.UWT"),
            raw_score: raw,
            final_score,
        }
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some(8.456)), "8.46");
        assert_eq!(format_score(Some(10.0)), "10.00");
        assert_eq!(format_score(None), "-");
    }

    #[test]
    fn test_format_race_options() {
        let options = vec!["Paris - Nice".to_string(), "Tour de France".to_string()];
        let result = format_race_options(&options, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines, vec!["  1. Paris - Nice", "  2. Tour de France"]);
    }

    #[test]
    fn test_format_race_options_empty() {
        assert_eq!(format_race_options(&[], false), "No upcoming races found.");
    }

    #[test]
    fn test_format_resolution() {
        let result = format_resolution("Tour de France", &Resolution::Scored(8.45), false);
        assert!(result.contains("RACE: Tour de France"));
        assert!(result.contains("DIFFICULTY: 8.45"));

        let result = format_resolution("Giro", &Resolution::NotFound, false);
        assert!(result.contains("DIFFICULTY: not found"));
    }

    #[test]
    fn test_format_band() {
        let recalibration = Recalibration {
            races: vec![],
            band: Some(ScoreBand { min: 1.5, max: 9.0 }),
            subset_size: 12,
        };
        assert_eq!(
            format_band(&recalibration),
            "Comparison band: 1.50 - 9.00 raw (12 races)"
        );

        let empty = Recalibration {
            races: vec![],
            band: None,
            subset_size: 0,
        };
        assert!(format_band(&empty).contains("empty"));
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 20), "Short");
        assert_eq!(truncate_name("Tour de France Femmes", 10), "Tour de...");
        assert_eq!(truncate_name("Giro", 3), "Gir");
    }

    #[test]
    fn test_format_scored_table() {
        let races = vec![
            sample_race("Tour de France", Some(10.0), Some(10.0)),
            sample_race("Tour de Langkawi", None, None),
        ];
        let result = format_scored_table(&races, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1."));
        assert!(lines[0].contains(" 10.00"));
        assert!(lines[0].contains("Pogacar Tadej"));
        assert!(lines[1].contains("     -"));
    }

    #[test]
    fn test_format_scored_table_empty() {
        assert_eq!(format_scored_table(&[], false), "No historical races found.");
    }

    #[test]
    fn test_format_tsv() {
        let races = vec![
            sample_race("Tour de France", Some(10.0), Some(9.5)),
            sample_race("Tour de Langkawi", None, None),
        ];
        let result = format_tsv(&races);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[0], "9.5\t10\tTour de France\tPogacar Tadej\t2.UWT");
        assert_eq!(lines[1], "\t\tTour de Langkawi\tPogacar Tadej\t2.UWT");
    }
}
