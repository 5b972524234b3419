use std::path::Path;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use csv::Writer;

use crate::scoring::{ScoredRace, ScoredRider};

/// Save scored riders as `Rank,Rider,Team,Points,raw_score`.
///
/// The write is atomic so an interrupted run never leaves a truncated table.
pub fn write_rider_scores(path: &Path, riders: &[ScoredRider]) -> Result<()> {
    let mut file = open_atomic(path)?;
    {
        let mut writer = Writer::from_writer(&mut file);
        writer.write_record(["Rank", "Rider", "Team", "Points", "raw_score"])?;
        for rider in riders {
            writer.write_record([
                (rider.entry.position + 1).to_string(),
                rider.entry.rider_name.clone(),
                rider.entry.team_name.clone(),
                rider.entry.points.to_string(),
                rider.raw_score.to_string(),
            ])?;
        }
        writer.flush().context("Failed to flush rider scores")?;
    }
    file.commit()
        .with_context(|| format!("Failed to save rider scores to {}", path.display()))?;
    Ok(())
}

/// Save scored races as `Date,Race,Winner,Class,raw_score,final_score`.
/// Absent scores are written as empty cells.
pub fn write_race_scores(path: &Path, races: &[ScoredRace]) -> Result<()> {
    let mut file = open_atomic(path)?;
    {
        let mut writer = Writer::from_writer(&mut file);
        writer.write_record(["Date", "Race", "Winner", "Class", "raw_score", "final_score"])?;
        for race in races {
            writer.write_record([
                race.race.date.clone(),
                race.race.race_name.clone(),
                race.race.winner_name.clone(),
                race.race.class.clone(),
                optional_cell(race.raw_score),
                optional_cell(race.final_score),
            ])?;
        }
        writer.flush().context("Failed to flush race scores")?;
    }
    file.commit()
        .with_context(|| format!("Failed to save race scores to {}", path.display()))?;
    Ok(())
}

fn open_atomic(path: &Path) -> Result<AtomicWriteFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
