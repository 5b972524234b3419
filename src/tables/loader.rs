use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};

use super::types::{HistoricalRace, RaceCatalog, RankingTable};
use crate::error::{PipelineError, TableKind};

/// Load the ranking table. Row order becomes the rider position.
pub fn load_ranking(path: &Path) -> Result<RankingTable, PipelineError> {
    let text = read_table_text(path, TableKind::Ranking)?;
    parse_ranking(&text)
}

/// Load the historical race results (one row per edition).
pub fn load_results(path: &Path) -> Result<Vec<HistoricalRace>, PipelineError> {
    let text = read_table_text(path, TableKind::Results)?;
    parse_results(&text)
}

/// Load the upcoming race catalog. The delimiter is sniffed from the header.
pub fn load_catalog(path: &Path) -> Result<RaceCatalog, PipelineError> {
    let text = read_table_text(path, TableKind::Catalog)?;
    parse_catalog(&text)
}

pub fn parse_ranking(text: &str) -> Result<RankingTable, PipelineError> {
    let table = TableKind::Ranking;
    let (columns, records) = read_records(text, b',', table)?;
    let rider_col = columns.require(table, &["Rider"])?;
    let team_col = columns.require(table, &["Team", "team"])?;
    let points_col = columns.find(&["Points"]);

    let mut rows = Vec::with_capacity(records.len());
    for (line, record) in records.iter().enumerate() {
        let rider = cell(record, rider_col);
        if rider.is_empty() {
            warn!("ranking row {} has no rider name; skipping", line + 2);
            continue;
        }
        let points = match points_col.map(|idx| cell(record, idx)) {
            Some(raw) => parse_points(raw).unwrap_or_else(|| {
                debug!("unparsable points '{}' for {}; using 0", raw, rider);
                0.0
            }),
            None => 0.0,
        };
        rows.push((rider.to_string(), cell(record, team_col).to_string(), points));
    }

    let ranking = RankingTable::from_rows(rows);
    debug!("loaded {} ranked riders", ranking.len());
    Ok(ranking)
}

pub fn parse_results(text: &str) -> Result<Vec<HistoricalRace>, PipelineError> {
    let table = TableKind::Results;
    let (columns, records) = read_records(text, b',', table)?;
    let date_col = columns.require(table, &["Date"])?;
    let race_col = columns.require(table, &["Race"])?;
    let winner_col = columns.require(table, &["Winner"])?;
    let class_col = columns.require(table, &["Class"])?;

    let races: Vec<HistoricalRace> = records
        .iter()
        .map(|record| {
            HistoricalRace::new(
                cell(record, date_col),
                cell(record, race_col),
                cell(record, winner_col),
                cell(record, class_col),
            )
        })
        .collect();
    debug!("loaded {} historical races", races.len());
    Ok(races)
}

pub fn parse_catalog(text: &str) -> Result<RaceCatalog, PipelineError> {
    let table = TableKind::Catalog;
    let delimiter = detect_delimiter(text.lines().next().unwrap_or(""));
    let (columns, records) = read_records(text, delimiter, table)?;
    let name_col = columns.require(table, &["Name"])?;

    let names = records
        .iter()
        .map(|record| cell(record, name_col).to_string())
        .collect();
    Ok(RaceCatalog { names })
}

/// Pick the most frequent of `,`, `;` and tab in the header line.
pub fn detect_delimiter(header: &str) -> u8 {
    [b',', b';', b'\t']
        .into_iter()
        .map(|d| (d, header.bytes().filter(|b| *b == d).count()))
        .max_by_key(|(_, count)| *count)
        .filter(|(_, count)| *count > 0)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}

/// Parse a points cell such as "3,456" or "120.5".
fn parse_points(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

fn read_table_text(path: &Path, table: TableKind) -> Result<String, PipelineError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.trim_start_matches('\u{feff}').to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(PipelineError::MissingInputTable {
            table,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_records(
    text: &str,
    delimiter: u8,
    table: TableKind,
) -> Result<(Columns, Vec<StringRecord>), PipelineError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| PipelineError::Csv { table, source })?;
    let columns = Columns::new(headers);

    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| PipelineError::Csv { table, source })?;
    Ok((columns, records))
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}

/// Trimmed header names; lookups are case-sensitive.
struct Columns {
    names: Vec<String>,
}

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        let names = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        Self { names }
    }

    fn find(&self, candidates: &[&str]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|c| self.names.iter().position(|n| n == c))
    }

    fn require(&self, table: TableKind, candidates: &[&str]) -> Result<usize, PipelineError> {
        self.find(candidates)
            .ok_or_else(|| PipelineError::MissingRequiredColumn {
                table,
                column: candidates[0].to_string(),
            })
    }
}
