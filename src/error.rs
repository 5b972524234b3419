use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The flat tables the pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Ranking,
    Results,
    Catalog,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::Ranking => "ranking",
            TableKind::Results => "race results",
            TableKind::Catalog => "race catalog",
        };
        f.write_str(name)
    }
}

/// Fatal conditions that abort a scoring run.
///
/// "No score" outcomes are not errors; see `scoring::Resolution` and
/// `scoring::Recalibration::band`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{table} table not found at {}", .path.display())]
    MissingInputTable { table: TableKind, path: PathBuf },

    #[error("{table} table is missing required column '{column}'")]
    MissingRequiredColumn { table: TableKind, column: String },

    #[error("reference team '{team}' has no riders in the ranking")]
    ReferenceTeamNotFound { team: String },

    #[error("malformed {table} table: {source}")]
    Csv {
        table: TableKind,
        #[source]
        source: csv::Error,
    },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// True for errors caused by the input tables rather than by scoring.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, PipelineError::ReferenceTeamNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message() {
        let err = PipelineError::MissingRequiredColumn {
            table: TableKind::Results,
            column: "Winner".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "race results table is missing required column 'Winner'"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_reference_team_is_not_input_error() {
        let err = PipelineError::ReferenceTeamNotFound {
            team: "Cofidis".to_string(),
        };
        assert!(!err.is_input_error());
        assert!(err.to_string().contains("Cofidis"));
    }
}
