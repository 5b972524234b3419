use serde::{Deserialize, Serialize};

pub const DEFAULT_REFERENCE_TEAM: &str = "Cofidis";

/// How riders are scored from the ranking table.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Linear decay across the reference team's position band.
    #[default]
    ReferenceTeam,
    /// Linear decay across the whole ranking, first rider 10, last rider 0.
    Absolute,
}

/// Which historical races define the min/max band during recalibration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RecalibrationPolicy {
    /// Every race with a raw score.
    All,
    /// Races with a raw score above zero.
    #[default]
    PositiveOnly,
    /// Positive races whose name is in `races`.
    RestrictedToNamedList { races: Vec<String> },
}

impl RecalibrationPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            RecalibrationPolicy::All => "all",
            RecalibrationPolicy::PositiveOnly => "positive_only",
            RecalibrationPolicy::RestrictedToNamedList { .. } => "restricted_to_named_list",
        }
    }
}

/// Scoring configuration.
///
/// Every field is optional; missing values fall back to the defaults.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   reference_team: Cofidis
///   mode: reference_team
///   recalibration:
///     policy: restricted_to_named_list
///     races: ["Paris - Nice", "Tour de France"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Team whose ranked riders anchor the 0-10 band
    #[serde(default)]
    pub reference_team: Option<String>,

    #[serde(default)]
    pub mode: Option<ScoringMode>,

    #[serde(default)]
    pub recalibration: Option<RecalibrationPolicy>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reference_team: Some(DEFAULT_REFERENCE_TEAM.to_string()),
            mode: Some(ScoringMode::ReferenceTeam),
            recalibration: Some(RecalibrationPolicy::PositiveOnly),
        }
    }
}

impl ScoringConfig {
    pub fn reference_team(&self) -> &str {
        self.reference_team
            .as_deref()
            .unwrap_or(DEFAULT_REFERENCE_TEAM)
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode.unwrap_or_default()
    }

    pub fn policy(&self) -> RecalibrationPolicy {
        self.recalibration.clone().unwrap_or_default()
    }
}
