use super::config::{RecalibrationPolicy, ScoringConfig, ScoringMode};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.mode() == ScoringMode::ReferenceTeam {
        if let Some(ref team) = config.reference_team {
            if team.trim().is_empty() {
                errors.push("scoring.reference_team: must not be empty".to_string());
            }
        }
    }

    if let Some(RecalibrationPolicy::RestrictedToNamedList { ref races }) = config.recalibration {
        if races.is_empty() {
            errors.push(
                "scoring.recalibration.races: restricted_to_named_list needs at least one race"
                    .to_string(),
            );
        }
        for (i, name) in races.iter().enumerate() {
            if name.trim().is_empty() {
                errors.push(format!("scoring.recalibration.races[{}]: must not be blank", i));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
