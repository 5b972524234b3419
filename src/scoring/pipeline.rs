use std::path::Path;

use anyhow::Result;
use log::info;

use super::config::ScoringConfig;
use super::join::{join_winners, ScoredRace};
use super::ranking::{score_ranking, ReferenceBand, ScoredRider};
use super::recalibrate::{recalibrate, Recalibration};
use super::resolver::{Resolution, ScoreIndex};
use crate::config::DataConfig;
use crate::error::PipelineError;
use crate::tables::{self, HistoricalRace, RankingTable};

/// Tables a scoring run consumes.
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub ranking: RankingTable,
    pub results: Vec<HistoricalRace>,
}

/// Read the ranking and results tables from the configured data directory.
pub fn load_inputs(data: &DataConfig) -> Result<PipelineInputs, PipelineError> {
    Ok(PipelineInputs {
        ranking: tables::load_ranking(&data.ranking_path())?,
        results: tables::load_results(&data.results_path())?,
    })
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub riders: Vec<ScoredRider>,
    pub reference_band: Option<ReferenceBand>,
    pub recalibration: Recalibration,
}

impl PipelineOutput {
    pub fn races(&self) -> &[ScoredRace] {
        &self.recalibration.races
    }

    pub fn index(&self) -> ScoreIndex<'_> {
        ScoreIndex::new(self.races())
    }

    pub fn resolve(&self, query: &str) -> Resolution {
        self.index().resolve(query)
    }

    /// Save the scored rider and race tables; nothing reads them back.
    pub fn persist(&self, rider_path: &Path, race_path: &Path) -> Result<()> {
        tables::write_rider_scores(rider_path, &self.riders)?;
        tables::write_race_scores(race_path, self.races())?;
        info!(
            "saved scored tables to {} and {}",
            rider_path.display(),
            race_path.display()
        );
        Ok(())
    }
}

/// Score riders, join them onto race winners and recalibrate.
pub fn run_pipeline(
    inputs: &PipelineInputs,
    config: &ScoringConfig,
) -> Result<PipelineOutput, PipelineError> {
    let scores = score_ranking(&inputs.ranking, config.mode(), config.reference_team())?;
    let joined = join_winners(&inputs.results, &scores.riders);
    let recalibration = recalibrate(&joined, &config.policy());

    Ok(PipelineOutput {
        riders: scores.riders,
        reference_band: scores.band,
        recalibration,
    })
}
