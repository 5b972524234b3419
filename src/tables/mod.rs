pub mod loader;
pub mod types;
pub mod writer;

pub use loader::{load_catalog, load_ranking, load_results};
pub use types::{HistoricalRace, RaceCatalog, RankingEntry, RankingTable};
pub use writer::{write_race_scores, write_rider_scores};
