pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::HunterConfig;

pub use adapters::memory::{InMemoryStore, StaticCompetitorFeed};
pub use adapters::secop::SecopClient;
pub use adapters::snapshot::Snapshot;
pub use adapters::storage::LocalStorage;
pub use crate::core::ranking::{
    rank_tenders, rank_with_experience, ranking_stats, RankingEngine, RankingOptions,
};
pub use crate::core::report::ReportWriter;
pub use utils::error::{HunterError, Result};
