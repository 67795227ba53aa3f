pub mod capacity;
pub mod experience;
pub mod ranking;
pub mod reference_units;
pub mod report;
pub mod scoring;
pub mod sector;

pub use crate::domain::model::{
    Company, CompanyFinancials, CompetitorTotal, Contract, ExperienceBucket, MatchResult,
    RankingReport, RankingStats, ScoreBreakdown, Tender,
};
pub use crate::domain::ports::{CompanyRepository, CompetitorFeed, Storage, TenderRepository};
pub use crate::utils::error::Result;
