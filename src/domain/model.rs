use chrono::{DateTime, NaiveDate, Utc};
use crate::utils::nullable::{decimal_or_none, decimal_or_zero, vec_or_empty};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nit: Option<String>,
}

/// Financial indicators as reported in the company's RUP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFinancials {
    pub liquidity_index: f64,
    pub indebtedness_index: f64,
    pub working_capital: f64,
    pub equity: f64,
}

/// Row of the financials table, keyed by the owning company. Indicators may
/// be null in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFinancialsRecord {
    pub company_id: String,
    #[serde(default, deserialize_with = "decimal_or_none")]
    pub liquidity_index: Option<f64>,
    #[serde(default, deserialize_with = "decimal_or_none")]
    pub indebtedness_index: Option<f64>,
    #[serde(default, deserialize_with = "decimal_or_none")]
    pub working_capital: Option<f64>,
    #[serde(default, deserialize_with = "decimal_or_none")]
    pub equity: Option<f64>,
}

impl CompanyFinancialsRecord {
    /// The indicators, or `None` when any of them is missing.
    pub fn financials(&self) -> Option<CompanyFinancials> {
        Some(CompanyFinancials {
            liquidity_index: self.liquidity_index?,
            indebtedness_index: self.indebtedness_index?,
            working_capital: self.working_capital?,
            equity: self.equity?,
        })
    }
}

/// A contract the company has already executed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(default)]
    pub id: String,
    pub company_id: String,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub contract_value: f64,
    #[serde(default, deserialize_with = "decimal_or_none")]
    pub contract_value_in_reference_units: Option<f64>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub classification_codes: Vec<String>,
    #[serde(default)]
    pub execution_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderStatus {
    #[default]
    Open,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tender {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub required_classification_codes: Vec<String>,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: TenderStatus,
}

impl Tender {
    pub fn is_open(&self) -> bool {
        self.status == TenderStatus::Open
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBucket {
    pub count: u32,
    pub total_value: f64,
    pub total_value_in_reference_units: f64,
}

/// Sub-scores behind a match score. `None` marks a sub-score that was
/// skipped because its denominator was not positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub capacity_fit: Option<u8>,
    pub classification_fit: u8,
    pub size_fit: Option<u8>,
    pub total: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub tender: Tender,
    pub match_score: u8,
    pub breakdown: ScoreBreakdown,
    pub sector: String,
}

impl MatchResult {
    pub fn tender_id(&self) -> &str {
        &self.tender.id
    }
}

/// Summed award value of one supplier in the open-data feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorTotal {
    pub supplier: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Competitiveness {
    High,
    Medium,
    #[default]
    Low,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingStats {
    pub total_evaluated: usize,
    pub high_probability: usize,
    pub avg_score: u8,
    pub global_rank: usize,
    pub percentile: u8,
    pub total_competitors: usize,
    pub company_total_value: f64,
    pub competitiveness: Competitiveness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRow {
    pub code: String,
    #[serde(flatten)]
    pub bucket: ExperienceBucket,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingReport {
    pub company_id: String,
    pub company_name: Option<String>,
    pub capacity: f64,
    pub sector: String,
    pub experience: Vec<ExperienceRow>,
    pub results: Vec<MatchResult>,
    pub stats: RankingStats,
}
