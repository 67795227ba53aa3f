use crate::core::capacity::capacity;
use crate::core::experience::{aggregate_by_code, total_contract_value, ExperienceByCode};
use crate::core::scoring::breakdown;
use crate::core::sector::{classify, GENERAL_SECTOR};
use crate::domain::model::{
    CompanyFinancials, Competitiveness, CompetitorTotal, Contract, MatchResult, RankingReport,
    RankingStats, Tender,
};
use crate::domain::ports::{CompanyRepository, CompetitorFeed, TenderRepository};
use crate::utils::error::Result;

/// Upper bound on open tenders pulled from the store per ranking.
pub const DEFAULT_MAX_OPEN_TENDERS: usize = 100;
pub const DEFAULT_HIGH_PROBABILITY_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, PartialEq)]
pub struct RankingOptions {
    pub max_open_tenders: usize,
    pub high_probability_threshold: u8,
    /// Search term for the competitor feed. Falls back to the company's sector.
    pub competitor_query: Option<String>,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            max_open_tenders: DEFAULT_MAX_OPEN_TENDERS,
            high_probability_threshold: DEFAULT_HIGH_PROBABILITY_THRESHOLD,
            competitor_query: None,
        }
    }
}

/// Scores every tender and orders them by score, best first. Tenders with
/// equal scores keep their input order.
pub fn rank_tenders(
    financials: Option<&CompanyFinancials>,
    contracts: &[Contract],
    open_tenders: Vec<Tender>,
) -> Vec<MatchResult> {
    rank_with_experience(financials, &aggregate_by_code(contracts), open_tenders)
}

/// Same as [`rank_tenders`] for experience that is already aggregated.
pub fn rank_with_experience(
    financials: Option<&CompanyFinancials>,
    experience: &ExperienceByCode,
    open_tenders: Vec<Tender>,
) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = open_tenders
        .into_iter()
        .map(|tender| {
            let parts = breakdown(financials, &tender, experience);
            let sector = classify(tender.required_classification_codes.as_slice()).to_string();
            MatchResult {
                tender,
                match_score: parts.total,
                breakdown: parts,
                sector,
            }
        })
        .collect();

    results.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    results
}

/// 1-based position of `company_total` among competitor totals sorted
/// largest first: the first competitor strictly below the company.
pub fn global_rank(company_total: f64, competitor_totals: &[CompetitorTotal]) -> usize {
    competitor_totals
        .iter()
        .position(|c| c.amount < company_total)
        .map(|idx| idx + 1)
        .unwrap_or(competitor_totals.len() + 1)
}

pub fn percentile(rank: usize, competitor_count: usize) -> u8 {
    let raw = 100.0 - rank as f64 / (competitor_count + 1) as f64 * 100.0;
    raw.round().clamp(1.0, 100.0) as u8
}

pub fn competitiveness(percentile: u8) -> Competitiveness {
    match percentile {
        75..=u8::MAX => Competitiveness::High,
        40..=74 => Competitiveness::Medium,
        _ => Competitiveness::Low,
    }
}

pub fn ranking_stats(
    results: &[MatchResult],
    company_total_value: f64,
    competitor_totals: &[CompetitorTotal],
    high_probability_threshold: u8,
) -> RankingStats {
    let total_evaluated = results.len();
    let high_probability = results
        .iter()
        .filter(|r| r.match_score >= high_probability_threshold)
        .count();
    let avg_score = if total_evaluated == 0 {
        0
    } else {
        let sum: u64 = results.iter().map(|r| u64::from(r.match_score)).sum();
        (sum as f64 / total_evaluated as f64).round() as u8
    };

    let global_rank = global_rank(company_total_value, competitor_totals);
    let percentile = percentile(global_rank, competitor_totals.len());

    RankingStats {
        total_evaluated,
        high_probability,
        avg_score,
        global_rank,
        percentile,
        total_competitors: competitor_totals.len(),
        company_total_value,
        competitiveness: competitiveness(percentile),
    }
}

pub struct RankingEngine<C: CompanyRepository, T: TenderRepository, F: CompetitorFeed> {
    companies: C,
    tenders: T,
    competitors: F,
    options: RankingOptions,
}

impl<C: CompanyRepository, T: TenderRepository, F: CompetitorFeed> RankingEngine<C, T, F> {
    pub fn new(companies: C, tenders: T, competitors: F) -> Self {
        Self {
            companies,
            tenders,
            competitors,
            options: RankingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RankingOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn run(&self, company_id: &str) -> Result<RankingReport> {
        tracing::info!("🏢 Loading company profile: {}", company_id);
        let company = self.companies.company(company_id).await?;
        if company.is_none() {
            tracing::warn!("Company {} not found, ranking with empty profile", company_id);
        }
        let financials = self.companies.financials(company_id).await?;
        let contracts = self.companies.contracts(company_id).await?;
        tracing::debug!(
            "Company {}: financials present = {}, {} contracts",
            company_id,
            financials.is_some(),
            contracts.len()
        );

        let k = capacity(financials.as_ref());
        let experience = aggregate_by_code(&contracts);
        // one vote per code occurrence across all contracts
        let contract_codes: Vec<&str> = contracts
            .iter()
            .flat_map(|c| c.classification_codes.iter().map(String::as_str))
            .collect();
        let sector = classify(contract_codes.as_slice());
        tracing::info!(
            "📐 Capacity K = {:.0}, {} experience codes, sector: {}",
            k,
            experience.len(),
            sector
        );

        let open_tenders = self.tenders.open_tenders(self.options.max_open_tenders).await?;
        tracing::info!("📥 Scoring {} open tenders", open_tenders.len());
        let results = rank_with_experience(financials.as_ref(), &experience, open_tenders);

        let competitor_totals = match self.competitor_query(sector) {
            Some(query) => {
                tracing::debug!("Fetching competitor totals for '{}'", query);
                self.competitors.competitor_totals(query).await?
            }
            None => {
                tracing::debug!("No competitor search term, skipping competitor feed");
                Vec::new()
            }
        };

        let stats = ranking_stats(
            &results,
            total_contract_value(&contracts),
            &competitor_totals,
            self.options.high_probability_threshold,
        );
        tracing::info!(
            "🏁 Ranked {} tenders: {} high probability, avg score {}, rank {} of {} (p{})",
            stats.total_evaluated,
            stats.high_probability,
            stats.avg_score,
            stats.global_rank,
            stats.total_competitors + 1,
            stats.percentile
        );

        Ok(RankingReport {
            company_id: company_id.to_string(),
            company_name: company.map(|c| c.name),
            capacity: k,
            sector: sector.to_string(),
            experience: experience.sorted_by_value(),
            results,
            stats,
        })
    }

    fn competitor_query<'a>(&'a self, sector: &'a str) -> Option<&'a str> {
        match self.options.competitor_query.as_deref() {
            Some(query) if !query.trim().is_empty() => Some(query),
            _ if sector != GENERAL_SECTOR => Some(sector),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ScoreBreakdown;

    fn result(id: &str, score: u8) -> MatchResult {
        MatchResult {
            tender: Tender {
                id: id.to_string(),
                ..Default::default()
            },
            match_score: score,
            breakdown: ScoreBreakdown {
                total: score,
                ..Default::default()
            },
            sector: GENERAL_SECTOR.to_string(),
        }
    }

    fn competitors(amounts: &[f64]) -> Vec<CompetitorTotal> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| CompetitorTotal {
                supplier: format!("Proveedor {}", i + 1),
                amount: *amount,
            })
            .collect()
    }

    fn tender(id: &str, amount: f64, codes: &[&str]) -> Tender {
        Tender {
            id: id.to_string(),
            amount,
            required_classification_codes: codes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_stats_with_zero_tenders() {
        let stats = ranking_stats(&[], 0.0, &[], DEFAULT_HIGH_PROBABILITY_THRESHOLD);
        assert_eq!(stats.total_evaluated, 0);
        assert_eq!(stats.high_probability, 0);
        assert_eq!(stats.avg_score, 0);
        assert_eq!(stats.global_rank, 1);
        assert_eq!(stats.percentile, 1);
    }

    #[test]
    fn test_stats_counts_and_average() {
        let results = vec![result("a", 90), result("b", 70), result("c", 45)];
        let stats = ranking_stats(&results, 0.0, &[], 70);
        assert_eq!(stats.total_evaluated, 3);
        assert_eq!(stats.high_probability, 2);
        // (90 + 70 + 45) / 3 = 68.33
        assert_eq!(stats.avg_score, 68);
    }

    #[test]
    fn test_global_rank_finds_first_smaller_competitor() {
        let totals = competitors(&[9_000.0, 5_000.0, 3_000.0, 1_000.0]);
        assert_eq!(global_rank(4_000.0, &totals), 3);
        assert_eq!(global_rank(10_000.0, &totals), 1);
        // equal amounts are not "less than"
        assert_eq!(global_rank(5_000.0, &totals), 3);
        assert_eq!(global_rank(500.0, &totals), 5);
    }

    #[test]
    fn test_percentile() {
        // rank 3 of 4 competitors: 100 - 3/5*100 = 40
        assert_eq!(percentile(3, 4), 40);
        assert_eq!(percentile(1, 4), 80);
        // last place floors at 1
        assert_eq!(percentile(5, 4), 1);
        assert_eq!(percentile(1, 0), 1);
    }

    #[test]
    fn test_stats_rank_against_competitors() {
        let totals = competitors(&[9_000.0, 5_000.0, 3_000.0, 1_000.0]);
        let stats = ranking_stats(&[result("a", 80)], 6_000.0, &totals, 70);
        assert_eq!(stats.global_rank, 2);
        assert_eq!(stats.percentile, 60);
        assert_eq!(stats.total_competitors, 4);
        assert_eq!(stats.competitiveness, Competitiveness::Medium);
    }

    #[test]
    fn test_competitiveness_bands() {
        assert_eq!(competitiveness(100), Competitiveness::High);
        assert_eq!(competitiveness(75), Competitiveness::High);
        assert_eq!(competitiveness(74), Competitiveness::Medium);
        assert_eq!(competitiveness(40), Competitiveness::Medium);
        assert_eq!(competitiveness(39), Competitiveness::Low);
    }

    #[test]
    fn test_rank_tenders_sorts_descending_and_keeps_ties_in_order() {
        let financials = CompanyFinancials {
            liquidity_index: 1.0,
            indebtedness_index: 0.0,
            working_capital: 1_000_000.0,
            equity: 0.0,
        };
        let contracts = vec![Contract {
            company_id: "c1".to_string(),
            contract_value: 800_000.0,
            classification_codes: vec!["72121500".to_string()],
            ..Default::default()
        }];
        let tenders = vec![
            tender("newest", 5_000_000.0, &["85101500"]),
            tender("twin-a", 900_000.0, &[]),
            tender("best", 900_000.0, &["72121501"]),
            tender("twin-b", 900_000.0, &[]),
        ];

        let ranked = rank_tenders(Some(&financials), &contracts, tenders);

        let ids: Vec<&str> = ranked.iter().map(|r| r.tender_id()).collect();
        assert_eq!(ids, vec!["best", "twin-a", "twin-b", "newest"]);
        assert_eq!(ranked[0].match_score, 100);
        assert_eq!(ranked[1].match_score, 80);
        assert_eq!(ranked[1].match_score, ranked[2].match_score);
        assert_eq!(ranked[0].sector, "Construcción e Infraestructura");
        assert_eq!(ranked[3].sector, "Servicios de Salud");
    }

    #[test]
    fn test_rank_tenders_without_company_data() {
        let ranked = rank_tenders(None, &[], vec![tender("t1", 1_000.0, &["72121500"])]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].match_score, 0);
    }

    #[test]
    fn test_rank_with_precomputed_experience() {
        let contracts = vec![Contract {
            company_id: "c1".to_string(),
            contract_value: 800_000.0,
            classification_codes: vec!["72121500".to_string()],
            ..Default::default()
        }];
        let experience = aggregate_by_code(&contracts);
        let tenders = vec![
            tender("a", 900_000.0, &["72121501"]),
            tender("b", 900_000.0, &["85101500"]),
        ];

        let ranked = rank_with_experience(None, &experience, tenders.clone());

        assert_eq!(ranked, rank_tenders(None, &contracts, tenders));
        assert_eq!(ranked[0].tender_id(), "a");
        // no financials: classification 40 + size 20
        assert_eq!(ranked[0].match_score, 60);
    }
}
