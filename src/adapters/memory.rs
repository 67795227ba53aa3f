use crate::core::{
    Company, CompanyFinancials, CompanyRepository, CompetitorFeed, CompetitorTotal, Contract,
    Result, Tender, TenderRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Store held entirely in memory. Backs the JSON snapshot loader and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    companies: HashMap<String, Company>,
    financials: HashMap<String, CompanyFinancials>,
    contracts: Vec<Contract>,
    tenders: Vec<Tender>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(mut self, company: Company) -> Self {
        self.companies.insert(company.id.clone(), company);
        self
    }

    pub fn with_financials(mut self, company_id: &str, financials: CompanyFinancials) -> Self {
        self.financials.insert(company_id.to_string(), financials);
        self
    }

    pub fn with_contract(mut self, contract: Contract) -> Self {
        self.contracts.push(contract);
        self
    }

    pub fn with_tender(mut self, tender: Tender) -> Self {
        self.tenders.push(tender);
        self
    }
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn company(&self, company_id: &str) -> Result<Option<Company>> {
        Ok(self.companies.get(company_id).cloned())
    }

    async fn financials(&self, company_id: &str) -> Result<Option<CompanyFinancials>> {
        Ok(self.financials.get(company_id).copied())
    }

    async fn contracts(&self, company_id: &str) -> Result<Vec<Contract>> {
        Ok(self
            .contracts
            .iter()
            .filter(|c| c.company_id == company_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TenderRepository for InMemoryStore {
    async fn open_tenders(&self, limit: usize) -> Result<Vec<Tender>> {
        let mut open: Vec<Tender> = self.tenders.iter().filter(|t| t.is_open()).cloned().collect();
        // unpublished tenders sort last
        open.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        open.truncate(limit);
        Ok(open)
    }
}

/// Competitor feed with fixed totals.
#[derive(Debug, Clone, Default)]
pub struct StaticCompetitorFeed {
    totals: Vec<CompetitorTotal>,
}

impl StaticCompetitorFeed {
    pub fn new(mut totals: Vec<CompetitorTotal>) -> Self {
        totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        Self { totals }
    }
}

#[async_trait]
impl CompetitorFeed for StaticCompetitorFeed {
    async fn competitor_totals(&self, _search: &str) -> Result<Vec<CompetitorTotal>> {
        Ok(self.totals.clone())
    }
}
