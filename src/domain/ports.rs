use crate::domain::model::{Company, CompanyFinancials, CompetitorTotal, Contract, Tender};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Read-only access to company records in the data store.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn company(&self, company_id: &str) -> Result<Option<Company>>;
    async fn financials(&self, company_id: &str) -> Result<Option<CompanyFinancials>>;
    async fn contracts(&self, company_id: &str) -> Result<Vec<Contract>>;
}

#[async_trait]
pub trait TenderRepository: Send + Sync {
    /// Open tenders, most recently published first, at most `limit` of them.
    async fn open_tenders(&self, limit: usize) -> Result<Vec<Tender>>;
}

#[async_trait]
pub trait CompetitorFeed: Send + Sync {
    /// Per-supplier award totals for processes matching `search`, largest first.
    async fn competitor_totals(&self, search: &str) -> Result<Vec<CompetitorTotal>>;
}
