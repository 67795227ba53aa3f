//! SECOP II open-data feed (Socrata API on datos.gov.co).
//!
//! Process records come back as JSON objects whose money fields are decimal
//! strings. Unparseable or missing amounts count as zero.

use crate::core::{CompetitorFeed, CompetitorTotal, Result};
use crate::utils::nullable::decimal_or_zero;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_SECOP_ENDPOINT: &str = "https://www.datos.gov.co/resource/p6dx-8zbt.json";
pub const DEFAULT_SEARCH_LIMIT: usize = 1000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const APP_TOKEN_HEADER: &str = "X-App-Token";

/// One procurement process row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SecopProcess {
    #[serde(default, rename = "id_del_proceso")]
    pub process_id: Option<String>,
    #[serde(default, rename = "entidad")]
    pub entity: Option<String>,
    #[serde(default, rename = "nombre_del_procedimiento")]
    pub procedure_name: Option<String>,
    #[serde(default, rename = "nombre_del_proveedor")]
    pub supplier_name: Option<String>,
    #[serde(
        default,
        rename = "valor_total_adjudicacion",
        deserialize_with = "decimal_or_zero"
    )]
    pub award_value: f64,
    #[serde(default, rename = "precio_base", deserialize_with = "decimal_or_zero")]
    pub base_price: f64,
}

impl SecopProcess {
    /// Award value, or the base price when nothing was awarded yet.
    pub fn effective_value(&self) -> f64 {
        if self.award_value > 0.0 {
            self.award_value
        } else {
            self.base_price
        }
    }
}

/// Sums process values per supplier, largest first. Supplier names are
/// matched case-insensitively; the first spelling seen is kept.
pub fn competitor_totals(processes: &[SecopProcess]) -> Vec<CompetitorTotal> {
    let mut by_supplier: HashMap<String, CompetitorTotal> = HashMap::new();

    for process in processes {
        let Some(name) = process.supplier_name.as_deref().map(str::trim) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        let entry = by_supplier
            .entry(name.to_uppercase())
            .or_insert_with(|| CompetitorTotal {
                supplier: name.to_string(),
                amount: 0.0,
            });
        entry.amount += process.effective_value();
    }

    let mut totals: Vec<CompetitorTotal> = by_supplier
        .into_values()
        .filter(|c| c.amount > 0.0)
        .collect();
    totals.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.supplier.cmp(&b.supplier))
    });
    totals
}

#[derive(Debug, Clone)]
pub struct SecopClient {
    endpoint: String,
    app_token: Option<String>,
    search_limit: usize,
    client: Client,
}

impl SecopClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            app_token: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
            client,
        })
    }

    pub fn app_token(mut self, token: Option<String>) -> Self {
        self.app_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Full-text search over processes.
    pub async fn search(&self, text: &str) -> Result<Vec<SecopProcess>> {
        let limit = self.search_limit.to_string();
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("$q", text), ("$limit", limit.as_str())]);
        if let Some(token) = &self.app_token {
            request = request.header(APP_TOKEN_HEADER, token);
        }

        tracing::debug!("Making SECOP request to: {} (q = {})", self.endpoint, text);
        let response = request.send().await?;
        tracing::debug!("SECOP response status: {}", response.status());

        let processes: Vec<SecopProcess> = response.error_for_status()?.json().await?;
        tracing::debug!("SECOP returned {} processes", processes.len());
        Ok(processes)
    }
}

#[async_trait]
impl CompetitorFeed for SecopClient {
    async fn competitor_totals(&self, search: &str) -> Result<Vec<CompetitorTotal>> {
        match self.search(search).await {
            Ok(processes) => {
                let totals = competitor_totals(&processes);
                tracing::info!(
                    "📡 SECOP: {} processes, {} competitors for '{}'",
                    processes.len(),
                    totals.len(),
                    search
                );
                Ok(totals)
            }
            Err(e) => {
                tracing::warn!("SECOP fetch failed, continuing without competitor data: {}", e);
                Ok(Vec::new())
            }
        }
    }
}
