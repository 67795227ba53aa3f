use crate::adapters::memory::InMemoryStore;
use crate::core::reference_units::SmmlvTable;
use crate::core::{Company, Contract, Result, Storage, Tender};
use crate::domain::model::CompanyFinancialsRecord;
use serde::{Deserialize, Serialize};

/// Export of the data store as a single JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub financials: Vec<CompanyFinancialsRecord>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub tenders: Vec<Tender>,
}

impl Snapshot {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        tracing::debug!("Reading snapshot from {}", path);
        let bytes = storage.read_file(path).await?;
        let snapshot = Self::from_slice(&bytes)?;
        tracing::info!(
            "📂 Snapshot loaded: {} companies, {} contracts, {} tenders",
            snapshot.companies.len(),
            snapshot.contracts.len(),
            snapshot.tenders.len()
        );
        Ok(snapshot)
    }

    pub fn backfill_reference_units(&mut self, table: &SmmlvTable) -> usize {
        let filled = table.backfill(&mut self.contracts);
        if filled > 0 {
            tracing::debug!("Backfilled SMMLV values for {} contracts", filled);
        }
        filled
    }

    pub fn into_store(self) -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for company in self.companies {
            store = store.with_company(company);
        }
        for record in self.financials {
            match record.financials() {
                Some(financials) => store = store.with_financials(&record.company_id, financials),
                None => tracing::warn!(
                    "⚠️ Incomplete financials for company {}, capacity will be 0",
                    record.company_id
                ),
            }
        }
        for contract in self.contracts {
            store = store.with_contract(contract);
        }
        for tender in self.tenders {
            store = store.with_tender(tender);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompanyRepository, TenderRepository};
    use crate::domain::model::TenderStatus;

    const SNAPSHOT: &str = r#"{
        "companies": [{"id": "c1", "name": "Constructora Andina SAS"}],
        "financials": [{
            "company_id": "c1",
            "liquidity_index": 2.0,
            "indebtedness_index": 0.4,
            "working_capital": 300000000,
            "equity": 200000000
        }],
        "contracts": [{
            "id": "k1",
            "company_id": "c1",
            "contract_value": 2600000,
            "classification_codes": ["72121500"],
            "execution_date": "2024-03-15"
        }],
        "tenders": [
            {"id": "t1", "amount": 450000000, "status": "open",
             "required_classification_codes": ["72121503"], "closing_date": "2026-11-30"},
            {"id": "t2", "amount": 100, "status": "adjudicado"}
        ]
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let snapshot = Snapshot::from_slice(SNAPSHOT.as_bytes()).unwrap();
        assert_eq!(snapshot.companies.len(), 1);
        assert_eq!(snapshot.financials[0].liquidity_index, Some(2.0));
        assert_eq!(snapshot.contracts[0].contract_value_in_reference_units, None);
        assert_eq!(snapshot.tenders[1].status, TenderStatus::Other);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let snapshot = Snapshot::from_slice(b"{}").unwrap();
        assert!(snapshot.companies.is_empty());
        assert!(snapshot.tenders.is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Snapshot::from_slice(b"{not json").is_err());
    }

    #[test]
    fn test_backfill_reference_units() {
        let mut snapshot = Snapshot::from_slice(SNAPSHOT.as_bytes()).unwrap();
        let filled = snapshot.backfill_reference_units(&SmmlvTable::default());
        assert_eq!(filled, 1);
        assert_eq!(snapshot.contracts[0].contract_value_in_reference_units, Some(2.0));
    }

    #[tokio::test]
    async fn test_into_store() {
        let store = Snapshot::from_slice(SNAPSHOT.as_bytes()).unwrap().into_store();

        assert!(store.company("c1").await.unwrap().is_some());
        assert_eq!(store.financials("c1").await.unwrap().unwrap().equity, 200_000_000.0);
        assert_eq!(store.contracts("c1").await.unwrap().len(), 1);
        let open = store.open_tenders(100).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, "t1");
    }

    #[test]
    fn test_null_amounts_default_to_zero() {
        let snapshot = Snapshot::from_slice(
            br#"{
                "contracts": [{"company_id": "c1", "contract_value": null,
                               "classification_codes": null}],
                "tenders": [
                    {"id": "t1", "amount": null, "required_classification_codes": null},
                    {"id": "t2"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.contracts[0].contract_value, 0.0);
        assert!(snapshot.contracts[0].classification_codes.is_empty());
        assert_eq!(snapshot.tenders[0].amount, 0.0);
        assert!(snapshot.tenders[0].required_classification_codes.is_empty());
        assert_eq!(snapshot.tenders[1].amount, 0.0);
    }

    #[tokio::test]
    async fn test_null_indicator_leaves_financials_absent() {
        let store = Snapshot::from_slice(
            br#"{
                "financials": [
                    {"company_id": "c1", "liquidity_index": null, "indebtedness_index": 0.4,
                     "working_capital": 1000, "equity": 1000},
                    {"company_id": "c2", "liquidity_index": 1.5, "indebtedness_index": 0.1,
                     "working_capital": 1000}
                ]
            }"#,
        )
        .unwrap()
        .into_store();

        assert_eq!(store.financials("c1").await.unwrap(), None);
        assert_eq!(store.financials("c2").await.unwrap(), None);
    }
}
