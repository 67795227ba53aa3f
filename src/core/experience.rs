use crate::domain::model::{Contract, ExperienceBucket, ExperienceRow};
use std::collections::HashMap;

/// Contract totals keyed by classification code.
///
/// Iteration order is unspecified; use [`ExperienceByCode::sorted_by_value`]
/// when order matters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceByCode {
    buckets: HashMap<String, ExperienceBucket>,
}

impl ExperienceByCode {
    pub fn get(&self, code: &str) -> Option<&ExperienceBucket> {
        self.buckets.get(code)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExperienceBucket)> {
        self.buckets.iter().map(|(code, bucket)| (code.as_str(), bucket))
    }

    /// Mean value of a contract across every bucket. A contract carrying
    /// several codes counts once per code here too.
    pub fn average_contract_value(&self) -> Option<f64> {
        let (total, count) = self
            .buckets
            .values()
            .fold((0.0, 0u64), |(total, count), b| {
                (total + b.total_value, count + u64::from(b.count))
            });

        if count == 0 {
            return None;
        }
        Some(total / count as f64)
    }

    /// Buckets ordered by total value, largest first; ties by code.
    pub fn sorted_by_value(&self) -> Vec<ExperienceRow> {
        let mut rows: Vec<ExperienceRow> = self
            .buckets
            .iter()
            .map(|(code, bucket)| ExperienceRow {
                code: code.clone(),
                bucket: *bucket,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.bucket
                .total_value
                .total_cmp(&a.bucket.total_value)
                .then_with(|| a.code.cmp(&b.code))
        });
        rows
    }
}

/// Groups contracts by classification code.
///
/// A contract is added in full to every code it carries, so the sum across
/// buckets can exceed the sum of the contracts.
pub fn aggregate_by_code(contracts: &[Contract]) -> ExperienceByCode {
    let mut buckets: HashMap<String, ExperienceBucket> = HashMap::new();

    for contract in contracts {
        let reference_value = contract.contract_value_in_reference_units.unwrap_or(0.0);
        for code in &contract.classification_codes {
            let bucket = buckets.entry(code.clone()).or_default();
            bucket.count += 1;
            bucket.total_value += contract.contract_value;
            bucket.total_value_in_reference_units += reference_value;
        }
    }

    ExperienceByCode { buckets }
}

/// Sum of the company's contract values, each contract counted once.
pub fn total_contract_value(contracts: &[Contract]) -> f64 {
    contracts.iter().map(|c| c.contract_value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(value: f64, reference: Option<f64>, codes: &[&str]) -> Contract {
        Contract {
            company_id: "c1".to_string(),
            contract_value: value,
            contract_value_in_reference_units: reference,
            classification_codes: codes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_aggregates_per_code() {
        let contracts = vec![
            contract(100.0, Some(1.0), &["72121500"]),
            contract(300.0, None, &["72121500"]),
            contract(50.0, Some(0.5), &["43211500"]),
        ];

        let experience = aggregate_by_code(&contracts);

        assert_eq!(experience.len(), 2);
        let construction = experience.get("72121500").unwrap();
        assert_eq!(construction.count, 2);
        assert_eq!(construction.total_value, 400.0);
        assert_eq!(construction.total_value_in_reference_units, 1.0);
        let tech = experience.get("43211500").unwrap();
        assert_eq!(tech.count, 1);
        assert_eq!(tech.total_value, 50.0);
    }

    #[test]
    fn test_multi_code_contract_is_counted_under_each_code() {
        let contracts = vec![contract(1_000.0, Some(2.0), &["7212", "8010", "4321"])];

        let experience = aggregate_by_code(&contracts);

        let summed: f64 = experience.iter().map(|(_, b)| b.total_value).sum();
        assert_eq!(summed, 3_000.0);
        for code in ["7212", "8010", "4321"] {
            let bucket = experience.get(code).unwrap();
            assert_eq!(bucket.count, 1);
            assert_eq!(bucket.total_value, 1_000.0);
            assert_eq!(bucket.total_value_in_reference_units, 2.0);
        }
    }

    #[test]
    fn test_contracts_without_codes_contribute_nothing() {
        let experience = aggregate_by_code(&[contract(500.0, None, &[])]);
        assert!(experience.is_empty());
        assert_eq!(experience.average_contract_value(), None);
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let mut contracts = vec![
            contract(10.0, Some(1.0), &["7212"]),
            contract(20.0, None, &["7212", "8511"]),
            contract(30.0, Some(3.0), &["8511"]),
            contract(40.0, None, &["5012"]),
        ];
        let forward = aggregate_by_code(&contracts);
        contracts.reverse();
        let reversed = aggregate_by_code(&contracts);
        contracts.swap(0, 2);
        let shuffled = aggregate_by_code(&contracts);

        assert_eq!(forward, reversed);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_average_contract_value() {
        let contracts = vec![
            contract(100.0, None, &["7212"]),
            contract(300.0, None, &["8010"]),
        ];
        let experience = aggregate_by_code(&contracts);
        assert_eq!(experience.average_contract_value(), Some(200.0));
    }

    #[test]
    fn test_sorted_by_value() {
        let contracts = vec![
            contract(100.0, None, &["8010"]),
            contract(900.0, None, &["7212"]),
            contract(100.0, None, &["4321"]),
        ];
        let rows = aggregate_by_code(&contracts).sorted_by_value();
        let codes: Vec<&str> = rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["7212", "4321", "8010"]);
    }

    #[test]
    fn test_total_contract_value_counts_each_contract_once() {
        let contracts = vec![
            contract(100.0, None, &["7212", "8010"]),
            contract(50.0, None, &[]),
        ];
        assert_eq!(total_contract_value(&contracts), 150.0);
    }
}
