use crate::domain::model::Contract;
use chrono::Datelike;
use std::collections::BTreeMap;

/// Monthly legal minimum wage (SMMLV) per year, in pesos.
const DEFAULT_SMMLV: &[(i32, f64)] = &[
    (2015, 644_350.0),
    (2016, 689_455.0),
    (2017, 737_717.0),
    (2018, 781_242.0),
    (2019, 828_116.0),
    (2020, 877_803.0),
    (2021, 908_526.0),
    (2022, 1_000_000.0),
    (2023, 1_160_000.0),
    (2024, 1_300_000.0),
    (2025, 1_423_500.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct SmmlvTable {
    by_year: BTreeMap<i32, f64>,
}

impl Default for SmmlvTable {
    fn default() -> Self {
        Self {
            by_year: DEFAULT_SMMLV.iter().copied().collect(),
        }
    }
}

impl SmmlvTable {
    /// Default table with `overrides` applied on top.
    pub fn with_overrides(overrides: &BTreeMap<i32, f64>) -> Self {
        let mut table = Self::default();
        for (year, value) in overrides {
            table.by_year.insert(*year, *value);
        }
        table
    }

    pub fn smmlv(&self, year: i32) -> Option<f64> {
        self.by_year.get(&year).copied().filter(|v| *v > 0.0)
    }

    pub fn to_reference_units(&self, value: f64, year: i32) -> Option<f64> {
        self.smmlv(year).map(|smmlv| value / smmlv)
    }

    /// Fills `contract_value_in_reference_units` from the execution year for
    /// contracts that lack it. Returns how many contracts were filled.
    pub fn backfill(&self, contracts: &mut [Contract]) -> usize {
        let mut filled = 0;
        for contract in contracts.iter_mut() {
            if contract.contract_value_in_reference_units.is_some() {
                continue;
            }
            let Some(date) = contract.execution_date else {
                continue;
            };
            if let Some(units) = self.to_reference_units(contract.contract_value, date.year()) {
                contract.contract_value_in_reference_units = Some(units);
                filled += 1;
            }
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_converts_with_year_wage() {
        let table = SmmlvTable::default();
        assert_eq!(table.to_reference_units(2_600_000.0, 2024), Some(2.0));
        assert_eq!(table.to_reference_units(1_000_000.0, 1990), None);
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let overrides = BTreeMap::from([(2024, 2_000_000.0), (2026, 1_500_000.0)]);
        let table = SmmlvTable::with_overrides(&overrides);
        assert_eq!(table.smmlv(2024), Some(2_000_000.0));
        assert_eq!(table.smmlv(2026), Some(1_500_000.0));
        assert_eq!(table.smmlv(2023), Some(1_160_000.0));
    }

    #[test]
    fn test_backfill_only_touches_missing_values() {
        let mut contracts = vec![
            Contract {
                contract_value: 1_160_000.0,
                execution_date: NaiveDate::from_ymd_opt(2023, 5, 1),
                ..Default::default()
            },
            Contract {
                contract_value: 1_160_000.0,
                contract_value_in_reference_units: Some(7.0),
                execution_date: NaiveDate::from_ymd_opt(2023, 5, 1),
                ..Default::default()
            },
            Contract {
                contract_value: 1_160_000.0,
                ..Default::default()
            },
        ];

        let filled = SmmlvTable::default().backfill(&mut contracts);

        assert_eq!(filled, 1);
        assert_eq!(contracts[0].contract_value_in_reference_units, Some(1.0));
        assert_eq!(contracts[1].contract_value_in_reference_units, Some(7.0));
        assert_eq!(contracts[2].contract_value_in_reference_units, None);
    }
}
