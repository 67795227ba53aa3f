use crate::domain::model::CompanyFinancials;

/// Contracting capacity (K) derived from the company's financial indicators.
///
/// `K = (working_capital + equity) * liquidity_index * (1 - indebtedness_index)`,
/// floored at zero. Missing indicators yield zero.
pub fn capacity(financials: Option<&CompanyFinancials>) -> f64 {
    let Some(f) = financials else {
        return 0.0;
    };

    let total_assets = f.working_capital + f.equity;
    let k = total_assets * f.liquidity_index * (1.0 - f.indebtedness_index);

    if k.is_finite() {
        k.max(0.0)
    } else {
        0.0
    }
}
