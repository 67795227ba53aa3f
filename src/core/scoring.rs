use crate::core::capacity::capacity;
use crate::core::experience::ExperienceByCode;
use crate::domain::model::{CompanyFinancials, ScoreBreakdown, Tender};

pub const CAPACITY_FIT_MAX: u8 = 40;
pub const CLASSIFICATION_FIT_MAX: u8 = 40;
pub const SIZE_FIT_MAX: u8 = 20;
/// Awarded when the tender lists no classification codes to compare against.
pub const UNSPECIFIED_CODES_POINTS: u8 = 20;
pub const MAX_SCORE: u8 = 100;

const SUBFAMILY_PREFIX_LEN: usize = 4;

/// Points for how the tender amount compares with the company's capacity K.
/// `None` when either side is not positive.
pub fn capacity_fit(amount: f64, capacity: f64) -> Option<u8> {
    if !(capacity > 0.0 && amount > 0.0 && amount.is_finite()) {
        return None;
    }

    let ratio = amount / capacity;
    let points = if ratio <= 1.0 {
        CAPACITY_FIT_MAX
    } else if ratio <= 1.5 {
        25
    } else if ratio <= 2.0 {
        10
    } else {
        0
    };
    Some(points)
}

fn subfamily_prefix(code: &str) -> &str {
    match code.char_indices().nth(SUBFAMILY_PREFIX_LEN) {
        Some((idx, _)) => &code[..idx],
        None => code,
    }
}

/// Share of the tender's required codes whose 4-character prefix appears
/// at the start of some experience code, scaled to 40 points.
pub fn classification_fit<S: AsRef<str>>(required: &[S], experience: &ExperienceByCode) -> u8 {
    if required.is_empty() {
        return UNSPECIFIED_CODES_POINTS;
    }

    let matched = required
        .iter()
        .map(|code| subfamily_prefix(code.as_ref()))
        .filter(|prefix| experience.codes().any(|c| c.starts_with(prefix)))
        .count();

    let match_ratio = matched as f64 / required.len() as f64;
    (match_ratio * f64::from(CLASSIFICATION_FIT_MAX)).round() as u8
}

/// Points for how the tender amount compares with the company's average
/// historical contract. `None` without a positive average.
pub fn size_fit(amount: f64, experience: &ExperienceByCode) -> Option<u8> {
    let avg = experience.average_contract_value()?;
    if !(avg > 0.0 && amount.is_finite()) {
        return None;
    }

    let size_ratio = amount / avg;
    let points = if (0.5..=2.0).contains(&size_ratio) {
        SIZE_FIT_MAX
    } else if (0.3..=3.0).contains(&size_ratio) {
        10
    } else {
        0
    };
    Some(points)
}

pub fn breakdown(
    financials: Option<&CompanyFinancials>,
    tender: &Tender,
    experience: &ExperienceByCode,
) -> ScoreBreakdown {
    let capacity_fit = capacity_fit(tender.amount, capacity(financials));
    let classification_fit =
        classification_fit(tender.required_classification_codes.as_slice(), experience);
    let size_fit = size_fit(tender.amount, experience);

    let sum = f64::from(capacity_fit.unwrap_or(0))
        + f64::from(classification_fit)
        + f64::from(size_fit.unwrap_or(0));
    let total = sum.round().min(f64::from(MAX_SCORE)) as u8;

    ScoreBreakdown {
        capacity_fit,
        classification_fit,
        size_fit,
        total,
    }
}

/// Match score in `0..=100` for one tender.
pub fn score(
    financials: Option<&CompanyFinancials>,
    tender: &Tender,
    experience: &ExperienceByCode,
) -> u8 {
    breakdown(financials, tender, experience).total
}
