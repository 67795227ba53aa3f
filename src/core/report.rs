use crate::core::Storage;
use crate::domain::model::RankingReport;
use crate::utils::error::{HunterError, Result};

pub const JSON_REPORT: &str = "ranking.json";
pub const CSV_REPORT: &str = "ranking.csv";
pub const SUPPORTED_FORMATS: &[&str] = &["json", "csv"];

const CSV_HEADER: &[&str] = &[
    "position",
    "tender_id",
    "title",
    "entity",
    "amount",
    "match_score",
    "capacity_fit",
    "classification_fit",
    "size_fit",
    "sector",
    "closing_date",
];

pub struct ReportWriter<S: Storage> {
    storage: S,
    formats: Vec<String>,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S, formats: Vec<String>) -> Self {
        Self { storage, formats }
    }

    /// Writes one file per configured format and returns their names.
    pub async fn write(&self, report: &RankingReport) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in &self.formats {
            let (name, data) = match format.as_str() {
                "json" => (JSON_REPORT, serde_json::to_vec_pretty(report)?),
                "csv" => (CSV_REPORT, render_csv(report)?),
                other => {
                    return Err(HunterError::InvalidConfigValueError {
                        field: "output.formats".to_string(),
                        value: other.to_string(),
                        reason: format!(
                            "Unsupported format. Valid formats: {}",
                            SUPPORTED_FORMATS.join(", ")
                        ),
                    })
                }
            };

            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.storage.write_file(name, &data).await?;
            written.push(name.to_string());
        }

        Ok(written)
    }
}

fn optional_points(points: Option<u8>) -> String {
    points.map(|p| p.to_string()).unwrap_or_default()
}

pub fn render_csv(report: &RankingReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for (idx, result) in report.results.iter().enumerate() {
        let tender = &result.tender;
        writer.write_record([
            (idx + 1).to_string(),
            tender.id.clone(),
            tender.title.clone().unwrap_or_default(),
            tender.entity.clone().unwrap_or_default(),
            format!("{:.0}", tender.amount),
            result.match_score.to_string(),
            optional_points(result.breakdown.capacity_fit),
            result.breakdown.classification_fit.to_string(),
            optional_points(result.breakdown.size_fit),
            result.sector.clone(),
            tender
                .closing_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| HunterError::IoError(e.into_error()))
}
