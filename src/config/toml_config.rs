use crate::adapters::secop::{
    SecopClient, DEFAULT_SEARCH_LIMIT, DEFAULT_SECOP_ENDPOINT, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ranking::{
    RankingOptions, DEFAULT_HIGH_PROBABILITY_THRESHOLD, DEFAULT_MAX_OPEN_TENDERS,
};
use crate::core::reference_units::SmmlvTable;
use crate::core::report::SUPPORTED_FORMATS;
use crate::utils::error::{HunterError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HunterConfig {
    #[serde(default)]
    pub secop: SecopConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub reference_units: Option<ReferenceUnitsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecopConfig {
    pub endpoint: String,
    pub app_token: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub search_limit: Option<usize>,
}

impl Default for SecopConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SECOP_ENDPOINT.to_string(),
            app_token: None,
            timeout_seconds: None,
            search_limit: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingConfig {
    pub max_open_tenders: Option<usize>,
    pub high_probability_threshold: Option<u8>,
    pub competitor_query: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    pub snapshot_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
            formats: vec!["json".to_string(), "csv".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceUnitsConfig {
    pub backfill: Option<bool>,
    /// SMMLV overrides keyed by year, e.g. `2026 = 1600000`.
    pub smmlv: Option<BTreeMap<String, f64>>,
}

impl HunterConfig {
    /// Loads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HunterError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HunterError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HunterError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("secop.endpoint", &self.secop.endpoint)?;
        if self.data.snapshot_path.trim().is_empty() {
            return Err(HunterError::MissingConfigError {
                field: "data.snapshot_path".to_string(),
            });
        }
        validation::validate_path("data.snapshot_path", &self.data.snapshot_path)?;
        validation::validate_path("output.path", &self.output.path)?;

        if let Some(limit) = self.secop.search_limit {
            validation::validate_positive_number("secop.search_limit", limit, 1)?;
        }
        if let Some(timeout) = self.secop.timeout_seconds {
            validation::validate_range("secop.timeout_seconds", timeout, 1, 600)?;
        }
        if let Some(max) = self.ranking.max_open_tenders {
            validation::validate_positive_number("ranking.max_open_tenders", max, 1)?;
        }
        if let Some(threshold) = self.ranking.high_probability_threshold {
            validation::validate_range("ranking.high_probability_threshold", threshold, 0, 100)?;
        }
        if let Some(query) = &self.ranking.competitor_query {
            validation::validate_non_empty_string("ranking.competitor_query", query)?;
        }

        for format in &self.output.formats {
            validation::validate_one_of("output.formats", format, SUPPORTED_FORMATS)?;
        }
        if let Some(format) = &self.logging.format {
            validation::validate_one_of("logging.format", format, &["compact", "json"])?;
        }

        self.smmlv_overrides()?;
        Ok(())
    }

    pub fn ranking_options(&self) -> RankingOptions {
        RankingOptions {
            max_open_tenders: self
                .ranking
                .max_open_tenders
                .unwrap_or(DEFAULT_MAX_OPEN_TENDERS),
            high_probability_threshold: self
                .ranking
                .high_probability_threshold
                .unwrap_or(DEFAULT_HIGH_PROBABILITY_THRESHOLD),
            competitor_query: self.ranking.competitor_query.clone(),
        }
    }

    pub fn secop_client(&self) -> Result<SecopClient> {
        let timeout = Duration::from_secs(
            self.secop
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        );
        Ok(SecopClient::with_timeout(&self.secop.endpoint, timeout)?
            .app_token(self.app_token())
            .search_limit(self.secop.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT)))
    }

    /// App token, ignoring an unresolved `${VAR}` placeholder.
    pub fn app_token(&self) -> Option<String> {
        self.secop
            .app_token
            .clone()
            .filter(|t| !(t.starts_with("${") && t.ends_with('}')))
    }

    pub fn backfill_reference_units(&self) -> bool {
        self.reference_units
            .as_ref()
            .and_then(|r| r.backfill)
            .unwrap_or(false)
    }

    fn smmlv_overrides(&self) -> Result<BTreeMap<i32, f64>> {
        let mut overrides = BTreeMap::new();
        let Some(table) = self.reference_units.as_ref().and_then(|r| r.smmlv.as_ref()) else {
            return Ok(overrides);
        };

        for (year, value) in table {
            let parsed: i32 = year.parse().map_err(|_| HunterError::InvalidConfigValueError {
                field: "reference_units.smmlv".to_string(),
                value: year.clone(),
                reason: "Keys must be years".to_string(),
            })?;
            if !(*value > 0.0) {
                return Err(HunterError::InvalidConfigValueError {
                    field: format!("reference_units.smmlv.{}", year),
                    value: value.to_string(),
                    reason: "SMMLV must be positive".to_string(),
                });
            }
            overrides.insert(parsed, *value);
        }
        Ok(overrides)
    }

    pub fn smmlv_table(&self) -> Result<SmmlvTable> {
        Ok(SmmlvTable::with_overrides(&self.smmlv_overrides()?))
    }

    pub fn json_logging(&self) -> bool {
        self.logging.format.as_deref() == Some("json")
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }

    pub fn snapshot_path(&self) -> &str {
        &self.data.snapshot_path
    }
}

impl Validate for HunterConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
