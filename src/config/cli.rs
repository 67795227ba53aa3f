use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "hunter")]
#[command(about = "Ranks open public tenders against a company's contracting profile")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "hunter.toml")]
    pub config: String,

    /// Company to rank tenders for
    #[arg(long)]
    pub company: String,

    /// Override the snapshot path from config
    #[arg(long)]
    pub snapshot: Option<String>,

    /// Override the output directory from config
    #[arg(long)]
    pub output: Option<String>,

    /// Override the competitor search term from config
    #[arg(long)]
    pub competitor_query: Option<String>,

    /// Rows of the ranking to print
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the configuration summary without loading data or calling SECOP
    #[arg(long)]
    pub dry_run: bool,
}

impl Validate for CliArgs {
    fn validate(&self) -> Result<()> {
        validate_path("config", &self.config)?;
        validate_non_empty_string("company", &self.company)?;
        if let Some(snapshot) = &self.snapshot {
            validate_path("snapshot", snapshot)?;
        }
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        Ok(())
    }
}
