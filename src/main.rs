use clap::Parser;
use hunter::core::RankingReport;
use hunter::utils::error::ErrorSeverity;
use hunter::utils::{logger, validation::Validate};
use hunter::{
    CliArgs, HunterConfig, HunterError, LocalStorage, RankingEngine, ReportWriter, Snapshot,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if let Err(e) = args.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let mut config = match HunterConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    apply_overrides(&mut config, &args);

    if config.json_logging() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting hunter for company {}", args.company);
    if args.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no data loaded, SECOP not called");
        return Ok(());
    }

    match run(&config, &args.company).await {
        Ok((report, written)) => {
            print_ranking(&report, args.top);
            for name in &written {
                println!("📁 Report saved to: {}/{}", config.output_path(), name);
            }
            tracing::info!("✅ Ranking completed successfully");
        }
        Err(e) => {
            tracing::error!(
                "❌ Ranking failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut HunterConfig, args: &CliArgs) {
    if let Some(snapshot) = &args.snapshot {
        config.data.snapshot_path = snapshot.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if let Some(query) = &args.competitor_query {
        config.ranking.competitor_query = Some(query.clone());
    }
}

async fn run(
    config: &HunterConfig,
    company_id: &str,
) -> Result<(RankingReport, Vec<String>), HunterError> {
    let mut snapshot = Snapshot::load(&LocalStorage::new("."), config.snapshot_path()).await?;
    if config.backfill_reference_units() {
        snapshot.backfill_reference_units(&config.smmlv_table()?);
    }
    let store = snapshot.into_store();

    let engine = RankingEngine::new(store.clone(), store, config.secop_client()?)
        .with_options(config.ranking_options());
    let report = engine.run(company_id).await?;

    let writer = ReportWriter::new(
        LocalStorage::new(config.output_path()),
        config.output.formats.clone(),
    );
    let written = writer.write(&report).await?;

    Ok((report, written))
}

fn display_config_summary(config: &HunterConfig, args: &CliArgs) {
    let options = config.ranking_options();

    println!("📋 Configuration Summary:");
    println!("  Company: {}", args.company);
    println!("  Snapshot: {}", config.snapshot_path());
    println!("  SECOP: {}", config.secop.endpoint);
    println!(
        "  App token: {}",
        if config.app_token().is_some() { "set" } else { "not set" }
    );
    println!("  Max open tenders: {}", options.max_open_tenders);
    println!("  High probability from: {}", options.high_probability_threshold);
    if let Some(query) = &options.competitor_query {
        println!("  Competitor query: {}", query);
    }
    println!("  Output: {} ({})", config.output_path(), config.output.formats.join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn print_ranking(report: &RankingReport, top: usize) {
    let stats = &report.stats;

    println!();
    println!(
        "🏢 {} ({})",
        report.company_name.as_deref().unwrap_or("Unknown company"),
        report.company_id
    );
    println!("  Capacity K: {:.0}", report.capacity);
    println!("  Sector: {}", report.sector);
    println!("  Historical contracts value: {:.0}", stats.company_total_value);
    println!();
    println!(
        "📊 {} tenders evaluated, {} high probability, average score {}",
        stats.total_evaluated, stats.high_probability, stats.avg_score
    );
    println!(
        "🏆 Estimated rank {} of {} (percentile {}, {:?} competitiveness)",
        stats.global_rank,
        stats.total_competitors + 1,
        stats.percentile,
        stats.competitiveness
    );
    println!();

    for (idx, result) in report.results.iter().take(top).enumerate() {
        let tender = &result.tender;
        println!(
            "  {:>3}. [{:>3}] {} - {} ({:.0})",
            idx + 1,
            result.match_score,
            tender.id,
            tender.title.as_deref().unwrap_or("-"),
            tender.amount
        );
    }
}
