use anyhow::Context;
use clap::Parser;
use landed_cost::adapters::{dataset_source_for, FixedRate, FrankfurterRates};
use landed_cost::app::report;
use landed_cost::domain::ports::ExchangeRateSource;
use landed_cost::utils::error::ErrorSeverity;
use landed_cost::utils::{logger, validation::Validate};
use landed_cost::{CliConfig, Command, QuoteEngine, QuoteError, TariffConfig};
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting landed-cost CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&cli).await {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", output.trim_end()).context("failed to write output")?;
        }
        Err(e) => {
            tracing::error!(
                "❌ landed-cost failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

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

async fn run(cli: &CliConfig) -> Result<String, QuoteError> {
    let config = TariffConfig::from_file_or_default(&cli.config)?;
    config.validate()?;
    tracing::info!("✅ Tariff configuration loaded and validated");

    let dataset_location = cli
        .dataset
        .clone()
        .unwrap_or_else(|| config.dataset.source.clone());
    let dataset_source = dataset_source_for(&dataset_location, config.dataset_timeout());

    let rate_source: Box<dyn ExchangeRateSource> = match (cli.rate, cli.offline) {
        (Some(rate), _) => {
            tracing::info!("🔧 EUR/USD rate overridden to {}", rate);
            Box::new(FixedRate(rate))
        }
        (None, true) => {
            tracing::info!("📴 Offline mode, using fallback EUR/USD rate");
            Box::new(FixedRate(config.exchange_rate.fallback))
        }
        (None, false) => Box::new(FrankfurterRates::new(
            &config.exchange_rate.endpoint,
            config.rate_timeout(),
        )),
    };

    let engine = QuoteEngine::bootstrap(
        dataset_source.as_ref(),
        rate_source.as_ref(),
        config.tariff(),
        config.exchange_rate.fallback,
    )
    .await?;

    let output = match &cli.command {
        Command::Quote(args) => {
            let quote = engine.quote(&args.inputs());
            if quote.grand_total.is_unknown() {
                tracing::warn!("⚠️ Grand total is unknown; check the location, price and vehicle inputs");
            }
            report::render(&quote, args.format)?
        }
        Command::Auctions => engine.auctions().join("\n"),
        Command::States { auction } => engine.states(auction).join("\n"),
        Command::Locations { auction, state } => {
            engine.locations(auction, state.as_deref()).join("\n")
        }
    };

    Ok(output)
}
