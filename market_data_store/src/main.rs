use std::error::Error;
use std::path::Path;

use chrono::Utc;
use clap::Parser;

use market_data_store::cli::params::{
    parse_dataset_kind, parse_date, parse_instrument, parse_interval,
};
use market_data_store::cli::{Cli, Commands};
use market_data_store::config::ServiceConfig;
use market_data_store::ingest;
use market_data_store::providers::upstox_rest::UpstoxProvider;
use market_data_store::ratelimit::ApiRateLimiter;
use market_data_store::service::HistoricalDataService;
use market_data_store::session;
use market_data_store::store::read_frame;
use market_data_store::validate::validate_data;
use shared_utils::env::env_var_or;

fn load_config(cli: &Cli) -> Result<ServiceConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_toml_file(path)?,
        None => ServiceConfig::new(env_var_or("MARKET_DATA_ROOT", "data/historical")),
    };
    if let Some(root) = &cli.data_root {
        config.data_root = root.into();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let service = HistoricalDataService::new(config.clone());

    match &cli.command {
        Commands::History {
            instrument,
            interval,
            start,
            end,
        } => {
            let series = service.get_historical_data(
                &parse_instrument(instrument)?,
                parse_date(start)?,
                parse_date(end)?,
                parse_interval(interval)?,
            )?;
            for candle in &series.candles {
                println!(
                    "{} O:{} H:{} L:{} C:{} V:{}",
                    candle.timestamp, candle.open, candle.high, candle.low, candle.close,
                    candle.volume
                );
            }
            eprintln!("{} candles", series.candles.len());
        }

        Commands::Latest {
            instrument,
            interval,
        } => {
            let candle =
                service.latest_candle(&parse_instrument(instrument)?, parse_interval(interval)?)?;
            println!(
                "{} O:{} H:{} L:{} C:{} V:{}",
                candle.timestamp, candle.open, candle.high, candle.low, candle.close,
                candle.volume
            );
        }

        Commands::Chain {
            underlying,
            expiry,
            date,
        } => {
            let snapshot_date = match date {
                Some(d) => parse_date(d)?,
                None => session::ist_date(Utc::now()),
            };
            let rows = service.get_option_chain_snapshot(
                &parse_instrument(underlying)?,
                parse_date(expiry)?,
                snapshot_date,
            )?;
            for quote in &rows {
                println!(
                    "{} {} ltp:{} iv:{} oi:{}",
                    quote.strike, quote.option_type, quote.ltp, quote.iv, quote.oi
                );
            }
            eprintln!("{} contracts", rows.len());
        }

        Commands::Iv { underlying } => {
            let metrics = service.get_iv_metrics(&parse_instrument(underlying)?)?;
            println!(
                "current_iv:{:.2} rank:{:.1} percentile:{:.1} observations:{}",
                metrics.current_iv, metrics.iv_rank, metrics.iv_percentile, metrics.observations
            );
        }

        Commands::Gaps {
            instrument,
            interval,
            start,
            end,
        } => {
            let gaps = service.detect_gaps(
                &parse_instrument(instrument)?,
                parse_date(start)?,
                parse_date(end)?,
                parse_interval(interval)?,
            )?;
            for gap in &gaps {
                println!("{} -> {}", gap.from, gap.to);
            }
            eprintln!("{} gaps", gaps.len());
        }

        Commands::Validate { path, kind } => {
            let df = read_frame(Path::new(path))?;
            let report = validate_data(&df, parse_dataset_kind(kind)?);
            for issue in &report.issues {
                println!("ISSUE: {issue}");
            }
            println!(
                "{}: {} rows, {}",
                path,
                report.row_count,
                if report.is_valid { "OK" } else { "INVALID" }
            );
            if !report.is_valid {
                std::process::exit(1);
            }
        }

        Commands::Fetch {
            instrument,
            interval,
            start,
            end,
            overwrite,
        } => {
            let provider = UpstoxProvider::new()?;
            let limiter = ApiRateLimiter::per_minute(config.requests_per_minute);
            let outcome = ingest::sync_candle_history(
                service.store(),
                &provider,
                &limiter,
                &parse_instrument(instrument)?,
                parse_interval(interval)?,
                parse_date(start)?,
                parse_date(end)?,
                *overwrite,
            )
            .await;
            println!("{:?}: {}", outcome.status, outcome.message);
        }

        Commands::Snapshot { underlying, expiry } => {
            let provider = UpstoxProvider::new()?;
            let limiter = ApiRateLimiter::per_minute(config.requests_per_minute);
            let outcome = ingest::snapshot_option_chain(
                service.store(),
                &provider,
                &limiter,
                &parse_instrument(underlying)?,
                parse_date(expiry)?,
            )
            .await?;
            println!("{:?}: {}", outcome.status, outcome.message);
        }
    }

    Ok(())
}
