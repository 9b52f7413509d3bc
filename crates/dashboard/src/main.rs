//! dashboard: fundamental analysis of listed companies in the terminal.
//!
//! Usage:
//!   cargo run -p dashboard -- analyze --tickers AAPL,MSFT,GOOGL
//!   cargo run -p dashboard -- analyze --tickers KO,PEP --view debt
//!   cargo run -p dashboard -- analyze --tickers NVDA --json
//!   cargo run -p dashboard -- interactive

mod config;
mod views;

use analysis_orchestrator::{AnalysisSession, BatchSummary, SessionConfig};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use config::DashboardConfig;
use fundamental_analysis::FundamentalAnalysisEngine;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use views::View;
use yahoo_client::YahooFinanceClient;

/// Valuation, solvency, liquidity and growth indicators for a list of tickers.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a comma-separated list of tickers and print the results.
    Analyze(AnalyzeArgs),
    /// Read ticker lists from stdin, accumulating results across lines.
    Interactive(SessionArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Tickers to analyze (e.g., "AAPL,MSFT,GOOGL").
    #[arg(long)]
    tickers: String,

    /// Print the session as JSON instead of tables.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Args)]
struct SessionArgs {
    /// View to render.
    #[arg(long, value_enum, default_value = "all")]
    view: View,

    /// Maximum tickers per batch (5-50).
    #[arg(long)]
    max_tickers: Option<usize>,

    /// Seconds to wait between provider requests (1-5).
    #[arg(long)]
    delay: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard=info,analysis_orchestrator=info,yahoo_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let env_config = DashboardConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Analyze(args) => {
            let config = env_config.with_overrides(args.session.max_tickers, args.session.delay);
            let mut session = build_session(&config)?;
            run_batch(&mut session, &args.tickers).await;

            if args.json {
                let records: Vec<_> = session.records().collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", views::render(args.session.view, session.records()));
            }
        }
        Commands::Interactive(args) => {
            let config = env_config.with_overrides(args.max_tickers, args.delay);
            let mut session = build_session(&config)?;
            interactive(&mut session, args.view).await?;
        }
    }

    Ok(())
}

fn build_session(config: &DashboardConfig) -> anyhow::Result<AnalysisSession> {
    tracing::info!(
        "Session: max {} tickers, {:.1}s between requests, cache TTL {}s",
        config.max_tickers,
        config.request_delay_secs,
        config.cache_ttl_secs
    );

    let client = YahooFinanceClient::new(config.request_timeout()).context("Failed to build Yahoo Finance client")?;
    let engine = FundamentalAnalysisEngine::with_params(config.cost_of_capital());
    let session_config = SessionConfig {
        max_tickers: config.max_tickers,
        request_delay: config.request_delay(),
        cache_ttl: config.cache_ttl(),
    };

    Ok(AnalysisSession::new(Arc::new(client), engine, session_config))
}

async fn run_batch(session: &mut AnalysisSession, input: &str) -> BatchSummary {
    let progress_bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}") {
        progress_bar.set_style(style.progress_chars("#>-"));
    }

    let summary = session
        .analyze_input(input, |p| {
            progress_bar.set_length(p.total as u64);
            progress_bar.set_position((p.index - 1) as u64);
            progress_bar.set_message(format!("Fetching {}...", p.ticker));
        })
        .await;

    progress_bar.finish_and_clear();
    tracing::info!(
        "Batch done: {} requested, {} already analyzed, {} analyzed, {} failed",
        summary.requested,
        summary.skipped,
        summary.analyzed,
        summary.failed
    );
    summary
}

async fn interactive(session: &mut AnalysisSession, mut view: View) -> anyhow::Result<()> {
    println!("Enter comma-separated tickers. Commands: :view NAME, :clear, :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest)) {
            (":quit" | ":q" | ":exit", _) => break,
            (":clear", _) => {
                session.clear();
                println!("Session and cache cleared.");
            }
            (":view", name) => match View::parse(name) {
                Some(v) => {
                    view = v;
                    print!("{}", views::render(view, session.records()));
                }
                None => println!("Unknown view {:?}. Try summary, debt, value, growth, liquidity or all.", name),
            },
            (cmd, _) if cmd.starts_with(':') => println!("Unknown command {}", cmd),
            _ => {
                let summary = run_batch(session, line).await;
                if summary.requested == 0 {
                    println!("No valid tickers in {:?}", line);
                    continue;
                }
                print!("{}", views::render(view, session.records()));
            }
        }
    }

    Ok(())
}
