//! Stock risk & return analyzer CLI.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a company against NIFTY 50 over five years
//! stock-risk Infosys
//!
//! # Different span and benchmark, persistent cache
//! stock-risk "Reliance Industries" --period 2y --index ^BSESN --cache-dir ~/.cache/stock-risk
//!
//! # Machine-readable output
//! stock-risk TCS --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use stock_risk::render::{render_dashboard, DEFAULT_WIDTH};
use stock_risk::{AnalyzerError, FirstTokenResolver, Period, StockAnalyzer};

#[derive(Clone, Copy, ValueEnum)]
enum Resolver {
    /// Yahoo Finance symbol search
    Yahoo,
    /// First word of the name, upper-cased (no lookup)
    FirstToken,
}

/// Resolve a company to a ticker and report CAGR, volatility, drawdown and beta.
#[derive(Parser)]
#[command(name = "stock-risk")]
#[command(about = "Stock risk & return analyzer")]
struct Cli {
    /// Company name or ticker
    #[arg(required = true, num_args = 1..)]
    company: Vec<String>,

    /// History span: 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max
    #[arg(long, default_value = "5y")]
    period: Period,

    /// Benchmark index for beta
    #[arg(long, default_value = stock_risk::config::MARKET_INDEX)]
    index: String,

    /// Persist fetched prices in this directory
    #[arg(long, conflicts_with = "no_cache")]
    cache_dir: Option<PathBuf>,

    /// Do not cache fetched prices
    #[arg(long)]
    no_cache: bool,

    /// How to turn the company name into a ticker
    #[arg(long, value_enum, default_value = "yahoo")]
    resolver: Resolver,

    /// Chart width in characters
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Print the analysis as JSON instead of the dashboard
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stock_risk=warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AnalyzerError> {
    let mut builder = StockAnalyzer::builder()
        .period(cli.period)
        .market_index(&cli.index);

    builder = if cli.no_cache {
        builder.no_cache()
    } else if let Some(dir) = &cli.cache_dir {
        builder.file_cache(Some(dir.as_path()))
    } else {
        builder.memory_cache()
    };

    if let Resolver::FirstToken = cli.resolver {
        builder = builder.resolver(FirstTokenResolver);
    }

    let analyzer = builder.build()?;
    let name = cli.company.join(" ");
    let analysis = analyzer.analyze(&name)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", render_dashboard(&analysis, cli.width));
    }
    Ok(())
}
