//! Cartsplit CLI
//!
//! Loads a cart scenario, works out whether to buy it in one order or split it into two and
//! prints the report.
//!
//! Use `--coupon-first` to apply coupons before the threshold promotion
//! Use `--summary-only` to print just the recommendation

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Result;
use cartsplit::{fixtures::load_scenario_file, strategy::calculate_best_strategy};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Cartsplit: should this cart be bought in one order or two?
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Scenario YAML file
    scenario: PathBuf,

    /// Apply the coupon before the threshold promotion
    #[arg(long)]
    coupon_first: bool,

    /// Print only the recommendation
    #[arg(long)]
    summary_only: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_subscriber(&args)?;

    let mut scenario = load_scenario_file(&args.scenario)?;

    if args.coupon_first {
        scenario.input.config.promo_before_coupon = Some(false);
    }

    info!(scenario = %args.scenario.display(), "loaded scenario");

    let calculation = calculate_best_strategy(&scenario.input);

    let unmet = scenario
        .expected
        .filter(|expected| !args.coupon_first && !expected.is_met_by(&calculation.result));

    if let Some(expected) = unmet {
        warn!(
            expected_final_pay = expected.final_pay,
            final_pay = calculation.result.final_pay,
            "result differs from the scenario's expected outcome"
        );
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.summary_only {
        writeln!(handle, "{}", calculation.summary())?;
    } else {
        calculation.report().write_to(&mut handle)?;
        writeln!(handle)?;
    }

    Ok(())
}

fn init_subscriber(args: &Args) -> Result<()> {
    match args.log_format {
        LogFormat::Compact => init_with_layer(
            args,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(true),
        ),
        LogFormat::Json => init_with_layer(
            args,
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        ),
    }
}

fn build_env_filter(args: &Args) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level))
}

fn init_with_layer<L>(args: &Args, fmt_layer: L) -> Result<()>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(args))
        .try_init()?;

    Ok(())
}
