use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vaxscan_client::ClicSanteClient;
use vaxscan_core::{AppConfig, DateWindow, FailurePolicy, PostalCode};

mod report;
mod scan;

use scan::ScanRequest;

#[derive(Debug, Parser)]
#[command(name = "vaxscan", version)]
#[command(about = "Scan for COVID-19 vaccination appointments in Québec")]
struct Cli {
    /// Your postal code, e.g. "H2X 1Y6".
    #[arg(short = 'p', long)]
    postal_code: String,

    /// Look for appointments in the next DAYS days.
    #[arg(short = 'd', long, value_name = "DAYS")]
    in_the_next: u32,

    /// Maximum distance to the vaccination centre, in km.
    #[arg(short = 'm', long, value_name = "KM")]
    max_distance: u32,

    /// Stop the whole scan as soon as one centre cannot be queried.
    #[arg(long)]
    fail_fast: bool,

    /// Skip centres whose first-dose quota counters are all zero.
    #[arg(long)]
    require_quota: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = vaxscan_core::load_app_config().context("failed to load configuration")?;
    init_tracing(&config)?;

    let postal_code = PostalCode::parse(&cli.postal_code)?;
    let window = DateWindow::next_days(chrono::Local::now().date_naive(), cli.in_the_next);
    let request = ScanRequest {
        postal_code,
        window,
        max_distance_km: cli.max_distance,
        require_quota: cli.require_quota || config.require_quota,
        failure_policy: if cli.fail_fast {
            FailurePolicy::Abort
        } else {
            config.failure_policy
        },
    };
    tracing::debug!(?config, ?request, "starting scan");

    let client = ClicSanteClient::from_config(&config).context("failed to build API client")?;

    let mut out = io::stdout().lock();
    report::render_banner(
        &mut out,
        &request.window,
        cli.in_the_next,
        request.max_distance_km,
        &request.postal_code,
    )?;
    out.flush()?;

    let report = scan::run_scan(&config, &client, &request, &mut out).await?;
    let printed = report::render(&report, &mut out)?;
    out.flush()?;

    tracing::info!(
        places = report.results.len(),
        failed = report.failures.len(),
        slots = printed,
        "scan complete"
    );
    Ok(())
}

/// Logs go to stderr so stdout carries only the report. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("invalid log level '{}'", config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
