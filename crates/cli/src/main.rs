use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use screener_core::domain::params::{ScreenForm, PERIOD_LABELS};
use screener_core::ingest::provider::PriceSource;
use screener_core::ingest::static_source::StaticPriceSource;

mod table;

#[derive(Debug, Parser)]
#[command(name = "screener", about = "Rank tickers by return and volatility")]
struct Args {
    /// Comma-separated tickers, e.g. "AAPL, MSFT, SPY".
    #[arg(long)]
    tickers: Option<String>,

    /// ReturnA lookback, e.g. "3 months".
    #[arg(long)]
    return_a_period: Option<String>,

    /// ReturnA weight in percent.
    #[arg(long)]
    return_a_weight: Option<u32>,

    #[arg(long)]
    return_b_period: Option<String>,

    #[arg(long)]
    return_b_weight: Option<u32>,

    #[arg(long)]
    volatility_period: Option<String>,

    #[arg(long)]
    volatility_weight: Option<u32>,

    /// Read prices from a JSON file instead of the live provider.
    #[arg(long, env = "SCREENER_PRICES_FILE")]
    prices_file: Option<PathBuf>,

    /// Tickers fetched concurrently.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-ticker fetch timeout in seconds.
    #[arg(long)]
    fetch_timeout_secs: Option<u64>,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// List the offered period labels and exit.
    #[arg(long)]
    list_periods: bool,
}

impl Args {
    fn form(&self) -> ScreenForm {
        let defaults = ScreenForm::default();
        ScreenForm {
            tickers: self.tickers.clone().unwrap_or(defaults.tickers),
            return_a_period: self
                .return_a_period
                .clone()
                .unwrap_or(defaults.return_a_period),
            return_a_weight: self.return_a_weight.unwrap_or(defaults.return_a_weight),
            return_b_period: self
                .return_b_period
                .clone()
                .unwrap_or(defaults.return_b_period),
            return_b_weight: self.return_b_weight.unwrap_or(defaults.return_b_weight),
            volatility_period: self
                .volatility_period
                .clone()
                .unwrap_or(defaults.volatility_period),
            volatility_weight: self
                .volatility_weight
                .unwrap_or(defaults.volatility_weight),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = screener_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if args.list_periods {
        for label in PERIOD_LABELS {
            println!("{label}");
        }
        return Ok(());
    }

    let request = args
        .form()
        .to_request()
        .context("invalid screener parameters")?;

    let source: Arc<dyn PriceSource> = match &args.prices_file {
        Some(path) => Arc::new(StaticPriceSource::from_json_file(path)?),
        None => screener_core::ingest::source_from_settings(&settings)?,
    };

    let mut options = settings.screen_options();
    if let Some(n) = args.concurrency {
        anyhow::ensure!(n >= 1, "--concurrency must be >= 1");
        options.concurrency = n;
    }
    if let Some(secs) = args.fetch_timeout_secs {
        options.fetch_timeout = Duration::from_secs(secs);
    }

    let report = match screener_core::screen::run_screen(source.as_ref(), &request, &options).await
    {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "screen run rejected");
            let err = anyhow::Error::new(err);
            sentry_anyhow::capture_anyhow(&err);
            return Err(err.context("screen run failed"));
        }
    };

    tracing::info!(
        run_id = %report.run_id,
        records = report.records.len(),
        failures = report.failures.len(),
        "screen report ready"
    );
    for failure in &report.failures {
        tracing::warn!(ticker = %failure.ticker, error = %failure.error, "ticker skipped");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.records.is_empty() {
        println!("No results for the requested tickers.");
    } else {
        println!("{}", table::render_records(&report));
    }

    if let Some(failures) = table::render_failures(&report) {
        eprintln!("Skipped tickers:\n{failures}");
    }

    Ok(())
}

fn init_sentry(settings: &screener_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
