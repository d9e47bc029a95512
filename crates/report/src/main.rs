use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ido_sales_core::ido::{IdoClient, RecordCap};
use ido_sales_core::report::{ReportKind, SalesReporter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Pipeline {
    Order,
    Invoice,
}

impl From<Pipeline> for ReportKind {
    fn from(p: Pipeline) -> Self {
        match p {
            Pipeline::Order => ReportKind::Order,
            Pipeline::Invoice => ReportKind::Invoice,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ido_sales_report")]
struct Args {
    /// Which sales series to compute.
    #[arg(long, value_enum, default_value = "order")]
    pipeline: Pipeline,

    /// IDO filter expression passed through to the load request.
    #[arg(long)]
    filter: Option<String>,

    /// Override IDO_RECORD_CAP for this run (0 = unbounded).
    #[arg(long)]
    record_cap: Option<u32>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = ido_sales_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(cap) = args.record_cap {
        settings.ido_record_cap = RecordCap::from_count(cap);
    }

    let client = IdoClient::from_settings(&settings)?;
    let reporter = SalesReporter::from_settings(&settings, Arc::new(client));
    let kind = ReportKind::from(args.pipeline);

    let entries = match reporter.report(kind, args.filter.as_deref()).await {
        Ok(entries) => entries,
        Err(e) => {
            let err = anyhow::Error::new(e).context(format!("{kind} sales report failed"));
            sentry_anyhow::capture_anyhow(&err);
            return Err(err);
        }
    };

    tracing::info!(report = %kind, entries = entries.len(), "sales report computed");

    let out = if args.pretty {
        serde_json::to_string_pretty(&entries)
    } else {
        serde_json::to_string(&entries)
    }
    .context("serialize sales entries failed")?;
    println!("{out}");

    Ok(())
}

fn init_sentry(settings: &ido_sales_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
