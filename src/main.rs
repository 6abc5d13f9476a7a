use anyhow::{bail, Context, Result};
use clap::Parser;
use futures::{stream::FuturesUnordered, StreamExt};
use reqwest::Client;
use sheetfeed::{
    datasets::gallery::CategoryFilter, Consumer, DatasetKind, Rendered, Request, SheetsConfig,
    View,
};
use std::{collections::BTreeMap, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reads the institute's Google Sheets and prints each dataset as JSON"
)]
struct Args {
    /// Dataset to load
    #[arg(value_enum, required_unless_present = "all")]
    dataset: Option<DatasetKind>,

    /// Load every dataset concurrently
    #[arg(long, conflicts_with = "dataset")]
    all: bool,

    /// `home` gives the short landing-page preview
    #[arg(long, value_enum, default_value_t = View::Page)]
    view: View,

    /// Gallery page category filter
    #[arg(long, default_value = "All")]
    category: String,

    /// YAML config file (also read from $SHEETFEED_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logs go to stderr so stdout stays JSON
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = SheetsConfig::load(args.config.as_deref())?;
    let client = Client::builder()
        .gzip(true)
        .build()
        .context("building HTTP client")?;
    let reader = cfg.reader(client)?;

    let request = Request {
        view: args.view,
        category: CategoryFilter::parse(&args.category),
    };

    let output = if args.all {
        let consumers: Vec<Consumer> = DatasetKind::ALL
            .iter()
            .map(|&kind| Consumer::new(kind, request.clone()))
            .collect();
        info!(datasets = consumers.len(), "loading all datasets");

        let (reader, cfg) = (&reader, &cfg);
        let mut pending: FuturesUnordered<_> = consumers
            .iter()
            .map(|c| async move { (c.kind(), c.refresh(reader, cfg).await) })
            .collect();
        let mut out: BTreeMap<&'static str, Rendered> = BTreeMap::new();
        while let Some((kind, rendered)) = pending.next().await {
            out.insert(kind.slug(), rendered);
        }
        to_json(&out, args.pretty)?
    } else {
        let Some(kind) = args.dataset else {
            bail!("pass a dataset or --all");
        };
        let consumer = Consumer::new(kind, request);
        to_json(&consumer.refresh(&reader, &cfg).await, args.pretty)?
    };

    println!("{}", output);
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(s)
}
