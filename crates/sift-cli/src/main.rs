//! `sift` - run a listing query over a JSON collection.
//!
//! ```text
//! sift --kind plan --records plans.json \
//!      --filter type=family --filter 'monthlyPremium=..$500' \
//!      --search gold --sort monthlyPremium:asc --page-size 3
//! ```
//!
//! Logs go to stderr and are controlled by `RUST_LOG`
//! (e.g. `RUST_LOG=sift=debug`).

mod args;
mod report;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sift::{Record, Schema, ViewConfig, ViewState};
use sift_catalog::{Doctor, InsuranceApplication, ListingKind, Message, Order, Plan, Property};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use args::Cli;
use report::{render, PageReport};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = run(&cli)?;
    println!("{}", output);
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let records = fs::read_to_string(&cli.records)
        .with_context(|| format!("reading records from {}", cli.records.display()))?;
    let config = match (&cli.config, cli.kind) {
        (Some(path), _) => load_config(path)?,
        (None, Some(kind)) => kind.view_config(),
        (None, None) => bail!("--config is required when --kind is not given"),
    };

    match cli.kind {
        Some(ListingKind::Plan) => run_typed::<Plan>(&records, &config, cli),
        Some(ListingKind::Doctor) => run_typed::<Doctor>(&records, &config, cli),
        Some(ListingKind::Property) => run_typed::<Property>(&records, &config, cli),
        Some(ListingKind::Order) => run_typed::<Order>(&records, &config, cli),
        Some(ListingKind::Application) => run_typed::<InsuranceApplication>(&records, &config, cli),
        Some(ListingKind::Message) => run_typed::<Message>(&records, &config, cli),
        None => {
            let schema = config.schema()?;
            let records: Vec<serde_json::Value> =
                serde_json::from_str(&records).context("parsing records")?;
            run_view(records, schema, &config, cli)
        }
    }
}

fn run_typed<T>(records: &str, config: &ViewConfig, cli: &Cli) -> anyhow::Result<String>
where
    T: sift::Schematic + DeserializeOwned + Serialize,
{
    let records: Vec<T> = serde_json::from_str(records).context("parsing records")?;
    run_view(records, T::schema(), config, cli)
}

fn run_view<T>(
    records: Vec<T>,
    schema: Schema,
    config: &ViewConfig,
    cli: &Cli,
) -> anyhow::Result<String>
where
    T: Record + Serialize,
{
    debug!(target: "sift::cli", records = records.len(), "loaded collection");
    let mut view = ViewState::new(records, schema, config)?;

    for filter in &cli.filters {
        view.set_filter(&filter.dimension, filter.constraint.clone())?;
    }
    if let Some(text) = &cli.search {
        view.set_search_text(text.as_str())?;
    }
    if let Some(sort) = &cli.sort {
        view.set_sort(&sort.field, sort.dir)?;
    }
    if let Some(size) = cli.page_size {
        view.set_page_size(size)?;
    }
    // Last: every other change returns to page 0.
    view.go_to_page(cli.page)?;

    render(&PageReport::new(&view), cli.output)
}

fn load_config(path: &Path) -> anyhow::Result<ViewConfig> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("reading view config from {}", path.display()))?;
    debug!(target: "sift::cli", path = %path.display(), "loading view config");
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => ViewConfig::from_json(&source)?,
        _ => ViewConfig::from_yaml(&source)?,
    };
    Ok(config)
}
