pub mod cli;
pub mod core;
pub mod providers;
pub mod report;

use crate::cli::rates;
use crate::core::config::AppConfig;
use crate::core::{FetchResult, QuoteProvider};
use crate::providers::QuoteClient;
use crate::report::ReportRenderer;
use anyhow::{Result, bail};
use std::path::PathBuf;
use tracing::{debug, info};

/// Fetches `pairs` (all supported pairs when empty), renders the report and
/// saves it, returning the fetched result and the report path.
pub async fn generate_report(
    provider: &dyn QuoteProvider,
    renderer: &ReportRenderer,
    pairs: &[String],
    filename: Option<&str>,
) -> Result<(FetchResult, PathBuf)> {
    let result = if pairs.is_empty() {
        provider.fetch_all().await?
    } else {
        provider.fetch(pairs).await?
    };

    if !result.success {
        bail!("Failed to fetch data from the API. Check your API key or connection.");
    }

    let html = renderer.render(&result);
    let path = renderer.persist(&html, filename)?;
    Ok((result, path))
}

pub async fn run(config: &AppConfig, pairs: &[String], filename: Option<&str>) -> Result<PathBuf> {
    info!("Forex report starting...");
    debug!(
        base_url = ?config.base_url,
        reports_dir = %config.reports_dir().display(),
        "Loaded config"
    );

    let client = QuoteClient::new(config.client_config()?)?;
    let renderer = ReportRenderer::new(config.reports_dir());

    println!("{}", rates::format_supported_pairs(&client.supported_pairs()));

    let (result, path) = generate_report(&client, &renderer, pairs, filename).await?;
    rates::display_summary(&result, &path);
    Ok(path)
}
