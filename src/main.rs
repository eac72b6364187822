use clap::Parser;
use fxreport::cli::ui;
use fxreport::core::config::AppConfig;
use fxreport::core::log::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Currency pairs to fetch, e.g. EURUSD USDJPY (default: all supported pairs)
    pairs: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// File name for the report inside the reports directory
    #[arg(short, long)]
    output: Option<String>,

    /// Directory the report is written to
    #[arg(long)]
    reports_dir: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match try_main(&cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            eprintln!("{}", ui::style_text(&format!("Error: {e:#}"), ui::StyleType::Error));
            ExitCode::FAILURE
        }
    }
}

async fn try_main(cli: &Cli) -> anyhow::Result<PathBuf> {
    let mut config = AppConfig::load(cli.config_path.as_deref())?;
    if let Some(dir) = &cli.reports_dir {
        config.reports_dir = Some(dir.clone());
    }
    fxreport::run(&config, &cli.pairs, cli.output.as_deref()).await
}
