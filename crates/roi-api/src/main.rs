use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use roi_api::config::RoiConfig;
use roi_api::tracing_setup::{TracingConfig, init_tracing};
use roi_api::types::CalculateResponse;
use roi_api::{AppState, create_app, pdf};
use roi_calculator::{RoiInput, compute};
use roi_web::ReportView;
use tracing::info;

#[derive(Parser)]
#[command(name = "roi", version, about = "Event attendance automation ROI calculator")]
struct Cli {
    /// Configuration file; defaults to $ROI_CONFIG_PATH or roi.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Print the metrics and report for an input record
    Calculate {
        /// JSON file holding the input record
        #[arg(long)]
        input: PathBuf,
    },
    /// Render the PDF report for an input record
    Render {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(TracingConfig::from_environment())?;

    let config = match &cli.config {
        Some(path) => RoiConfig::load_from(path)?,
        None => RoiConfig::load()?,
    }
    .apply_profile()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_server(config).await,
        Command::Calculate { input } => {
            let response = CalculateResponse::from(compute(read_input(&input)?));
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Command::Render { input, output } => {
            let view = ReportView::new(&compute(read_input(&input)?).report());
            let renderer = pdf::build_renderer(&config.pdf, config.server.base_url.as_deref());
            let bytes = renderer.render(&view).await?;
            tokio::fs::write(&output, &bytes)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(
                renderer = renderer.name(),
                path = %output.display(),
                bytes = bytes.len(),
                "PDF written"
            );
            Ok(())
        }
    }
}

fn read_input(path: &Path) -> anyhow::Result<RoiInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not an input record", path.display()))
}

async fn start_server(config: RoiConfig) -> anyhow::Result<()> {
    let addr = config.bind_address();
    info!(%addr, environment = %config.environment.env_type, "Configuring web server");

    let app = create_app(AppState::from_config(config)?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ROI server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
