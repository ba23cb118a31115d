mod config;
mod scan_cmd;
mod status_cmd;
mod terminal_output;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use markscan_gateway::{start_server, GatewayState};
use markscan_providers::TogetherProvider;
use markscan_understanding::OcrService;

use config::Config;
use scan_cmd::ScanArgs;

#[derive(Parser)]
#[command(name = "markscan")]
#[command(about = "MarkScan: image to Markdown OCR with Together AI vision models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web UI and analysis API
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(long)]
        bind: Option<String>,
    },
    /// Transcribe one image and print the Markdown
    Scan {
        /// Image file (png, jpg, jpeg, gif or webp)
        image: PathBuf,
        /// Together AI API key; falls back to TOGETHER_API_KEY
        #[arg(long)]
        api_key: Option<String>,
        /// Vision model to request
        #[arg(long)]
        model: Option<String>,
        /// Write the Markdown here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the status of a running server
    Status,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let config = Config::from_env();
    let _log_guard = logging::init_logger(&config.log_dir, &config.log_level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                bind_address: bind.unwrap_or(config.bind_address),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Scan {
            image,
            api_key,
            model,
            output,
        } => {
            let config = Config {
                model: model.unwrap_or(config.model),
                ..config
            };
            let args = ScanArgs {
                image,
                api_key: api_key.or_else(|| config.together_api_key.clone()),
                output,
            };
            return scan_cmd::run(&ocr_service(&config), args).await;
        }
        Commands::Status => status_cmd::run(config.port).await?,
    }

    Ok(ExitCode::SUCCESS)
}

fn ocr_service(config: &Config) -> OcrService {
    let mut provider = TogetherProvider::new();
    if let Some(base) = &config.api_base {
        provider = provider.with_base_url(base);
    }
    OcrService::new(Arc::new(provider)).with_config(config.ocr_config())
}

async fn run_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address, config.port))?;

    info!(
        addr = %addr,
        model = %config.model,
        staging_dir = %config.staging_dir.display(),
        "Starting MarkScan"
    );

    let state = GatewayState::new(ocr_service(&config));
    start_server(addr, state).await
}
