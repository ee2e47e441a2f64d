use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use record_server::config::{CollectionKind, Config, LogConfig};
use record_server::{IntegrationTestSettings, Pet, Record, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "record-server")]
#[command(about = "Serve a named-record collection over HTTP, persisted to a JSON file")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long)]
    addr: Option<String>,

    /// JSON file the collection is loaded from and stored to
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Collection to serve
    #[arg(long, value_enum)]
    collection: Option<CollectionKind>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Config file (or defaults) with command line overrides applied
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(addr) = &self.addr {
            config.server_addr = addr.clone();
        }
        if let Some(collection) = self.collection {
            config.collection = collection;
        }
        if let Some(data_file) = &self.data_file {
            config.data_file = Some(data_file.clone());
        }
        if self.verbose {
            config.log.level = "debug".to_string();
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(log: &LogConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &log.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }

    Ok(())
}

async fn serve<R: Record>(config: &Config) -> Result<()> {
    let server = Server::<R>::start(config)
        .await
        .with_context(|| format!("Failed to start server on {}", config.server_addr))?;
    info!("Server listening on: {}", server.local_addr());
    info!("Data file: {}", server.store().path().display());

    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C");
            shutdown.stop().await;
        }
    });

    server.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    init_logging(&config.log)?;

    info!("Starting record-server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    match config.collection {
        CollectionKind::Pets => serve::<Pet>(&config).await,
        CollectionKind::CiGating => serve::<IntegrationTestSettings>(&config).await,
    }
}
