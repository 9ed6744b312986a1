use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use backend_lib::{
    config::{LogFormat, Settings},
    router, AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Mergington High School activity sign-up service
#[derive(Debug, Parser)]
#[command(name = "mergington-activities", version)]
struct Args {
    /// TOML config file (defaults to ./config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// JSON file with the initial activities
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Directory served under /static
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Reject sign-ups once an activity is full
    #[arg(long)]
    enforce_capacity: bool,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        if let Some(bind) = self.bind {
            settings.bind_addr = bind;
        }
        if let Some(seed) = self.seed {
            settings.seed_file = Some(seed);
        }
        if let Some(static_dir) = self.static_dir {
            settings.static_dir = Some(static_dir);
        }
        if self.enforce_capacity {
            settings.enforce_capacity = true;
        }
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match settings.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    args.apply(&mut settings);
    settings.validate()?;

    init_tracing(&settings);

    let bind_addr = settings.bind_addr;
    let state = AppState::from_settings(settings).context("failed to seed activity directory")?;
    info!(
        activities = state.directory.len(),
        enforce_capacity = state.directory.enforces_capacity(),
        "activity directory ready"
    );

    let app = router::create_router(Arc::new(state));

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
