use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use solutions_server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "Browse and submit solutions stored as JSON files", long_about = None)]
struct Args {
    /// Directory holding one JSON file per solution; created if missing
    #[arg(long, default_value = "./solutions")]
    dir: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app = build_app(&args.dir).with_context(|| format!("opening solutions dir {}", args.dir.display()))?;
    // build_app has created the directory by now
    let dir = std::fs::canonicalize(&args.dir)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, dir = %dir.display(), "serving solutions");
    axum::serve(listener, app).await?;
    Ok(())
}
