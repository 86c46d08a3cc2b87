use anyhow::Result;
use axum::Router;
use clap::Parser;
use server::{build_app, AppOptions};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Dataset directory of *.json node documents, indexed at startup
    #[arg(long)]
    data: Option<PathBuf>,
    /// Engine config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
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
    let opts = AppOptions {
        data_dir: args.data,
        config: args.config,
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(opts).await?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
