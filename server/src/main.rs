use std::{fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use server::{build_router, server_state::ServerState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "Serves the route walker frontend and its route catalog")]
struct Args {
    #[arg(long, env = "ROUTE_WALKER_PORT", default_value_t = 8080)]
    port: u16,

    /// Directory of the built frontend
    #[arg(long, env = "ROUTE_WALKER_DIST", default_value = "frontend/dist")]
    dist_dir: PathBuf,

    /// JSON route catalog. The built-in routes are served when absent.
    #[arg(long, env = "ROUTE_WALKER_ROUTES")]
    routes: Option<PathBuf>,

    /// JSON walk configuration
    #[arg(long, env = "ROUTE_WALKER_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "ROUTE_WALKER_LOG_DIR", default_value = "server/log")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    std::fs::create_dir_all(&args.log_dir)
        .with_context(|| format!("Failed to create log dir {}", args.log_dir.display()))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(args.log_dir.join("server.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{}=trace,route_walker_lib=debug", env!("CARGO_CRATE_NAME")).into())
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file))
        .init();

    tracing::info!("Starting server...");

    let server_state = ServerState::load(args.routes.as_deref(), args.config.as_deref())?;
    server_state.check_catalog();

    let app = build_router(Arc::new(server_state), &args.dist_dir);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], args.port))).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
