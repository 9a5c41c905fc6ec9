use anyhow::Context;
use clap::Parser;
use segrank_web::routes;
use segrank_web::state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser)]
struct Args {
    /// Directory holding leaderboard CSVs and leaderboards.json
    #[arg(long, short, default_value = "leaderboards")]
    data: PathBuf,

    #[arg(long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    info!("🏁 SegRank display service is initializing...");
    info!("📂 Serving leaderboards from: {:?}", args.data);

    let state = AppState::load(args.data.clone())
        .with_context(|| format!("loading leaderboards from {:?}", args.data))?;

    let app = routes::app(Arc::new(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("🚀 Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
