use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use placenames_core::{load_index, QueryEngine, SuggestConfig};
use placenames_server::api::metrics;
use placenames_server::{create_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "placenames-server", about = "Ranked place-name autosuggest API")]
struct Args {
    /// CSV data file of `name,relevancy` records (`.gz` is decompressed)
    #[arg(
        long,
        env = "PLACENAMES_DATA_FILE",
        default_value = "data/placenames_with_relevancy.csv.gz"
    )]
    data_file: PathBuf,

    /// Address to listen on
    #[arg(long, env = "PLACENAMES_LISTEN", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Entries retained per prefix; also the largest allowed max_results
    #[arg(long, env = "PLACENAMES_TOP_K", default_value_t = 100)]
    top_k: usize,

    /// max_results used when a request gives none
    #[arg(long, env = "PLACENAMES_DEFAULT_LIMIT", default_value_t = 10)]
    default_limit: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("placenames_server=info".parse()?)
                .add_directive("placenames_core=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = SuggestConfig {
        capacity_per_node: args.top_k,
        default_limit: args.default_limit,
        ..SuggestConfig::default()
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: {e} (check --top-k and --default-limit)");
        std::process::exit(1);
    }

    info!(
        data_file = %args.data_file.display(),
        listen = %args.listen,
        top_k = args.top_k,
        default_limit = args.default_limit,
        "Starting place-name autosuggest server"
    );

    let prometheus_handle = metrics::install_recorder();

    let data_file = args.data_file.clone();
    let index = tokio::task::spawn_blocking(move || load_index(&data_file, config)).await??;
    metrics::record_index(&index.stats());

    // Drains pending histogram samples between scrapes.
    let upkeep_handle = prometheus_handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(15));
        loop {
            interval.tick().await;
            upkeep_handle.run_upkeep();
        }
    });

    let app = create_router(AppState::new(QueryEngine::new(index), prometheus_handle));

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!(address = %args.listen, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
