use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use paged_query::config::AppConfig;
use paged_query::logging::init_tracing;
use paged_query::router::build_router;
use paged_query::startup::initialize_backend;

#[derive(Parser, Debug)]
#[command(name = "paged-query")]
#[command(about = "Record listing service with query-string sorting and pagination")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config file)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_tracing();

    let mut app_config = if args.config == "config.yaml" && !Path::new("config.yaml").exists() {
        info!("No config.yaml found, using in-memory sample data");
        AppConfig::default_config()
    } else {
        AppConfig::load_from_file(&args.config)?
    };

    if let Some(port) = args.port {
        app_config.server.port = port;
    }
    if let Some(host) = args.host {
        app_config.server.host = host;
    }

    info!(
        "Backend: {:?}, default page size {}",
        app_config.backend.backend_type, app_config.pagination.default_page_size
    );

    let backend = initialize_backend(&app_config).await?;
    let app_config = Arc::new(app_config);
    let app = build_router(app_config.clone(), backend)?;

    let host: std::net::IpAddr = app_config.server.host.parse().unwrap_or_else(|_| {
        warn!(
            "Invalid host address: {}, using 127.0.0.1",
            app_config.server.host
        );
        [127, 0, 0, 1].into()
    });
    let addr = SocketAddr::from((host, app_config.server.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
