use std::{env, net::SocketAddr, path::Path};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, quotes::SharedStore};
use service::{runtime, storage::json_quote_store::JsonQuoteStore};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(3000);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Data file location from configs or env, defaulting to `data/quotes.json`
fn load_data_path() -> String {
    match configs::load_default() {
        Ok(cfg) => cfg.store.data_path,
        Err(_) => env::var("QUOTES_DATA_PATH").unwrap_or_else(|_| "data/quotes.json".to_string()),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let data_path = load_data_path();
    if let Some(dir) = Path::new(&data_path).parent() {
        runtime::ensure_env(&dir.to_string_lossy()).await?;
    }

    // Quote collection, persisted as a JSON document
    let store: SharedStore = JsonQuoteStore::new(&data_path).await?;

    // Build router
    let app: Router = routes::build_router(store, build_cors());

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, %data_path, "starting quote api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
