use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalogue_api_rest::{router, AppState};
use catalogue_core::{CoreConfig, ProductService};

/// Main entry point for the catalogue server
///
/// Serves the REST API, the uploaded images and (optionally) a static front-end from a
/// single HTTP listener.
///
/// # Environment Variables
/// - `CATALOGUE_REST_ADDR`: listen address (default: "0.0.0.0:5000")
/// - `CATALOGUE_DATA_FILE`: product JSON document (default: "products.json")
/// - `CATALOGUE_UPLOAD_DIR`: image directory (default: "uploads")
/// - `CATALOGUE_MAX_UPLOAD_BYTES`: request body limit (default: 16 MiB)
/// - `CATALOGUE_STATIC_DIR`: directory served for unmatched paths (optional)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catalogue=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var("CATALOGUE_DATA_FILE").ok(),
        std::env::var("CATALOGUE_UPLOAD_DIR").ok(),
        std::env::var("CATALOGUE_MAX_UPLOAD_BYTES").ok(),
    )?;
    let rest_addr =
        std::env::var("CATALOGUE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());
    let static_dir = std::env::var("CATALOGUE_STATIC_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    let products = ProductService::new(&cfg);
    products.images().ensure_upload_dir()?;

    tracing::info!("++ Catalogue data file {}", cfg.data_file().display());
    tracing::info!("++ Catalogue uploads in {}", cfg.upload_dir().display());
    if let Some(dir) = &static_dir {
        tracing::info!("++ Serving static files from {}", dir.display());
    }
    tracing::info!("++ Starting Catalogue REST on {}", rest_addr);

    let app = router(AppState { products }, cfg.max_upload_bytes(), static_dir);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
