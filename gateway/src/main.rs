//! Gateway main entry point
//!
//! Serves the media catalog API over HTTP.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::{build_router, AppState, GatewayConfig};

async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info,gateway_lib=info,catalog_service=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = GatewayConfig::from_env();
    tracing::info!("Starting media catalog gateway v{}", config.version);

    let state = AppState::from_config(&config).context("invalid token configuration")?;

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        state
            .catalog
            .ensure_admin(email, password)
            .await
            .context("failed to create bootstrap admin")?;
        tracing::info!(email = %email, "Bootstrap admin ready");
    }

    tracing::info!(
        videos = %config.video_dir.display(),
        images = %config.image_dir.display(),
        chunk_cap = config.chunk_cap_bytes,
        "Media stores configured"
    );

    let listener = TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http_addr))?;
    tracing::info!("HTTP server listening on {}", config.http_addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn print_help() {
    println!("Media catalog gateway v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    gateway [run]");
    println!();
    println!("ENVIRONMENT:");
    println!("    HTTP_ADDR              Listen address (default 0.0.0.0:8080)");
    println!("    JWT_SECRET             Token signing secret (random if unset)");
    println!("    JWT_ISSUER             Token issuer (default media-catalog)");
    println!("    JWT_EXPIRES_IN_SECS    Token lifetime (default 864000)");
    println!("    VIDEO_DIR              Video store root (default ./uploads/videos)");
    println!("    IMAGE_DIR              Image store root (default ./uploads/images)");
    println!("    MEDIA_CHUNK_CAP_BYTES  Max bytes per range response (default 1048576)");
    println!("    ADMIN_EMAIL            Bootstrap admin email");
    println!("    ADMIN_PASSWORD         Bootstrap admin password");
    println!("    RUST_LOG               Log filter (default gateway=info)");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("run") => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_server())
        }
        Some("--help") | Some("-h") => {
            print_help();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown argument: {}", other);
            print_help();
            std::process::exit(2);
        }
    }
}
