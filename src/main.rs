mod app;
mod core;
mod features;
mod modules;
mod shared;

use crate::app::{build_router, detect_connection_id, AppServices};
use crate::core::config::Config;
use crate::core::middleware;
use crate::features::auth::AuthService;
use crate::features::faxes::{FaxDefaults, FaxService};
use crate::features::media::{MediaCleanupWorker, MediaService};
use crate::features::settings::SettingsService;
use crate::modules::telnyx::{FaxApi, TelnyxClient};
use crate::modules::tunnel;
use crate::shared::templates::TemplateEngine;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Prefer a running ngrok tunnel over the configured base URL
    if let Some(api) = config.app.ngrok_api_url.clone() {
        if let Some(public_url) = tunnel::detect_public_url(&api).await {
            tracing::info!("Using ngrok public URL: {}", public_url);
            config.app.public_base_url = public_url;
        }
    }
    let public_base_url = config.app.public_base_url.clone();

    let mut templates = TemplateEngine::discover(config.app.template_dir.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load templates: {}", e))?;

    let auth_service = Arc::new(AuthService::new(&config.auth, &public_base_url));
    if auth_service.is_enabled() {
        tracing::info!("Authentication enabled");
    } else {
        tracing::warn!("No authentication configured, fax pages are open to anyone");
    }
    templates.set_global("auth_enabled", auth_service.is_enabled());
    let templates = Arc::new(templates);

    let fax_api: Arc<dyn FaxApi> = Arc::new(TelnyxClient::new(
        config.fax.api_key.clone(),
        config.fax.api_base_url.clone(),
    ));
    tracing::info!("Fax API client initialized ({})", config.fax.api_base_url);

    let mut default_connection_id = config.fax.default_connection_id.clone();
    if default_connection_id.is_none() {
        if let Some(app_id) = config.fax.fax_application_id.as_deref() {
            default_connection_id = detect_connection_id(fax_api.as_ref(), app_id).await;
        }
    }

    let media_service = Arc::new(MediaService::new(&config.media, &public_base_url));
    tracing::info!(
        "Media storage initialized (backend: {}, hipaa: {})",
        media_service.backend_name(),
        config.media.hipaa
    );

    // Sweeps only make sense for the in-memory backend
    let cancel = CancellationToken::new();
    let cleanup_handle = media_service.memory_store().map(|store| {
        MediaCleanupWorker::new(store.clone(), config.media.cleanup_interval).spawn(cancel.clone())
    });

    let fax_service = Arc::new(FaxService::new(
        Arc::clone(&fax_api),
        Arc::clone(&media_service),
        FaxDefaults {
            from: config.fax.default_from.clone(),
            connection_id: default_connection_id.clone(),
        },
        config.media.hipaa,
        config.fax.fax_application_id.is_some(),
    ));
    let settings_service = Arc::new(SettingsService::new(
        fax_api,
        config.fax.fax_application_id.clone(),
        default_connection_id,
    ));

    let services = AppServices {
        auth: auth_service,
        media: media_service,
        faxes: fax_service,
        settings: settings_service,
        templates,
    };

    let app = build_router(&services)
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!(
        "fax-ui v{} listening on http://{} (public: {})",
        env!("CARGO_PKG_VERSION"),
        addr,
        public_base_url
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    if let Some(handle) = cleanup_handle {
        let _ = handle.await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolve on Ctrl-C and stop background workers
async fn shutdown_signal(cancel: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
    cancel.cancel();
}
