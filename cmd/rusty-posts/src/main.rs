//! # rusty-posts
//!
//! Assembles the service: settings, tracing, the one store connection, the
//! router. The store connection is opened before the listener binds and
//! closed after the server has drained.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use api_adapters::{build_router, AppState};
use configs::{LogFormat, LogSettings, Settings, StorageBackend, UpdateEchoSetting};
use domains::PostRepository;
use services::{PostPolicy, PostService, UpdateEcho};
use storage_adapters::InMemoryPostRepository;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "db-mongodb")]
use secrecy::ExposeSecret;
#[cfg(feature = "db-mongodb")]
use storage_adapters::MongoPostRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    init_tracing(&settings.log);
    settings.log_summary();

    let store = Store::open(&settings).await?;
    let service = PostService::new(store.repository(), post_policy(&settings));

    let static_dir = Path::new(&settings.server.static_dir);
    let app = build_router(
        AppState::new(service),
        static_dir.is_dir().then_some(static_dir),
    );

    let addr = settings.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    info!("shut down cleanly");
    Ok(())
}

fn init_tracing(log: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn post_policy(settings: &Settings) -> PostPolicy {
    PostPolicy {
        upsert_on_update: settings.posts.upsert_on_update,
        update_echo: match settings.posts.update_echo {
            UpdateEchoSetting::Stored => UpdateEcho::Stored,
            UpdateEchoSetting::Merged => UpdateEcho::Merged,
        },
        required_fields: settings.posts.required_fields.clone(),
    }
}

/// The process-wide store, chosen by `storage.backend`.
enum Store {
    #[cfg(feature = "db-mongodb")]
    Mongo(Arc<MongoPostRepository>),
    Memory(Arc<InMemoryPostRepository>),
}

impl Store {
    async fn open(settings: &Settings) -> anyhow::Result<Self> {
        match settings.storage.backend {
            #[cfg(feature = "db-mongodb")]
            StorageBackend::Mongodb => {
                let db = &settings.database;
                let repo = MongoPostRepository::connect(
                    db.connection_uri().expose_secret(),
                    &db.name,
                    &db.collection,
                )
                .await?;
                Ok(Store::Mongo(Arc::new(repo)))
            }
            #[cfg(not(feature = "db-mongodb"))]
            StorageBackend::Mongodb => {
                anyhow::bail!("storage.backend = \"mongodb\" needs the db-mongodb feature")
            }
            StorageBackend::Memory => {
                warn!("using the in-memory store; posts are lost on exit");
                Ok(Store::Memory(Arc::new(InMemoryPostRepository::new())))
            }
        }
    }

    fn repository(&self) -> Arc<dyn PostRepository> {
        match self {
            #[cfg(feature = "db-mongodb")]
            Store::Mongo(repo) => repo.clone(),
            Store::Memory(repo) => repo.clone(),
        }
    }

    async fn close(self) {
        match self {
            #[cfg(feature = "db-mongodb")]
            Store::Mongo(repo) => repo.shutdown().await,
            Store::Memory(repo) => info!(posts = repo.len(), "discarding in-memory store"),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }
    info!("shutdown signal received, draining connections");
}
