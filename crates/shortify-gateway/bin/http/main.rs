mod cli;

use crate::cli::{CacheBackendArg, LogFormatArg, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use shortify_cache::{LayeredCache, MokaUrlCache, RedisUrlCache};
use shortify_core::{Redirector, Repository, Shortener};
use shortify_gateway::{App, AppState};
use shortify_redirector::RedirectorService;
use shortify_shortener::{RandomSuffix, ShortenerService};
use shortify_storage::{InMemoryRepository, MySqlRepository};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        "starting gateway server"
    );

    let state = match config.storage {
        StorageBackendArg::InMemory => {
            build_state(&config, Arc::new(InMemoryRepository::new())).await?
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(mysql_dsn)
                .await
                .context("failed to connect to MySQL")?;
            repository
                .migrate()
                .await
                .context("failed to run MySQL migrations")?;
            build_state(&config, Arc::new(repository)).await?
        }
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "gateway server listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway server stopped");
    Ok(())
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn build_state<R: Repository>(config: &CLI, repository: Arc<R>) -> anyhow::Result<AppState> {
    let shortener: Arc<dyn Shortener> = Arc::new(ShortenerService::from_shared(
        Arc::clone(&repository),
        Arc::new(RandomSuffix),
    ));

    let moka = || MokaUrlCache::with_capacity(config.moka_capacity);
    let redirector: Arc<dyn Redirector> = match config.cache {
        CacheBackendArg::Moka => Arc::new(RedirectorService::from_shared(
            repository,
            Arc::new(moka()),
        )),
        CacheBackendArg::Redis => Arc::new(RedirectorService::from_shared(
            repository,
            Arc::new(connect_redis(config).await?),
        )),
        CacheBackendArg::Layered => Arc::new(RedirectorService::from_shared(
            repository,
            Arc::new(LayeredCache::new(moka(), connect_redis(config).await?)),
        )),
    };

    Ok(AppState::new(
        shortener,
        redirector,
        config.public_base_url.as_str(),
    ))
}

async fn connect_redis(config: &CLI) -> anyhow::Result<RedisUrlCache> {
    let redis_url = config
        .redis_url
        .as_deref()
        .context("redis url is required when cache backend is redis or layered")?;
    RedisUrlCache::connect(redis_url)
        .await
        .context("failed to connect to Redis")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
