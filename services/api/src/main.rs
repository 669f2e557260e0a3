//! Recipe-sharing HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, cache, auth, and the HTTP router, then
//! starts the API server and the metrics listener.
use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tastytales::app::{build_router, AppState};
use tastytales::auth::AuthVerifier;
use tastytales::config::{AppConfig, CacheBackend};
use tastytales::observability;
use tastytales::service::RecipeService;
use tastytales::store::{memory::InMemoryStore, RecipeStore};
use tastytales::upload::LocalDiskUploader;
use tastytales_cache::{CacheStore, MemoryCache, RedisCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env_or_yaml().context("load configuration")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability();
    let state = build_state(&config).await?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);

    let addr = config.bind_addr;
    tracing::info!(%addr, "recipe api listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("redis cache selected but TASTY_REDIS_URL is missing")?;
            Arc::new(RedisCache::connect(url).await?)
        }
    };
    let cache_backend = cache.backend_name();

    let store: Arc<dyn RecipeStore> = Arc::new(InMemoryStore::new());
    let uploader = Arc::new(LocalDiskUploader::new(
        config.media_dir.clone(),
        config.media_base_url.clone(),
    ));
    let verifier = Arc::new(AuthVerifier::new(
        &config.jwt_secret,
        Duration::from_secs(config.jwt_expires_secs),
        cache.clone(),
    ));
    let service = Arc::new(RecipeService::new(
        store.clone(),
        cache,
        uploader,
        Duration::from_secs(config.cache_ttl_secs),
    ));

    Ok(AppState {
        service,
        store,
        verifier,
        api_version: "v1".to_string(),
        cache_backend,
        media_dir: config.media_dir.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            bind_addr: "127.0.0.1:0".parse().expect("bind"),
            metrics_bind: "127.0.0.1:0".parse().expect("metrics"),
            cache_backend: CacheBackend::Memory,
            redis_url: None,
            cache_ttl_secs: 180,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_secs: 3600,
            media_dir: std::env::temp_dir().join("tastytales-test-media"),
            media_base_url: "/media".to_string(),
        }
    }

    #[tokio::test]
    async fn build_state_memory_backends() {
        let state = build_state(&test_config()).await.expect("state");
        assert_eq!(state.store.backend_name(), "memory");
        assert_eq!(state.cache_backend, "memory");
        assert_eq!(state.api_version, "v1");
    }

    #[tokio::test]
    async fn build_state_redis_requires_url() {
        let config = AppConfig {
            cache_backend: CacheBackend::Redis,
            ..test_config()
        };
        let err = build_state(&config).await.err().expect("missing url");
        assert!(err.to_string().contains("TASTY_REDIS_URL"));
    }

    #[tokio::test]
    async fn run_with_shutdown_starts_and_stops() {
        run_with_shutdown(test_config(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
        })
        .await
        .expect("run should stop cleanly");
    }
}
