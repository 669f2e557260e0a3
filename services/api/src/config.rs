use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 180;
pub const DEFAULT_JWT_EXPIRES_SECS: u64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis,
}

// Service configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub cache_backend: CacheBackend,
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    pub jwt_secret: String,
    pub jwt_expires_secs: u64,
    pub media_dir: PathBuf,
    pub media_base_url: String,
}

#[derive(Debug, Deserialize)]
struct AppConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    cache_backend: Option<String>,
    redis_url: Option<String>,
    cache_ttl_secs: Option<u64>,
    jwt_secret: Option<String>,
    jwt_expires_secs: Option<u64>,
    media_dir: Option<PathBuf>,
    media_base_url: Option<String>,
}

fn parse_cache_backend(raw: &str) -> Result<CacheBackend> {
    match raw {
        "memory" => Ok(CacheBackend::Memory),
        "redis" => Ok(CacheBackend::Redis),
        other => bail!("unknown cache backend: {other}"),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("TASTY_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse TASTY_BIND")?;
        let metrics_bind = std::env::var("TASTY_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9090".to_string())
            .parse()
            .with_context(|| "parse TASTY_METRICS_BIND")?;
        let cache_backend = parse_cache_backend(
            &std::env::var("TASTY_CACHE_BACKEND").unwrap_or_else(|_| "memory".to_string()),
        )?;
        let redis_url = std::env::var("TASTY_REDIS_URL").ok();
        let cache_ttl_secs = match std::env::var("TASTY_CACHE_TTL_SECS") {
            Ok(raw) => raw.parse().with_context(|| "parse TASTY_CACHE_TTL_SECS")?,
            Err(_) => DEFAULT_CACHE_TTL_SECS,
        };
        let jwt_secret = std::env::var("TASTY_JWT_SECRET")
            .unwrap_or_else(|_| "tastytales-dev-secret".to_string());
        let jwt_expires_secs = match std::env::var("TASTY_JWT_EXPIRES_SECS") {
            Ok(raw) => raw.parse().with_context(|| "parse TASTY_JWT_EXPIRES_SECS")?,
            Err(_) => DEFAULT_JWT_EXPIRES_SECS,
        };
        let media_dir =
            PathBuf::from(std::env::var("TASTY_MEDIA_DIR").unwrap_or_else(|_| "media".to_string()));
        let media_base_url =
            std::env::var("TASTY_MEDIA_BASE_URL").unwrap_or_else(|_| "/media".to_string());
        Ok(Self {
            bind_addr,
            metrics_bind,
            cache_backend,
            redis_url,
            cache_ttl_secs,
            jwt_secret,
            jwt_expires_secs,
            media_dir,
            media_base_url,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("TASTY_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read TASTY_CONFIG: {path}"))?;
            let override_cfg: AppConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.cache_backend {
                config.cache_backend = parse_cache_backend(&value)?;
            }
            if let Some(value) = override_cfg.redis_url {
                config.redis_url = Some(value);
            }
            if let Some(value) = override_cfg.cache_ttl_secs {
                config.cache_ttl_secs = value;
            }
            if let Some(value) = override_cfg.jwt_secret {
                config.jwt_secret = value;
            }
            if let Some(value) = override_cfg.jwt_expires_secs {
                config.jwt_expires_secs = value;
            }
            if let Some(value) = override_cfg.media_dir {
                config.media_dir = value;
            }
            if let Some(value) = override_cfg.media_base_url {
                config.media_base_url = value;
            }
        }
        Ok(config)
    }
}
