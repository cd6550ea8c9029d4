use anyhow::{Context, Result};
use std::env;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Backend API
    pub backend_api_url: Url,
    pub backend_api_timeout_seconds: u64,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Hand-off store (Redis when configured, in-memory otherwise)
    pub redis_url: Option<String>,
    pub handoff_ttl_seconds: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // Backend API
        let backend_api_url = env::var("BACKEND_API_URL").context("BACKEND_API_URL must be set")?;
        let backend_api_url = Url::parse(&backend_api_url)
            .with_context(|| format!("BACKEND_API_URL is not a valid URL: {backend_api_url}"))?;
        let backend_api_timeout_seconds = env::var("BACKEND_API_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Hand-off store
        let redis_url = env::var("REDIS_URL").ok().filter(|s| !s.trim().is_empty());
        let handoff_ttl_seconds = env::var("HANDOFF_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86_400); // 1 day default

        Ok(Settings {
            env,
            server_addr,
            backend_api_url,
            backend_api_timeout_seconds,
            cors_allow_origins,
            redis_url,
            handoff_ttl_seconds,
        })
    }

    /// Settings for tests and local tooling, pointing at `backend_api_url`.
    pub fn local(backend_api_url: Url) -> Self {
        Settings {
            env: Environment::Dev,
            server_addr: "127.0.0.1:0".to_string(),
            backend_api_url,
            backend_api_timeout_seconds: 5,
            cors_allow_origins: vec!["http://localhost:3000".to_string()],
            redis_url: None,
            handoff_ttl_seconds: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parsing_defaults_to_dev() {
        assert_eq!(Environment::from_str("production"), Environment::Prod);
        assert_eq!(Environment::from_str("STAGING"), Environment::Staging);
        assert_eq!(Environment::from_str("anything"), Environment::Dev);
        assert!(Environment::Prod.is_prod());
    }
}
