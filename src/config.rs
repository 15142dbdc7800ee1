use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

use crate::services::{openai, replicate};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// Data URLs of phone photos easily exceed axum's 2 MB default
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub replicate_api_token: String,
    pub replicate_base_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub bind_addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let replicate_api_token = get("REPLICATE_API_TOKEN").context("REPLICATE_API_TOKEN must be set in .env file")?;
        let openai_api_key = get("OPENAI_API_KEY").context("OPENAI_API_KEY must be set in .env file")?;

        let openai_model = get("OPENAI_MODEL").unwrap_or_else(|| openai::DEFAULT_MODEL.to_string());
        let replicate_base_url = get("REPLICATE_BASE_URL").unwrap_or_else(|| replicate::DEFAULT_BASE_URL.to_string());
        let openai_base_url = get("OPENAI_BASE_URL").unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

        let max_body_bytes = match get("MAX_BODY_BYTES") {
            Some(v) => v.trim().parse::<usize>().context("MAX_BODY_BYTES must be a byte count")?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            replicate_api_token,
            replicate_base_url,
            openai_api_key,
            openai_model,
            openai_base_url,
            bind_addr,
            max_body_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("REPLICATE_API_TOKEN", "r8_x"), ("OPENAI_API_KEY", "sk-x")])).unwrap();

        assert_eq!(config.replicate_api_token, "r8_x");
        assert_eq!(config.openai_api_key, "sk-x");
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.replicate_base_url, "https://api.replicate.com");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("REPLICATE_API_TOKEN", "r8_x"),
            ("OPENAI_API_KEY", "sk-x"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("MAX_BODY_BYTES", "1024"),
        ]))
        .unwrap();

        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_body_bytes, 1024);
    }

    #[test]
    fn test_missing_token_fails() {
        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-x")])).unwrap_err();
        assert!(err.to_string().contains("REPLICATE_API_TOKEN"));

        let err = Config::from_lookup(lookup(&[("REPLICATE_API_TOKEN", "r8_x"), ("OPENAI_API_KEY", " ")])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_invalid_values_fail() {
        let base = [("REPLICATE_API_TOKEN", "r8_x"), ("OPENAI_API_KEY", "sk-x")];

        let mut pairs = base.to_vec();
        pairs.push(("BIND_ADDR", "not-an-addr"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = base.to_vec();
        pairs.push(("MAX_BODY_BYTES", "ten"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }
}
