use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_ADDR: &str = "0.0.0.0:8053";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Process settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub addr: SocketAddr,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set to a Postgres instance")?;
        Self::from_parts(
            database_url,
            std::env::var("DASHBOARD_ADDR").ok(),
            std::env::var("DATABASE_MAX_CONNECTIONS").ok(),
        )
    }

    fn from_parts(
        database_url: String,
        addr: Option<String>,
        max_connections: Option<String>,
    ) -> anyhow::Result<Self> {
        let addr_text = addr.unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_text
            .parse()
            .with_context(|| format!("invalid DASHBOARD_ADDR: {addr_text}"))?;

        let max_connections = match max_connections {
            Some(text) => text
                .parse()
                .with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS: {text}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            addr,
            max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_parts("postgres://localhost/db".to_string(), None, None).unwrap();
        assert_eq!(config.addr.port(), 8053);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_parts(
            "postgres://localhost/db".to_string(),
            Some("127.0.0.1:9000".to_string()),
            Some("12".to_string()),
        )
        .unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.max_connections, 12);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = Config::from_parts("x".to_string(), Some("nowhere".to_string()), None)
            .unwrap_err();
        assert!(err.to_string().contains("DASHBOARD_ADDR"));

        let err = Config::from_parts("x".to_string(), None, Some("many".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
    }
}
