use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use threadboard_web::password::PasswordScheme;

/// Server settings read from `THREADBOARD_*` environment variables.
///
/// The session-signing key is not configurable; it is drawn fresh on every
/// start.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub password_scheme: PasswordScheme,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("THREADBOARD_HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = match lookup("THREADBOARD_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("THREADBOARD_PORT is not a port number: {}", raw))?,
            None => 5000,
        };
        let db_path = lookup("THREADBOARD_DB_PATH")
            .unwrap_or_else(|| "database.db".into())
            .into();
        let password_scheme = match lookup("THREADBOARD_PASSWORD_SCHEME") {
            Some(raw) => raw
                .parse::<PasswordScheme>()
                .context("THREADBOARD_PASSWORD_SCHEME")?,
            None => PasswordScheme::default(),
        };

        Ok(Self {
            host,
            port,
            db_path,
            password_scheme,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_path, PathBuf::from("database.db"));
        assert_eq!(config.password_scheme, PasswordScheme::Plaintext);
        assert_eq!(config.addr().unwrap().port(), 5000);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("THREADBOARD_HOST", "0.0.0.0"),
            ("THREADBOARD_PORT", "8080"),
            ("THREADBOARD_DB_PATH", "/tmp/board.db"),
            ("THREADBOARD_PASSWORD_SCHEME", "argon2"),
        ])
        .unwrap();
        assert_eq!(config.addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.db_path, PathBuf::from("/tmp/board.db"));
        assert_eq!(config.password_scheme, PasswordScheme::Argon2);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("THREADBOARD_PORT", "eighty")]).is_err());
        assert!(config(&[("THREADBOARD_PASSWORD_SCHEME", "rot13")]).is_err());
        assert!(config(&[("THREADBOARD_HOST", "not a host")]).unwrap().addr().is_err());
    }
}
