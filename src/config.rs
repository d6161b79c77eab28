use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "HealthGuide";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Port used when neither `HEALTHGUIDE_BIND` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 5000;

const ENV_BIND: &str = "HEALTHGUIDE_BIND";
const ENV_PORT: &str = "PORT";
const ENV_DB_PATH: &str = "HEALTHGUIDE_DB_PATH";
const ENV_KNOWLEDGE_BASE: &str = "HEALTHGUIDE_KNOWLEDGE_BASE";
const ENV_JWT_SECRET: &str = "HEALTHGUIDE_JWT_SECRET";

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "healthguide=info,healthguide_lib=info,tower_http=warn"
}

/// Get the application data directory
/// ~/HealthGuide/ on all platforms, falling back to the working directory
/// when no home directory can be determined (containers, CI).
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite database location.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("healthguide.db")
}

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    /// Knowledge base override; `None` uses the bundled file.
    pub knowledge_base_path: Option<PathBuf>,
    /// HS256 secret for bearer tokens; `None` generates an ephemeral one.
    pub jwt_secret: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

impl ServerConfig {
    /// Read settings from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match non_empty(ENV_BIND) {
            Some(value) => value.parse::<SocketAddr>().map_err(|_| ConfigError::InvalidValue {
                var: ENV_BIND,
                value,
            })?,
            None => {
                let port = match non_empty(ENV_PORT) {
                    Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                        var: ENV_PORT,
                        value,
                    })?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)
            }
        };

        Ok(Self {
            bind_addr,
            db_path: non_empty(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            knowledge_base_path: non_empty(ENV_KNOWLEDGE_BASE).map(PathBuf::from),
            jwt_secret: non_empty(ENV_JWT_SECRET),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with("HealthGuide"));
    }

    #[test]
    fn default_db_under_app_data() {
        let db = default_db_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("healthguide.db"));
    }

    #[test]
    fn defaults_when_environment_empty() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert!(config.bind_addr.ip().is_unspecified());
        assert_eq!(config.db_path, default_db_path());
        assert!(config.knowledge_base_path.is_none());
        assert!(config.jwt_secret.is_none());
    }

    #[test]
    fn port_variable_overrides_default() {
        let config = ServerConfig::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn bind_takes_precedence_over_port() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HEALTHGUIDE_BIND", "127.0.0.1:9000"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn invalid_port_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn blank_values_ignored() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HEALTHGUIDE_JWT_SECRET", "  "),
            ("HEALTHGUIDE_DB_PATH", "/tmp/hg.db"),
            ("HEALTHGUIDE_KNOWLEDGE_BASE", "/etc/hg/symptoms.json"),
        ]))
        .unwrap();
        assert!(config.jwt_secret.is_none());
        assert_eq!(config.db_path, PathBuf::from("/tmp/hg.db"));
        assert_eq!(
            config.knowledge_base_path,
            Some(PathBuf::from("/etc/hg/symptoms.json"))
        );
    }
}
