//! Runtime settings read from the environment.

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Where todo rows live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local map; contents are lost on restart.
    Memory,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub api_key: String,
    pub storage: StorageBackend,
    /// Required when `storage` is Postgres.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub body_limit: usize,
    pub run_migrations: bool,
    pub create_database: bool,
}

impl Settings {
    /// Load from process environment. Call `dotenvy::dotenv()` first if a `.env` file should apply.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("API_KEY").ok_or(ConfigError::Missing("API_KEY"))?;

        let storage = match get("STORAGE").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE",
                    reason: format!("expected 'postgres' or 'memory', got '{}'", other),
                })
            }
        };

        let database_url = get("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => parse_number::<u32>("DB_MAX_CONNECTIONS", &v)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }

        let body_limit = match get("BODY_LIMIT_BYTES") {
            Some(v) => parse_number::<usize>("BODY_LIMIT_BYTES", &v)?,
            None => DEFAULT_BODY_LIMIT,
        };

        let run_migrations = parse_flag("RUN_MIGRATIONS", get("RUN_MIGRATIONS"), true)?;
        let create_database = parse_flag("CREATE_DATABASE", get("CREATE_DATABASE"), true)?;

        Ok(Settings {
            api_key,
            storage,
            database_url,
            bind_addr,
            max_connections,
            body_limit,
            run_migrations,
            create_database,
        })
    }
}

fn parse_number<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn parse_flag(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_apply() {
        let s = load(&[("API_KEY", "secret"), ("DATABASE_URL", "postgres://localhost/todos")]).unwrap();
        assert_eq!(s.storage, StorageBackend::Postgres);
        assert_eq!(s.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(s.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(s.body_limit, DEFAULT_BODY_LIMIT);
        assert!(s.run_migrations);
        assert!(s.create_database);
    }

    #[test]
    fn api_key_is_required() {
        let err = load(&[("DATABASE_URL", "postgres://localhost/todos")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("API_KEY")));
    }

    #[test]
    fn postgres_needs_database_url() {
        let err = load(&[("API_KEY", "k")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn memory_storage_needs_no_database() {
        let s = load(&[("API_KEY", "k"), ("STORAGE", "memory"), ("RUN_MIGRATIONS", "0")]).unwrap();
        assert_eq!(s.storage, StorageBackend::Memory);
        assert!(s.database_url.is_none());
        assert!(!s.run_migrations);
    }

    #[test]
    fn rejects_bad_values() {
        let base = [("API_KEY", "k"), ("STORAGE", "memory")];
        let with = |extra: (&'static str, &'static str)| {
            let mut v = base.to_vec();
            v.push(extra);
            load(&v)
        };
        assert!(matches!(
            with(("STORAGE", "redis")),
            Err(ConfigError::Invalid { key: "STORAGE", .. })
        ));
        assert!(matches!(
            with(("DB_MAX_CONNECTIONS", "0")),
            Err(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", .. })
        ));
        assert!(matches!(
            with(("BIND_ADDR", "nowhere")),
            Err(ConfigError::Invalid { key: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            with(("RUN_MIGRATIONS", "maybe")),
            Err(ConfigError::Invalid { key: "RUN_MIGRATIONS", .. })
        ));
    }
}
