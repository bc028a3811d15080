use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "expense-tracker.toml";

/// Prefix for environment overrides, e.g. `EXPENSE_TRACKER__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "EXPENSE_TRACKER";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("expenses.db"),
        }
    }
}

/// An empty origin list allows any origin
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WebConfig {
    /// Browser client assets, served under `/static`
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("web"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the TOML file, then environment variables.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        builder.try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Environment overrides are process-wide; tests that call `load` take turns
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.database.path, PathBuf::from("expenses.db"));
        assert!(config.cors.allowed_origins.is_empty());
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 9090\n\n[cors]\nallowed_origins = [\"http://localhost:3000\"]").unwrap();
        file.flush().unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.web.static_dir, PathBuf::from("web"));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/expense-tracker.toml"))).is_err());
    }

    #[test]
    fn test_environment_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let vars = [
            ("EXPENSE_TRACKER__SERVER__PORT", "9100"),
            ("EXPENSE_TRACKER__DATABASE__PATH", "/tmp/env-expenses.db"),
            ("EXPENSE_TRACKER__CORS__ALLOWED_ORIGINS", "http://a.test,http://b.test"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let loaded = AppConfig::load(None);

        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let config = loaded.unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, PathBuf::from("/tmp/env-expenses.db"));
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://a.test", "http://b.test"]
        );
    }
}
