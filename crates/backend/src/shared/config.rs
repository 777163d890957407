use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "target/db/app.db".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Учётная запись администратора и срок жизни токена
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_admin")]
    pub admin_username: String,
    #[serde(default = "default_admin")]
    pub admin_password: String,
    #[serde(default = "default_token_hours")]
    pub access_token_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin(),
            admin_password: default_admin(),
            access_token_hours: default_token_hours(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    #[serde(default = "default_recent_log_limit")]
    pub recent_log_limit: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            recent_log_limit: default_recent_log_limit(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_admin() -> String {
    "admin".to_string()
}

fn default_token_hours() -> i64 {
    24
}

fn default_recent_log_limit() -> u64 {
    10
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[server]
port = 3000

[auth]
admin_username = "admin"
admin_password = "admin"
access_token_hours = 24

[gateway]
recent_log_limit = 10
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Конфигурация процесса; читается один раз.
/// Если файл битый: пишем ошибку и работаем на значениях по умолчанию.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config.toml, using defaults: {}", e);
            Config::default()
        }
    })
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> PathBuf {
    let db_path = Path::new(&config.database.path);

    if db_path.is_absolute() {
        return db_path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(db_path);
        }
    }

    PathBuf::from(&config.database.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.admin_username, "admin");
        assert_eq!(config.auth.access_token_hours, 24);
        assert_eq!(config.gateway.recent_log_limit, 10);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        // старый файл только с [database]
        let config = parse_config("[database]\npath = \"/var/lib/quote/app.db\"\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.gateway.recent_log_limit, 10);
        assert_eq!(
            get_database_path(&config),
            PathBuf::from("/var/lib/quote/app.db")
        );
    }

    #[test]
    fn test_partial_section() {
        let config = parse_config("[gateway]\nrecent_log_limit = 25\n[auth]\naccess_token_hours = 2\n")
            .unwrap();
        assert_eq!(config.gateway.recent_log_limit, 25);
        assert_eq!(config.auth.access_token_hours, 2);
        assert_eq!(config.auth.admin_password, "admin");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(parse_config("[server]\nport = \"many\"").is_err());
    }
}
