use std::io::ErrorKind;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_BASE_PATH: &str = "/api/accounts";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Route prefix of the account resource, e.g. `/api/accounts` or `/api/bank-accounts`.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Browser origins allowed by CORS; empty allows any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
            base_path: default_base_path(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Apply pending schema migrations when the server starts.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_base_path() -> String { DEFAULT_BASE_PATH.to_string() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_run_migrations() -> bool { true }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// `Ok(None)` when the file does not exist; unreadable or malformed files are errors.
pub fn read_config_file(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => load_from_str(&content)
            .with_context(|| format!("invalid config file {path}"))
            .map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!("cannot read config file {path}: {e}")),
    }
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file first; env vars only when the file does not exist.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = match read_config_file(&config_path())? {
            Some(cfg) => cfg,
            None => Self::from_env(),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut server = ServerConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            server.worker_threads = Some(w);
        }
        if let Ok(base) = std::env::var("ACCOUNTS_BASE_PATH") {
            server.base_path = base;
        }
        if let Ok(origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
            server.cors_allowed_origins = origins.split(',').map(str::to_string).collect();
        }
        Self { server, database: DatabaseConfig::from_env() }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        // URL may come from DATABASE_URL when the file leaves it empty
        self.database.normalize_from_env();
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        self.base_path = normalize_base_path(&self.base_path)?;
        self.cors_allowed_origins = normalize_origins(&self.cors_allowed_origins)?;
        Ok(())
    }
}

/// Trims entries, drops blanks and trailing slashes; each origin must be `http(s)://host[:port]`.
pub fn normalize_origins(raw: &[String]) -> Result<Vec<String>> {
    let mut out = Vec::with_capacity(raw.len());
    for origin in raw {
        let origin = origin.trim().trim_end_matches('/');
        if origin.is_empty() {
            continue;
        }
        let rest = origin
            .strip_prefix("http://")
            .or_else(|| origin.strip_prefix("https://"))
            .ok_or_else(|| anyhow!("server.cors_allowed_origins entry {origin} must start with http:// or https://"))?;
        if rest.is_empty() || rest.contains('/') || rest.contains(char::is_whitespace) {
            return Err(anyhow!("server.cors_allowed_origins entry {origin} must be scheme://host[:port]"));
        }
        out.push(origin.to_string());
    }
    Ok(out)
}

/// Canonical form is `/segment[/segment...]` with no trailing slash and no path parameters.
pub fn normalize_base_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(anyhow!("server.base_path must not be empty or '/'"));
    }
    if !trimmed.starts_with('/') {
        return Err(anyhow!("server.base_path must start with '/'"));
    }
    if trimmed.contains(':') || trimmed.contains('*') || trimmed.contains("//") {
        return Err(anyhow!("server.base_path must be a literal path, got {trimmed}"));
    }
    Ok(trimmed.to_string())
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.normalize_from_env();
        cfg
    }

    /// Private SQLite database living as long as the pool; one connection so every query sees it.
    pub fn sqlite_in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }

    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.trim().to_lowercase().starts_with("sqlite:")
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || self.is_sqlite()) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let cfg = load_from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            base_path = "/api/bank-accounts/"

            [database]
            url = "postgres://u:p@localhost:5432/bank"
            max_connections = 5
            run_migrations = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.min_connections, 2);
        assert!(!cfg.database.run_migrations);

        let mut cfg = cfg;
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.base_path, "/api/bank-accounts");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn base_path_defaults_when_omitted() {
        let cfg = load_from_str("[server]\nhost = \"127.0.0.1\"\nport = 8080\n").unwrap();
        assert_eq!(cfg.server.base_path, DEFAULT_BASE_PATH);
    }

    #[test]
    fn base_path_rules() {
        assert_eq!(normalize_base_path(" /api/accounts ").unwrap(), "/api/accounts");
        assert!(normalize_base_path("/").is_err());
        assert!(normalize_base_path("api/accounts").is_err());
        assert!(normalize_base_path("/api/:id").is_err());
        assert!(normalize_base_path("/api//accounts").is_err());
    }

    #[test]
    fn database_url_schemes() {
        let mut db = DatabaseConfig { url: "mysql://localhost/bank".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
        db.url = "sqlite::memory:".into();
        assert!(db.validate().is_ok());
        db.url = "postgresql://localhost/bank".into();
        assert!(db.validate().is_ok());
    }

    #[test]
    fn pool_bounds_are_checked() {
        let mut db = DatabaseConfig::sqlite_in_memory();
        db.min_connections = 0;
        assert!(db.validate().is_err());
        db.min_connections = 3;
        db.max_connections = 2;
        assert!(db.validate().is_err());
    }

    #[test]
    fn origins_are_normalized() {
        let raw = vec![" http://localhost:4200/ ".to_string(), "".to_string(), "https://bank.example".to_string()];
        assert_eq!(
            normalize_origins(&raw).unwrap(),
            vec!["http://localhost:4200".to_string(), "https://bank.example".to_string()]
        );
        assert!(normalize_origins(&["localhost:4200".to_string()]).is_err());
        assert!(normalize_origins(&["http://localhost:4200/app".to_string()]).is_err());
    }

    fn write_temp(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("bank-accounts-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        let path = std::env::temp_dir().join(format!("bank-accounts-{}-absent.toml", std::process::id()));
        assert!(read_config_file(&path.to_string_lossy()).unwrap().is_none());
    }

    #[test]
    fn malformed_config_file_is_reported() {
        let path = write_temp("broken", "[server\nport = 'x'");
        let err = read_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("invalid config file"), "{err}");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn existing_config_file_is_used() {
        let path = write_temp("valid", "[server]\nhost = \"0.0.0.0\"\nport = 9100\ncors_allowed_origins = [\"http://localhost:4200\"]\n");
        let cfg = read_config_file(&path).unwrap().expect("file present");
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.cors_allowed_origins, vec!["http://localhost:4200".to_string()]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn zero_port_rejected() {
        let mut server = ServerConfig { port: 0, ..ServerConfig::default() };
        assert!(server.normalize().is_err());
    }
}
