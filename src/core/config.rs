//! Configuration management for the MCP server.
//!
//! Settings are read once at startup from environment variables (optionally
//! seeded from a `.env` file) and then shared immutably as `Arc<Config>`.
//! Each backend family has its own section; a section whose required field
//! is empty reports itself as not configured.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// MySQL connection settings.
    pub mysql: DatabaseConfig,

    /// PostgreSQL connection settings.
    pub postgres: DatabaseConfig,

    /// MongoDB connection settings.
    pub mongo: MongoConfig,

    /// GitHub repository scope and credentials.
    pub github: GithubConfig,

    /// Generic HTTP API settings.
    pub custom_api: CustomApiConfig,

    /// Local git sandbox settings.
    pub local_git: LocalGitConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Connection settings shared by the relational engines.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Database name. Empty means the backend is not configured.
    pub database: String,
}

impl DatabaseConfig {
    fn with_defaults(port: u16, user: &str) -> Self {
        Self {
            host: "localhost".to_string(),
            port,
            user: user.to_string(),
            password: String::new(),
            database: String::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.database.is_empty()
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &redact(&self.password))
            .field("database", &self.database)
            .finish()
    }
}

/// MongoDB settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    /// Full connection string; takes precedence over host and port.
    pub uri: Option<String>,
}

impl MongoConfig {
    pub fn is_configured(&self) -> bool {
        !self.database.is_empty()
    }

    /// The connection string used to open a client.
    pub fn connection_uri(&self) -> String {
        match &self.uri {
            Some(uri) => uri.clone(),
            None => format!("mongodb://{}:{}", self.host, self.port),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27017,
            database: String::new(),
            uri: None,
        }
    }
}

impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Connection strings may embed credentials.
        f.debug_struct("MongoConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("uri", &self.uri.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// GitHub settings. All operations are scoped to `owner/repo`.
#[derive(Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default, skip_serializing)]
    pub token: String,
    pub owner: String,
    pub repo: String,
    /// REST API root, overridable for GitHub Enterprise.
    pub api_url: String,
}

impl GithubConfig {
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner: String::new(),
            repo: String::new(),
            api_url: "https://api.github.com".to_string(),
        }
    }
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &redact(&self.token))
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Generic HTTP API settings.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CustomApiConfig {
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Static headers sent with every request.
    pub headers: HashMap<String, String>,
}

impl CustomApiConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }
}

impl std::fmt::Debug for CustomApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Header values often carry tokens too, so only names are shown.
        let mut header_names: Vec<_> = self.headers.keys().collect();
        header_names.sort();
        f.debug_struct("CustomApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("headers", &header_names)
            .finish()
    }
}

/// Local git sandbox settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalGitConfig {
    /// Root directory every repository path must stay beneath.
    pub base_path: Option<PathBuf>,
    pub default_branch: String,
}

impl Default for LocalGitConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            default_branch: "main".to_string(),
        }
    }
}

fn redact(secret: &str) -> Option<&'static str> {
    (!secret.is_empty()).then_some("[REDACTED]")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "universal-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            mysql: DatabaseConfig::with_defaults(3306, "root"),
            postgres: DatabaseConfig::with_defaults(5432, "postgres"),
            mongo: MongoConfig::default(),
            github: GithubConfig::default(),
            custom_api: CustomApiConfig::default(),
            local_git: LocalGitConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`). Backends use their own prefixes:
    /// `MYSQL_*`, `POSTGRES_*`, `MONGO_*`, `GITHUB_*`, `CUSTOM_API_*` and
    /// `LOCAL_GIT_*`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        load_database("MYSQL", &mut config.mysql);
        load_database("POSTGRES", &mut config.postgres);

        set_string("MONGO_HOST", &mut config.mongo.host);
        set_parsed("MONGO_PORT", &mut config.mongo.port);
        set_string("MONGO_DATABASE", &mut config.mongo.database);
        config.mongo.uri = std::env::var("MONGO_URI").ok().filter(|v| !v.is_empty());

        set_string("GITHUB_TOKEN", &mut config.github.token);
        set_string("GITHUB_OWNER", &mut config.github.owner);
        set_string("GITHUB_REPO", &mut config.github.repo);
        set_string("GITHUB_API_URL", &mut config.github.api_url);

        set_string("CUSTOM_API_URL", &mut config.custom_api.base_url);
        set_string("CUSTOM_API_KEY", &mut config.custom_api.api_key);
        if let Ok(raw) = std::env::var("CUSTOM_API_HEADERS") {
            config.custom_api.headers = parse_headers(&raw);
        }

        if let Ok(base_path) = std::env::var("LOCAL_GIT_BASE_PATH") {
            if !base_path.is_empty() {
                config.local_git.base_path = Some(PathBuf::from(base_path));
            }
        }
        set_string("LOCAL_GIT_DEFAULT_BRANCH", &mut config.local_git.default_branch);

        config
    }

    /// Log which backend families are configured.
    pub fn log_backends(&self) {
        let backends = [
            ("mysql", self.mysql.is_configured()),
            ("postgresql", self.postgres.is_configured()),
            ("mongodb", self.mongo.is_configured()),
            ("github", self.github.is_configured()),
            ("custom_api", self.custom_api.is_configured()),
            ("local_git", self.local_git.base_path.is_some()),
        ];
        for (name, configured) in backends {
            if configured {
                info!(backend = name, "Backend configured");
            } else {
                info!(backend = name, "Backend not configured, its tools will report an error");
            }
        }
    }
}

fn load_database(prefix: &str, target: &mut DatabaseConfig) {
    set_string(&format!("{prefix}_HOST"), &mut target.host);
    set_parsed(&format!("{prefix}_PORT"), &mut target.port);
    set_string(&format!("{prefix}_USER"), &mut target.user);
    set_string(&format!("{prefix}_PASSWORD"), &mut target.password);
    set_string(&format!("{prefix}_DATABASE"), &mut target.database);
}

fn set_string(key: &str, target: &mut String) {
    if let Ok(value) = std::env::var(key) {
        *target = value;
    }
}

fn set_parsed<T: FromStr + std::fmt::Display>(key: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => warn!("Invalid value '{}' for {}, keeping {}", raw, key, target),
        }
    }
}

/// Parse `CUSTOM_API_HEADERS`, a JSON object of header names to values.
/// Non-string values are stringified; anything that is not an object is
/// ignored with a warning.
fn parse_headers(raw: &str) -> HashMap<String, String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect(),
        Ok(_) => {
            warn!("CUSTOM_API_HEADERS must be a JSON object, ignoring it");
            HashMap::new()
        }
        Err(e) => {
            warn!("CUSTOM_API_HEADERS is not valid JSON ({}), ignoring it", e);
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_database_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MYSQL_HOST", "db.internal");
            std::env::set_var("MYSQL_PORT", "3307");
            std::env::set_var("MYSQL_DATABASE", "shop");
        }
        let config = Config::from_env();
        assert_eq!(config.mysql.host, "db.internal");
        assert_eq!(config.mysql.port, 3307);
        assert_eq!(config.mysql.user, "root");
        assert!(config.mysql.is_configured());
        unsafe {
            std::env::remove_var("MYSQL_HOST");
            std::env::remove_var("MYSQL_PORT");
            std::env::remove_var("MYSQL_DATABASE");
        }
    }

    #[test]
    fn test_invalid_port_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("POSTGRES_PORT", "not-a-port");
        }
        let config = Config::from_env();
        assert_eq!(config.postgres.port, 5432);
        unsafe {
            std::env::remove_var("POSTGRES_PORT");
        }
    }

    #[test]
    fn test_defaults_are_not_configured() {
        let config = Config::default();
        assert!(!config.mysql.is_configured());
        assert!(!config.postgres.is_configured());
        assert!(!config.mongo.is_configured());
        assert!(!config.github.is_configured());
        assert!(!config.custom_api.is_configured());
        assert!(config.local_git.base_path.is_none());
        assert_eq!(config.local_git.default_branch, "main");
        assert_eq!(config.github.api_url, "https://api.github.com");
    }

    #[test]
    fn test_parse_headers() {
        let headers = parse_headers(r#"{"X-Tenant": "acme", "X-Retries": 3}"#);
        assert_eq!(headers.get("X-Tenant").map(String::as_str), Some("acme"));
        assert_eq!(headers.get("X-Retries").map(String::as_str), Some("3"));

        assert!(parse_headers("[1, 2]").is_empty());
        assert!(parse_headers("{not json").is_empty());
    }

    #[test]
    fn test_mongo_uri_precedence() {
        let mut mongo = MongoConfig::default();
        assert_eq!(mongo.connection_uri(), "mongodb://localhost:27017");
        mongo.uri = Some("mongodb://user:pw@replica/?tls=true".to_string());
        assert_eq!(mongo.connection_uri(), "mongodb://user:pw@replica/?tls=true");
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let mut config = Config::default();
        config.mysql.password = "mysql_secret".to_string();
        config.github.token = "ghp_secret".to_string();
        config.custom_api.api_key = "api_secret".to_string();
        config
            .custom_api
            .headers
            .insert("X-Auth".to_string(), "header_secret".to_string());
        config.mongo.uri = Some("mongodb://u:mongo_secret@h".to_string());

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("REDACTED"));
        for secret in ["mysql_secret", "ghp_secret", "api_secret", "header_secret", "mongo_secret"] {
            assert!(!debug_str.contains(secret), "{secret} leaked");
        }
        assert!(debug_str.contains("X-Auth"));
    }
}
