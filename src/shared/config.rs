use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use crate::shared::error::FeedError;
use crate::shared::result::Result;

/// 应用配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub sync: SyncConfig,
    pub cache: CacheConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub sqlite_path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("ghfeed.db"),
            max_connections: 10,
        }
    }
}

/// GitHub API 配置
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_base_url: String,
    pub username: String,
    pub token: Option<String>,
    pub accept: String,
    pub request_timeout_secs: u64,
    pub per_page: u32,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    /// 翻页之间的固定等待，0 表示不等待
    pub page_delay_ms: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            username: String::new(),
            token: None,
            accept: "application/vnd.github.v3+json".to_string(),
            request_timeout_secs: 10,
            per_page: 100,
            max_retries: 2,
            retry_backoff_ms: 500,
            page_delay_ms: 0,
        }
    }
}

// token 不能出现在日志里
impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_base_url", &self.api_base_url)
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("accept", &self.accept)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("per_page", &self.per_page)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("page_delay_ms", &self.page_delay_ms)
            .finish()
    }
}

/// 同步任务配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub workers: usize,
    /// 分页抓取中途失败时是否仍然更新 last_synced_at
    pub mark_partial_as_synced: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 3600,
            workers: 4,
            mark_partial_as_synced: false,
        }
    }
}

/// 缓存配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_capacity: u64,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1000,
            ttl_secs: 60,
        }
    }
}

/// 命令行对配置文件的覆盖项
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub bind_address: Option<SocketAddr>,
    pub username: Option<String>,
    pub token: Option<String>,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| FeedError::Config(e.to_string()))?;
        Ok(config)
    }

    /// 从命令行参数和文件加载配置
    pub fn from_args_and_file(path: &Path, overrides: ConfigOverrides) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            Config::default()
        };

        // 命令行参数覆盖配置文件
        if let Some(db_path) = overrides.db_path {
            config.database.sqlite_path = db_path;
        }
        if let Some(bind_address) = overrides.bind_address {
            config.server.bind_address = bind_address;
        }
        if let Some(username) = overrides.username {
            config.github.username = username;
        }
        if let Some(token) = overrides.token.filter(|t| !t.is_empty()) {
            config.github.token = Some(token);
        }

        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.github.api_base_url)
            .map_err(|e| FeedError::Config(format!("invalid github.api_base_url: {}", e)))?;

        if self.sync.enabled && self.github.username.trim().is_empty() {
            return Err(FeedError::Config(
                "github.username is required when sync is enabled (use --username or GITHUB_USERNAME)".into(),
            ));
        }
        if self.sync.workers == 0 {
            return Err("sync.workers must be at least 1".into());
        }
        if !(1..=100).contains(&self.github.per_page) {
            return Err("github.per_page must be between 1 and 100".into());
        }
        if self.server.cors_origins.is_empty() {
            return Err("server.cors_origins must not be empty".into());
        }

        Ok(())
    }
}
