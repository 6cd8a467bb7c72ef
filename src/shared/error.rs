use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// 统一的错误类型
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// SQLx 数据库错误
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// 迁移错误
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP 客户端错误
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON 错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL 解析错误
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// 缓存序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// 仓库未找到
    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    /// 提交未找到
    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    /// 无效的 SHA
    #[error("Invalid commit SHA: {0}")]
    InvalidSha(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 任务队列错误
    #[error("Queue error: {0}")]
    Queue(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 用于 Axum 的错误响应实现
impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            FeedError::RepositoryNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            FeedError::CommitNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            FeedError::InvalidSha(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            FeedError::Queue(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            FeedError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            FeedError::Sqlx(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
        };

        tracing::error!("Request error: {}", self);

        (status, message).into_response()
    }
}

impl From<String> for FeedError {
    fn from(s: String) -> Self {
        FeedError::Config(s)
    }
}

impl From<&str> for FeedError {
    fn from(s: &str) -> Self {
        FeedError::Config(s.to_string())
    }
}
