use serde::{Deserialize, Serialize};
use std::fmt;
use crate::shared::error::FeedError;

/// 提交 SHA 值对象
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitSha(String);

impl CommitSha {
    pub fn new(sha: &str) -> Result<Self, FeedError> {
        if sha.len() != 40 {
            return Err(FeedError::InvalidSha(format!("length {}", sha.len())));
        }

        if !sha.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FeedError::InvalidSha(format!("non-hex characters in {}", sha)));
        }

        Ok(Self(sha.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CommitSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 提交作者信息缺失时使用的占位值
pub struct AuthorFallback;

impl AuthorFallback {
    pub const NAME: &'static str = "Unknown";
    pub const EMAIL: &'static str = "unknown@example.com";
}
