use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 仓库实体，id 由 GitHub 分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub html_url: String,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl Repository {
    pub fn new(id: i64, name: String, owner: String, html_url: String) -> Self {
        Self {
            id,
            name,
            owner,
            html_url,
            last_synced_at: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// 提交实体，sha 全局唯一且写入后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub repository_id: i64,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub date: DateTime<Utc>,
    pub html_url: String,
}

impl Commit {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    /// 提交信息的第一行
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// 带仓库名的提交，用于动态流查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub commit: Commit,
    pub repository_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(sha: &str, message: &str) -> Commit {
        Commit {
            sha: sha.to_string(),
            repository_id: 1,
            message: message.to_string(),
            author_name: "a".into(),
            author_email: "a@example.com".into(),
            date: Utc::now(),
            html_url: String::new(),
        }
    }

    #[test]
    fn short_sha_and_summary() {
        let c = commit("0123456789abcdef0123456789abcdef01234567", "Fix bug\n\nLonger body");
        assert_eq!(c.short_sha(), "0123456");
        assert_eq!(c.summary(), "Fix bug");

        let c = commit("abc", "");
        assert_eq!(c.short_sha(), "abc");
        assert_eq!(c.summary(), "");
    }

    #[test]
    fn full_name_joins_owner_and_name() {
        let repo = Repository::new(7, "hello".into(), "octocat".into(), "https://github.com/octocat/hello".into());
        assert_eq!(repo.full_name(), "octocat/hello");
        assert!(repo.last_synced_at.is_none());
    }
}
