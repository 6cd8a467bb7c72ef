use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `GET /users/{user}/repos` 中的单个仓库
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
    pub id: i64,
    pub name: String,
    pub owner: GitHubOwner,
    pub html_url: String,
    pub commits_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
}

/// `GET /repos/{owner}/{repo}/commits` 中的单个提交
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubCommit {
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
    pub commit: GitHubCommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubCommitDetail {
    #[serde(default)]
    pub message: String,
    pub author: Option<GitHubSignature>,
    pub committer: Option<GitHubSignature>,
}

/// 作者/提交者签名，GitHub 不保证各字段都存在
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubSignature {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}
