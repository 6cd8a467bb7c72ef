use serde::{Deserialize, Serialize};
use crate::domain::entities::{Commit, FeedEntry, Repository};
use crate::ports::queue::SyncJob;

/// 仓库 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryDto {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub full_name: String,
    pub html_url: String,
    pub last_synced_at: Option<String>,
    /// 仅在单个仓库详情中返回
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_count: Option<i64>,
}

impl From<Repository> for RepositoryDto {
    fn from(repo: Repository) -> Self {
        Self {
            full_name: repo.full_name(),
            id: repo.id,
            name: repo.name,
            owner: repo.owner,
            html_url: repo.html_url,
            last_synced_at: repo.last_synced_at.map(|dt| dt.to_rfc3339()),
            commit_count: None,
        }
    }
}

/// 提交 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDto {
    pub sha: String,
    pub short_sha: String,
    pub repository_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    pub summary: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub date: String,
    pub html_url: String,
}

impl From<Commit> for CommitDto {
    fn from(commit: Commit) -> Self {
        Self {
            sha: commit.sha.clone(),
            short_sha: commit.short_sha().to_string(),
            summary: commit.summary().to_string(),
            repository_id: commit.repository_id,
            repository_name: None,
            message: commit.message,
            author_name: commit.author_name,
            author_email: commit.author_email,
            date: commit.date.to_rfc3339(),
            html_url: commit.html_url,
        }
    }
}

impl From<FeedEntry> for CommitDto {
    fn from(entry: FeedEntry) -> Self {
        Self {
            repository_name: Some(entry.repository_name),
            ..CommitDto::from(entry.commit)
        }
    }
}

/// 已入队任务的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAcceptedDto {
    pub status: String,
    pub job: SyncJob,
}

impl JobAcceptedDto {
    pub fn queued(job: SyncJob) -> Self {
        Self {
            status: "queued".to_string(),
            job,
        }
    }
}
