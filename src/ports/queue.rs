use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::shared::result::Result;

/// 后台同步任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncJob {
    /// 同步账号下的所有仓库，并为每个仓库派发 SyncCommits
    SyncRepositories,
    /// 同步单个仓库的提交。commits_url 为 GitHub 的模板形式（带 `{/sha}`）
    SyncCommits {
        repository_id: i64,
        commits_url: String,
    },
}

impl SyncJob {
    pub fn name(&self) -> &'static str {
        match self {
            SyncJob::SyncRepositories => "sync_repositories",
            SyncJob::SyncCommits { .. } => "sync_commits",
        }
    }
}

/// 任务队列接口。submit 返回时任务已经入队
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn submit(&self, job: SyncJob) -> Result<()>;
}
