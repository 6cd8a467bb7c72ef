use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::domain::entities::Repository;
use crate::shared::result::Result;

/// 仓库仓储接口（Repository Pattern）
#[async_trait]
pub trait RepositoryPort: Send + Sync {
    /// 根据 ID 查找仓库
    async fn find_by_id(&self, id: i64) -> Result<Option<Repository>>;

    /// 列出所有仓库（按名称排序）
    async fn list_all(&self) -> Result<Vec<Repository>>;

    /// 按 id 插入或更新 name/owner/html_url，不修改 last_synced_at
    async fn upsert(&self, repo: &Repository) -> Result<()>;

    /// 更新同步时间
    async fn mark_synced(&self, id: i64, at: DateTime<Utc>) -> Result<()>;
}
