use async_trait::async_trait;
use crate::domain::entities::{Commit, FeedEntry};
use crate::shared::result::Result;

/// 提交搜索条件
#[derive(Debug, Clone, Default)]
pub struct CommitQuery {
    /// 匹配 message、作者名或 sha
    pub text: Option<String>,
    pub repository_name: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// 提交仓储接口
#[async_trait]
pub trait CommitPort: Send + Sync {
    /// 根据 sha 查找提交
    async fn find_by_sha(&self, sha: &str) -> Result<Option<Commit>>;

    /// 获取仓库的提交列表（分页，最新的在前）
    async fn list_by_repository(
        &self,
        repository_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Commit>>;

    /// 批量插入，sha 已存在的行保持不变。返回实际插入的条数
    async fn insert_many_if_absent(&self, commits: &[Commit]) -> Result<usize>;

    /// 最近的提交（带仓库名），按时间倒序
    async fn recent_with_repository(&self, limit: i64) -> Result<Vec<FeedEntry>>;

    /// 搜索提交
    async fn search(&self, query: &CommitQuery) -> Result<Vec<FeedEntry>>;

    /// 统计提交数量
    async fn count_by_repository(&self, repository_id: i64) -> Result<i64>;
}
