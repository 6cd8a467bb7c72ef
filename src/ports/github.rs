use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// 分页抓取接口：从初始 URL 开始沿着 `rel="next"` 一直抓到最后一页
#[async_trait]
pub trait PaginatedFetchPort: Send + Sync {
    async fn fetch_all(&self, url: Url) -> FetchOutcome;
}

/// 分页抓取结果
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// 所有页的元素，按抓取顺序拼接
    pub items: Vec<Value>,
    /// 成功抓取的页数
    pub pages: usize,
    pub status: FetchStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Complete,
    /// 中途失败，items 只包含失败前的页
    Partial { failed_url: String, reason: String },
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == FetchStatus::Complete
    }
}
