use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use crate::shared::result::Result;

/// 缓存接口，过期时间由实现统一配置
#[async_trait]
pub trait CachePort: Send + Sync {
    /// 获取缓存值
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>>;

    /// 设置缓存值
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<()>;
}
