//! 服务层测试用的桩和 GitHub 响应样例

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use crate::infrastructure::sqlite::commit_repo::SqliteCommitRepository;
use crate::infrastructure::sqlite::memory_pool;
use crate::infrastructure::sqlite::repository_repo::SqliteRepositoryRepository;
use crate::ports::queue::{JobQueue, SyncJob};
use crate::shared::config::{Config, GitHubConfig};
use crate::shared::result::Result;

/// 只记录 submit 调用的队列
#[derive(Default)]
pub struct RecordingQueue {
    jobs: Mutex<Vec<SyncJob>>,
}

impl RecordingQueue {
    pub fn jobs(&self) -> Vec<SyncJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for RecordingQueue {
    async fn submit(&self, job: SyncJob) -> Result<()> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

pub struct Stores {
    pub repositories: Arc<SqliteRepositoryRepository>,
    pub commits: Arc<SqliteCommitRepository>,
}

pub async fn stores() -> Stores {
    let pool = memory_pool().await;
    Stores {
        repositories: Arc::new(SqliteRepositoryRepository::new(pool.clone())),
        commits: Arc::new(SqliteCommitRepository::new(pool)),
    }
}

/// 指向 mock server 的配置，不重试
pub fn config_for(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.github = GitHubConfig {
        api_base_url: server_uri.to_string(),
        username: "octocat".to_string(),
        token: Some("test-token".to_string()),
        max_retries: 0,
        retry_backoff_ms: 1,
        ..GitHubConfig::default()
    };
    config
}

pub fn repo_payload(server_uri: &str, id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("octocat/{}", name),
        "owner": { "login": "octocat", "id": 1 },
        "html_url": format!("https://github.com/octocat/{}", name),
        "commits_url": format!("{}/repos/octocat/{}/commits{{/sha}}", server_uri, name),
    })
}

pub fn sha(seed: u32) -> String {
    format!("{:040x}", seed)
}

pub fn commit_payload(seed: u32, message: &str) -> Value {
    json!({
        "sha": sha(seed),
        "html_url": format!("https://github.com/octocat/hello/commit/{}", sha(seed)),
        "commit": {
            "message": message,
            "author": {
                "name": "Mona Lisa",
                "email": "mona@example.com",
                "date": "2024-05-01T12:00:00Z"
            },
            "committer": {
                "name": "GitHub",
                "email": "noreply@github.com",
                "date": "2024-05-01T12:05:00Z"
            }
        }
    })
}
