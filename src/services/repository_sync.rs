use std::sync::Arc;
use tracing::{info, warn};
use crate::domain::entities::Repository;
use crate::infrastructure::github::types::GitHubRepository;
use crate::infrastructure::github::GitHubEndpoints;
use crate::ports::github::PaginatedFetchPort;
use crate::ports::queue::{JobQueue, SyncJob};
use crate::ports::repository::RepositoryPort;
use crate::shared::config::Config;
use crate::shared::result::Result;

/// 仓库同步：拉取账号的仓库列表，逐个 upsert 后派发提交同步任务
pub struct RepositorySyncJob {
    config: Arc<Config>,
    endpoints: GitHubEndpoints,
    fetcher: Arc<dyn PaginatedFetchPort>,
    repository_store: Arc<dyn RepositoryPort>,
    queue: Arc<dyn JobQueue>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepositorySyncReport {
    pub pages: usize,
    pub fetched: usize,
    pub upserted: usize,
    pub malformed: usize,
    pub jobs_submitted: usize,
    /// 仓库列表是否完整抓取
    pub complete: bool,
}

impl RepositorySyncJob {
    pub fn new(
        config: Arc<Config>,
        endpoints: GitHubEndpoints,
        fetcher: Arc<dyn PaginatedFetchPort>,
        repository_store: Arc<dyn RepositoryPort>,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            config,
            endpoints,
            fetcher,
            repository_store,
            queue,
        }
    }

    pub async fn run(&self) -> Result<RepositorySyncReport> {
        let username = &self.config.github.username;
        info!("Starting GitHub sync for user: {}", username);

        let url = self.endpoints.owned_repositories(username)?;
        let outcome = self.fetcher.fetch_all(url).await;

        let mut report = RepositorySyncReport {
            pages: outcome.pages,
            fetched: outcome.items.len(),
            complete: outcome.is_complete(),
            ..Default::default()
        };

        if !report.complete {
            warn!(
                "Repository list for {} is incomplete ({} fetched): {:?}",
                username, report.fetched, outcome.status
            );
        }

        if outcome.items.is_empty() {
            info!("No repositories found for {}", username);
            return Ok(report);
        }

        for value in outcome.items {
            let payload: GitHubRepository = match serde_json::from_value(value) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Skipping malformed repository payload: {}", e);
                    report.malformed += 1;
                    continue;
                }
            };

            let repo = Repository::new(
                payload.id,
                payload.name,
                payload.owner.login,
                payload.html_url,
            );
            self.repository_store.upsert(&repo).await?;
            report.upserted += 1;

            // 必须在 upsert 完成之后入队，提交同步依赖这一行已经存在
            self.queue
                .submit(SyncJob::SyncCommits {
                    repository_id: repo.id,
                    commits_url: payload.commits_url,
                })
                .await?;
            report.jobs_submitted += 1;
        }

        info!(
            "Repository sync finished: {} page(s), {} upserted, {} commit jobs queued, {} malformed",
            report.pages, report.upserted, report.jobs_submitted, report.malformed
        );

        Ok(report)
    }
}
