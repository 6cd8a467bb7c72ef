use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use crate::domain::entities::Commit;
use crate::domain::value_objects::{AuthorFallback, CommitSha};
use crate::infrastructure::github::types::GitHubCommit;
use crate::infrastructure::github::GitHubEndpoints;
use crate::ports::commit::CommitPort;
use crate::ports::github::PaginatedFetchPort;
use crate::ports::repository::RepositoryPort;
use crate::shared::config::Config;
use crate::shared::result::Result;

/// 提交同步：拉取单个仓库的全部提交，插入尚未记录的提交
pub struct CommitSyncJob {
    config: Arc<Config>,
    endpoints: GitHubEndpoints,
    fetcher: Arc<dyn PaginatedFetchPort>,
    repository_store: Arc<dyn RepositoryPort>,
    commit_store: Arc<dyn CommitPort>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommitSyncReport {
    pub repository_id: i64,
    /// 仓库行不存在，任务未执行
    pub skipped: bool,
    pub pages: usize,
    pub fetched: usize,
    pub inserted: usize,
    pub already_known: usize,
    pub malformed: usize,
    pub complete: bool,
    pub marked_synced: bool,
}

impl CommitSyncJob {
    pub fn new(
        config: Arc<Config>,
        endpoints: GitHubEndpoints,
        fetcher: Arc<dyn PaginatedFetchPort>,
        repository_store: Arc<dyn RepositoryPort>,
        commit_store: Arc<dyn CommitPort>,
    ) -> Self {
        Self {
            config,
            endpoints,
            fetcher,
            repository_store,
            commit_store,
        }
    }

    pub async fn run(&self, repository_id: i64, commits_url: &str) -> Result<CommitSyncReport> {
        let mut report = CommitSyncReport {
            repository_id,
            ..Default::default()
        };

        let Some(repo) = self.repository_store.find_by_id(repository_id).await? else {
            warn!("Repository with id {} not found, skipping commit sync", repository_id);
            report.skipped = true;
            return Ok(report);
        };

        info!("Fetching commits for {}...", repo.full_name());

        let url = self.endpoints.commit_list(commits_url)?;
        let outcome = self.fetcher.fetch_all(url).await;
        report.pages = outcome.pages;
        report.fetched = outcome.items.len();
        report.complete = outcome.is_complete();

        let mut commits = Vec::with_capacity(outcome.items.len());
        for value in outcome.items {
            match commit_from_payload(repo.id, value) {
                Ok(commit) => commits.push(commit),
                Err(reason) => {
                    warn!("Skipping malformed commit in {}: {}", repo.full_name(), reason);
                    report.malformed += 1;
                }
            }
        }

        report.inserted = self.commit_store.insert_many_if_absent(&commits).await?;
        report.already_known = commits.len() - report.inserted;

        if report.complete || self.config.sync.mark_partial_as_synced {
            self.repository_store.mark_synced(repo.id, Utc::now()).await?;
            report.marked_synced = true;
        } else {
            warn!(
                "Commit list for {} is incomplete, last_synced_at left unchanged: {:?}",
                repo.full_name(),
                outcome.status
            );
        }

        info!(
            "Finished syncing {}. Added {} new commits from {} page(s) ({} already known).",
            repo.full_name(),
            report.inserted,
            report.pages,
            report.already_known
        );

        Ok(report)
    }
}

/// GitHub 提交 JSON 转换为领域实体，作者信息缺失时使用占位值
fn commit_from_payload(repository_id: i64, value: Value) -> std::result::Result<Commit, String> {
    let payload: GitHubCommit = serde_json::from_value(value).map_err(|e| e.to_string())?;
    let sha = CommitSha::new(&payload.sha).map_err(|e| e.to_string())?;

    let author = payload.commit.author.unwrap_or_default();
    let date = author
        .date
        .or_else(|| payload.commit.committer.and_then(|c| c.date))
        .ok_or_else(|| format!("commit {} has no date", sha))?;

    Ok(Commit {
        sha: sha.into_inner(),
        repository_id,
        message: payload.commit.message,
        author_name: non_empty(author.name).unwrap_or_else(|| AuthorFallback::NAME.to_string()),
        author_email: non_empty(author.email).unwrap_or_else(|| AuthorFallback::EMAIL.to_string()),
        date,
        html_url: payload.html_url,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
