use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use crate::domain::entities::{Commit, FeedEntry};
use crate::ports::cache::CachePort;
use crate::ports::commit::CommitPort;
use crate::shared::result::Result;

pub const DEFAULT_FEED_LIMIT: i64 = 100;

/// 某一天内的提交，按仓库名分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedDay {
    pub date: NaiveDate,
    pub repositories: Vec<FeedRepository>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRepository {
    pub name: String,
    pub commits: Vec<Commit>,
}

/// 按日期（新的在前）、仓库名（升序）分组，组内保持输入顺序
pub fn group_by_day(entries: Vec<FeedEntry>) -> Vec<FeedDay> {
    let mut days: BTreeMap<NaiveDate, BTreeMap<String, Vec<Commit>>> = BTreeMap::new();

    for entry in entries {
        days.entry(entry.commit.date.date_naive())
            .or_default()
            .entry(entry.repository_name)
            .or_default()
            .push(entry.commit);
    }

    days.into_iter()
        .rev()
        .map(|(date, repos)| FeedDay {
            date,
            repositories: repos
                .into_iter()
                .map(|(name, commits)| FeedRepository { name, commits })
                .collect(),
        })
        .collect()
}

/// 最近活动动态流，结果缓存
pub struct FeedService<C: CachePort> {
    commit_store: Arc<dyn CommitPort>,
    cache: Arc<C>,
}

impl<C: CachePort> FeedService<C> {
    pub fn new(commit_store: Arc<dyn CommitPort>, cache: Arc<C>) -> Self {
        Self {
            commit_store,
            cache,
        }
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<FeedDay>> {
        let key = format!("feed:{}", limit);
        if let Some(days) = self.cache.get::<Vec<FeedDay>>(&key).await? {
            debug!("Feed cache hit: {}", key);
            return Ok(days);
        }

        let entries = self.commit_store.recent_with_repository(limit).await?;
        let days = group_by_day(entries);
        self.cache.set(&key, &days).await?;
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Repository;
    use crate::infrastructure::cache::MokaCache;
    use crate::ports::repository::RepositoryPort;
    use crate::services::test_support::{sha, stores};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn entry(seed: u32, repo: &str, day: u32, hour: u32) -> FeedEntry {
        FeedEntry {
            commit: Commit {
                sha: sha(seed),
                repository_id: 1,
                message: format!("commit {}", seed),
                author_name: "Mona".into(),
                author_email: "mona@example.com".into(),
                date: Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap(),
                html_url: String::new(),
            },
            repository_name: repo.to_string(),
        }
    }

    #[test]
    fn groups_newest_day_first_and_repositories_by_name() {
        let entries = vec![
            entry(1, "zeta", 2, 18),
            entry(2, "alpha", 2, 17),
            entry(3, "zeta", 2, 9),
            entry(4, "beta", 1, 20),
        ];

        let days = group_by_day(entries);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        let names: Vec<_> = days[0].repositories.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        let zeta: Vec<_> = days[0].repositories[1].commits.iter().map(|c| c.sha.clone()).collect();
        assert_eq!(zeta, vec![sha(1), sha(3)]);
        assert_eq!(days[1].repositories[0].name, "beta");
    }

    #[test]
    fn empty_feed() {
        assert!(group_by_day(vec![]).is_empty());
    }

    #[tokio::test]
    async fn recent_is_served_from_cache() {
        let stores = stores().await;
        stores
            .repositories
            .upsert(&Repository::new(1, "alpha".into(), "octocat".into(), String::new()))
            .await
            .unwrap();
        let commits = stores.commits.clone();
        commits.insert_many_if_absent(&[entry(1, "alpha", 1, 10).commit]).await.unwrap();

        let service = FeedService::new(
            commits.clone(),
            Arc::new(MokaCache::new(10, Duration::from_secs(60))),
        );
        let first = service.recent(DEFAULT_FEED_LIMIT).await.unwrap();
        assert_eq!(first.len(), 1);

        commits.insert_many_if_absent(&[entry(2, "alpha", 3, 10).commit]).await.unwrap();
        let cached = service.recent(DEFAULT_FEED_LIMIT).await.unwrap();
        assert_eq!(cached, first);
    }
}
