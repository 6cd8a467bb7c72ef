pub mod commit;
pub mod feed;
pub mod repository;
pub mod sync;

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

pub(crate) fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use crate::domain::entities::{Commit, Repository};
    use crate::infrastructure::cache::MokaCache;
    use crate::infrastructure::github::GitHubEndpoints;
    use crate::ports::commit::CommitPort;
    use crate::ports::queue::SyncJob;
    use crate::ports::repository::RepositoryPort;
    use crate::presentation::routes::{create_app_router, AppContext};
    use crate::services::feed::FeedService;
    use crate::services::test_support::{sha, stores, RecordingQueue};

    async fn app() -> (Router, Arc<RecordingQueue>) {
        let stores = stores().await;
        stores
            .repositories
            .upsert(&Repository::new(
                1,
                "hello".into(),
                "octocat".into(),
                "https://github.com/octocat/hello".into(),
            ))
            .await
            .unwrap();
        for (seed, message) in [(1, "Fix typo"), (2, "Add README")] {
            stores
                .commits
                .insert_many_if_absent(&[Commit {
                    sha: sha(seed),
                    repository_id: 1,
                    message: message.to_string(),
                    author_name: "Mona".into(),
                    author_email: "mona@example.com".into(),
                    date: Utc.with_ymd_and_hms(2024, 5, seed, 12, 0, 0).unwrap(),
                    html_url: String::new(),
                }])
                .await
                .unwrap();
        }

        let queue = Arc::new(RecordingQueue::default());
        let ctx = Arc::new(AppContext {
            repository_store: stores.repositories.clone(),
            commit_store: stores.commits.clone(),
            queue: queue.clone(),
            endpoints: GitHubEndpoints::new("https://api.github.com", 100).unwrap(),
            feed: FeedService::new(
                stores.commits.clone(),
                Arc::new(MokaCache::new(10, Duration::from_secs(60))),
            ),
        });
        (create_app_router(ctx), queue)
    }

    async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn lists_and_gets_repositories() {
        let (app, _) = app().await;

        let (status, body) = call(app.clone(), "GET", "/api/repositories").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["full_name"], "octocat/hello");
        assert_eq!(body[0]["last_synced_at"], Value::Null);
        assert!(body[0].get("commit_count").is_none());

        let (status, body) = call(app.clone(), "GET", "/api/repositories/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["commit_count"], 2);

        let (status, _) = call(app, "GET", "/api/repositories/2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lists_repository_commits_newest_first() {
        let (app, _) = app().await;

        let (status, body) = call(app.clone(), "GET", "/api/repositories/1/commits?limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["summary"], "Add README");

        let (status, _) = call(app, "GET", "/api/repositories/9/commits").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn searches_and_gets_commits() {
        let (app, _) = app().await;

        let (status, body) = call(app.clone(), "GET", "/api/commits?q=typo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["repository_name"], "hello");

        let (status, body) = call(app.clone(), "GET", &format!("/api/commits/{}", sha(1))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Fix typo");

        let (status, _) = call(app.clone(), "GET", &format!("/api/commits/{}", sha(9))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(app, "GET", "/api/commits/xyz").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn feed_groups_by_day() {
        let (app, _) = app().await;

        let (status, body) = call(app, "GET", "/api/feed").await;
        assert_eq!(status, StatusCode::OK);
        let days = body.as_array().unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0]["date"], "2024-05-02");
        assert_eq!(days[0]["repositories"][0]["name"], "hello");
    }

    #[tokio::test]
    async fn sync_endpoints_enqueue_jobs() {
        let (app, queue) = app().await;

        let (status, body) = call(app.clone(), "POST", "/api/sync").await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["job"]["kind"], "sync_repositories");

        let (status, _) = call(app.clone(), "POST", "/api/repositories/1/sync").await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (status, _) = call(app, "POST", "/api/repositories/5/sync").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert_eq!(
            queue.jobs(),
            vec![
                SyncJob::SyncRepositories,
                SyncJob::SyncCommits {
                    repository_id: 1,
                    commits_url: "https://api.github.com/repos/octocat/hello/commits{/sha}".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _) = app().await;
        let (status, body) = call(app, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
