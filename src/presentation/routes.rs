use axum::{Router, routing::{get, post}};
use std::sync::Arc;
use crate::infrastructure::cache::MokaCache;
use crate::infrastructure::github::GitHubEndpoints;
use crate::presentation::handlers;
use crate::services::feed::FeedService;

/// 应用状态
pub struct AppContext {
    pub repository_store: Arc<dyn crate::ports::repository::RepositoryPort>,
    pub commit_store: Arc<dyn crate::ports::commit::CommitPort>,
    pub queue: Arc<dyn crate::ports::queue::JobQueue>,
    pub endpoints: GitHubEndpoints,
    pub feed: FeedService<MokaCache>,
}

/// 创建应用路由
pub fn create_app_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(handlers::sync::health))
        .nest("/api", api_routes())
        .with_state(ctx)
}

/// API 路由
fn api_routes() -> Router<Arc<AppContext>> {
    Router::new()
        // 仓库 API
        .route("/repositories", get(handlers::repository::api_list_repositories))
        .route("/repositories/{id}", get(handlers::repository::api_get_repository))
        .route("/repositories/{id}/commits", get(handlers::repository::api_list_repository_commits))
        .route("/repositories/{id}/sync", post(handlers::repository::api_sync_repository))

        // 提交 API
        .route("/commits", get(handlers::commit::api_search_commits))
        .route("/commits/{sha}", get(handlers::commit::api_get_commit))

        // 动态流
        .route("/feed", get(handlers::feed::api_feed))

        // 手动触发全量同步
        .route("/sync", post(handlers::sync::api_sync_all))
}
