use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use crate::ports::queue::SyncJob;
use crate::presentation::dto::{CommitDto, JobAcceptedDto, RepositoryDto};
use crate::presentation::handlers::clamp_limit;
use crate::presentation::routes::AppContext;
use crate::shared::error::FeedError;
use crate::shared::result::Result;

#[derive(Deserialize)]
pub struct ListCommitsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// API: 列出所有仓库
pub async fn api_list_repositories(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<RepositoryDto>>> {
    let repos = ctx.repository_store.list_all().await?;
    Ok(Json(repos.into_iter().map(Into::into).collect()))
}

/// API: 获取单个仓库（附带已镜像的提交数）
pub async fn api_get_repository(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<RepositoryDto>> {
    let repo = ctx
        .repository_store
        .find_by_id(id)
        .await?
        .ok_or_else(|| FeedError::RepositoryNotFound(id.to_string()))?;
    let commit_count = ctx.commit_store.count_by_repository(repo.id).await?;

    Ok(Json(RepositoryDto {
        commit_count: Some(commit_count),
        ..RepositoryDto::from(repo)
    }))
}

/// API: 列出仓库的提交
pub async fn api_list_repository_commits(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
    Query(query): Query<ListCommitsQuery>,
) -> Result<Json<Vec<CommitDto>>> {
    if ctx.repository_store.find_by_id(id).await?.is_none() {
        return Err(FeedError::RepositoryNotFound(id.to_string()));
    }

    let commits = ctx
        .commit_store
        .list_by_repository(id, clamp_limit(query.limit), query.offset.unwrap_or(0).max(0))
        .await?;

    Ok(Json(commits.into_iter().map(Into::into).collect()))
}

/// API: 为已存在的仓库提交一次提交同步
pub async fn api_sync_repository(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<JobAcceptedDto>)> {
    let repo = ctx
        .repository_store
        .find_by_id(id)
        .await?
        .ok_or_else(|| FeedError::RepositoryNotFound(id.to_string()))?;

    let job = SyncJob::SyncCommits {
        repository_id: repo.id,
        commits_url: ctx.endpoints.commits_url_template(&repo.owner, &repo.name)?,
    };
    ctx.queue.submit(job.clone()).await?;

    Ok((StatusCode::ACCEPTED, Json(JobAcceptedDto::queued(job))))
}
