use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use crate::domain::value_objects::CommitSha;
use crate::ports::commit::CommitQuery;
use crate::presentation::dto::CommitDto;
use crate::presentation::handlers::clamp_limit;
use crate::presentation::routes::AppContext;
use crate::shared::error::FeedError;
use crate::shared::result::Result;

#[derive(Deserialize)]
pub struct SearchCommitsQuery {
    pub q: Option<String>,
    pub repository: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// API: 搜索提交（message、作者、sha），可按仓库名过滤
pub async fn api_search_commits(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<SearchCommitsQuery>,
) -> Result<Json<Vec<CommitDto>>> {
    let entries = ctx
        .commit_store
        .search(&CommitQuery {
            text: query.q,
            repository_name: query.repository.filter(|r| !r.is_empty()),
            limit: clamp_limit(query.limit),
            offset: query.offset.unwrap_or(0).max(0),
        })
        .await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// API: 获取单个提交
pub async fn api_get_commit(
    State(ctx): State<Arc<AppContext>>,
    Path(sha): Path<String>,
) -> Result<Json<CommitDto>> {
    let sha = CommitSha::new(&sha)?;
    let commit = ctx
        .commit_store
        .find_by_sha(sha.as_str())
        .await?
        .ok_or_else(|| FeedError::CommitNotFound(sha.to_string()))?;

    Ok(Json(commit.into()))
}
