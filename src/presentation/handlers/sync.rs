use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;
use crate::ports::queue::SyncJob;
use crate::presentation::dto::JobAcceptedDto;
use crate::presentation::routes::AppContext;
use crate::shared::result::Result;

/// API: 手动触发一次全量仓库同步
pub async fn api_sync_all(
    State(ctx): State<Arc<AppContext>>,
) -> Result<(StatusCode, Json<JobAcceptedDto>)> {
    ctx.queue.submit(SyncJob::SyncRepositories).await?;
    Ok((StatusCode::ACCEPTED, Json(JobAcceptedDto::queued(SyncJob::SyncRepositories))))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
