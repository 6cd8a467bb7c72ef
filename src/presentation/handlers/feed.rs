use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use crate::presentation::routes::AppContext;
use crate::services::feed::{FeedDay, DEFAULT_FEED_LIMIT};
use crate::shared::result::Result;

#[derive(Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

/// API: 最近的提交，按日期和仓库分组
pub async fn api_feed(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<FeedDay>>> {
    let limit = query.limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, 500);
    Ok(Json(ctx.feed.recent(limit).await?))
}
