use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::response::ApiError;
use crate::services::{parse_top_limit, DishKey};
use crate::storage::models::VoteTally;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesResponse {
    pub subject: String,
    pub sub_index: u32,
    pub likes: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLikeResponse {
    pub subject: String,
    pub sub_index: u32,
    pub likes: u64,
    pub message: String,
}

impl From<VoteTally> for LikesResponse {
    fn from(tally: VoteTally) -> Self {
        LikesResponse {
            subject: tally.subject,
            sub_index: tally.sub_index,
            likes: tally.count,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn get_likes(
    State(state): State<Arc<AppState>>,
    Path((subject, sub_index)): Path<(String, String)>,
) -> Result<Json<LikesResponse>, ApiError> {
    let dish = DishKey::parse(&subject, &sub_index)
        .map_err(|e| ApiError::from_service(e, "Failed to get likes"))?;

    let likes = state
        .votes
        .likes(&dish)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to get likes"))?;

    Ok(Json(LikesResponse {
        subject: dish.subject,
        sub_index: dish.sub_index,
        likes,
    }))
}

pub async fn get_all_likes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, u64>>, ApiError> {
    let likes = state
        .votes
        .all_likes()
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to get likes"))?;

    Ok(Json(likes))
}

pub async fn add_like(
    State(state): State<Arc<AppState>>,
    Path((subject, sub_index)): Path<(String, String)>,
) -> Result<Json<AddLikeResponse>, ApiError> {
    record_like(&state, &subject, &sub_index).await
}

/// Votes for the restaurant whose id is literally `top`. The static segment of
/// the top-N route shadows `/api/likes/:subject/:sub_index` for it.
/// Route: POST /api/likes/top/:sub_index
pub async fn add_like_top(
    State(state): State<Arc<AppState>>,
    Path(sub_index): Path<String>,
) -> Result<Json<AddLikeResponse>, ApiError> {
    record_like(&state, "top", &sub_index).await
}

async fn record_like(
    state: &AppState,
    subject: &str,
    sub_index: &str,
) -> Result<Json<AddLikeResponse>, ApiError> {
    let dish = DishKey::parse(subject, sub_index)
        .map_err(|e| ApiError::from_service(e, "Failed to add like"))?;

    let vote = state
        .votes
        .record_vote(&dish)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to add like"))?;

    Ok(Json(AddLikeResponse {
        subject: vote.dish.subject,
        sub_index: vote.dish.sub_index,
        likes: vote.likes,
        message: "Like added successfully".to_string(),
    }))
}

/// Route: GET /api/likes/top/:limit
pub async fn top_likes(
    State(state): State<Arc<AppState>>,
    Path(limit): Path<String>,
) -> Result<Json<Vec<LikesResponse>>, ApiError> {
    top(&state, Some(&limit)).await
}

/// Route: GET /api/likes/top
pub async fn top_likes_default(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LikesResponse>>, ApiError> {
    top(&state, None).await
}

async fn top(
    state: &AppState,
    limit: Option<&str>,
) -> Result<Json<Vec<LikesResponse>>, ApiError> {
    let tallies = state
        .votes
        .top(parse_top_limit(limit))
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to get top likes"))?;

    Ok(Json(tallies.into_iter().map(LikesResponse::from).collect()))
}
