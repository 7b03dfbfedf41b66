use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, models::comment::CreateCommentRequest, services::Forum};

/// Create a new comment.
/// A comment without `thread_id` starts its own thread.
pub async fn add_comment(
    State(forum): State<Forum>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let node = forum.comments.add_comment(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "comment_added": node })),
    ))
}

/// Delete a comment (Soft Delete).
/// Replies stay in place and are shown at top level afterwards.
pub async fn delete_comment(
    State(forum): State<Forum>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    forum.comments.delete_comment(comment_id).await?;

    Ok(Json(serde_json::json!({ "message": "Comment deleted successfully" })))
}

/// Get a single comment by ID, soft-deleted ones included.
pub async fn get_comment(
    State(forum): State<Forum>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let comment = forum.comments.get_comment(comment_id).await?;

    Ok(Json(serde_json::json!({ "comment": comment })))
}

/// All visible comments as reply trees, newest thread first.
pub async fn find_comments(State(forum): State<Forum>) -> Result<impl IntoResponse, AppError> {
    let forest = forum.comments.find_comments().await?;

    Ok(Json(serde_json::json!({
        "comments": forest.comments,
        "count": forest.count,
    })))
}

/// Visible comments of one article as reply trees.
pub async fn find_comments_by_article(
    State(forum): State<Forum>,
    Path(article_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let forest = forum.comments.find_comments_by_article(article_id).await?;

    Ok(Json(serde_json::json!({
        "comments": forest.comments,
        "count": forest.count,
    })))
}

pub async fn count_comments(
    State(forum): State<Forum>,
    Path(article_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let count = forum.comments.count_comments_by_article(article_id).await?;

    Ok(Json(serde_json::json!({ "comments_amount": count })))
}
