use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::reaction::{ReactionKind, ReactionRequest},
    services::Forum,
};

async fn add(forum: Forum, kind: ReactionKind, payload: ReactionRequest) -> Result<impl IntoResponse, AppError> {
    forum
        .reactions
        .add(kind, payload.comment_id, payload.user_id)
        .await?;

    Ok(Json(serde_json::json!({ "message": format!("{} added successfully", capitalized(kind)) })))
}

async fn remove(forum: Forum, kind: ReactionKind, payload: ReactionRequest) -> Result<impl IntoResponse, AppError> {
    forum
        .reactions
        .remove(kind, payload.comment_id, payload.user_id)
        .await?;

    Ok(Json(serde_json::json!({ "message": format!("{} removed successfully", capitalized(kind)) })))
}

fn capitalized(kind: ReactionKind) -> &'static str {
    match kind {
        ReactionKind::Like => "Like",
        ReactionKind::Dislike => "Dislike",
    }
}

/// Like a comment. Replaces a dislike of the same user.
pub async fn add_like(
    State(forum): State<Forum>,
    Json(payload): Json<ReactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    add(forum, ReactionKind::Like, payload).await
}

/// Remove a like. 404 if the user has not liked the comment.
pub async fn delete_like(
    State(forum): State<Forum>,
    Json(payload): Json<ReactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    remove(forum, ReactionKind::Like, payload).await
}

pub async fn find_likes(
    State(forum): State<Forum>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let likes = forum.reactions.list_likes(comment_id).await?;

    Ok(Json(serde_json::json!({ "likes": likes })))
}

pub async fn count_likes(
    State(forum): State<Forum>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let count = forum.reactions.count_likes(comment_id).await?;

    Ok(Json(serde_json::json!({ "number_of_likes": count })))
}

/// Dislike a comment. Replaces a like of the same user.
pub async fn add_dislike(
    State(forum): State<Forum>,
    Json(payload): Json<ReactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    add(forum, ReactionKind::Dislike, payload).await
}

/// Remove a dislike. 404 if the user has not disliked the comment.
pub async fn delete_dislike(
    State(forum): State<Forum>,
    Json(payload): Json<ReactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    remove(forum, ReactionKind::Dislike, payload).await
}

pub async fn find_dislikes(
    State(forum): State<Forum>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dislikes = forum.reactions.list_dislikes(comment_id).await?;

    Ok(Json(serde_json::json!({ "dislikes": dislikes })))
}

pub async fn count_dislikes(
    State(forum): State<Forum>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let count = forum.reactions.count_dislikes(comment_id).await?;

    Ok(Json(serde_json::json!({ "number_of_dislikes": count })))
}
