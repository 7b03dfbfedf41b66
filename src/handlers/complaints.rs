use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, models::complaint::CreateComplaintRequest, services::Forum};

/// Flag a comment.
/// A repeated complaint of the same user is appended to the first one.
pub async fn add_complaint(
    State(forum): State<Forum>,
    Json(payload): Json<CreateComplaintRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    forum
        .complaints
        .add_complaint(payload.comment_id, payload.user_id, payload.message)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Complaint added successfully" })))
}

pub async fn delete_complaint(
    State(forum): State<Forum>,
    Path(complaint_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    forum.complaints.delete_complaint(complaint_id).await?;

    Ok(Json(serde_json::json!({ "message": "Complaint removed successfully" })))
}

pub async fn find_complaints(
    State(forum): State<Forum>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let complaints = forum.complaints.list_complaints(comment_id).await?;

    Ok(Json(serde_json::json!({ "complaints": complaints })))
}

pub async fn count_complaints(
    State(forum): State<Forum>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let count = forum.complaints.count_complaints(comment_id).await?;

    Ok(Json(serde_json::json!({ "number_of_complaints": count })))
}
