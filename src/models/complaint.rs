use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'complaints' table in the database.
/// One row per (comment, user); repeated complaints extend `message`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
}

/// DTO for flagging a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateComplaintRequest {
    pub comment_id: Uuid,
    pub user_id: Uuid,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Message must be between 1 and 2000 characters"
    ))]
    pub message: String,
}
