use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::html::clean_html;

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub article_id: Uuid,
    /// Root comment of the reply chain. Equal to `id` for a root.
    pub thread_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub deleted: bool,
}

impl Comment {
    pub fn is_thread_root(&self) -> bool {
        self.thread_id == self.id
    }
}

/// A comment together with the comments grouped under it.
/// Built fresh on every read, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    pub id: Uuid,
    pub comment: Comment,
    pub children: Vec<CommentNode>,
    /// Set when the comment's thread root was missing from the batch
    /// and it was lifted to the top level.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub promoted: bool,
}

impl CommentNode {
    pub fn new(comment: Comment) -> Self {
        Self {
            id: comment.id,
            comment,
            children: Vec::new(),
            promoted: false,
        }
    }
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub article_id: Uuid,

    /// Optional: the thread this comment joins. Defaults to a new thread.
    pub thread_id: Option<Uuid>,

    /// Optional: the ID of the comment being replied to.
    pub parent_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Author must be between 1 and 255 characters"))]
    pub author: String,

    #[validate(
        length(
            min = 1,
            max = 10000,
            message = "Comment must be between 1 and 10000 characters"
        ),
        custom(function = validate_visible_content)
    )]
    pub content: String,

    /// Optional: handle of the author being answered, prefixed to the content.
    #[validate(length(max = 255, message = "reply_to must be at most 255 characters"))]
    pub reply_to: Option<String>,
}

/// Rejects content that is empty once markup is stripped, e.g. a lone `<script>`.
fn validate_visible_content(content: &str) -> Result<(), validator::ValidationError> {
    if clean_html(content).trim().is_empty() {
        let mut err = validator::ValidationError::new("content_empty_after_cleaning");
        err.message = Some("Comment has no visible content".into());
        return Err(err);
    }
    Ok(())
}

impl CreateCommentRequest {
    /// Turns the request into a fresh comment row.
    pub fn into_comment(self, id: Uuid, created: DateTime<Utc>) -> Comment {
        let content = match self.reply_to.as_deref().map(str::trim) {
            Some(reply_to) if !reply_to.is_empty() => {
                format!("@{}: {}", clean_html(reply_to), clean_html(&self.content))
            }
            _ => clean_html(&self.content),
        };

        Comment {
            id,
            article_id: self.article_id,
            thread_id: self.thread_id.unwrap_or(id),
            parent_id: self.parent_id,
            author: self.author,
            content,
            created,
            deleted: false,
        }
    }
}
