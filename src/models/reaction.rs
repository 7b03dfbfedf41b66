use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The two mutually exclusive reactions a user can leave on a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn opposite(self) -> Self {
        match self {
            ReactionKind::Like => ReactionKind::Dislike,
            ReactionKind::Dislike => ReactionKind::Like,
        }
    }

    /// Table holding the rows of this kind.
    pub fn table(self) -> &'static str {
        match self {
            ReactionKind::Like => "likes",
            ReactionKind::Dislike => "dislikes",
        }
    }

    pub fn not_found(self) -> String {
        format!("{} not found", self)
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionKind::Like => f.write_str("like"),
            ReactionKind::Dislike => f.write_str("dislike"),
        }
    }
}

/// Represents a row of the 'likes' or 'dislikes' table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Reaction {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
}

impl Reaction {
    pub fn new(comment_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            comment_id,
            user_id,
        }
    }
}

/// DTO for adding or removing a like/dislike.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReactionRequest {
    pub comment_id: Uuid,
    pub user_id: Uuid,
}
