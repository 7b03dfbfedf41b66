// src/repository/mod.rs

//! Storage collaborator contracts.
//!
//! Every primitive reports one of three outcomes: success, "no matching
//! row" (`AppError::NotFound` for writes, `None`/empty for reads), or a
//! storage failure (`AppError::InternalServerError`).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        comment::Comment,
        complaint::Complaint,
        reaction::{Reaction, ReactionKind},
    },
};

pub use memory::InMemoryForumRepository;
pub use postgres::PgForumRepository;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn add_comment(&self, comment: &Comment) -> Result<(), AppError>;

    /// Sets the soft-delete flag. Unknown ids are `NotFound`.
    async fn delete_comment(&self, id: Uuid) -> Result<(), AppError>;

    /// Includes soft-deleted rows.
    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>, AppError>;

    /// Non-deleted comments, newest first.
    async fn find_comments(&self) -> Result<Vec<Comment>, AppError>;

    /// Non-deleted comments of one article, newest first.
    async fn find_comments_by_article(&self, article_id: Uuid) -> Result<Vec<Comment>, AppError>;

    /// All rows of the article, soft-deleted ones included.
    async fn count_comments_by_article(&self, article_id: Uuid) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Inserts the row. A row for the same (comment, user) already present
    /// is left untouched and reported as success.
    async fn add_reaction(&self, kind: ReactionKind, reaction: &Reaction) -> Result<(), AppError>;

    /// Deletes the (comment, user) row. `NotFound` when there is none.
    async fn delete_reaction(
        &self,
        kind: ReactionKind,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError>;

    /// Removes any opposite reaction of the same user and inserts `reaction`
    /// as one indivisible unit.
    async fn switch_reaction(&self, kind: ReactionKind, reaction: &Reaction)
    -> Result<(), AppError>;

    async fn find_reactions(
        &self,
        kind: ReactionKind,
        comment_id: Uuid,
    ) -> Result<Vec<Reaction>, AppError>;

    async fn count_reactions(&self, kind: ReactionKind, comment_id: Uuid) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Inserts the complaint, or appends `"\n" + message` to the stored
    /// message of the same (comment, user) in a single step.
    async fn add_complaint(&self, complaint: &Complaint) -> Result<(), AppError>;

    /// `NotFound` when no complaint has this id.
    async fn delete_complaint(&self, id: Uuid) -> Result<(), AppError>;

    async fn find_complaints_by_comment(&self, comment_id: Uuid)
    -> Result<Vec<Complaint>, AppError>;

    async fn count_complaints(&self, comment_id: Uuid) -> Result<i64, AppError>;
}

/// A backend able to store every forum entity.
pub trait ForumRepository: CommentRepository + ReactionRepository + ComplaintRepository {}

impl<T> ForumRepository for T where T: CommentRepository + ReactionRepository + ComplaintRepository {}
