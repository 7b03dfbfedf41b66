// src/repository/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CommentRepository, ComplaintRepository, ReactionRepository};
use crate::{
    error::AppError,
    models::{
        comment::Comment,
        complaint::Complaint,
        reaction::{Reaction, ReactionKind},
    },
};

const COMMENT_COLUMNS: &str =
    "id, article_id, thread_id, parent_id, author, content, created, deleted";

/// Forum storage backed by the tables of `migrations/`.
#[derive(Clone)]
pub struct PgForumRepository {
    pool: PgPool,
}

impl PgForumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a failed write, turning a foreign key violation on `comment_id`
/// into a user-visible "comment not found".
fn write_error(err: sqlx::Error, action: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return AppError::NotFound("comment not found".to_string());
        }
        if db_err.is_unique_violation() {
            return AppError::Conflict(format!("Failed to {}: duplicate row", action));
        }
    }
    tracing::error!("Failed to {}: {:?}", action, err);
    AppError::InternalServerError(err.to_string())
}

fn read_error(err: sqlx::Error, action: &str) -> AppError {
    tracing::error!("Failed to {}: {:?}", action, err);
    AppError::InternalServerError(err.to_string())
}

#[async_trait]
impl CommentRepository for PgForumRepository {
    async fn add_comment(&self, comment: &Comment) -> Result<(), AppError> {
        // A reply's thread must be an existing root of the same article.
        let result = sqlx::query(
            r#"
            INSERT INTO comments (id, article_id, thread_id, parent_id, author, content, created, deleted)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE $3 = $1
               OR EXISTS (
                   SELECT 1 FROM comments
                   WHERE id = $3 AND article_id = $2 AND thread_id = id
               )
            "#,
        )
        .bind(comment.id)
        .bind(comment.article_id)
        .bind(comment.thread_id)
        .bind(comment.parent_id)
        .bind(&comment.author)
        .bind(&comment.content)
        .bind(comment.created)
        .bind(comment.deleted)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound("parent comment not found".to_string());
                }
            }
            write_error(e, "add comment")
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("thread not found".to_string()));
        }
        Ok(())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE comments SET deleted = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "delete comment"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("comment not found".to_string()));
        }
        Ok(())
    }

    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>, AppError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE id = $1",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error(e, "get comment"))
    }

    async fn find_comments(&self) -> Result<Vec<Comment>, AppError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE deleted = FALSE ORDER BY created DESC",
            COMMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error(e, "find comments"))
    }

    async fn find_comments_by_article(&self, article_id: Uuid) -> Result<Vec<Comment>, AppError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE article_id = $1 AND deleted = FALSE ORDER BY created DESC",
            COMMENT_COLUMNS
        ))
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error(e, "find comments by article"))
    }

    async fn count_comments_by_article(&self, article_id: Uuid) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE article_id = $1")
            .bind(article_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| read_error(e, "count comments"))
    }
}

#[async_trait]
impl ReactionRepository for PgForumRepository {
    async fn add_reaction(&self, kind: ReactionKind, reaction: &Reaction) -> Result<(), AppError> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, comment_id, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (comment_id, user_id) DO NOTHING
            "#,
            kind.table()
        ))
        .bind(reaction.id)
        .bind(reaction.comment_id)
        .bind(reaction.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &format!("add {}", kind)))?;

        Ok(())
    }

    async fn delete_reaction(
        &self,
        kind: ReactionKind,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE comment_id = $1 AND user_id = $2",
            kind.table()
        ))
        .bind(comment_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &format!("delete {}", kind)))?;

        if result.rows_affected() == 0 {
            tracing::debug!(%comment_id, %user_id, "{}", kind.not_found());
            return Err(AppError::NotFound(kind.not_found()));
        }
        Ok(())
    }

    async fn switch_reaction(
        &self,
        kind: ReactionKind,
        reaction: &Reaction,
    ) -> Result<(), AppError> {
        let action = format!("switch to {}", kind);
        let mut tx = self.pool.begin().await.map_err(|e| write_error(e, &action))?;

        // Serializes concurrent switches of the same (comment, user) pair
        // until commit, so opposite switches cannot both land.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("reaction:{}:{}", reaction.comment_id, reaction.user_id))
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(e, &action))?;

        sqlx::query(&format!(
            "DELETE FROM {} WHERE comment_id = $1 AND user_id = $2",
            kind.opposite().table()
        ))
        .bind(reaction.comment_id)
        .bind(reaction.user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &action))?;

        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, comment_id, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (comment_id, user_id) DO NOTHING
            "#,
            kind.table()
        ))
        .bind(reaction.id)
        .bind(reaction.comment_id)
        .bind(reaction.user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &action))?;

        tx.commit().await.map_err(|e| write_error(e, &action))?;

        Ok(())
    }

    async fn find_reactions(
        &self,
        kind: ReactionKind,
        comment_id: Uuid,
    ) -> Result<Vec<Reaction>, AppError> {
        sqlx::query_as::<_, Reaction>(&format!(
            "SELECT id, comment_id, user_id FROM {} WHERE comment_id = $1",
            kind.table()
        ))
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error(e, &format!("find {}s", kind)))
    }

    async fn count_reactions(&self, kind: ReactionKind, comment_id: Uuid) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE comment_id = $1",
            kind.table()
        ))
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| read_error(e, &format!("count {}s", kind)))
    }
}

#[async_trait]
impl ComplaintRepository for PgForumRepository {
    async fn add_complaint(&self, complaint: &Complaint) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO complaints (id, comment_id, user_id, message)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (comment_id, user_id)
            DO UPDATE SET message = complaints.message || E'\n' || EXCLUDED.message
            "#,
        )
        .bind(complaint.id)
        .bind(complaint.comment_id)
        .bind(complaint.user_id)
        .bind(&complaint.message)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "add complaint"))?;

        Ok(())
    }

    async fn delete_complaint(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "delete complaint"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("complaint not found".to_string()));
        }
        Ok(())
    }

    async fn find_complaints_by_comment(
        &self,
        comment_id: Uuid,
    ) -> Result<Vec<Complaint>, AppError> {
        sqlx::query_as::<_, Complaint>(
            "SELECT id, comment_id, user_id, message FROM complaints WHERE comment_id = $1",
        )
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error(e, "find complaints"))
    }

    async fn count_complaints(&self, comment_id: Uuid) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM complaints WHERE comment_id = $1")
            .bind(comment_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| read_error(e, "count complaints"))
    }
}
