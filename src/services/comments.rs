// src/services/comments.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::tree::build_forest;
use crate::{
    error::AppError,
    models::comment::{Comment, CommentNode, CreateCommentRequest},
    repository::CommentRepository,
};

/// A forest of comments plus the number of rows it was built from.
#[derive(Debug)]
pub struct CommentForest {
    pub comments: Vec<CommentNode>,
    pub count: usize,
}

impl CommentForest {
    fn from_rows(rows: Vec<Comment>) -> Self {
        let count = rows.len();
        Self {
            comments: build_forest(rows),
            count,
        }
    }
}

#[derive(Clone)]
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>) -> Self {
        Self { repo }
    }

    /// Stores a new comment and returns it as a childless node.
    pub async fn add_comment(&self, request: CreateCommentRequest) -> Result<CommentNode, AppError> {
        let comment = request.into_comment(Uuid::new_v4(), Utc::now());
        self.repo.add_comment(&comment).await?;
        tracing::info!(
            comment_id = %comment.id,
            article_id = %comment.article_id,
            thread_id = %comment.thread_id,
            "comment added"
        );
        Ok(CommentNode::new(comment))
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete_comment(id).await
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, AppError> {
        self.repo
            .get_comment(id)
            .await?
            .ok_or(AppError::NotFound("comment not found".to_string()))
    }

    pub async fn find_comments(&self) -> Result<CommentForest, AppError> {
        let rows = self.repo.find_comments().await?;
        Ok(CommentForest::from_rows(rows))
    }

    pub async fn find_comments_by_article(&self, article_id: Uuid) -> Result<CommentForest, AppError> {
        let rows = self.repo.find_comments_by_article(article_id).await?;
        Ok(CommentForest::from_rows(rows))
    }

    pub async fn count_comments_by_article(&self, article_id: Uuid) -> Result<i64, AppError> {
        self.repo.count_comments_by_article(article_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryForumRepository;

    fn service() -> CommentService {
        CommentService::new(Arc::new(InMemoryForumRepository::new()))
    }

    fn request(article_id: Uuid, thread_id: Option<Uuid>, content: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            article_id,
            thread_id,
            parent_id: thread_id,
            author: "ada".to_string(),
            content: content.to_string(),
            reply_to: None,
        }
    }

    #[tokio::test]
    async fn replies_are_grouped_under_their_thread() {
        let comments = service();
        let article = Uuid::new_v4();
        let root = comments.add_comment(request(article, None, "first")).await.unwrap();
        let reply = comments
            .add_comment(request(article, Some(root.id), "second"))
            .await
            .unwrap();
        let other = comments.add_comment(request(Uuid::new_v4(), None, "elsewhere")).await.unwrap();

        let forest = comments.find_comments_by_article(article).await.unwrap();
        assert_eq!(forest.count, 2);
        assert_eq!(forest.comments.len(), 1);
        assert_eq!(forest.comments[0].id, root.id);
        assert_eq!(forest.comments[0].children[0].id, reply.id);

        let all = comments.find_comments().await.unwrap();
        assert_eq!(all.count, 3);
        assert!(all.comments.iter().any(|n| n.id == other.id));
    }

    #[tokio::test]
    async fn replies_of_deleted_root_are_promoted() {
        let comments = service();
        let article = Uuid::new_v4();
        let root = comments.add_comment(request(article, None, "first")).await.unwrap();
        let reply = comments
            .add_comment(request(article, Some(root.id), "second"))
            .await
            .unwrap();

        comments.delete_comment(root.id).await.unwrap();

        let forest = comments.find_comments_by_article(article).await.unwrap();
        assert_eq!(forest.count, 1);
        assert_eq!(forest.comments[0].id, reply.id);
        assert!(forest.comments[0].promoted);

        // soft-deleted comments stay readable and counted
        assert!(comments.get_comment(root.id).await.unwrap().deleted);
        assert_eq!(comments.count_comments_by_article(article).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unknown_comment_is_not_found() {
        let comments = service();
        assert!(comments.get_comment(Uuid::new_v4()).await.unwrap_err().is_not_found());
        assert!(comments.delete_comment(Uuid::new_v4()).await.unwrap_err().is_not_found());
    }
}
