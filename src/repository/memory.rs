// src/repository/memory.rs

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
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

#[derive(Debug, Default)]
struct Tables {
    comments: Vec<Comment>,
    likes: Vec<Reaction>,
    dislikes: Vec<Reaction>,
    complaints: Vec<Complaint>,
}

impl Tables {
    fn reactions(&self, kind: ReactionKind) -> &Vec<Reaction> {
        match kind {
            ReactionKind::Like => &self.likes,
            ReactionKind::Dislike => &self.dislikes,
        }
    }

    fn reactions_mut(&mut self, kind: ReactionKind) -> &mut Vec<Reaction> {
        match kind {
            ReactionKind::Like => &mut self.likes,
            ReactionKind::Dislike => &mut self.dislikes,
        }
    }

    /// Mirrors the foreign key from reactions/complaints to comments.
    fn ensure_comment(&self, comment_id: Uuid) -> Result<(), AppError> {
        if self.comments.iter().any(|c| c.id == comment_id) {
            Ok(())
        } else {
            Err(AppError::NotFound("comment not found".to_string()))
        }
    }

    fn insert_reaction(&mut self, kind: ReactionKind, reaction: &Reaction) -> Result<(), AppError> {
        self.ensure_comment(reaction.comment_id)?;
        let rows = self.reactions_mut(kind);
        if !rows
            .iter()
            .any(|r| r.comment_id == reaction.comment_id && r.user_id == reaction.user_id)
        {
            rows.push(reaction.clone());
        }
        Ok(())
    }

    fn remove_reaction(&mut self, kind: ReactionKind, comment_id: Uuid, user_id: Uuid) -> usize {
        let rows = self.reactions_mut(kind);
        let before = rows.len();
        rows.retain(|r| !(r.comment_id == comment_id && r.user_id == user_id));
        before - rows.len()
    }

    /// Non-deleted comments matching `keep`, newest first. Ties keep the
    /// most recently inserted row first.
    fn visible_comments<F>(&self, keep: F) -> Vec<Comment>
    where
        F: Fn(&Comment) -> bool,
    {
        let mut rows: Vec<Comment> = self
            .comments
            .iter()
            .rev()
            .filter(|c| !c.deleted && keep(c))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created.cmp(&a.created));
        rows
    }
}

/// Process-local storage with the same contract as the Postgres backend.
/// Each call runs under one lock, so every primitive is atomic.
#[derive(Debug, Default)]
pub struct InMemoryForumRepository {
    tables: Mutex<Tables>,
}

impl InMemoryForumRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::InternalServerError("in-memory store poisoned".to_string()))
    }
}

#[async_trait]
impl CommentRepository for InMemoryForumRepository {
    async fn add_comment(&self, comment: &Comment) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        if !comment.is_thread_root()
            && !tables.comments.iter().any(|c| {
                c.id == comment.thread_id && c.article_id == comment.article_id && c.is_thread_root()
            })
        {
            return Err(AppError::NotFound("thread not found".to_string()));
        }
        if tables.comments.iter().any(|c| c.id == comment.id) {
            return Err(AppError::Conflict(format!("comment {} already exists", comment.id)));
        }
        if let Some(parent_id) = comment.parent_id {
            if !tables.comments.iter().any(|c| c.id == parent_id) {
                return Err(AppError::NotFound("parent comment not found".to_string()));
            }
        }
        tables.comments.push(comment.clone());
        Ok(())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(AppError::NotFound("comment not found".to_string()))?;
        comment.deleted = true;
        Ok(())
    }

    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>, AppError> {
        let tables = self.lock()?;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn find_comments(&self) -> Result<Vec<Comment>, AppError> {
        Ok(self.lock()?.visible_comments(|_| true))
    }

    async fn find_comments_by_article(&self, article_id: Uuid) -> Result<Vec<Comment>, AppError> {
        Ok(self.lock()?.visible_comments(|c| c.article_id == article_id))
    }

    async fn count_comments_by_article(&self, article_id: Uuid) -> Result<i64, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.article_id == article_id)
            .count() as i64)
    }
}

#[async_trait]
impl ReactionRepository for InMemoryForumRepository {
    async fn add_reaction(&self, kind: ReactionKind, reaction: &Reaction) -> Result<(), AppError> {
        self.lock()?.insert_reaction(kind, reaction)
    }

    async fn delete_reaction(
        &self,
        kind: ReactionKind,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        match self.lock()?.remove_reaction(kind, comment_id, user_id) {
            0 => Err(AppError::NotFound(kind.not_found())),
            _ => Ok(()),
        }
    }

    async fn switch_reaction(
        &self,
        kind: ReactionKind,
        reaction: &Reaction,
    ) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        tables.ensure_comment(reaction.comment_id)?;
        tables.remove_reaction(kind.opposite(), reaction.comment_id, reaction.user_id);
        tables.insert_reaction(kind, reaction)
    }

    async fn find_reactions(
        &self,
        kind: ReactionKind,
        comment_id: Uuid,
    ) -> Result<Vec<Reaction>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .reactions(kind)
            .iter()
            .filter(|r| r.comment_id == comment_id)
            .cloned()
            .collect())
    }

    async fn count_reactions(&self, kind: ReactionKind, comment_id: Uuid) -> Result<i64, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .reactions(kind)
            .iter()
            .filter(|r| r.comment_id == comment_id)
            .count() as i64)
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryForumRepository {
    async fn add_complaint(&self, complaint: &Complaint) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        tables.ensure_comment(complaint.comment_id)?;
        match tables
            .complaints
            .iter_mut()
            .find(|c| c.comment_id == complaint.comment_id && c.user_id == complaint.user_id)
        {
            Some(existing) => {
                existing.message.push('\n');
                existing.message.push_str(&complaint.message);
            }
            None => tables.complaints.push(complaint.clone()),
        }
        Ok(())
    }

    async fn delete_complaint(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        let before = tables.complaints.len();
        tables.complaints.retain(|c| c.id != id);
        if tables.complaints.len() == before {
            return Err(AppError::NotFound("complaint not found".to_string()));
        }
        Ok(())
    }

    async fn find_complaints_by_comment(
        &self,
        comment_id: Uuid,
    ) -> Result<Vec<Complaint>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .complaints
            .iter()
            .filter(|c| c.comment_id == comment_id)
            .cloned()
            .collect())
    }

    async fn count_complaints(&self, comment_id: Uuid) -> Result<i64, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .complaints
            .iter()
            .filter(|c| c.comment_id == comment_id)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn comment(article_id: Uuid, minutes_ago: i64) -> Comment {
        let id = Uuid::new_v4();
        Comment {
            id,
            article_id,
            thread_id: id,
            parent_id: None,
            author: "ada".to_string(),
            content: "hello".to_string(),
            created: Utc::now() - Duration::minutes(minutes_ago),
            deleted: false,
        }
    }

    #[tokio::test]
    async fn find_comments_is_newest_first_and_skips_deleted() {
        let repo = InMemoryForumRepository::new();
        let article = Uuid::new_v4();
        let old = comment(article, 30);
        let new = comment(article, 1);
        let gone = comment(article, 10);
        for c in [&old, &new, &gone] {
            repo.add_comment(c).await.unwrap();
        }
        repo.delete_comment(gone.id).await.unwrap();

        let ids: Vec<Uuid> = repo
            .find_comments_by_article(article)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![new.id, old.id]);

        // soft-deleted rows still count and can still be fetched
        assert_eq!(repo.count_comments_by_article(article).await.unwrap(), 3);
        assert!(repo.get_comment(gone.id).await.unwrap().unwrap().deleted);
    }

    #[tokio::test]
    async fn deleting_unknown_comment_is_not_found() {
        let repo = InMemoryForumRepository::new();
        let err = repo.delete_comment(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn duplicate_comment_id_conflicts() {
        let repo = InMemoryForumRepository::new();
        let c = comment(Uuid::new_v4(), 0);
        repo.add_comment(&c).await.unwrap();
        assert!(matches!(repo.add_comment(&c).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn thread_must_be_a_root_of_the_same_article() {
        let repo = InMemoryForumRepository::new();
        let article = Uuid::new_v4();
        let root = comment(article, 2);
        repo.add_comment(&root).await.unwrap();

        let mut reply = comment(article, 1);
        reply.thread_id = root.id;
        repo.add_comment(&reply).await.unwrap();

        // a reply is not a thread root
        let mut nested = comment(article, 0);
        nested.thread_id = reply.id;
        let err = repo.add_comment(&nested).await.unwrap_err();
        assert_eq!(err.to_string(), "thread not found");

        // unknown thread
        let mut stray = comment(article, 0);
        stray.thread_id = Uuid::new_v4();
        assert!(repo.add_comment(&stray).await.unwrap_err().is_not_found());

        // root of another article
        let mut foreign = comment(Uuid::new_v4(), 0);
        foreign.thread_id = root.id;
        assert!(repo.add_comment(&foreign).await.unwrap_err().is_not_found());

        assert_eq!(repo.count_comments_by_article(article).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn reply_to_unknown_parent_is_not_found() {
        let repo = InMemoryForumRepository::new();
        let mut reply = comment(Uuid::new_v4(), 0);
        reply.parent_id = Some(Uuid::new_v4());
        let err = repo.add_comment(&reply).await.unwrap_err();
        assert_eq!(err.to_string(), "parent comment not found");
    }

    #[tokio::test]
    async fn reaction_on_unknown_comment_is_not_found() {
        let repo = InMemoryForumRepository::new();
        let reaction = Reaction::new(Uuid::new_v4(), Uuid::new_v4());
        let err = repo
            .add_reaction(ReactionKind::Like, &reaction)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "comment not found");
    }
}
