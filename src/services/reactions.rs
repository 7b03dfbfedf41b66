// src/services/reactions.rs

use std::sync::Arc;

use uuid::Uuid;

use super::ForumSettings;
use crate::{
    error::AppError,
    models::reaction::{Reaction, ReactionKind},
    repository::ReactionRepository,
};

/// Keeps at most one of {like, dislike} per (comment, user).
///
/// Adding is tolerant: the opposite reaction is removed if present and a
/// repeated add is a no-op. Removing is strict: a missing reaction is
/// `NotFound`.
///
/// With `atomic_reactions` off, the removal and the insert are two separate
/// storage statements. A crash between them leaves the user with no
/// reaction, and two concurrent opposite switches for the same pair can
/// leave both rows in place.
#[derive(Clone)]
pub struct ReactionCoordinator {
    repo: Arc<dyn ReactionRepository>,
    settings: ForumSettings,
}

impl ReactionCoordinator {
    pub fn new(repo: Arc<dyn ReactionRepository>, settings: ForumSettings) -> Self {
        Self { repo, settings }
    }

    pub async fn add(&self, kind: ReactionKind, comment_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let reaction = Reaction::new(comment_id, user_id);

        if self.settings.atomic_reactions {
            return self.repo.switch_reaction(kind, &reaction).await;
        }

        match self.repo.delete_reaction(kind.opposite(), comment_id, user_id).await {
            Ok(()) => {
                tracing::debug!(%comment_id, %user_id, "switched {} to {}", kind.opposite(), kind)
            }
            Err(AppError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        self.repo.add_reaction(kind, &reaction).await
    }

    pub async fn remove(&self, kind: ReactionKind, comment_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.repo.delete_reaction(kind, comment_id, user_id).await
    }

    pub async fn list(&self, kind: ReactionKind, comment_id: Uuid) -> Result<Vec<Reaction>, AppError> {
        self.repo.find_reactions(kind, comment_id).await
    }

    pub async fn count(&self, kind: ReactionKind, comment_id: Uuid) -> Result<i64, AppError> {
        self.repo.count_reactions(kind, comment_id).await
    }

    pub async fn add_like(&self, comment_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.add(ReactionKind::Like, comment_id, user_id).await
    }

    pub async fn add_dislike(&self, comment_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.add(ReactionKind::Dislike, comment_id, user_id).await
    }

    pub async fn remove_like(&self, comment_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.remove(ReactionKind::Like, comment_id, user_id).await
    }

    pub async fn remove_dislike(&self, comment_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.remove(ReactionKind::Dislike, comment_id, user_id).await
    }

    pub async fn list_likes(&self, comment_id: Uuid) -> Result<Vec<Reaction>, AppError> {
        self.list(ReactionKind::Like, comment_id).await
    }

    pub async fn list_dislikes(&self, comment_id: Uuid) -> Result<Vec<Reaction>, AppError> {
        self.list(ReactionKind::Dislike, comment_id).await
    }

    pub async fn count_likes(&self, comment_id: Uuid) -> Result<i64, AppError> {
        self.count(ReactionKind::Like, comment_id).await
    }

    pub async fn count_dislikes(&self, comment_id: Uuid) -> Result<i64, AppError> {
        self.count(ReactionKind::Dislike, comment_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::comment::Comment,
        repository::{CommentRepository, InMemoryForumRepository},
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn seeded() -> (Arc<InMemoryForumRepository>, Uuid) {
        let repo = Arc::new(InMemoryForumRepository::new());
        let id = Uuid::new_v4();
        repo.add_comment(&Comment {
            id,
            article_id: Uuid::new_v4(),
            thread_id: id,
            parent_id: None,
            author: "ada".to_string(),
            content: "hello".to_string(),
            created: Utc::now(),
            deleted: false,
        })
        .await
        .unwrap();
        (repo, id)
    }

    fn coordinators(repo: &Arc<InMemoryForumRepository>) -> [ReactionCoordinator; 2] {
        [true, false].map(|atomic_reactions| {
            ReactionCoordinator::new(repo.clone(), ForumSettings { atomic_reactions })
        })
    }

    #[tokio::test]
    async fn dislike_replaces_like() {
        let (repo, comment) = seeded().await;
        for reactions in coordinators(&repo) {
            let user = Uuid::new_v4();
            reactions.add_like(comment, user).await.unwrap();
            reactions.add_dislike(comment, user).await.unwrap();

            let likes = reactions.list_likes(comment).await.unwrap();
            let dislikes = reactions.list_dislikes(comment).await.unwrap();
            assert!(likes.iter().all(|r| r.user_id != user));
            assert_eq!(dislikes.iter().filter(|r| r.user_id == user).count(), 1);
        }
    }

    #[tokio::test]
    async fn like_replaces_dislike() {
        let (repo, comment) = seeded().await;
        for reactions in coordinators(&repo) {
            let user = Uuid::new_v4();
            reactions.add_dislike(comment, user).await.unwrap();
            reactions.add_like(comment, user).await.unwrap();

            let likes = reactions.list_likes(comment).await.unwrap();
            let dislikes = reactions.list_dislikes(comment).await.unwrap();
            assert_eq!(likes.iter().filter(|r| r.user_id == user).count(), 1);
            assert!(dislikes.iter().all(|r| r.user_id != user));
        }
    }

    #[tokio::test]
    async fn repeated_like_is_idempotent() {
        let (repo, comment) = seeded().await;
        for reactions in coordinators(&repo) {
            let user = Uuid::new_v4();
            reactions.add_like(comment, user).await.unwrap();
            let first = reactions.list_likes(comment).await.unwrap();
            reactions.add_like(comment, user).await.unwrap();
            let second = reactions.list_likes(comment).await.unwrap();
            assert_eq!(first, second, "second add must not touch the stored row");
        }
        assert_eq!(
            coordinators(&repo)[0].count_likes(comment).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn removing_missing_like_is_not_found() {
        let (repo, comment) = seeded().await;
        let [reactions, _] = coordinators(&repo);
        let user = Uuid::new_v4();
        reactions.add_dislike(comment, user).await.unwrap();

        let err = reactions.remove_like(comment, user).await.unwrap_err();
        assert_eq!(err.to_string(), "like not found");
        assert_eq!(reactions.count_dislikes(comment).await.unwrap(), 1);
        assert_eq!(reactions.count_likes(comment).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn remove_dislike_deletes_row() {
        let (repo, comment) = seeded().await;
        let [_, reactions] = coordinators(&repo);
        let user = Uuid::new_v4();
        reactions.add_dislike(comment, user).await.unwrap();
        reactions.remove_dislike(comment, user).await.unwrap();
        assert_eq!(reactions.count_dislikes(comment).await.unwrap(), 0);
        let err = reactions.remove_dislike(comment, user).await.unwrap_err();
        assert_eq!(err.to_string(), "dislike not found");
    }

    #[tokio::test]
    async fn unknown_comment_is_not_found() {
        let (repo, _) = seeded().await;
        for reactions in coordinators(&repo) {
            let err = reactions
                .add_like(Uuid::new_v4(), Uuid::new_v4())
                .await
                .unwrap_err();
            assert!(err.is_not_found());
        }
    }

    /// Fails every delete with a storage error and counts inserts.
    struct BrokenDeletes {
        inserts: AtomicUsize,
    }

    #[async_trait]
    impl ReactionRepository for BrokenDeletes {
        async fn add_reaction(&self, _: ReactionKind, _: &Reaction) -> Result<(), AppError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete_reaction(&self, _: ReactionKind, _: Uuid, _: Uuid) -> Result<(), AppError> {
            Err(AppError::InternalServerError("disk full".to_string()))
        }

        async fn switch_reaction(&self, _: ReactionKind, _: &Reaction) -> Result<(), AppError> {
            unreachable!("non-atomic mode never switches in storage")
        }

        async fn find_reactions(&self, _: ReactionKind, _: Uuid) -> Result<Vec<Reaction>, AppError> {
            Ok(Vec::new())
        }

        async fn count_reactions(&self, _: ReactionKind, _: Uuid) -> Result<i64, AppError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn storage_failure_during_switch_propagates() {
        let repo = Arc::new(BrokenDeletes {
            inserts: AtomicUsize::new(0),
        });
        let reactions = ReactionCoordinator::new(
            repo.clone(),
            ForumSettings {
                atomic_reactions: false,
            },
        );

        let err = reactions
            .add_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalServerError(_)));
        assert_eq!(repo.inserts.load(Ordering::SeqCst), 0);
    }
}
