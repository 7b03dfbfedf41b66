// src/services/mod.rs

pub mod comments;
pub mod complaints;
pub mod reactions;
pub mod tree;

use std::sync::Arc;

pub use comments::{CommentForest, CommentService};
pub use complaints::ComplaintService;
pub use reactions::ReactionCoordinator;
pub use tree::build_forest;

use crate::repository::ForumRepository;

/// Settings handed to the forum core at construction.
#[derive(Debug, Clone, Copy)]
pub struct ForumSettings {
    /// Run "remove opposite, insert" reaction switches as one storage
    /// transaction instead of two statements.
    pub atomic_reactions: bool,
}

impl Default for ForumSettings {
    fn default() -> Self {
        Self {
            atomic_reactions: true,
        }
    }
}

/// Entry point to the forum core. Stateless apart from the shared store,
/// cheap to clone into every request.
#[derive(Clone)]
pub struct Forum {
    pub comments: CommentService,
    pub reactions: ReactionCoordinator,
    pub complaints: ComplaintService,
}

impl Forum {
    pub fn new<R>(repo: Arc<R>, settings: ForumSettings) -> Self
    where
        R: ForumRepository + 'static,
    {
        Self {
            comments: CommentService::new(repo.clone()),
            reactions: ReactionCoordinator::new(repo.clone(), settings),
            complaints: ComplaintService::new(repo),
        }
    }
}
