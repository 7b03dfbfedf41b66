// src/services/tree.rs

//! Flat comment rows to reply forest.
//!
//! Comments are grouped by `thread_id`, not by `parent_id`: every comment of
//! a thread becomes a direct child of the thread root, whatever its parent.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::comment::{Comment, CommentNode};

/// Where a comment's `thread_id` chain ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Pending,
    Visiting,
    Root(usize),
    Missing,
    Cycle,
}

/// Groups `comments` (newest first) into a forest without reordering
/// siblings.
///
/// Every comment becomes a direct child of the root its `thread_id` chain
/// ends at, so the forest is never deeper than two levels. Comments whose
/// chain hits a missing id or loops are lifted to the top level and flagged
/// as `promoted`; nothing is dropped.
pub fn build_forest(comments: Vec<Comment>) -> Vec<CommentNode> {
    // First occurrence wins for duplicated ids.
    let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(comments.len());
    for (i, comment) in comments.iter().enumerate() {
        index.entry(comment.id).or_insert(i);
    }

    let mut resolved = vec![Resolution::Pending; comments.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots: Vec<(usize, bool)> = Vec::new();

    for (i, comment) in comments.iter().enumerate() {
        if comment.is_thread_root() {
            roots.push((i, false));
            continue;
        }
        match resolve(i, &comments, &index, &mut resolved) {
            Resolution::Root(root) => children[root].push(i),
            reason => {
                tracing::warn!(
                    comment_id = %comment.id,
                    thread_id = %comment.thread_id,
                    cycle = reason == Resolution::Cycle,
                    "thread root not found, promoting comment to top level"
                );
                roots.push((i, true));
            }
        }
    }

    let mut slots: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    let mut forest = Vec::with_capacity(roots.len());

    for (root, promoted) in roots {
        let Some(comment) = slots[root].take() else {
            continue;
        };
        let mut node = CommentNode::new(comment);
        node.promoted = promoted;
        node.children = children[root]
            .iter()
            .filter_map(|&child| slots[child].take().map(CommentNode::new))
            .collect();
        forest.push(node);
    }

    forest
}

/// Follows the `thread_id` chain of `start` until it reaches a root, a
/// missing id or a comment already on the walk. Results are memoized for
/// every comment on the path, so all calls together stay linear.
fn resolve(
    start: usize,
    comments: &[Comment],
    index: &HashMap<Uuid, usize>,
    resolved: &mut [Resolution],
) -> Resolution {
    let mut path = Vec::new();
    let mut current = start;

    let outcome = loop {
        match resolved[current] {
            Resolution::Pending => {}
            Resolution::Visiting => break Resolution::Cycle,
            done => break done,
        }
        let comment = &comments[current];
        if comment.is_thread_root() {
            break Resolution::Root(current);
        }
        resolved[current] = Resolution::Visiting;
        path.push(current);
        match index.get(&comment.thread_id) {
            Some(&next) => current = next,
            None => break Resolution::Missing,
        }
    };

    for i in path {
        resolved[i] = outcome;
    }
    outcome
}
