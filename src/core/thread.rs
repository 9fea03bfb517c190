//! # Thread Visibility
//!
//! Decides which part of each comment tree is on screen.
//!
//! Every comment has its own `replies_shown` flag, off until the user
//! flips it on that comment. A comment's children are drawn only while its
//! flag is on *and* it sits above `max_depth`. A collapsed comment with
//! replies gets a single "View N replies" row instead, where N counts every
//! reply below it, not just direct children.
//!
//! ```text
//! Post                         depth
//! ├── Comment (shown)            0
//! │   ├── Comment                1
//! │   └── View 3 replies         1   ← collapsed, 3 descendants
//! └── Comment                    0
//!     └── View 1 reply           0
//! ```
//!
//! The tree is flattened into [`ThreadRow`]s so the TUI can measure,
//! scroll, and hit-test a plain list.

use std::collections::HashSet;

use uuid::Uuid;

use crate::core::feed::{CommentNode, Post};

/// Nesting level past which replies are never drawn.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Total replies reachable from `node`, at any depth.
pub fn descendant_count(node: &CommentNode) -> usize {
    node.replies
        .iter()
        .map(|reply| 1 + descendant_count(reply))
        .sum()
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "y" } else { "ies" }
}

/// Affordance text for a collapsed comment.
pub fn reply_label(count: usize) -> String {
    format!("View {count} repl{}", plural(count))
}

/// Footer text for an expanded comment.
pub fn hide_label(count: usize) -> String {
    format!("Hide repl{}", plural(count))
}

/// Per-comment `replies_shown` flags.
///
/// Absent from the set means collapsed. Flags are independent: flipping one
/// comment never touches its siblings, ancestors, or descendants.
#[derive(Debug, Default, Clone)]
pub struct Visibility {
    shown: HashSet<Uuid>,
    revision: u64,
}

impl Visibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shown(&self, id: Uuid) -> bool {
        self.shown.contains(&id)
    }

    /// Flip the flag for `id` and return its new value.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        self.revision += 1;
        if self.shown.remove(&id) {
            false
        } else {
            self.shown.insert(id);
            true
        }
    }

    /// Bumped on every toggle; lets renderers tell when row heights moved.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Stable identity of a row, independent of its position in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey {
    Post(Uuid),
    Comment(Uuid),
    ViewReplies(Uuid),
    DepthLimit(Uuid),
}

/// One renderable entry of the flattened feed.
#[derive(Debug, Clone, Copy)]
pub enum ThreadRow<'a> {
    Post {
        post: &'a Post,
    },
    Comment {
        post_id: Uuid,
        node: &'a CommentNode,
        depth: usize,
        descendants: usize,
        replies_shown: bool,
    },
    /// Collapsed comment with replies: "View N replies".
    ViewReplies {
        post_id: Uuid,
        comment_id: Uuid,
        depth: usize,
        count: usize,
    },
    /// Expanded comment at `max_depth`: its replies exist but are not drawn.
    DepthLimit {
        comment_id: Uuid,
        depth: usize,
        hidden: usize,
    },
}

impl ThreadRow<'_> {
    pub fn key(&self) -> RowKey {
        match self {
            ThreadRow::Post { post } => RowKey::Post(post.id),
            ThreadRow::Comment { node, .. } => RowKey::Comment(node.id),
            ThreadRow::ViewReplies { comment_id, .. } => RowKey::ViewReplies(*comment_id),
            ThreadRow::DepthLimit { comment_id, .. } => RowKey::DepthLimit(*comment_id),
        }
    }

    /// Post this row belongs to.
    pub fn post_id(&self) -> Option<Uuid> {
        match self {
            ThreadRow::Post { post } => Some(post.id),
            ThreadRow::Comment { post_id, .. } | ThreadRow::ViewReplies { post_id, .. } => {
                Some(*post_id)
            }
            ThreadRow::DepthLimit { .. } => None,
        }
    }

    /// The comment whose flag this row toggles, if any.
    pub fn toggle_target(&self) -> Option<Uuid> {
        match self {
            ThreadRow::Comment {
                node, descendants, ..
            } if *descendants > 0 => Some(node.id),
            ThreadRow::ViewReplies { comment_id, .. } => Some(*comment_id),
            _ => None,
        }
    }
}

/// Flatten the feed into the rows currently visible.
pub fn visible_rows<'a>(
    posts: &'a [Post],
    visibility: &Visibility,
    max_depth: usize,
) -> Vec<ThreadRow<'a>> {
    let mut rows = Vec::new();
    for post in posts {
        rows.push(ThreadRow::Post { post });
        for node in &post.comments {
            push_comment(&mut rows, post.id, node, 0, visibility, max_depth);
        }
    }
    rows
}

fn push_comment<'a>(
    rows: &mut Vec<ThreadRow<'a>>,
    post_id: Uuid,
    node: &'a CommentNode,
    depth: usize,
    visibility: &Visibility,
    max_depth: usize,
) {
    let descendants = descendant_count(node);
    let replies_shown = visibility.is_shown(node.id);

    rows.push(ThreadRow::Comment {
        post_id,
        node,
        depth,
        descendants,
        replies_shown,
    });

    if descendants == 0 {
        return;
    }

    if !replies_shown {
        rows.push(ThreadRow::ViewReplies {
            post_id,
            comment_id: node.id,
            depth,
            count: descendants,
        });
    } else if depth < max_depth {
        for reply in &node.replies {
            push_comment(rows, post_id, reply, depth + 1, visibility, max_depth);
        }
    } else {
        rows.push(ThreadRow::DepthLimit {
            comment_id: node.id,
            depth,
            hidden: descendants,
        });
    }
}
