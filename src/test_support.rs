//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::core::feed::{Author, CommentNode, Post};
use crate::core::state::App;
use crate::core::submit::{CommentPayload, SubmissionEndpoint, SubmitError, SubmitReceipt};

/// An endpoint that accepts everything without doing I/O.
pub struct NoopEndpoint;

#[async_trait]
impl SubmissionEndpoint for NoopEndpoint {
    fn name(&self) -> &str {
        "noop"
    }

    async fn submit(&self, _payload: &CommentPayload) -> Result<SubmitReceipt, SubmitError> {
        Ok(SubmitReceipt {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
        })
    }
}

/// A guest comment with fresh id; `post` fixes up post/parent links.
pub fn comment(text: &str, replies: Vec<CommentNode>) -> CommentNode {
    let created = Utc.with_ymd_and_hms(2025, 11, 28, 1, 33, 22).unwrap();
    CommentNode {
        id: Uuid::new_v4(),
        author: None,
        guest: Some(format!("Guest{}", text.len())),
        comment: text.to_string(),
        post_id: Uuid::nil(),
        user_id: None,
        parent_id: None,
        files: Vec::new(),
        likes: Vec::new(),
        created_at: created,
        updated_at: created,
        replies,
    }
}

fn link(node: &mut CommentNode, post_id: Uuid, parent: Option<Uuid>) {
    node.post_id = post_id;
    node.parent_id = parent;
    let id = node.id;
    for reply in &mut node.replies {
        link(reply, post_id, Some(id));
    }
}

pub fn post(title: &str, mut comments: Vec<CommentNode>) -> Post {
    let id = Uuid::new_v4();
    for c in &mut comments {
        link(c, id, None);
    }
    let created = Utc.with_ymd_and_hms(2025, 11, 25, 21, 55, 19).unwrap();
    Post {
        id,
        user_id: Uuid::new_v4(),
        title: title.to_string(),
        text: format!("{title} body"),
        files: Vec::new(),
        published: true,
        created_at: created,
        updated_at: created,
        profiles: Author {
            fname: "Edna".to_string(),
            lname: Some("Adaji".to_string()),
            avatar_url: None,
        },
        likes: Vec::new(),
        shares: Vec::new(),
        comments,
    }
}

/// Creates a test App over the given posts with a NoopEndpoint.
pub fn test_app_with(posts: Vec<Post>) -> App {
    App::new(posts, Arc::new(NoopEndpoint))
}

/// Creates a test App over a single post with one short thread.
pub fn test_app() -> App {
    test_app_with(vec![post(
        "Test post",
        vec![comment("root", vec![comment("reply", vec![])])],
    )])
}
