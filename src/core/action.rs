//! # Actions
//!
//! Everything that can happen in threadline becomes an `Action`.
//! User expands a thread? That's `Action::ToggleReplies(id)`.
//! Endpoint stores a comment? That's `Action::SubmissionAccepted { .. }`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing any I/O the
//! caller should perform. No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::feed::{CommentNode, insert_reply};
use crate::core::state::App;
use crate::core::submit::{Attachment, CommentPayload, SubmitReceipt};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Flip `replies_shown` on one comment.
    ToggleReplies(Uuid),
    /// Composer produced a valid payload.
    Submit(CommentPayload),
    SubmissionAccepted {
        payload: CommentPayload,
        receipt: SubmitReceipt,
    },
    SubmissionFailed(String),
    Quit,
}

/// I/O the caller must perform after `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    Submit(CommentPayload),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::ToggleReplies(id) => {
            if crate::core::feed::find_comment(&app.posts, id).is_none() {
                warn!("ToggleReplies for unknown comment {}", id);
                return Effect::None;
            }
            app.visibility.toggle(id);
            Effect::None
        }
        Action::Submit(payload) => {
            if app.submitting {
                app.status_message = "Still sending the previous comment…".to_string();
                return Effect::None;
            }
            app.submitting = true;
            app.status_message = "Sending…".to_string();
            Effect::Submit(payload)
        }
        Action::SubmissionAccepted { payload, receipt } => {
            app.submitting = false;
            let node = comment_from_payload(app, payload, &receipt);
            let is_reply = node.parent_id.is_some();
            match insert_reply(&mut app.posts, node) {
                Ok(()) => {
                    app.feed_revision += 1;
                    info!("Comment {} added to feed", receipt.id);
                    app.status_message = if is_reply {
                        "Reply posted".to_string()
                    } else {
                        "Comment posted".to_string()
                    };
                }
                Err(e) => {
                    warn!("Accepted comment {} could not be placed: {}", receipt.id, e);
                    app.status_message = format!("Posted, but {e}");
                }
            }
            Effect::None
        }
        Action::SubmissionFailed(error) => {
            app.submitting = false;
            app.status_message = format!("Send failed: {error}");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn comment_from_payload(app: &App, payload: CommentPayload, receipt: &SubmitReceipt) -> CommentNode {
    // Only the signed-in user's own id gets an author attached.
    let author = match (&app.identity, payload.user_id) {
        (Some(identity), Some(user_id)) if identity.user_id == user_id => {
            Some(identity.author.clone())
        }
        _ => None,
    };
    let files = match &payload.attachment {
        Some(Attachment::File { path, .. }) => vec![path.clone()],
        Some(Attachment::Sticker { sticker }) => vec![sticker.clone()],
        None => Vec::new(),
    };

    CommentNode {
        id: receipt.id,
        author,
        guest: payload.guest,
        comment: payload.comment,
        post_id: payload.post_id,
        user_id: payload.user_id,
        parent_id: payload.parent_id,
        files,
        likes: Vec::new(),
        created_at: receipt.created_at,
        updated_at: receipt.created_at,
        replies: Vec::new(),
    }
}
