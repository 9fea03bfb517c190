//! # Application State
//!
//! Core business state for threadline. This module contains domain logic
//! only - no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── posts: Vec<Post>                       // the feed, comment trees inside
//! ├── visibility: Visibility                 // per-comment replies_shown
//! ├── max_depth: usize                       // deepest drawn reply level
//! ├── identity: Option<Identity>             // signed-in user, if any
//! ├── endpoint: Arc<dyn SubmissionEndpoint>  // where new comments go
//! ├── submitting: bool                       // a submission is in flight
//! ├── status_message: String                 // status bar text
//! └── feed_revision: u64                     // bumped when a comment lands
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::{Identity, ResolvedConfig};
use crate::core::feed::Post;
use crate::core::submit::SubmissionEndpoint;
use crate::core::thread::{DEFAULT_MAX_DEPTH, ThreadRow, Visibility, visible_rows};

pub struct App {
    pub posts: Vec<Post>,
    pub visibility: Visibility,
    pub max_depth: usize,
    pub identity: Option<Identity>,
    pub endpoint: Arc<dyn SubmissionEndpoint>,
    pub submitting: bool,
    pub status_message: String,
    pub feed_revision: u64,
}

impl App {
    pub fn new(posts: Vec<Post>, endpoint: Arc<dyn SubmissionEndpoint>) -> Self {
        Self {
            posts,
            visibility: Visibility::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            identity: None,
            endpoint,
            submitting: false,
            status_message: String::from("Welcome to Threadline!"),
            feed_revision: 0,
        }
    }

    pub fn from_config(
        posts: Vec<Post>,
        endpoint: Arc<dyn SubmissionEndpoint>,
        config: &ResolvedConfig,
    ) -> Self {
        let mut app = Self::new(posts, endpoint);
        app.max_depth = config.max_depth;
        app.identity = config.identity.clone();
        app
    }

    /// Rows of the feed as currently expanded.
    pub fn rows(&self) -> Vec<ThreadRow<'_>> {
        visible_rows(&self.posts, &self.visibility, self.max_depth)
    }

    /// Changes whenever the set of rows or their contents may have changed.
    pub fn layout_revision(&self) -> (u64, u64) {
        (self.visibility.revision(), self.feed_revision)
    }
}
