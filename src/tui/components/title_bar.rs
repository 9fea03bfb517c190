//! # TitleBar Component
//!
//! Top status bar showing the feed size and the latest status message.
//!
//! ## Responsibilities
//!
//! - Display how many posts are loaded
//! - Display status messages (e.g. "Sending…", "Reply posted")
//! - Show "↓ More" when there are rows below the viewport
//!
//! ## Conditional Formatting
//!
//! 1. **Unseen content**: `"Threadline | 2 posts | Reply posted | ↓ More"`
//! 2. **Status message**: `"Threadline | 2 posts | Reply posted"`
//! 3. **Default**: `"Threadline | 2 posts"`
//!
//! Pieces are appended in priority order so the most important text stays
//! visible on narrow terminals.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

/// Top status bar. Stateless; every field is a prop.
pub struct TitleBar {
    pub post_count: usize,
    /// Status message from `App` (e.g. "Sending…")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(post_count: usize, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            post_count,
            status_message,
            has_unseen_content,
        }
    }

    fn title_text(&self) -> String {
        let noun = if self.post_count == 1 { "post" } else { "posts" };
        let mut text = format!("Threadline | {} {}", self.post_count, noun);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ More");
        }
        text
    }
}

impl Component for TitleBar {
    /// Always a single line, so a plain Span rather than a Block.
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.title_text()), area);
    }
}
