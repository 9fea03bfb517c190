//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as parameters:
//! - `TitleBar`: Top status bar with post count and status text
//! - `PostHeader`: One post's title, byline, body, and counts
//! - `CommentCard`: One comment, indented by its depth
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state and emit events:
//! - `ThreadView`: Scrollable feed with layout caching and selection
//! - `ComposerBox`: Comment form wrapped around `core::composer::ComposerForm`
//! - `EmojiPicker`: Popover grid of emoji and stickers
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props (struct fields), not by
//! reaching into `App`:
//!
//! ```rust,ignore
//! TitleBar::new(app.posts.len(), app.status_message.clone(), unseen).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── post_header.rs   (Post card)
//! ├── comment.rs       (Comment card, indentation, wrapping)
//! ├── thread_view.rs   (Scrollable feed + layout cache)
//! ├── composer/        (Comment form)
//! └── emoji_picker.rs  (Emoji/sticker popover)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod comment;
pub mod composer;
pub mod emoji_picker;
pub mod post_header;
pub mod thread_view;

pub use composer::{ComposerBox, ComposerEvent};
pub use emoji_picker::{EmojiPicker, EmojiPickerEvent, EmojiPickerState};
pub use thread_view::{ThreadView, ThreadViewState};
