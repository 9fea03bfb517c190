//! # Composer Form
//!
//! Form state for writing a comment or reply. One `ComposerForm` exists per
//! reply action; it only knows its [`ReplyTarget`], never the thread.
//!
//! ```text
//! ComposerForm
//! ├── target: ReplyTarget        // post + optional parent comment
//! ├── guest: TextField           // name shown when posting anonymously
//! ├── comment: TextField         // body (multi-line)
//! ├── attachment_entry: TextField// path typed before attaching
//! ├── attachment: Option<Attachment>
//! ├── anonymous: bool
//! └── active: ComposerField      // where typing and emoji go
//! ```
//!
//! Nothing here does I/O. `build_payload()` turns the form into the
//! [`CommentPayload`] handed to the submission endpoint.

use std::fmt;

use uuid::Uuid;

use crate::core::config::Identity;
use crate::core::submit::{Attachment, CommentPayload};

/// Sticker palette offered next to the emoji grid.
pub const STICKERS: [&str; 4] = ["🎨", "✏️", "🧩", "🔁"];

/// Where a new comment goes.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyTarget {
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    /// Human label for the panel title ("Reply to Edna", "Comment on …").
    pub label: String,
}

impl ReplyTarget {
    pub fn post(post_id: Uuid, title: &str) -> Self {
        Self {
            post_id,
            parent_id: None,
            label: format!("Comment on \"{title}\""),
        }
    }

    pub fn reply(post_id: Uuid, parent_id: Uuid, name: &str) -> Self {
        Self {
            post_id,
            parent_id: Some(parent_id),
            label: format!("Reply to {name}"),
        }
    }
}

/// Editable text with a cursor kept on a char boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextField {
    pub text: String,
    /// Byte offset into `text` (0..=text.len()).
    pub cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = prev_boundary(&self.text, self.cursor);
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        let next = next_boundary(&self.text, self.cursor);
        self.text.drain(self.cursor..next);
        true
    }

    pub fn left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = prev_boundary(&self.text, self.cursor);
        true
    }

    pub fn right(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.cursor = next_boundary(&self.text, self.cursor);
        true
    }

    fn line_start(&self, pos: usize) -> usize {
        self.text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.text[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(self.text.len())
    }

    pub fn home(&mut self) -> bool {
        let start = self.line_start(self.cursor);
        let moved = start != self.cursor;
        self.cursor = start;
        moved
    }

    pub fn end(&mut self) -> bool {
        let end = self.line_end(self.cursor);
        let moved = end != self.cursor;
        self.cursor = end;
        moved
    }

    /// Move to the previous (`up`) or next logical line, keeping the
    /// char column where the target line is long enough.
    pub fn vertical(&mut self, up: bool) -> bool {
        let start = self.line_start(self.cursor);
        let column = self.text[start..self.cursor].chars().count();

        let target_start = if up {
            if start == 0 {
                return false;
            }
            self.line_start(start - 1)
        } else {
            let end = self.line_end(self.cursor);
            if end >= self.text.len() {
                return false;
            }
            end + 1
        };

        let target_end = self.line_end(target_start);
        self.cursor = self.text[target_start..target_end]
            .char_indices()
            .nth(column)
            .map(|(i, _)| target_start + i)
            .unwrap_or(target_end);
        true
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

pub fn prev_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerField {
    Guest,
    Comment,
    Attachment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComposerError {
    EmptyComment,
    EmptyAttachmentPath,
}

impl fmt::Display for ComposerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposerError::EmptyComment => write!(f, "write something before sending"),
            ComposerError::EmptyAttachmentPath => write!(f, "type a file path to attach"),
        }
    }
}

impl std::error::Error for ComposerError {}

#[derive(Debug, Clone)]
pub struct ComposerForm {
    pub target: ReplyTarget,
    pub guest: TextField,
    pub comment: TextField,
    pub attachment_entry: TextField,
    pub attachment: Option<Attachment>,
    pub anonymous: bool,
    pub active: ComposerField,
    identity: Option<Identity>,
}

impl ComposerForm {
    pub fn new(target: ReplyTarget, identity: Option<Identity>) -> Self {
        Self {
            target,
            guest: TextField::new(),
            comment: TextField::new(),
            attachment_entry: TextField::new(),
            attachment: None,
            anonymous: false,
            active: ComposerField::Comment,
            identity,
        }
    }

    /// Without a signed-in identity every comment is a guest comment.
    pub fn posts_as_guest(&self) -> bool {
        self.anonymous || self.identity.is_none()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Fields the user can currently move between, in Tab order.
    pub fn fields(&self) -> Vec<ComposerField> {
        let mut fields = Vec::with_capacity(3);
        if self.posts_as_guest() {
            fields.push(ComposerField::Guest);
        }
        fields.push(ComposerField::Comment);
        if self.active == ComposerField::Attachment {
            fields.push(ComposerField::Attachment);
        }
        fields
    }

    pub fn toggle_anonymous(&mut self) {
        self.anonymous = !self.anonymous;
        if !self.posts_as_guest() && self.active == ComposerField::Guest {
            self.active = ComposerField::Comment;
        }
    }

    pub fn focus(&mut self, field: ComposerField) {
        if field == ComposerField::Guest && !self.posts_as_guest() {
            return;
        }
        self.active = field;
    }

    pub fn cycle_focus(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.active).unwrap_or(0);
        self.active = fields[(pos + 1) % fields.len()];
    }

    pub fn active_field_mut(&mut self) -> &mut TextField {
        match self.active {
            ComposerField::Guest => &mut self.guest,
            ComposerField::Comment => &mut self.comment,
            ComposerField::Attachment => &mut self.attachment_entry,
        }
    }

    /// Insert an emoji at the cursor of the focused text field. Path entry
    /// does not take emoji.
    pub fn insert_emoji(&mut self, emoji: &str) -> bool {
        match self.active {
            ComposerField::Guest => self.guest.insert_str(emoji),
            ComposerField::Comment => self.comment.insert_str(emoji),
            ComposerField::Attachment => return false,
        }
        true
    }

    /// Attach the typed path, replacing any earlier attachment.
    pub fn attach_file_from_entry(&mut self) -> Result<(), ComposerError> {
        let path = self.attachment_entry.text.trim();
        if path.is_empty() {
            return Err(ComposerError::EmptyAttachmentPath);
        }
        self.attachment = Some(Attachment::file(path));
        self.attachment_entry.clear();
        self.active = ComposerField::Comment;
        Ok(())
    }

    pub fn attach_sticker(&mut self, sticker: &str) {
        self.attachment = Some(Attachment::sticker(sticker));
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    pub fn build_payload(&self) -> Result<CommentPayload, ComposerError> {
        let comment = self.comment.text.trim();
        if comment.is_empty() {
            return Err(ComposerError::EmptyComment);
        }

        let (user_id, guest) = if self.posts_as_guest() {
            let name = self.guest.text.trim();
            (None, (!name.is_empty()).then(|| name.to_string()))
        } else {
            (self.identity.as_ref().map(|i| i.user_id), None)
        };

        Ok(CommentPayload {
            user_id,
            guest,
            post_id: self.target.post_id,
            parent_id: self.target.parent_id,
            attachment: self.attachment.clone(),
            comment: comment.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::Author;

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            author: Author {
                fname: "Cynthia".into(),
                lname: Some("Adaji".into()),
                avatar_url: None,
            },
        }
    }

    fn form(identity: Option<Identity>) -> ComposerForm {
        ComposerForm::new(ReplyTarget::reply(Uuid::new_v4(), Uuid::new_v4(), "Edna"), identity)
    }

    #[test]
    fn test_text_field_editing_respects_char_boundaries() {
        let mut field = TextField::new();
        field.insert_str("hé");
        field.insert_char('🧩');
        assert_eq!(field.text, "hé🧩");
        assert!(field.left());
        assert!(field.left());
        field.insert_char('x');
        assert_eq!(field.text, "hxé🧩");
        assert!(field.delete());
        assert_eq!(field.text, "hx🧩");
        assert!(field.backspace());
        assert_eq!(field.text, "h🧩");
        assert_eq!(field.cursor, 1);
    }

    #[test]
    fn test_text_field_boundaries_report_no_move() {
        let mut field = TextField::new();
        assert!(!field.backspace());
        assert!(!field.left());
        assert!(!field.right());
        assert!(!field.delete());
    }

    #[test]
    fn test_home_end_use_logical_lines() {
        let mut field = TextField::new();
        field.insert_str("first\nsecond");
        assert!(field.home());
        assert_eq!(field.cursor, 6);
        assert!(!field.home());
        assert!(field.end());
        assert_eq!(field.cursor, field.text.len());
    }

    #[test]
    fn test_vertical_keeps_column() {
        let mut field = TextField::new();
        field.insert_str("abcdef\nab\nabcdef");
        // cursor at end of line 3, column 6
        assert!(field.vertical(true));
        assert_eq!(&field.text[..field.cursor], "abcdef\nab");
        assert!(field.vertical(true));
        assert_eq!(&field.text[..field.cursor], "ab");
        assert!(!field.vertical(true));
        assert!(field.vertical(false));
        assert!(field.vertical(false));
        assert_eq!(&field.text[..field.cursor], "abcdef\nab\nab");
        assert!(!field.vertical(false));
    }

    #[test]
    fn test_emoji_goes_to_active_field_cursor() {
        let mut form = form(None);
        form.comment.insert_str("great post");
        form.comment.cursor = 5;
        assert!(form.insert_emoji("😀"));
        assert_eq!(form.comment.text, "great😀 post");

        form.focus(ComposerField::Guest);
        assert!(form.insert_emoji("🎉"));
        assert_eq!(form.guest.text, "🎉");

        form.focus(ComposerField::Attachment);
        assert!(!form.insert_emoji("🎉"));
    }

    #[test]
    fn test_guest_field_only_when_posting_as_guest() {
        let mut form = form(Some(identity()));
        assert!(!form.posts_as_guest());
        assert_eq!(form.fields(), vec![ComposerField::Comment]);
        form.focus(ComposerField::Guest);
        assert_eq!(form.active, ComposerField::Comment);

        form.toggle_anonymous();
        assert_eq!(form.fields(), vec![ComposerField::Guest, ComposerField::Comment]);
        form.focus(ComposerField::Guest);
        form.toggle_anonymous();
        assert_eq!(form.active, ComposerField::Comment);
    }

    #[test]
    fn test_cycle_focus_wraps() {
        let mut form = form(None);
        assert_eq!(form.active, ComposerField::Comment);
        form.cycle_focus();
        assert_eq!(form.active, ComposerField::Guest);
        form.cycle_focus();
        assert_eq!(form.active, ComposerField::Comment);
    }

    #[test]
    fn test_attachment_slot_is_replaced() {
        let mut form = form(None);
        form.attach_sticker("🎨");
        form.focus(ComposerField::Attachment);
        assert_eq!(
            form.attach_file_from_entry(),
            Err(ComposerError::EmptyAttachmentPath)
        );
        form.attachment_entry.insert_str("  /tmp/react_perf.png ");
        form.attach_file_from_entry().unwrap();
        assert_eq!(form.attachment, Some(Attachment::file("/tmp/react_perf.png")));
        assert_eq!(form.active, ComposerField::Comment);
        assert!(form.attachment_entry.text.is_empty());

        form.clear_attachment();
        assert!(form.attachment.is_none());
    }

    #[test]
    fn test_payload_requires_comment() {
        let mut form = form(None);
        form.comment.insert_str("   \n ");
        assert_eq!(form.build_payload(), Err(ComposerError::EmptyComment));
    }

    #[test]
    fn test_payload_as_guest() {
        let mut form = form(None);
        form.guest.insert_str("  GuestIan ");
        form.comment.insert_str(" Thanks! ");
        let payload = form.build_payload().unwrap();
        assert_eq!(payload.guest.as_deref(), Some("GuestIan"));
        assert_eq!(payload.user_id, None);
        assert_eq!(payload.comment, "Thanks!");
        assert_eq!(payload.parent_id, form.target.parent_id);

        form.guest.clear();
        assert_eq!(form.build_payload().unwrap().guest, None);
    }

    #[test]
    fn test_payload_as_signed_in_user() {
        let me = identity();
        let mut form = form(Some(me.clone()));
        form.guest.insert_str("ignored");
        form.comment.insert_str("Hello");
        let payload = form.build_payload().unwrap();
        assert_eq!(payload.user_id, Some(me.user_id));
        assert_eq!(payload.guest, None);

        form.toggle_anonymous();
        let payload = form.build_payload().unwrap();
        assert_eq!(payload.user_id, None);
        assert_eq!(payload.guest.as_deref(), Some("ignored"));
    }

    #[test]
    fn test_target_labels() {
        let post = ReplyTarget::post(Uuid::nil(), "Understanding REST APIs");
        assert_eq!(post.label, "Comment on \"Understanding REST APIs\"");
        assert!(post.parent_id.is_none());
        let reply = ReplyTarget::reply(Uuid::nil(), Uuid::nil(), "GuestIan");
        assert_eq!(reply.label, "Reply to GuestIan");
    }
}
