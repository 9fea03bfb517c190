//! # Composer Component
//!
//! Bottom panel for writing a comment or reply. Wraps a
//! `core::composer::ComposerForm` and adds everything terminal-shaped:
//! wrapping, internal scrolling, cursor placement, key handling.
//!
//! ## Layout
//!
//! ```text
//! ╭ Reply to Edna ────────────────────────────╮
//! │ Posting as Eneojo Amobeda                 │  identity, or "Name:" guest field
//! │ Great tips, thanks!                       │  comment (up to 5 lines, then scrolls)
//! │ 📎 sketch.png  Ctrl+X remove              │  attachment / path entry
//! ╰ Enter Send  Ctrl+J Newline  Tab Field … ──╯
//! ```

mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::composer::{ComposerError, ComposerField, ComposerForm};
use crate::core::submit::CommentPayload;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use text_wrap::{
    FIXED_LINES, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, cursor_line_col, inner_width,
    prefix_width, wrap_line_count, wrapped_lines,
};

const GUEST_PREFIX: &str = "Name: ";
const ATTACH_PREFIX: &str = "Attach: ";
const HELP_TEXT: &str =
    " Enter Send  Ctrl+J Newline  Tab Field  Ctrl+G Anonymous  Ctrl+E Emoji  Ctrl+O Attach  Esc Back ";

/// High-level events emitted by the composer
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    Submit(CommentPayload),
    /// Enter was pressed but the form is not ready
    Invalid(ComposerError),
    OpenEmojiPicker,
    /// Esc: hand focus back to the thread view
    Blur,
    Changed,
}

pub struct ComposerBox {
    pub form: ComposerForm,
    /// Prop: whether keystrokes go here (dimmed otherwise)
    pub focused: bool,
    /// Line offset for comment scrolling
    scroll_offset: u16,
    /// Comment field rectangle from the last render (emoji picker anchor)
    field_area: Rect,
}

impl ComposerBox {
    pub fn new(form: ComposerForm) -> Self {
        Self {
            form,
            focused: true,
            scroll_offset: 0,
            field_area: Rect::default(),
        }
    }

    /// Panel height for the current comment text, clamped to
    /// `MAX_VISIBLE_LINES` of comment.
    pub fn calculate_height(&self, width: u16) -> u16 {
        self.comment_lines(width) + FIXED_LINES + VERTICAL_OVERHEAD
    }

    fn comment_lines(&self, width: u16) -> u16 {
        wrap_line_count(&self.form.comment.text, inner_width(width)).min(MAX_VISIBLE_LINES)
    }

    /// Where the comment field was last drawn.
    pub fn field_area(&self) -> Rect {
        self.field_area
    }

    fn update_scroll_offset(&mut self, width: u16) {
        let inner = inner_width(width);
        let total = wrap_line_count(&self.form.comment.text, inner);
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let (line, _) = cursor_line_col(&self.form.comment.text, self.form.comment.cursor, inner);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line - (MAX_VISIBLE_LINES - 1);
        }
    }

    fn field_style(&self, field: ComposerField) -> Style {
        if self.focused && self.form.active == field {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    fn identity_line(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        if self.form.posts_as_guest() {
            let name = if self.form.guest.text.is_empty() && self.form.active != ComposerField::Guest
            {
                Span::styled("Anonymous", dim.add_modifier(Modifier::ITALIC))
            } else {
                Span::styled(self.form.guest.text.clone(), self.field_style(ComposerField::Guest))
            };
            Line::from(vec![Span::styled(GUEST_PREFIX, dim), name])
        } else {
            let who = self
                .form
                .identity()
                .map(|i| i.author.full_name())
                .unwrap_or_default();
            Line::from(vec![
                Span::styled("Posting as ", dim),
                Span::styled(who, Style::default().fg(Color::Green)),
                Span::styled("  Ctrl+G post anonymously", dim),
            ])
        }
    }

    fn attachment_line(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        if self.form.active == ComposerField::Attachment {
            return Line::from(vec![
                Span::styled(ATTACH_PREFIX, dim),
                Span::styled(
                    self.form.attachment_entry.text.clone(),
                    self.field_style(ComposerField::Attachment),
                ),
            ]);
        }
        match &self.form.attachment {
            Some(attachment) => Line::from(vec![
                Span::styled(attachment.label(), Style::default().fg(Color::Yellow)),
                Span::styled("  Ctrl+X remove", dim),
            ]),
            None => Line::styled("No attachment", dim),
        }
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let total_lines = wrap_line_count(&self.form.comment.text, inner_width(area.width));
        if total_lines <= MAX_VISIBLE_LINES {
            return;
        }
        let max_scroll = total_lines.saturating_sub(MAX_VISIBLE_LINES);
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(max_scroll as usize)
            .position(self.scroll_offset as usize);

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            Rect {
                x: area.x + area.width.saturating_sub(1),
                width: 1,
                ..self.field_area
            },
            &mut scrollbar_state,
        );
    }

    fn cursor_position(&self, inner: Rect, comment_lines: u16) -> (u16, u16) {
        let (col, row) = match self.form.active {
            ComposerField::Guest => (
                GUEST_PREFIX.width() as u16
                    + prefix_width(&self.form.guest.text, self.form.guest.cursor),
                0,
            ),
            ComposerField::Comment => {
                let (line, col) = cursor_line_col(
                    &self.form.comment.text,
                    self.form.comment.cursor,
                    inner.width,
                );
                (col, 1 + line.saturating_sub(self.scroll_offset))
            }
            ComposerField::Attachment => (
                ATTACH_PREFIX.width() as u16
                    + prefix_width(
                        &self.form.attachment_entry.text,
                        self.form.attachment_entry.cursor,
                    ),
                1 + comment_lines,
            ),
        };
        let max_col = inner.width.saturating_sub(1);
        (inner.x + col.min(max_col), inner.y + row)
    }
}

impl Component for ComposerBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.update_scroll_offset(area.width);

        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::DIM)
        };
        let mut title = format!(" {} ", self.form.target.label);
        if self.form.anonymous {
            title.push_str("· anonymous ");
        }

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_bottom(Line::from(HELP_TEXT).centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let comment_lines = self.comment_lines(area.width);
        self.field_area = Rect {
            x: inner.x,
            y: inner.y + 1,
            width: inner.width,
            height: comment_lines,
        };

        let mut lines = vec![self.identity_line()];
        let wrapped = wrapped_lines(&self.form.comment.text, inner.width);
        let editing_comment = self.focused && self.form.active == ComposerField::Comment;
        if self.form.comment.text.is_empty() && !editing_comment {
            lines.push(Line::styled(
                "Write a comment…",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
        } else {
            let style = self.field_style(ComposerField::Comment);
            lines.extend(
                wrapped
                    .into_iter()
                    .skip(self.scroll_offset as usize)
                    .take(comment_lines as usize)
                    .map(|l| Line::styled(l, style)),
            );
        }
        lines.push(self.attachment_line());

        frame.render_widget(Paragraph::new(lines), inner);
        self.render_scrollbar(frame, area);

        if self.focused {
            frame.set_cursor_position(self.cursor_position(inner, comment_lines));
        }
    }
}

impl EventHandler for ComposerBox {
    type Event = ComposerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let multiline = self.form.active == ComposerField::Comment;
        let changed = |moved: bool| moved.then_some(ComposerEvent::Changed);

        match event {
            TuiEvent::InputChar('\n') if !multiline => None,
            TuiEvent::InputChar(c) => {
                self.form.active_field_mut().insert_char(*c);
                Some(ComposerEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                if multiline {
                    self.form.active_field_mut().insert_str(text);
                } else {
                    self.form.active_field_mut().insert_str(&text.replace('\n', " "));
                }
                Some(ComposerEvent::Changed)
            }
            TuiEvent::Backspace => changed(self.form.active_field_mut().backspace()),
            TuiEvent::Delete => changed(self.form.active_field_mut().delete()),
            TuiEvent::CursorLeft => changed(self.form.active_field_mut().left()),
            TuiEvent::CursorRight => changed(self.form.active_field_mut().right()),
            TuiEvent::CursorHome => changed(self.form.active_field_mut().home()),
            TuiEvent::CursorEnd => changed(self.form.active_field_mut().end()),
            TuiEvent::CursorUp if multiline => changed(self.form.comment.vertical(true)),
            TuiEvent::CursorDown if multiline => changed(self.form.comment.vertical(false)),
            TuiEvent::Tab => {
                self.form.cycle_focus();
                Some(ComposerEvent::Changed)
            }
            TuiEvent::ToggleAnonymous => {
                self.form.toggle_anonymous();
                Some(ComposerEvent::Changed)
            }
            TuiEvent::OpenEmojiPicker => Some(ComposerEvent::OpenEmojiPicker),
            TuiEvent::AttachFile => {
                self.form.focus(ComposerField::Attachment);
                Some(ComposerEvent::Changed)
            }
            TuiEvent::ClearAttachment => {
                self.form.clear_attachment();
                Some(ComposerEvent::Changed)
            }
            TuiEvent::Submit if self.form.active == ComposerField::Attachment => {
                match self.form.attach_file_from_entry() {
                    Ok(()) => Some(ComposerEvent::Changed),
                    Err(e) => Some(ComposerEvent::Invalid(e)),
                }
            }
            TuiEvent::Submit => match self.form.build_payload() {
                Ok(payload) => Some(ComposerEvent::Submit(payload)),
                Err(e) => Some(ComposerEvent::Invalid(e)),
            },
            TuiEvent::Escape if self.form.active == ComposerField::Attachment => {
                self.form.attachment_entry.clear();
                self.form.focus(ComposerField::Comment);
                Some(ComposerEvent::Changed)
            }
            TuiEvent::Escape => Some(ComposerEvent::Blur),
            _ => None,
        }
    }
}
