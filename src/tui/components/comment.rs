use std::path::Path;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::feed::CommentNode;
use crate::core::thread::hide_label;
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
pub(crate) const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Top + bottom borders plus the footer line.
const VERTICAL_OVERHEAD: u16 = 3;
/// Columns of indentation per reply level.
pub const INDENT_WIDTH: u16 = 3;
/// Indentation stops growing once a card would get narrower than this.
const MIN_CARD_WIDTH: u16 = 24;

/// Left indentation for rows at `depth`, capped so deep cards stay readable.
pub fn indent_for(depth: usize, width: u16) -> u16 {
    let wanted = (depth as u16).saturating_mul(INDENT_WIDTH);
    wanted.min(width.saturating_sub(MIN_CARD_WIDTH))
}

/// Wrap text into display lines.
///
/// Rendering draws exactly these lines, so a row's measured height always
/// matches what ends up on screen.
pub fn wrap_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    let lines: Vec<String> = textwrap::wrap(text.trim(), options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Last path segment of an attached file, for display.
pub fn file_label(file: &str) -> String {
    let name = Path::new(file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    format!("📎 {name}")
}

/// A single comment card, indented by its depth.
///
/// Transient: built each frame by `ThreadView` for rows inside the
/// visible range.
#[derive(Clone, Copy)]
pub struct CommentCard<'a> {
    pub node: &'a CommentNode,
    pub depth: usize,
    pub descendants: usize,
    pub replies_shown: bool,
    pub is_selected: bool,
}

impl<'a> CommentCard<'a> {
    pub fn new(
        node: &'a CommentNode,
        depth: usize,
        descendants: usize,
        replies_shown: bool,
        is_selected: bool,
    ) -> Self {
        Self {
            node,
            depth,
            descendants,
            replies_shown,
            is_selected,
        }
    }

    /// Height of the card at `width`, without rendering it.
    pub fn calculate_height(node: &CommentNode, depth: usize, width: u16) -> u16 {
        let card_width = width.saturating_sub(indent_for(depth, width));
        let content_width = card_width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let body = wrap_lines(&node.comment, content_width).len() as u16;
        body + node.files.len() as u16 + VERTICAL_OVERHEAD
    }

    fn footer(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = vec![
            Span::styled(format!("♥ {}", self.node.likes.len()), dim),
            Span::raw("  "),
            Span::styled("Reply", Style::default().fg(Color::Cyan)),
        ];
        if self.descendants > 0 && self.replies_shown {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                hide_label(self.descendants),
                Style::default().fg(Color::Cyan),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for CommentCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let indent = indent_for(self.depth, area.width);
        let card = Rect {
            x: area.x + indent,
            width: area.width.saturating_sub(indent),
            ..area
        };

        let name_style = if self.node.author.is_some() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Magenta)
        };
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };

        let title = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                self.node.display_name().to_string(),
                name_style.add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · {} ", self.node.created_at.format("%b %-d, %Y")),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(card);
        block.render(card, buf);

        let mut lines: Vec<Line> = wrap_lines(&self.node.comment, inner.width)
            .into_iter()
            .map(Line::from)
            .collect();
        for file in &self.node.files {
            lines.push(Line::styled(
                file_label(file),
                Style::default().fg(Color::Yellow),
            ));
        }
        lines.push(self.footer());

        Paragraph::new(lines).render(inner, buf);
    }
}

impl Component for CommentCard<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
