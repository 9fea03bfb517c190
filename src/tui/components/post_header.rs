use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::feed::Post;
use crate::core::thread::descendant_count;
use crate::tui::components::comment::{HORIZONTAL_OVERHEAD, file_label, wrap_lines};

/// Borders, byline and footer.
const VERTICAL_OVERHEAD: u16 = 4;

/// Every comment under the post, replies included.
pub fn total_comments(post: &Post) -> usize {
    post.comments
        .iter()
        .map(|c| 1 + descendant_count(c))
        .sum()
}

/// The post a thread hangs off: title, author, body, counts.
#[derive(Clone, Copy)]
pub struct PostHeader<'a> {
    pub post: &'a Post,
    pub is_selected: bool,
}

impl<'a> PostHeader<'a> {
    pub fn new(post: &'a Post, is_selected: bool) -> Self {
        Self { post, is_selected }
    }

    pub fn calculate_height(post: &Post, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let body = wrap_lines(&post.text, content_width).len() as u16;
        body + post.files.len() as u16 + VERTICAL_OVERHEAD
    }
}

impl Widget for PostHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Yellow)
        };

        let block = Block::bordered()
            .border_type(BorderType::Double)
            .border_style(border_style)
            .title(Span::styled(
                format!(" {} ", self.post.title),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = vec![Line::styled(
            format!(
                "by {} · {}",
                self.post.profiles.full_name(),
                self.post.created_at.format("%b %-d, %Y")
            ),
            dim.add_modifier(Modifier::ITALIC),
        )];
        lines.extend(wrap_lines(&self.post.text, inner.width).into_iter().map(Line::from));
        for file in &self.post.files {
            lines.push(Line::styled(file_label(file), Style::default().fg(Color::Yellow)));
        }

        let comments = total_comments(self.post);
        lines.push(Line::from(vec![
            Span::styled(format!("♥ {}", self.post.likes.len()), dim),
            Span::raw("  "),
            Span::styled(
                format!(
                    "{comments} comment{}",
                    if comments == 1 { "" } else { "s" }
                ),
                dim,
            ),
        ]));

        Paragraph::new(lines).render(inner, buf);
    }
}
