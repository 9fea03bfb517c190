use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{EmojiPicker, ThreadView, TitleBar};
use crate::tui::{Mode, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

const BROWSE_HELP: &[(&str, &str)] = &[
    ("↑↓", "Select"),
    ("Space", "Replies"),
    ("r", "Reply"),
    ("c", "Comment"),
    ("q", "Quit"),
];
const BROWSE_WITH_COMPOSER_HELP: &[(&str, &str)] = &[
    ("↑↓", "Select"),
    ("Space", "Replies"),
    ("Tab", "Composer"),
    ("Esc", "Discard"),
    ("q", "Quit"),
];
const COMPOSE_HELP: &[(&str, &str)] = &[("Enter", "Send"), ("Esc", "Thread"), ("Ctrl+C", "Quit")];
const PICKER_HELP: &[(&str, &str)] = &[("←→↑↓", "Move"), ("Enter", "Pick"), ("Esc", "Close")];

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let width = frame.area().width;
    let composer_height = tui
        .composer
        .as_ref()
        .map_or(0, |composer| composer.calculate_height(width));
    let layout = Layout::vertical([Length(1), Min(0), Length(composer_height), Length(1)]);
    let [title_area, thread_area, composer_area, help_area] = layout.areas(frame.area());

    // Thread first: it decides whether there is unseen content.
    let rows = app.rows();
    ThreadView::new(&mut tui.thread_view, &rows, app.layout_revision())
        .render(frame, thread_area);

    TitleBar::new(
        app.posts.len(),
        app.status_message.clone(),
        tui.thread_view.has_unseen_content,
    )
    .render(frame, title_area);

    let picker_open = tui.emoji_picker.is_some();
    if let Some(composer) = tui.composer.as_mut() {
        composer.focused = tui.mode == Mode::Compose && !picker_open;
        composer.render(frame, composer_area);
    }

    frame.render_widget(help_line(tui), help_area);

    // Overlay last so it draws over everything else
    if let (Some(picker), Some(composer)) = (&tui.emoji_picker, &tui.composer) {
        EmojiPicker::new(picker).render(frame, composer.field_area());
    }
}

fn help_line(tui: &TuiState) -> Line<'static> {
    let entries = if tui.emoji_picker.is_some() {
        PICKER_HELP
    } else {
        match (tui.mode, tui.composer.is_some()) {
            (Mode::Compose, _) => COMPOSE_HELP,
            (Mode::Browse, true) => BROWSE_WITH_COMPOSER_HELP,
            (Mode::Browse, false) => BROWSE_HELP,
        }
    };

    let key_style = Style::default().fg(Color::Cyan);
    let text_style = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::with_capacity(entries.len() * 2);
    for (key, label) in entries {
        spans.push(Span::styled(format!(" {key} "), key_style));
        spans.push(Span::styled(format!("{label} "), text_style));
    }
    Line::from(spans)
}

/// Hit test: which row (if any) sits at screen row `screen_y`.
///
/// `area` is the thread viewport from the last render and `prefix_heights`
/// the cumulative row bottoms from its layout cache.
pub fn hit_test_row(
    screen_y: u16,
    area: Rect,
    scroll_offset_y: u16,
    prefix_heights: &[u16],
) -> Option<usize> {
    if screen_y < area.y || screen_y >= area.y + area.height {
        return None;
    }

    let content_y = (screen_y - area.y) + scroll_offset_y;
    let idx = prefix_heights.partition_point(|&bottom| bottom <= content_y);
    (idx < prefix_heights.len()).then_some(idx)
}
