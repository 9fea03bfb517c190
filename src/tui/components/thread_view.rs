//! # ThreadView Component
//!
//! Scrollable view of the whole feed: post headers, comment cards, and the
//! one-line affordance rows between them.
//!
//! ## Responsibilities
//!
//! - Render the rows produced by `App::rows()`
//! - Track the selected row by [`RowKey`] so selection survives collapse/expand
//! - Cache row heights and rebuild them only when width or layout revision changes
//! - Keep the selected row in view after keyboard navigation
//!
//! ## Architecture
//!
//! `ThreadView` is a transient component (created each frame) that wraps
//! `&'a mut ThreadViewState` (persistent state) and the current rows (props).

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::thread::{RowKey, ThreadRow, reply_label};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::comment::{CommentCard, indent_for};
use crate::tui::components::post_header::PostHeader;
use crate::tui::event::TuiEvent;

/// Blank lines above every post header except the first.
const POST_GAP: u16 = 1;

/// Scroll, selection, and layout state for the thread view.
/// Must be persisted in the parent TuiState.
pub struct ThreadViewState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// Selected row (hover or keyboard navigation)
    pub selected: Option<RowKey>,
    /// Scroll the selection into view on the next render
    pub follow_selection: bool,
    /// Last known viewport, used for hit testing and scroll clamping
    pub area: Rect,
    /// Content continues below the viewport
    pub has_unseen_content: bool,
}

impl Default for ThreadViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadViewState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            selected: None,
            follow_selection: false,
            area: Rect::default(),
            has_unseen_content: false,
        }
    }

    /// Select a row and bring it into view on the next frame.
    pub fn select(&mut self, key: RowKey) {
        self.selected = Some(key);
        self.follow_selection = true;
    }

    /// Move the selection `step` rows, starting from the top or bottom
    /// when nothing is selected yet.
    pub fn move_selection(&mut self, rows: &[ThreadRow], step: isize) {
        if rows.is_empty() {
            return;
        }
        let current = self
            .selected
            .and_then(|key| rows.iter().position(|r| r.key() == key));
        let next = match current {
            Some(idx) => idx
                .saturating_add_signed(step)
                .min(rows.len() - 1),
            None if step < 0 => rows.len() - 1,
            None => 0,
        };
        self.select(rows[next].key());
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.layout.total_height().saturating_sub(self.area.height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll so row `idx` is fully visible. A row taller than the viewport
    /// is aligned by its top edge.
    pub fn scroll_to_index(&mut self, idx: usize) {
        if idx >= self.layout.prefix_heights.len() {
            return;
        }
        let item_top = self.layout.row_top(idx);
        let item_bottom = self.layout.prefix_heights[idx];
        let offset_y = self.scroll_state.offset().y;
        let viewport = self.area.height;

        if item_top < offset_y || item_bottom - item_top > viewport {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
        } else if item_bottom > offset_y + viewport {
            self.scroll_state.set_offset(Position {
                x: 0,
                y: item_bottom.saturating_sub(viewport),
            });
        }
    }
}

/// Scrollable feed component.
/// Created fresh each frame with references to state and rows.
pub struct ThreadView<'a> {
    pub state: &'a mut ThreadViewState,
    pub rows: &'a [ThreadRow<'a>],
    /// `App::layout_revision()`; heights are rebuilt when it changes
    pub revision: (u64, u64),
}

impl<'a> ThreadView<'a> {
    pub fn new(
        state: &'a mut ThreadViewState,
        rows: &'a [ThreadRow<'a>],
        revision: (u64, u64),
    ) -> Self {
        Self {
            state,
            rows,
            revision,
        }
    }
}

impl Component for ThreadView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        // 1. Layout cache
        if !self
            .state
            .layout
            .is_valid(self.rows.len(), content_width, self.revision)
        {
            self.state
                .layout
                .rebuild(self.rows, content_width, self.revision);
        }
        self.state.area = area;

        // 2. Selection follow + clamp
        if self.state.follow_selection {
            self.state.follow_selection = false;
            if let Some(idx) = self
                .state
                .selected
                .and_then(|key| self.rows.iter().position(|r| r.key() == key))
            {
                self.state.scroll_to_index(idx);
            }
        }
        self.state.clamp_scroll();

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);
        let total_height = self.state.layout.total_height();

        // 3. Render visible rows into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range {
            let row = &self.rows[i];
            let top = self.state.layout.row_top(i);
            let height = self.state.layout.heights[i];
            let is_selected = self.state.selected == Some(row.key());

            // Post gap sits above the header, inside the row's height.
            let gap = if matches!(row, ThreadRow::Post { .. }) && i > 0 {
                POST_GAP.min(height)
            } else {
                0
            };
            let rect = Rect::new(0, top + gap, content_width, height - gap);
            scroll_view.render_widget(RowWidget { row, is_selected }, rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let max_scroll = total_height.saturating_sub(area.height);
        self.state.has_unseen_content = self.state.scroll_state.offset().y < max_scroll;
    }
}

/// Dispatches a row to its widget.
struct RowWidget<'a> {
    row: &'a ThreadRow<'a>,
    is_selected: bool,
}

impl Widget for RowWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match *self.row {
            ThreadRow::Post { post } => PostHeader::new(post, self.is_selected).render(area, buf),
            ThreadRow::Comment {
                node,
                depth,
                descendants,
                replies_shown,
                ..
            } => CommentCard::new(node, depth, descendants, replies_shown, self.is_selected)
                .render(area, buf),
            ThreadRow::ViewReplies { depth, count, .. } => {
                let mut style = Style::default().fg(Color::Cyan);
                if self.is_selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                affordance_line(depth + 1, area.width, "└ ", reply_label(count), style)
                    .render(area, buf);
            }
            ThreadRow::DepthLimit { depth, hidden, .. } => {
                let mut style = Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC);
                if self.is_selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                let text = format!(
                    "{hidden} deeper repl{} not shown",
                    if hidden == 1 { "y" } else { "ies" }
                );
                affordance_line(depth + 1, area.width, "⋯ ", text, style).render(area, buf);
            }
        }
    }
}

fn affordance_line(
    depth: usize,
    width: u16,
    marker: &'static str,
    text: String,
    style: Style,
) -> Paragraph<'static> {
    let indent = " ".repeat(indent_for(depth, width) as usize);
    Paragraph::new(Line::from(vec![
        Span::raw(indent),
        Span::styled(marker, style),
        Span::styled(text, style),
    ]))
}

/// Height of one row at `width`.
pub fn row_height(row: &ThreadRow, index: usize, width: u16) -> u16 {
    match row {
        ThreadRow::Post { post } => {
            let gap = if index > 0 { POST_GAP } else { 0 };
            PostHeader::calculate_height(post, width) + gap
        }
        ThreadRow::Comment { node, depth, .. } => CommentCard::calculate_height(node, *depth, width),
        ThreadRow::ViewReplies { .. } | ThreadRow::DepthLimit { .. } => 1,
    }
}

/// EventHandler lives on the state: scrolling only needs persistent data.
impl EventHandler for ThreadViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.clamp_scroll();
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
    revision: Option<(u64, u64)>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
            revision: None,
        }
    }

    /// Rows only change through toggles and inserted comments, both of
    /// which bump the revision.
    pub fn is_valid(&self, row_count: usize, content_width: u16, revision: (u64, u64)) -> bool {
        self.revision == Some(revision)
            && self.content_width == content_width
            && self.heights.len() == row_count
    }

    pub fn rebuild(&mut self, rows: &[ThreadRow], content_width: u16, revision: (u64, u64)) {
        self.heights = rows
            .iter()
            .enumerate()
            .map(|(i, row)| row_height(row, i, content_width))
            .collect();
        self.rebuild_prefix_heights();
        self.content_width = content_width;
        self.revision = Some(revision);
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn row_top(&self, idx: usize) -> u16 {
        if idx == 0 {
            0
        } else {
            self.prefix_heights[idx - 1]
        }
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::{comment, post, test_app, test_app_with};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(state: &mut ThreadViewState, app: &crate::core::state::App, w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        let rows = app.rows();
        terminal
            .draw(|f| {
                let area = f.area();
                ThreadView::new(state, &rows, app.layout_revision()).render(f, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_layout_cache_validity() {
        let app = test_app();
        let rows = app.rows();
        let mut cache = LayoutCache::new();
        assert!(!cache.is_valid(rows.len(), 80, (0, 0)));

        cache.rebuild(&rows, 80, (0, 0));
        assert!(cache.is_valid(rows.len(), 80, (0, 0)));
        assert!(!cache.is_valid(rows.len(), 40, (0, 0)));
        assert!(!cache.is_valid(rows.len(), 80, (1, 0)));
        assert!(!cache.is_valid(rows.len() + 1, 80, (0, 0)));
    }

    #[test]
    fn test_prefix_heights_and_row_top() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 1, 4];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.prefix_heights, vec![3, 4, 8]);
        assert_eq!(cache.row_top(0), 0);
        assert_eq!(cache.row_top(2), 4);
        assert_eq!(cache.total_height(), 8);
    }

    #[test]
    fn test_visible_range_buffers_half_viewport() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![10; 10];
        cache.rebuild_prefix_heights();
        // viewport 20 at offset 40 → buffered span 30..70
        assert_eq!(cache.visible_range(40, 20), 3..7);
        assert_eq!(cache.visible_range(0, 20), 0..3);
    }

    #[test]
    fn test_move_selection_wraps_into_range() {
        let app = test_app();
        let rows = app.rows();
        let mut state = ThreadViewState::new();

        state.move_selection(&rows, 1);
        assert_eq!(state.selected, Some(rows[0].key()));
        state.move_selection(&rows, 1);
        assert_eq!(state.selected, Some(rows[1].key()));
        state.move_selection(&rows, 10);
        assert_eq!(state.selected, Some(rows[rows.len() - 1].key()));
        state.move_selection(&rows, -10);
        assert_eq!(state.selected, Some(rows[0].key()));

        let mut fresh = ThreadViewState::new();
        fresh.move_selection(&rows, -1);
        assert_eq!(fresh.selected, Some(rows[rows.len() - 1].key()));
        assert!(fresh.follow_selection);
    }

    #[test]
    fn test_render_collapsed_thread() {
        let app = test_app();
        let mut state = ThreadViewState::new();
        let text = render(&mut state, &app, 60, 20);
        assert!(text.contains("Test post"));
        assert!(text.contains("root"));
        assert!(text.contains("View 1 reply"));
        // the nested reply's card stays hidden
        assert!(!text.contains("Guest5"));
    }

    #[test]
    fn test_render_after_expand_rebuilds_layout() {
        let mut app = test_app();
        let mut state = ThreadViewState::new();
        render(&mut state, &app, 60, 30);
        let collapsed_rows = state.layout.heights.len();

        let root = app.posts[0].comments[0].id;
        update(&mut app, Action::ToggleReplies(root));
        let text = render(&mut state, &app, 60, 30);

        // "View 1 reply" row replaced by the reply card
        assert_eq!(state.layout.heights.len(), collapsed_rows);
        assert!(text.contains("Hide reply"));
        assert!(!text.contains("View 1 reply"));
    }

    #[test]
    fn test_depth_limit_row_rendered() {
        let deep = comment("l0", vec![comment("l1", vec![comment("l2", vec![])])]);
        let mut app = test_app_with(vec![post("Deep", vec![deep])]);
        app.max_depth = 1;
        let l0 = app.posts[0].comments[0].id;
        let l1 = app.posts[0].comments[0].replies[0].id;
        update(&mut app, Action::ToggleReplies(l0));
        update(&mut app, Action::ToggleReplies(l1));

        let mut state = ThreadViewState::new();
        let text = render(&mut state, &app, 60, 30);
        assert!(text.contains("1 deeper reply not shown"));
    }

    #[test]
    fn test_follow_selection_scrolls_into_view() {
        let comments = (0..12).map(|i| comment(&format!("comment {i}"), vec![])).collect();
        let app = test_app_with(vec![post("Busy", comments)]);
        let rows = app.rows();
        let mut state = ThreadViewState::new();
        render(&mut state, &app, 60, 10);
        assert_eq!(state.scroll_state.offset().y, 0);
        assert!(state.has_unseen_content);

        state.select(rows[rows.len() - 1].key());
        render(&mut state, &app, 60, 10);
        let bottom = state.layout.total_height();
        assert_eq!(state.scroll_state.offset().y, bottom - 10);
        assert!(!state.has_unseen_content);
    }

    #[test]
    fn test_scroll_events_are_clamped() {
        let app = test_app();
        let mut state = ThreadViewState::new();
        render(&mut state, &app, 60, 40);
        for _ in 0..5 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        // Everything fits: nothing to scroll.
        assert_eq!(state.scroll_state.offset().y, 0);
    }
}
