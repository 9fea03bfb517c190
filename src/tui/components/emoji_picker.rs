//! # Emoji Picker Component
//!
//! Popover over the composer with a fixed emoji palette and a sticker row.
//! Opened with Ctrl+E while composing.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `EmojiPickerState` lives in `TuiState`
//! - `EmojiPicker` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::core::composer::STICKERS;
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

pub const PALETTE: [&str; 24] = [
    "😀", "😂", "😍", "🥰", "😎", "🤔", "😢", "😮",
    "👍", "👏", "🙌", "🙏", "💪", "🔥", "🎉", "💯",
    "❤", "💡", "✨", "🌍", "✈", "🍲", "📚", "🎨",
];

/// Cells per grid row.
const COLUMNS: usize = 8;
/// Each cell: one space, a two-column glyph, one space.
const CELL_WIDTH: u16 = 4;
const POPOVER_WIDTH: u16 = COLUMNS as u16 * CELL_WIDTH + 2;
/// Three palette rows, the sticker label, the sticker row, borders.
const POPOVER_HEIGHT: u16 = 3 + 1 + 1 + 2;

const ITEM_COUNT: usize = PALETTE.len() + STICKERS.len();

/// Place a `width`×`height` popover next to `anchor`: below it when it
/// fits inside `viewport`, otherwise above it, clamped to the viewport.
pub fn popover_area(anchor: Rect, width: u16, height: u16, viewport: Rect) -> Rect {
    let width = width.min(viewport.width);
    let height = height.min(viewport.height);

    let below = anchor.bottom();
    let y = if below.saturating_add(height) <= viewport.bottom() {
        below
    } else {
        anchor.y.saturating_sub(height).max(viewport.y)
    };
    let x = anchor
        .x
        .min(viewport.right().saturating_sub(width))
        .max(viewport.x);

    Rect::new(x, y, width, height)
}

/// Events emitted by the emoji picker.
#[derive(Debug, Clone, PartialEq)]
pub enum EmojiPickerEvent {
    Emoji(&'static str),
    Sticker(&'static str),
    Dismiss,
}

/// Persistent state for the picker overlay.
#[derive(Debug, Default)]
pub struct EmojiPickerState {
    /// Index into the palette followed by the stickers
    pub selected: usize,
}

impl EmojiPickerState {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> EmojiPickerEvent {
        match self.selected.checked_sub(PALETTE.len()) {
            None => EmojiPickerEvent::Emoji(PALETTE[self.selected]),
            Some(i) => EmojiPickerEvent::Sticker(STICKERS[i]),
        }
    }
}

impl EventHandler for EmojiPickerState {
    type Event = EmojiPickerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<EmojiPickerEvent> {
        let last = ITEM_COUNT - 1;
        match event {
            TuiEvent::Escape | TuiEvent::OpenEmojiPicker => Some(EmojiPickerEvent::Dismiss),
            TuiEvent::CursorLeft => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorRight | TuiEvent::Tab => {
                self.selected = (self.selected + 1).min(last);
                None
            }
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(COLUMNS);
                None
            }
            TuiEvent::CursorDown => {
                self.selected = (self.selected + COLUMNS).min(last);
                None
            }
            TuiEvent::Submit => Some(self.current()),
            _ => None,
        }
    }
}

/// Transient render wrapper for the picker overlay.
pub struct EmojiPicker<'a> {
    state: &'a EmojiPickerState,
}

impl<'a> EmojiPicker<'a> {
    pub fn new(state: &'a EmojiPickerState) -> Self {
        Self { state }
    }

    pub fn render(&self, frame: &mut Frame, anchor: Rect) {
        let area = popover_area(anchor, POPOVER_WIDTH, POPOVER_HEIGHT, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Emoji ")
            .title_bottom(Line::from(" Enter Pick  Esc Close ").centered());

        let mut lines: Vec<Line> = PALETTE
            .chunks(COLUMNS)
            .enumerate()
            .map(|(row, chunk)| self.grid_line(row * COLUMNS, chunk))
            .collect();
        lines.push(Line::styled(
            " Stickers",
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(self.grid_line(PALETTE.len(), &STICKERS));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn grid_line(&self, first_index: usize, items: &[&'static str]) -> Line<'static> {
        let spans: Vec<Span> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if first_index + i == self.state.selected {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Span::styled(format!(" {item} "), style)
            })
            .collect();
        Line::from(spans)
    }
}
