//! Wrapping and cursor geometry for the composer's comment field.
//!
//! Stateless helpers; the text and cursor live in `core::composer::TextField`.

use unicode_width::UnicodeWidthStr;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Identity/guest line above the comment, attachment line below it
pub(super) const FIXED_LINES: u16 = 2;
/// Maximum visible comment lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;

pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Inner content width after subtracting border/padding overhead.
pub(super) fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrap `text` into display lines, keeping the empty line a trailing
/// newline opens so the cursor has somewhere to sit.
pub(super) fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![String::new()];
    }
    let mut lines: Vec<String> = textwrap::wrap(text, wrap_options(width))
        .into_iter()
        .map(|l| l.into_owned())
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        lines.push(String::new());
    }
    lines
}

pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    wrapped_lines(text, width).len() as u16
}

/// Wrapped line and display column of the cursor at byte offset `pos`.
///
/// Columns are measured in terminal cells, so wide characters such as
/// emoji advance the cursor by two.
pub(super) fn cursor_line_col(text: &str, pos: usize, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }
    let before = &text[..pos];
    let line = wrap_line_count(before, width).saturating_sub(1);

    // textwrap trims trailing whitespace, so measure from where the last
    // segment starts in the logical line rather than the segment itself.
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let logical = &before[line_start..];
    let segments = textwrap::wrap(logical, wrap_options(width));
    let col = match segments.split_last() {
        Some((last, earlier)) if !earlier.is_empty() => {
            let mut offset = 0;
            for seg in earlier {
                offset = logical[offset..]
                    .find(seg.as_ref())
                    .map_or(offset, |i| offset + i + seg.len());
            }
            let start = logical[offset..]
                .find(last.as_ref())
                .map_or(offset, |i| offset + i);
            logical[start..].width()
        }
        _ => logical.width(),
    };
    (line, (col as u16).min(width))
}

/// Display width of the single-line text before `pos`.
pub(super) fn prefix_width(text: &str, pos: usize) -> u16 {
    text[..pos].width() as u16
}
