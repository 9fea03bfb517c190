//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 500ms between polls and only
//! redraws after a terminal event or a background action (submission
//! results). All pending events are drained before the next draw.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::composer::{ComposerError, ComposerForm, ReplyTarget};
use crate::core::config::ResolvedConfig;
use crate::core::feed::{find_comment, load_feed, source_for};
use crate::core::state::App;
use crate::core::submit::{
    CommentPayload, HttpEndpoint, LoggingEndpoint, SubmissionEndpoint, SubmitError,
};
use crate::core::thread::{RowKey, ThreadRow};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ComposerBox, ComposerEvent, EmojiPickerEvent, EmojiPickerState, ThreadViewState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Move between rows and expand or collapse replies.
    Browse,
    /// Keystrokes edit the open composer. Esc switches to Browse.
    Compose,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub thread_view: ThreadViewState,
    /// At most one composer at a time (None = closed)
    pub composer: Option<ComposerBox>,
    /// Emoji picker overlay (None = hidden)
    pub emoji_picker: Option<EmojiPickerState>,
    pub mode: Mode,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            thread_view: ThreadViewState::new(),
            composer: None,
            emoji_picker: None,
            mode: Mode::Browse,
        }
    }

    fn close_composer(&mut self) {
        self.composer = None;
        self.emoji_picker = None;
        self.mode = Mode::Browse;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals without
        // it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the submission endpoint: HTTP when a URL is configured, otherwise
/// the log.
pub fn build_endpoint(config: &ResolvedConfig) -> Arc<dyn SubmissionEndpoint> {
    match &config.endpoint_url {
        Some(url) => {
            info!("Submitting comments to {}", url);
            Arc::new(HttpEndpoint::new(url.clone()))
        }
        None => {
            info!("No endpoint configured, comments are logged only");
            Arc::new(LoggingEndpoint)
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    // Load before touching the terminal so errors print normally.
    let source = source_for(config.fixture.as_deref());
    let posts = load_feed(source.as_ref()).map_err(|e| std::io::Error::other(e.to_string()))?;

    let mut app = App::from_config(posts, build_endpoint(&config), &config);
    let mut tui = TuiState::new();
    if let Some(first) = app.rows().first() {
        tui.thread_view.selected = Some(first.key());
    }
    let submit_timeout = Duration::from_secs(config.submit_timeout_secs);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(500));

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = handle_event(&mut app, &mut tui, &event)
                && dispatch(&mut app, &mut tui, action, submit_timeout, &tx)
            {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (submission results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, &mut tui, action, submit_timeout, &tx) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    info!("Threadline shutting down");
    ratatui::restore();
    Ok(())
}

/// Run an action through the reducer and perform its effect.
/// Returns true when the app should quit.
fn dispatch(
    app: &mut App,
    tui: &mut TuiState,
    action: Action,
    submit_timeout: Duration,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match update(app, action) {
        Effect::Quit => true,
        Effect::Submit(payload) => {
            tui.close_composer();
            spawn_submission(app.endpoint.clone(), payload, submit_timeout, tx.clone());
            false
        }
        Effect::None => false,
    }
}

/// Route one terminal event. Overlays see events first, then scrolling and
/// mouse, then the handler for the current mode.
fn handle_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::Resize => return None,
        _ => {}
    }

    if tui.emoji_picker.is_some() {
        handle_picker_event(tui, event);
        return None;
    }

    match event {
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.thread_view.handle_event(event);
            None
        }
        TuiEvent::MouseMove(_col, row) => {
            let rows = app.rows();
            if let Some(idx) = hit_row(tui, *row, rows.len()) {
                tui.thread_view.selected = Some(rows[idx].key());
            }
            None
        }
        TuiEvent::MouseClick(_col, row) => {
            let rows = app.rows();
            let idx = hit_row(tui, *row, rows.len())?;
            tui.thread_view.selected = Some(rows[idx].key());
            match rows[idx] {
                ThreadRow::ViewReplies { .. } => toggle_row(tui, &rows[idx]),
                _ => None,
            }
        }
        _ => match tui.mode {
            Mode::Browse => handle_browse_event(app, tui, event),
            Mode::Compose => handle_compose_event(app, tui, event),
        },
    }
}

fn hit_row(tui: &TuiState, screen_y: u16, row_count: usize) -> Option<usize> {
    let view = &tui.thread_view;
    ui::hit_test_row(
        screen_y,
        view.area,
        view.scroll_state.offset().y,
        &view.layout.prefix_heights,
    )
    .filter(|&idx| idx < row_count)
}

fn handle_picker_event(tui: &mut TuiState, event: &TuiEvent) {
    let Some(picker) = tui.emoji_picker.as_mut() else {
        return;
    };
    let Some(picked) = picker.handle_event(event) else {
        return;
    };
    if let Some(composer) = tui.composer.as_mut() {
        match picked {
            EmojiPickerEvent::Emoji(emoji) => {
                composer.form.insert_emoji(emoji);
            }
            EmojiPickerEvent::Sticker(sticker) => composer.form.attach_sticker(sticker),
            EmojiPickerEvent::Dismiss => {}
        }
    }
    tui.emoji_picker = None;
}

/// Toggle replies for the comment a row belongs to. Selecting the comment
/// itself keeps the cursor in place when "View N replies" disappears.
fn toggle_row(tui: &mut TuiState, row: &ThreadRow) -> Option<Action> {
    let id = row.toggle_target()?;
    if matches!(row, ThreadRow::ViewReplies { .. }) {
        tui.thread_view.select(RowKey::Comment(id));
    }
    Some(Action::ToggleReplies(id))
}

fn handle_browse_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    let rows = app.rows();
    let selected = tui
        .thread_view
        .selected
        .and_then(|key| rows.iter().find(|r| r.key() == key));

    match event {
        TuiEvent::CursorUp => tui.thread_view.move_selection(&rows, -1),
        TuiEvent::CursorDown => tui.thread_view.move_selection(&rows, 1),
        TuiEvent::CursorHome => {
            if let Some(first) = rows.first() {
                tui.thread_view.select(first.key());
            }
        }
        TuiEvent::CursorEnd => {
            if let Some(last) = rows.last() {
                tui.thread_view.select(last.key());
            }
        }
        TuiEvent::Submit | TuiEvent::InputChar(' ') => {
            let row = *selected?;
            return toggle_row(tui, &row);
        }
        TuiEvent::InputChar('r') => {
            let target = selected.and_then(|row| reply_target(app, row));
            drop(rows);
            match target {
                Some(target) => open_composer(app, tui, target),
                None => app.status_message = "Select a comment to reply to".to_string(),
            }
        }
        TuiEvent::InputChar('c') => {
            let target = selected.and_then(|row| post_target(app, row));
            drop(rows);
            match target {
                Some(target) => open_composer(app, tui, target),
                None => app.status_message = "Select a post to comment on".to_string(),
            }
        }
        TuiEvent::InputChar('q') => return Some(Action::Quit),
        TuiEvent::Tab if tui.composer.is_some() => tui.mode = Mode::Compose,
        TuiEvent::Escape => tui.close_composer(),
        _ => {}
    }
    None
}

/// The comment a row stands for, as a reply target.
fn reply_target(app: &App, row: &ThreadRow) -> Option<ReplyTarget> {
    let comment_id = match *row {
        ThreadRow::Comment { node, .. } => node.id,
        ThreadRow::ViewReplies { comment_id, .. } | ThreadRow::DepthLimit { comment_id, .. } => {
            comment_id
        }
        ThreadRow::Post { .. } => return None,
    };
    let node = find_comment(&app.posts, comment_id)?;
    Some(ReplyTarget::reply(node.post_id, node.id, node.display_name()))
}

/// The post a row belongs to, as a top-level comment target.
fn post_target(app: &App, row: &ThreadRow) -> Option<ReplyTarget> {
    let post_id = match row.post_id() {
        Some(id) => id,
        None => {
            let comment_id = match *row {
                ThreadRow::DepthLimit { comment_id, .. } => comment_id,
                _ => return None,
            };
            find_comment(&app.posts, comment_id)?.post_id
        }
    };
    let post = app.posts.iter().find(|p| p.id == post_id)?;
    Some(ReplyTarget::post(post.id, &post.title))
}

/// Open a composer for `target`. The same target again closes it; a
/// different one replaces it.
fn open_composer(app: &mut App, tui: &mut TuiState, target: ReplyTarget) {
    let same_target = tui.composer.as_ref().is_some_and(|composer| {
        composer.form.target.post_id == target.post_id
            && composer.form.target.parent_id == target.parent_id
    });
    if same_target {
        debug!("Closing composer for {}", target.label);
        tui.close_composer();
        return;
    }

    info!("Opening composer: {}", target.label);
    app.status_message = target.label.clone();
    tui.composer = Some(ComposerBox::new(ComposerForm::new(
        target,
        app.identity.clone(),
    )));
    tui.emoji_picker = None;
    tui.mode = Mode::Compose;
}

fn handle_compose_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    let Some(composer) = tui.composer.as_mut() else {
        tui.mode = Mode::Browse;
        return None;
    };

    match composer.handle_event(event)? {
        ComposerEvent::Submit(payload) => Some(Action::Submit(payload)),
        ComposerEvent::Invalid(e) => {
            app.status_message = match e {
                ComposerError::EmptyComment => format!("Not sent: {e}"),
                ComposerError::EmptyAttachmentPath => format!("Not attached: {e}"),
            };
            None
        }
        ComposerEvent::OpenEmojiPicker => {
            tui.emoji_picker = Some(EmojiPickerState::new());
            None
        }
        ComposerEvent::Blur => {
            tui.mode = Mode::Browse;
            None
        }
        ComposerEvent::Changed => None,
    }
}

/// Hand a payload to the endpoint on the tokio runtime and report the
/// outcome as an action.
fn spawn_submission(
    endpoint: Arc<dyn SubmissionEndpoint>,
    payload: CommentPayload,
    timeout: Duration,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    info!(
        "Spawning submission to {} (post={}, parent={:?})",
        endpoint.name(),
        payload.post_id,
        payload.parent_id
    );
    tokio::spawn(async move {
        let result = match tokio::time::timeout(timeout, endpoint.submit(&payload)).await {
            Ok(result) => result,
            Err(_) => Err(SubmitError::Timeout(timeout.as_secs())),
        };
        let action = match result {
            Ok(receipt) => {
                info!("Submission accepted as {}", receipt.id);
                Action::SubmissionAccepted { payload, receipt }
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                Action::SubmissionFailed(e.to_string())
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to send submission result: receiver dropped");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::composer::ComposerField;
    use crate::test_support::{NoopEndpoint, comment, post, test_app, test_app_with};
    use async_trait::async_trait;
    use crate::core::submit::SubmitReceipt;

    fn key(c: char) -> TuiEvent {
        TuiEvent::InputChar(c)
    }

    fn select(tui: &mut TuiState, key: RowKey) {
        tui.thread_view.selected = Some(key);
    }

    fn type_str(app: &mut App, tui: &mut TuiState, s: &str) {
        for c in s.chars() {
            assert_eq!(handle_event(app, tui, &key(c)), None);
        }
    }

    #[test]
    fn test_space_toggles_selected_comment() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let root = app.posts[0].comments[0].id;
        select(&mut tui, RowKey::Comment(root));

        let action = handle_event(&mut app, &mut tui, &key(' '));
        assert_eq!(action, Some(Action::ToggleReplies(root)));
    }

    #[test]
    fn test_enter_on_view_replies_reselects_comment() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let root = app.posts[0].comments[0].id;
        select(&mut tui, RowKey::ViewReplies(root));

        let action = handle_event(&mut app, &mut tui, &TuiEvent::Submit);
        assert_eq!(action, Some(Action::ToggleReplies(root)));
        assert_eq!(tui.thread_view.selected, Some(RowKey::Comment(root)));
    }

    #[test]
    fn test_toggle_on_post_or_leaf_does_nothing() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        select(&mut tui, RowKey::Post(app.posts[0].id));
        assert_eq!(handle_event(&mut app, &mut tui, &key(' ')), None);

        tui.thread_view.selected = None;
        assert_eq!(handle_event(&mut app, &mut tui, &key(' ')), None);
    }

    #[test]
    fn test_arrows_move_selection() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        handle_event(&mut app, &mut tui, &TuiEvent::CursorDown);
        assert_eq!(tui.thread_view.selected, Some(RowKey::Post(app.posts[0].id)));
        handle_event(&mut app, &mut tui, &TuiEvent::CursorDown);
        let root = app.posts[0].comments[0].id;
        assert_eq!(tui.thread_view.selected, Some(RowKey::Comment(root)));
        handle_event(&mut app, &mut tui, &TuiEvent::CursorEnd);
        assert_eq!(tui.thread_view.selected, Some(RowKey::ViewReplies(root)));
    }

    #[test]
    fn test_r_opens_reply_composer() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let root = app.posts[0].comments[0].id;
        select(&mut tui, RowKey::Comment(root));

        handle_event(&mut app, &mut tui, &key('r'));
        assert_eq!(tui.mode, Mode::Compose);
        let target = &tui.composer.as_ref().unwrap().form.target;
        assert_eq!(target.parent_id, Some(root));
        assert_eq!(target.post_id, app.posts[0].id);
        assert_eq!(target.label, "Reply to Guest4");
    }

    #[test]
    fn test_r_on_post_reports() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        select(&mut tui, RowKey::Post(app.posts[0].id));

        handle_event(&mut app, &mut tui, &key('r'));
        assert!(tui.composer.is_none());
        assert_eq!(app.status_message, "Select a comment to reply to");
    }

    #[test]
    fn test_c_comments_on_post_of_selected_comment() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let root = app.posts[0].comments[0].id;
        select(&mut tui, RowKey::ViewReplies(root));

        handle_event(&mut app, &mut tui, &key('c'));
        let target = &tui.composer.as_ref().unwrap().form.target;
        assert_eq!(target.parent_id, None);
        assert_eq!(target.label, "Comment on \"Test post\"");
    }

    #[test]
    fn test_same_target_closes_different_target_replaces() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let root = app.posts[0].comments[0].id;
        select(&mut tui, RowKey::Comment(root));

        handle_event(&mut app, &mut tui, &key('r'));
        handle_event(&mut app, &mut tui, &TuiEvent::Escape);
        assert_eq!(tui.mode, Mode::Browse);
        assert!(tui.composer.is_some());

        // Different target replaces
        handle_event(&mut app, &mut tui, &key('c'));
        assert_eq!(tui.composer.as_ref().unwrap().form.target.parent_id, None);

        // Same target toggles closed
        handle_event(&mut app, &mut tui, &TuiEvent::Escape); // blur
        handle_event(&mut app, &mut tui, &key('c'));
        assert!(tui.composer.is_none());
        assert_eq!(tui.mode, Mode::Browse);
    }

    #[test]
    fn test_browse_tab_refocuses_and_esc_discards() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        select(&mut tui, RowKey::Post(app.posts[0].id));
        handle_event(&mut app, &mut tui, &key('c'));
        type_str(&mut app, &mut tui, "draft");
        handle_event(&mut app, &mut tui, &TuiEvent::Escape);

        handle_event(&mut app, &mut tui, &TuiEvent::Tab);
        assert_eq!(tui.mode, Mode::Compose);
        assert_eq!(tui.composer.as_ref().unwrap().form.comment.text, "draft");

        handle_event(&mut app, &mut tui, &TuiEvent::Escape);
        handle_event(&mut app, &mut tui, &TuiEvent::Escape);
        assert!(tui.composer.is_none());
    }

    #[test]
    fn test_letters_type_in_compose_mode() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        select(&mut tui, RowKey::Post(app.posts[0].id));
        handle_event(&mut app, &mut tui, &key('c'));

        // 'q' and 'r' are text here, not commands
        type_str(&mut app, &mut tui, "quite right");
        assert_eq!(tui.composer.as_ref().unwrap().form.comment.text, "quite right");
    }

    #[test]
    fn test_compose_submit_builds_action() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        select(&mut tui, RowKey::Post(app.posts[0].id));
        handle_event(&mut app, &mut tui, &key('c'));
        type_str(&mut app, &mut tui, "Great tips");

        match handle_event(&mut app, &mut tui, &TuiEvent::Submit) {
            Some(Action::Submit(payload)) => {
                assert_eq!(payload.comment, "Great tips");
                assert_eq!(payload.post_id, app.posts[0].id);
                assert_eq!(payload.parent_id, None);
            }
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn test_compose_empty_submit_sets_status() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        select(&mut tui, RowKey::Post(app.posts[0].id));
        handle_event(&mut app, &mut tui, &key('c'));

        assert_eq!(handle_event(&mut app, &mut tui, &TuiEvent::Submit), None);
        assert_eq!(app.status_message, "Not sent: write something before sending");
        assert!(tui.composer.is_some());
    }

    #[test]
    fn test_picker_inserts_emoji_and_attaches_sticker() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        select(&mut tui, RowKey::Post(app.posts[0].id));
        handle_event(&mut app, &mut tui, &key('c'));
        type_str(&mut app, &mut tui, "hi ");

        handle_event(&mut app, &mut tui, &TuiEvent::OpenEmojiPicker);
        assert!(tui.emoji_picker.is_some());
        // Picker swallows typing
        handle_event(&mut app, &mut tui, &key('x'));
        handle_event(&mut app, &mut tui, &TuiEvent::Submit);
        assert!(tui.emoji_picker.is_none());
        assert_eq!(tui.composer.as_ref().unwrap().form.comment.text, "hi 😀");

        handle_event(&mut app, &mut tui, &TuiEvent::OpenEmojiPicker);
        for _ in 0..4 {
            handle_event(&mut app, &mut tui, &TuiEvent::CursorDown);
        }
        handle_event(&mut app, &mut tui, &TuiEvent::Submit);
        let form = &tui.composer.as_ref().unwrap().form;
        assert!(matches!(
            form.attachment,
            Some(crate::core::submit::Attachment::Sticker { .. })
        ));
        assert_eq!(form.active, ComposerField::Comment);
    }

    #[test]
    fn test_picker_escape_keeps_composer() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        select(&mut tui, RowKey::Post(app.posts[0].id));
        handle_event(&mut app, &mut tui, &key('c'));
        handle_event(&mut app, &mut tui, &TuiEvent::OpenEmojiPicker);
        handle_event(&mut app, &mut tui, &TuiEvent::Escape);

        assert!(tui.emoji_picker.is_none());
        assert_eq!(tui.mode, Mode::Compose);
    }

    #[test]
    fn test_force_quit_and_q() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(handle_event(&mut app, &mut tui, &TuiEvent::ForceQuit), Some(Action::Quit));
        assert_eq!(handle_event(&mut app, &mut tui, &key('q')), Some(Action::Quit));
    }

    #[test]
    fn test_mouse_click_toggles_view_replies() {
        let mut app = test_app_with(vec![post(
            "Clicks",
            vec![comment("root", vec![comment("reply", vec![])])],
        )]);
        let mut tui = TuiState::new();
        let root = app.posts[0].comments[0].id;
        // Rows: post (0..6), comment (6..10), "View 1 reply" (10..11)
        tui.thread_view.area = ratatui::layout::Rect::new(0, 1, 80, 20);
        tui.thread_view.layout.prefix_heights = vec![6, 10, 11];

        let action = handle_event(&mut app, &mut tui, &TuiEvent::MouseClick(5, 11));
        assert_eq!(action, Some(Action::ToggleReplies(root)));
        assert_eq!(tui.thread_view.selected, Some(RowKey::Comment(root)));

        // Clicking a comment only selects it
        let action = handle_event(&mut app, &mut tui, &TuiEvent::MouseClick(5, 8));
        assert_eq!(action, None);
        assert_eq!(tui.thread_view.selected, Some(RowKey::Comment(root)));
    }

    #[test]
    fn test_mouse_hover_selects_without_following() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        tui.thread_view.area = ratatui::layout::Rect::new(0, 1, 80, 20);
        tui.thread_view.layout.prefix_heights = vec![6, 10, 11];

        handle_event(&mut app, &mut tui, &TuiEvent::MouseMove(0, 2));
        assert_eq!(tui.thread_view.selected, Some(RowKey::Post(app.posts[0].id)));
        assert!(!tui.thread_view.follow_selection);

        // Outside any row keeps the selection
        handle_event(&mut app, &mut tui, &TuiEvent::MouseMove(0, 0));
        assert_eq!(tui.thread_view.selected, Some(RowKey::Post(app.posts[0].id)));
    }

    #[test]
    fn test_build_endpoint() {
        let mut config = crate::core::config::resolve(
            &crate::core::config::ThreadlineConfig::default(),
            &crate::core::config::CliOverrides::default(),
        );
        config.endpoint_url = None;
        assert_eq!(build_endpoint(&config).name(), "log");
        config.endpoint_url = Some("http://localhost:9/api".into());
        assert_eq!(build_endpoint(&config).name(), "http");
    }

    #[tokio::test]
    async fn test_dispatch_submit_closes_composer_and_reports() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        select(&mut tui, RowKey::Post(app.posts[0].id));
        handle_event(&mut app, &mut tui, &key('c'));
        type_str(&mut app, &mut tui, "Hello");
        let action = handle_event(&mut app, &mut tui, &TuiEvent::Submit).unwrap();

        let (tx, rx) = mpsc::channel();
        let quit = dispatch(&mut app, &mut tui, action, Duration::from_secs(5), &tx);
        assert!(!quit);
        assert!(app.submitting);
        assert!(tui.composer.is_none());
        assert_eq!(tui.mode, Mode::Browse);

        let mut result = rx.try_recv();
        for _ in 0..100 {
            if result.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            result = rx.try_recv();
        }
        let action = result.expect("submission result");
        assert!(matches!(action, Action::SubmissionAccepted { .. }));
        dispatch(&mut app, &mut tui, action, Duration::from_secs(5), &tx);
        assert!(!app.submitting);
        assert_eq!(app.posts[0].comments.len(), 2);
    }

    #[tokio::test]
    async fn test_spawn_submission_accepts() {
        let app = test_app();
        let payload = CommentPayload {
            user_id: None,
            guest: None,
            post_id: app.posts[0].id,
            parent_id: None,
            attachment: None,
            comment: "ok".into(),
        };
        let (tx, rx) = mpsc::channel();
        spawn_submission(Arc::new(NoopEndpoint), payload, Duration::from_secs(5), tx)
            .await
            .unwrap();
        assert!(matches!(
            rx.try_recv().unwrap(),
            Action::SubmissionAccepted { .. }
        ));
    }

    struct HangingEndpoint;

    #[async_trait]
    impl SubmissionEndpoint for HangingEndpoint {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn submit(&self, _payload: &CommentPayload) -> Result<SubmitReceipt, SubmitError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_spawn_submission_times_out() {
        let app = test_app();
        let payload = CommentPayload {
            user_id: None,
            guest: Some("Eve".into()),
            post_id: app.posts[0].id,
            parent_id: None,
            attachment: None,
            comment: "slow".into(),
        };
        let (tx, rx) = mpsc::channel();
        spawn_submission(
            Arc::new(HangingEndpoint),
            payload,
            Duration::from_millis(20),
            tx,
        )
        .await
        .unwrap();
        match rx.try_recv().unwrap() {
            Action::SubmissionFailed(message) => assert!(message.starts_with("no response")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
