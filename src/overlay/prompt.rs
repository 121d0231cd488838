//! Command Search Prompt
//!
//! Opens a view zone inside the terminal, relays each submitted line to a
//! [`SearchProvider`] and shows the first suggestion it returns. The user
//! accepts the suggestion by pressing Enter on an empty line (Alt+Enter
//! inserts it without running it), refines it by typing another prompt, or
//! cancels with Escape.

use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::guard::ZoneGuard;
use super::host::{FontStyle, TerminalHost, TerminalId, ViewZone};
use super::input::CursorDirection;
use super::session::SessionFactory;
use super::view::PromptView;
use crate::error::{OverlayError, ProviderError};
use crate::search::{SearchProvider, SearchRequest, SearchResult, ThreadId};

type QueryFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<String>, ProviderError>> + Send + 'a>>;

/// A query in flight, tagged with the generation it was issued in
struct PendingQuery<'a> {
    generation: u64,
    future: QueryFuture<'a>,
}

/// What a key press asks the session to do
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Resolve(Option<SearchResult>),
    Submit(String),
    Redraw,
    Ignore,
}

/// Fixed per-session values
struct SessionContext {
    thread_id: ThreadId,
    terminal: TerminalId,
    font: FontStyle,
}

/// Interactive command search overlay
pub struct PromptOverlay {
    sessions: Arc<SessionFactory>,
    initial_prompt: Option<String>,
}

impl PromptOverlay {
    pub fn new(sessions: Arc<SessionFactory>) -> Self {
        Self {
            sessions,
            initial_prompt: None,
        }
    }

    /// Pre-fill the input field of every session opened by this overlay
    pub fn with_initial_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.initial_prompt = (!prompt.is_empty()).then_some(prompt);
        self
    }

    /// Show the prompt in `terminal` and wait for the user to accept or cancel.
    ///
    /// Resolves to `Ok(None)` without touching the terminal when it has no
    /// rendering surface, and to `Ok(None)` on cancellation (Escape, or focus
    /// returning to the terminal). The view zone is always disposed and focus
    /// restored before this returns.
    pub async fn show<H, P>(
        &self,
        terminal: &mut H,
        provider: &P,
    ) -> Result<Option<SearchResult>, OverlayError>
    where
        H: TerminalHost,
        P: SearchProvider + ?Sized,
    {
        if !terminal.has_surface() {
            debug!(
                terminal = terminal.id().get(),
                "terminal has no rendering surface, skipping command search"
            );
            return Ok(None);
        }

        let zone = terminal.insert_view_zone().await?;
        let session = SessionContext {
            thread_id: self.sessions.next_thread_id(),
            terminal: terminal.id(),
            font: terminal.font(),
        };
        let focus = terminal.on_did_focus();
        let mut guard = ZoneGuard::new(terminal, zone);
        debug!(thread_id = %session.thread_id, "command search session opened");

        let outcome = tokio::select! {
            biased;
            () = focus_regained(focus) => {
                debug!(thread_id = %session.thread_id, "terminal regained focus, cancelling");
                Ok(None)
            }
            outcome = self.run_session(guard.zone_mut(), provider, &session) => outcome,
        };

        guard.finish();
        debug!(
            thread_id = %session.thread_id,
            accepted = matches!(outcome, Ok(Some(_))),
            "command search session closed"
        );
        outcome
    }

    async fn run_session<Z, P>(
        &self,
        zone: &mut Z,
        provider: &P,
        session: &SessionContext,
    ) -> Result<Option<SearchResult>, OverlayError>
    where
        Z: ViewZone,
        P: SearchProvider + ?Sized,
    {
        let area = zone.rendered().await?;
        debug!(width = area.width, height = area.height, "view zone rendered");

        let mut view = PromptView::new(session.font);
        if let Some(prompt) = &self.initial_prompt {
            view.input_mut().insert_str(prompt);
        }
        zone.draw(&view)?;

        let mut generation = 0u64;
        let mut pending: Option<PendingQuery<'_>> = None;

        loop {
            tokio::select! {
                biased;
                (answered, result) = next_answer(&mut pending) => {
                    pending = None;
                    if answered != generation {
                        debug!(answered, generation, "dropping stale query result");
                        continue;
                    }
                    match result {
                        Ok(candidates) => {
                            debug!(
                                thread_id = %session.thread_id,
                                generation,
                                candidates = candidates.len(),
                                "query answered"
                            );
                            view.show_candidates(candidates);
                        }
                        Err(err) => {
                            warn!(thread_id = %session.thread_id, generation, "query failed: {}", err);
                            view.show_error(err.to_string());
                        }
                    }
                }
                key = zone.next_key() => {
                    let Some(key) = key else {
                        return Err(OverlayError::ZoneClosed);
                    };
                    match handle_key(key, &mut view) {
                        KeyAction::Resolve(result) => return Ok(result),
                        KeyAction::Submit(prompt) => {
                            generation += 1;
                            if let Some(stale) = pending.take() {
                                debug!(superseded = stale.generation, "superseding in-flight query");
                            }
                            debug!(thread_id = %session.thread_id, generation, "dispatching query");
                            let request = SearchRequest::new(session.thread_id, session.terminal, prompt);
                            pending = Some(PendingQuery {
                                generation,
                                future: provider.query(request),
                            });
                        }
                        KeyAction::Redraw => {}
                        KeyAction::Ignore => continue,
                    }
                }
            }
            zone.draw(&view)?;
        }
    }
}

/// Completes only when focus actually fired; a dropped sender never cancels.
async fn focus_regained(focus: oneshot::Receiver<()>) {
    if focus.await.is_err() {
        future::pending::<()>().await;
    }
}

async fn next_answer(
    slot: &mut Option<PendingQuery<'_>>,
) -> (u64, Result<Vec<String>, ProviderError>) {
    match slot {
        Some(query) => {
            let generation = query.generation;
            (generation, query.future.as_mut().await)
        }
        None => future::pending().await,
    }
}

fn handle_key(key: KeyEvent, view: &mut PromptView) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let input = view.input_mut();

    match key.code {
        KeyCode::Enter => {
            let prompt = input.take();
            if !prompt.trim().is_empty() {
                return KeyAction::Submit(prompt);
            }
            // Alt forces insert-only.
            let result = view
                .suggestion()
                .map(|command| SearchResult::new(command, !alt));
            KeyAction::Resolve(result)
        }
        KeyCode::Esc => KeyAction::Resolve(None),
        KeyCode::Char('c') if ctrl => KeyAction::Resolve(None),
        KeyCode::Char('a') if ctrl => {
            input.move_cursor(CursorDirection::Home);
            KeyAction::Redraw
        }
        KeyCode::Char('e') if ctrl => {
            input.move_cursor(CursorDirection::End);
            KeyAction::Redraw
        }
        KeyCode::Char('h') if ctrl => {
            input.delete_char();
            KeyAction::Redraw
        }
        KeyCode::Char('k') if ctrl => {
            input.delete_to_end_of_line();
            KeyAction::Redraw
        }
        KeyCode::Char('u') if ctrl => {
            input.delete_line();
            KeyAction::Redraw
        }
        KeyCode::Char('w') if ctrl => {
            input.delete_word_backward();
            KeyAction::Redraw
        }
        KeyCode::Char(ch) if !ctrl && !alt => {
            input.insert_char(ch);
            KeyAction::Redraw
        }
        KeyCode::Backspace => {
            input.delete_char();
            KeyAction::Redraw
        }
        KeyCode::Delete => {
            input.delete_char_forward();
            KeyAction::Redraw
        }
        KeyCode::Left => {
            input.move_cursor(CursorDirection::Left);
            KeyAction::Redraw
        }
        KeyCode::Right => {
            input.move_cursor(CursorDirection::Right);
            KeyAction::Redraw
        }
        KeyCode::Home => {
            input.move_cursor(CursorDirection::Home);
            KeyAction::Redraw
        }
        KeyCode::End => {
            input.move_cursor(CursorDirection::End);
            KeyAction::Redraw
        }
        _ => KeyAction::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn view_with_suggestion(command: &str) -> PromptView {
        let mut view = PromptView::new(FontStyle::default());
        view.show_candidates(vec![command.to_string()]);
        view
    }

    #[test]
    fn test_enter_on_empty_without_suggestion_cancels() {
        let mut view = PromptView::new(FontStyle::default());
        assert_eq!(
            handle_key(press(KeyCode::Enter), &mut view),
            KeyAction::Resolve(None)
        );
    }

    #[test]
    fn test_enter_accepts_suggestion() {
        let mut view = view_with_suggestion("foo");
        assert_eq!(
            handle_key(press(KeyCode::Enter), &mut view),
            KeyAction::Resolve(Some(SearchResult::new("foo", true)))
        );
    }

    #[test]
    fn test_alt_enter_inserts_only() {
        let mut view = view_with_suggestion("foo");
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT);
        assert_eq!(
            handle_key(key, &mut view),
            KeyAction::Resolve(Some(SearchResult::new("foo", false)))
        );
    }

    #[test]
    fn test_enter_submits_and_clears_buffer() {
        let mut view = view_with_suggestion("foo");
        view.input_mut().insert_str("list files");
        assert_eq!(
            handle_key(press(KeyCode::Enter), &mut view),
            KeyAction::Submit("list files".to_string())
        );
        assert!(view.input().is_empty());
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let mut view = view_with_suggestion("foo");
        view.input_mut().insert_str("   ");
        assert_eq!(
            handle_key(press(KeyCode::Enter), &mut view),
            KeyAction::Resolve(Some(SearchResult::new("foo", true)))
        );
    }

    #[test]
    fn test_cancel_keys() {
        let mut view = view_with_suggestion("foo");
        assert_eq!(
            handle_key(press(KeyCode::Esc), &mut view),
            KeyAction::Resolve(None)
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(ctrl_c, &mut view), KeyAction::Resolve(None));
    }

    #[test]
    fn test_editing_keys() {
        let mut view = PromptView::new(FontStyle::default());
        for ch in "ls dir".chars() {
            assert_eq!(handle_key(press(KeyCode::Char(ch)), &mut view), KeyAction::Redraw);
        }
        let ctrl_w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        handle_key(ctrl_w, &mut view);
        assert_eq!(view.input().as_str(), "ls ");

        handle_key(press(KeyCode::Backspace), &mut view);
        assert_eq!(view.input().as_str(), "ls");

        let shifted = KeyEvent::new(KeyCode::Char('L'), KeyModifiers::SHIFT);
        handle_key(shifted, &mut view);
        assert_eq!(view.input().as_str(), "lsL");
    }

    #[test]
    fn test_release_events_ignored() {
        let mut view = PromptView::new(FontStyle::default());
        let mut key = press(KeyCode::Char('x'));
        key.kind = KeyEventKind::Release;
        assert_eq!(handle_key(key, &mut view), KeyAction::Ignore);
        assert!(view.input().is_empty());
    }

    #[test]
    fn test_initial_prompt_ignores_empty() {
        let overlay = PromptOverlay::new(Arc::new(SessionFactory::new())).with_initial_prompt("");
        assert!(overlay.initial_prompt.is_none());
    }
}
