//! Terminal host abstractions the overlay is drawn into.

use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use tokio::sync::oneshot;

use super::view::PromptView;
use crate::error::OverlayError;

/// Opaque reference to the terminal that owns an overlay session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalId(u32);

impl TerminalId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Colors the terminal renders text with; the view zone matches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontStyle {
    pub foreground: Color,
    pub background: Color,
    pub accent: Color,
}

impl FontStyle {
    pub fn text(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn prompt(&self) -> Style {
        Style::default().fg(self.accent).bg(self.background)
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            background: Color::DarkGray,
            accent: Color::Blue,
        }
    }
}

/// A terminal able to host a transient view zone.
#[async_trait]
pub trait TerminalHost: Send {
    type Zone: ViewZone;

    fn id(&self) -> TerminalId;

    /// Whether the terminal currently has a rendering surface to insert zones into
    fn has_surface(&self) -> bool;

    /// One-shot subscription fired when the terminal's primary surface regains focus.
    ///
    /// Dropping the receiver unsubscribes. A receiver whose sender is dropped
    /// without firing never counts as a focus change.
    fn on_did_focus(&mut self) -> oneshot::Receiver<()>;

    async fn insert_view_zone(&mut self) -> Result<Self::Zone, OverlayError>;

    fn font(&self) -> FontStyle;

    /// Return input focus to the terminal itself
    fn focus(&mut self);
}

/// A region inserted into the terminal's rendering surface.
#[async_trait]
pub trait ViewZone: Send {
    /// Resolves once the zone has been laid out and can receive content.
    async fn rendered(&mut self) -> Result<Rect, OverlayError>;

    /// Next key pressed while the zone has focus, `None` once the source is gone.
    ///
    /// Must be cancel safe: the overlay races it against in-flight queries.
    async fn next_key(&mut self) -> Option<KeyEvent>;

    fn draw(&mut self, view: &PromptView) -> Result<(), OverlayError>;

    /// Remove the zone from the surface. Called exactly once per zone.
    fn dispose(&mut self);
}
