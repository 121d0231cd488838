//! Crossterm Terminal Host
//!
//! Hosts the overlay in a ratatui inline viewport opened below the shell's
//! cursor. While a zone is open, raw mode and focus reporting are enabled and
//! a pump thread polls crossterm events: key presses go to the zone, and the
//! terminal window regaining focus after losing it fires the focus
//! subscriptions.

use std::io::{self, IsTerminal, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::{
    cursor,
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEvent, KeyEventKind},
    execute, terminal,
};
use parking_lot::Mutex;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal, TerminalOptions, Viewport};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::config::OverlayConfig;
use super::host::{FontStyle, TerminalHost, TerminalId, ViewZone};
use super::view::PromptView;
use crate::error::OverlayError;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

type FocusWaiters = Arc<Mutex<Vec<oneshot::Sender<()>>>>;

/// The process's controlling terminal
pub struct CrosstermTerminal {
    id: TerminalId,
    zone_height: u16,
    font: FontStyle,
    focus_waiters: FocusWaiters,
}

impl CrosstermTerminal {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            id: TerminalId::new(std::process::id()),
            // One row for the suggestion, one for the input field.
            zone_height: config.zone_height.max(2),
            font: config.font_style(),
            focus_waiters: Arc::default(),
        }
    }
}

#[async_trait]
impl TerminalHost for CrosstermTerminal {
    type Zone = CrosstermZone;

    fn id(&self) -> TerminalId {
        self.id
    }

    fn has_surface(&self) -> bool {
        io::stdout().is_terminal() && io::stdin().is_terminal()
    }

    fn on_did_focus(&mut self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let mut waiters = self.focus_waiters.lock();
        waiters.retain(|waiter| !waiter.is_closed());
        waiters.push(tx);
        rx
    }

    async fn insert_view_zone(&mut self) -> Result<CrosstermZone, OverlayError> {
        terminal::enable_raw_mode()?;
        match CrosstermZone::open(self.zone_height, Arc::clone(&self.focus_waiters)) {
            Ok(zone) => Ok(zone),
            Err(err) => {
                let _ = execute!(io::stdout(), DisableFocusChange);
                let _ = terminal::disable_raw_mode();
                Err(err.into())
            }
        }
    }

    fn font(&self) -> FontStyle {
        self.font
    }

    fn focus(&mut self) {
        if let Err(err) = execute!(io::stdout(), cursor::Show) {
            warn!("failed to restore terminal cursor: {}", err);
        }
    }
}

/// Inline viewport hosting one overlay session
pub struct CrosstermZone {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    keys: mpsc::UnboundedReceiver<KeyEvent>,
    stop: Arc<AtomicBool>,
    pump: Option<JoinHandle<()>>,
    disposed: bool,
}

impl CrosstermZone {
    fn open(height: u16, focus_waiters: FocusWaiters) -> io::Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnableFocusChange)?;

        let terminal = Terminal::with_options(
            CrosstermBackend::new(stdout),
            TerminalOptions {
                viewport: Viewport::Inline(height),
            },
        )?;

        let (keys_tx, keys) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let pump = EventPump {
            keys: keys_tx,
            focus_waiters,
            stop: Arc::clone(&stop),
        }
        .spawn()?;

        debug!(height, "inline view zone inserted");
        Ok(Self {
            terminal,
            keys,
            stop,
            pump: Some(pump),
            disposed: false,
        })
    }
}

#[async_trait]
impl ViewZone for CrosstermZone {
    async fn rendered(&mut self) -> Result<Rect, OverlayError> {
        let mut area = Rect::default();
        self.terminal
            .draw(|frame| area = frame.size())
            .map_err(|err| OverlayError::Render(err.to_string()))?;
        Ok(area)
    }

    async fn next_key(&mut self) -> Option<KeyEvent> {
        self.keys.recv().await
    }

    fn draw(&mut self, view: &PromptView) -> Result<(), OverlayError> {
        self.terminal
            .draw(|frame| {
                let area = frame.size();
                view.render(frame, area);
            })
            .map_err(|err| OverlayError::Render(err.to_string()))?;
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.stop.store(true, Ordering::Relaxed);
        if let Some(pump) = self.pump.take() {
            if pump.join().is_err() {
                warn!("event pump thread panicked");
            }
        }

        if let Err(err) = self.terminal.clear() {
            warn!("failed to clear view zone: {}", err);
        }
        let _ = execute!(self.terminal.backend_mut(), DisableFocusChange);
        if let Err(err) = terminal::disable_raw_mode() {
            warn!("failed to disable raw mode: {}", err);
        }
        debug!("inline view zone disposed");
    }
}

impl Drop for CrosstermZone {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Forwards crossterm events to the open zone until stopped
struct EventPump {
    keys: mpsc::UnboundedSender<KeyEvent>,
    focus_waiters: FocusWaiters,
    stop: Arc<AtomicBool>,
}

impl EventPump {
    fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("kai-search-events".to_string())
            .spawn(move || self.run())
    }

    fn run(self) {
        // Some terminals report the current focus state as soon as reporting
        // is enabled; only a gain that follows a loss counts.
        let mut focus_left = false;

        while !self.stop.load(Ordering::Relaxed) {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    warn!("event poll failed: {}", err);
                    break;
                }
            }

            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    if self.keys.send(key).is_err() {
                        break;
                    }
                }
                Ok(Event::FocusLost) => focus_left = true,
                Ok(Event::FocusGained) if focus_left => {
                    focus_left = false;
                    self.notify_focus();
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("event read failed: {}", err);
                    break;
                }
            }
        }
        debug!("event pump stopped");
    }

    fn notify_focus(&self) {
        for waiter in self.focus_waiters.lock().drain(..) {
            let _ = waiter.send(());
        }
    }
}
