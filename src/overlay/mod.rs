//! Command Search Overlay Module
//!
//! This module provides the transient prompt shown inside a terminal: a
//! single-line input field and a suggestion area hosted in a view zone,
//! relaying prompts to a search provider until the user accepts or cancels.
//!
//! ## Module Structure
//!
//! - `config` - Configuration and theme management
//! - `host` - Terminal host and view zone traits
//! - `input` - Single-line prompt buffer with cursor management
//! - `view` - Prompt view state and rendering
//! - `session` - Thread id allocation per overlay session
//! - `guard` - Scoped view zone release
//! - `prompt` - Main overlay session orchestration
//! - `terminal` - Crossterm terminal host

pub mod config;
mod guard;
pub mod host;
pub mod input;
pub mod prompt;
pub mod session;
pub mod terminal;
pub mod view;

// Re-export main types for convenience
pub use config::{OpenRouterConfig, OverlayConfig};
pub use host::{FontStyle, TerminalHost, TerminalId, ViewZone};
pub use input::PromptInput;
pub use prompt::PromptOverlay;
pub use session::SessionFactory;
pub use terminal::{CrosstermTerminal, CrosstermZone};
pub use view::PromptView;
