//! KAI Search - natural-language command search inside the terminal
//!
//! This library provides a transient prompt overlay that lets the user describe
//! a task in plain language, relays the prompt to a search provider and shows
//! the suggested command, which the user can run, insert or discard.
//!
//! # Features
//!
//! - **Prompt Overlay**: Single-line input hosted in an inline view zone
//! - **Refine Queries**: Follow-up prompts share the session's thread id
//! - **Accept or Insert**: Enter runs the suggestion, Alt+Enter only inserts it
//! - **Deterministic Cleanup**: The view zone is released on every exit path
//! - **OpenRouter Integration**: Conversational provider over chat completions
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kai_search::llm::OpenRouterProvider;
//! use kai_search::overlay::{CrosstermTerminal, OverlayConfig, PromptOverlay, SessionFactory};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OverlayConfig::load(None)?;
//! let provider = OpenRouterProvider::from_env(&config)?;
//! let mut terminal = CrosstermTerminal::new(&config);
//!
//! let overlay = PromptOverlay::new(Arc::new(SessionFactory::new()));
//! if let Some(result) = overlay.show(&mut terminal, &provider).await? {
//!     println!("{} (execute: {})", result.command, result.execute);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Keys
//!
//! 1. **Enter** - submit the prompt, or accept the suggestion on an empty line
//! 2. **Alt+Enter** - accept the suggestion without running it
//! 3. **Escape / Ctrl+C** - cancel
//! 4. **Ctrl+A/E/U/K/W** - readline-style editing

pub mod error;
pub mod llm;
pub mod logging;
pub mod overlay;
pub mod search;
pub mod tools;

// Re-export commonly used types for convenience
pub use error::{ConfigError, OverlayError, ProviderError};
pub use overlay::{PromptOverlay, SessionFactory};
pub use search::{SearchProvider, SearchRequest, SearchResult, ThreadId};
