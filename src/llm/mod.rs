//! LLM Integration Module
//!
//! Provides the OpenRouter client and the command search provider built on it.

pub mod openrouter;
pub mod provider;

// Re-export main types
pub use openrouter::OpenRouterClient;
pub use provider::{extract_commands, OpenRouterProvider, API_KEY_ENV};
