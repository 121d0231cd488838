//! Command search requests, results and the provider contract.
//!
//! A provider receives one [`SearchRequest`] per submitted prompt line and
//! answers with an ordered list of candidate commands. Every request made
//! from the same overlay session carries the same [`ThreadId`], so a
//! provider can treat follow-up prompts as refinements of the first one.

use std::fmt;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::overlay::host::TerminalId;

/// Identifies one overlay session; shared by the initial prompt and all refine requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadId(u64);

impl ThreadId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single prompt submitted from the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    thread_id: ThreadId,
    terminal: TerminalId,
    prompt: String,
}

impl SearchRequest {
    pub fn new(thread_id: ThreadId, terminal: TerminalId, prompt: impl Into<String>) -> Self {
        Self {
            thread_id,
            terminal,
            prompt: prompt.into(),
        }
    }

    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// The terminal the request was issued from
    pub fn terminal(&self) -> TerminalId {
        self.terminal
    }

    /// The user's prompt text
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// The command accepted by the user when the overlay resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub command: String,
    /// Whether the command should be executed, as opposed to only inserted.
    pub execute: bool,
}

impl SearchResult {
    pub fn new(command: impl Into<String>, execute: bool) -> Self {
        Self {
            command: command.into(),
            execute,
        }
    }
}

/// Natural-language backend answering prompts with candidate commands.
///
/// An empty list means "no suggestion" and is not an error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn query(&self, request: SearchRequest) -> Result<Vec<String>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accessors() {
        let request = SearchRequest::new(ThreadId::new(7), TerminalId::new(2), "list files");
        assert_eq!(request.thread_id().get(), 7);
        assert_eq!(request.terminal(), TerminalId::new(2));
        assert_eq!(request.prompt(), "list files");
    }

    #[test]
    fn test_thread_id_display() {
        assert_eq!(ThreadId::new(42).to_string(), "42");
    }
}
