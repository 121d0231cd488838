//! OpenRouter-backed command search provider.
//!
//! Each overlay session is one conversation: the provider keeps the messages
//! exchanged under a thread id and replays them with every refine request,
//! so "only the hidden ones" after "list files" is understood in context.

use std::collections::BTreeMap;
use std::env;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::openrouter::{extract_response_content, Message, OpenRouterClient};
use crate::error::ProviderError;
use crate::overlay::config::{OpenRouterConfig, OverlayConfig};
use crate::search::{SearchProvider, SearchRequest, ThreadId};

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Conversations kept at once; the oldest thread is forgotten first.
const MAX_THREADS: usize = 16;

pub struct OpenRouterProvider {
    client: OpenRouterClient,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    system_prompt: String,
    threads: Mutex<BTreeMap<ThreadId, Vec<Message>>>,
}

impl OpenRouterProvider {
    pub fn new(client: OpenRouterClient, config: &OpenRouterConfig, shell: &str) -> Self {
        Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system_prompt: system_prompt(shell),
            threads: Mutex::new(BTreeMap::new()),
        }
    }

    /// Build the provider from `OPENROUTER_API_KEY` and the overlay configuration
    pub fn from_env(config: &OverlayConfig) -> Result<Self, ProviderError> {
        let api_key = env::var(API_KEY_ENV).map_err(|_| ProviderError::MissingApiKey(API_KEY_ENV))?;

        if api_key.is_empty() {
            return Err(ProviderError::InvalidApiKey("key is empty"));
        }
        if api_key.len() < 10 {
            return Err(ProviderError::InvalidApiKey("key is too short"));
        }

        let client = OpenRouterClient::new(api_key).with_base_url(&config.openrouter.base_url);
        Ok(Self::new(client, &config.openrouter, &config.shell))
    }

    fn history(&self, thread: ThreadId) -> Vec<Message> {
        self.threads
            .lock()
            .get(&thread)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, thread: ThreadId, user: Message, assistant: Message) {
        let mut threads = self.threads.lock();
        threads.entry(thread).or_default().extend([user, assistant]);
        while threads.len() > MAX_THREADS {
            if let Some((forgotten, _)) = threads.pop_first() {
                debug!(thread_id = %forgotten, "forgetting command search thread");
            }
        }
    }
}

#[async_trait]
impl SearchProvider for OpenRouterProvider {
    async fn query(&self, request: SearchRequest) -> Result<Vec<String>, ProviderError> {
        let thread = request.thread_id();
        let user = OpenRouterClient::create_user_message(request.prompt());

        let mut messages = vec![OpenRouterClient::create_system_message(&self.system_prompt)];
        messages.extend(self.history(thread));
        messages.push(user.clone());

        let response = self
            .client
            .send_conversation(&self.model, messages, self.max_tokens, self.temperature)
            .await?;
        let content = extract_response_content(&response)
            .ok_or(ProviderError::EmptyReply)?
            .to_string();

        let candidates = extract_commands(&content);
        debug!(thread_id = %thread, candidates = candidates.len(), "parsed command candidates");
        self.record(
            thread,
            user,
            OpenRouterClient::create_assistant_message(&content),
        );
        Ok(candidates)
    }
}

fn system_prompt(shell: &str) -> String {
    format!(
        "You translate requests into commands for the `{}` shell on {}. \
         Reply with the single best command in one fenced code block and nothing else. \
         When the user follows up, revise your previous command.",
        shell,
        env::consts::OS
    )
}

/// Pull candidate commands out of a model reply.
///
/// Fenced code blocks win, one candidate per block. Without fences every
/// non-empty line is a candidate, except lead-in lines ending in `:`.
/// Leading `$ ` prompts and inline backticks are stripped.
pub fn extract_commands(reply: &str) -> Vec<String> {
    let mut fenced = Vec::new();
    let mut block: Option<Vec<&str>> = None;

    for line in reply.lines() {
        if line.trim_start().starts_with("```") {
            match block.take() {
                Some(lines) => push_block(&mut fenced, &lines),
                None => block = Some(Vec::new()),
            }
            continue;
        }
        if let Some(lines) = block.as_mut() {
            lines.push(strip_prompt(line.trim_start()));
        }
    }
    // Unterminated fence
    if let Some(lines) = block {
        push_block(&mut fenced, &lines);
    }

    if !fenced.is_empty() {
        return fenced;
    }

    reply
        .lines()
        .map(|line| strip_prompt(line.trim()).trim_matches('`').trim())
        .filter(|line| !line.is_empty() && !line.ends_with(':'))
        .map(str::to_string)
        .collect()
}

fn push_block(candidates: &mut Vec<String>, lines: &[&str]) {
    let command = lines.join("\n").trim().to_string();
    if !command.is_empty() {
        candidates.push(command);
    }
}

fn strip_prompt(line: &str) -> &str {
    line.strip_prefix("$ ").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenRouterProvider {
        OpenRouterProvider::new(
            OpenRouterClient::new("test-key-123".to_string()),
            &OpenRouterConfig::default(),
            "bash",
        )
    }

    #[test]
    fn test_extract_fenced_block() {
        let reply = "Here you go:\n```bash\n$ ls -la\n```\n";
        assert_eq!(extract_commands(reply), vec!["ls -la"]);
    }

    #[test]
    fn test_extract_multiple_blocks() {
        let reply = "```\nfind . -name '*.rs'\n```\nor\n```sh\nfd -e rs\n```";
        assert_eq!(extract_commands(reply), vec!["find . -name '*.rs'", "fd -e rs"]);
    }

    #[test]
    fn test_extract_multiline_block_kept_whole() {
        let reply = "```\ncd /tmp\nls\n```";
        assert_eq!(extract_commands(reply), vec!["cd /tmp\nls"]);
    }

    #[test]
    fn test_extract_plain_lines() {
        let reply = "`du -sh *`\n\n$ sort -h";
        assert_eq!(extract_commands(reply), vec!["du -sh *", "sort -h"]);
    }

    #[test]
    fn test_extract_skips_lead_in_line() {
        let reply = "Here is the command:\n$ ls -la";
        assert_eq!(extract_commands(reply), vec!["ls -la"]);
    }

    #[test]
    fn test_extract_unterminated_fence() {
        assert_eq!(extract_commands("```\ngit status"), vec!["git status"]);
    }

    #[test]
    fn test_extract_empty_reply() {
        assert!(extract_commands("").is_empty());
        assert!(extract_commands("```\n```").is_empty());
    }

    #[test]
    fn test_history_is_per_thread() {
        let provider = provider();
        let first = ThreadId::new(1);
        provider.record(
            first,
            OpenRouterClient::create_user_message("list files"),
            OpenRouterClient::create_assistant_message("ls"),
        );

        assert_eq!(provider.history(first).len(), 2);
        assert!(provider.history(ThreadId::new(2)).is_empty());
    }

    #[test]
    fn test_oldest_threads_forgotten() {
        let provider = provider();
        for id in 1..=(MAX_THREADS as u64 + 2) {
            provider.record(
                ThreadId::new(id),
                OpenRouterClient::create_user_message("q"),
                OpenRouterClient::create_assistant_message("a"),
            );
        }

        assert_eq!(provider.threads.lock().len(), MAX_THREADS);
        assert!(provider.history(ThreadId::new(1)).is_empty());
        assert!(provider.history(ThreadId::new(2)).is_empty());
        assert_eq!(provider.history(ThreadId::new(3)).len(), 2);
    }

    #[test]
    fn test_system_prompt_names_shell() {
        assert!(system_prompt("zsh").contains("`zsh`"));
    }
}
