//! OpenAI request bodies as accepted on `/v1/chat/completions` and `/v1/embeddings`.
//!
//! Missing fields fall back to the defaults below, so a partial body is merged
//! over a complete default request.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

const DEFAULT_SYSTEM_PROMPT: &str = "\nYou are ChatGPT, a large language model trained by OpenAI.\nKnowledge cutoff: 2021-09\nCurrent model: gpt-4\n";

/// Chat completion request forwarded upstream.
///
/// Only these fields are forwarded; anything else in the inbound body is dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatCompletionRequest {
    /// Conversation messages, passed through untouched.
    pub messages: Value,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub n: i64,
    pub stream: bool,
}

impl Default for ChatCompletionRequest {
    fn default() -> Self {
        Self {
            messages: json!([{ "role": "system", "content": DEFAULT_SYSTEM_PROMPT }]),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.5,
            top_p: 1.0,
            n: 1,
            stream: false,
        }
    }
}

/// Embeddings request forwarded upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingRequest {
    /// A string, a token array or a list of either.
    pub input: Value,
    pub model: String,
}

impl Default for EmbeddingRequest {
    fn default() -> Self {
        Self { input: Value::String(String::new()), model: DEFAULT_EMBEDDING_MODEL.to_string() }
    }
}

impl EmbeddingRequest {
    pub fn has_input(&self) -> bool {
        match &self.input {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        }
    }

    /// Upstream expects a list; scalar input is wrapped.
    pub fn normalize_input(&mut self) {
        if !self.input.is_array() {
            let scalar = self.input.take();
            self.input = Value::Array(vec![scalar]);
        }
    }
}
