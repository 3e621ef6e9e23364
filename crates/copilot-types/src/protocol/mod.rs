//! Inbound protocol request types.

pub mod openai;

pub use openai::{ChatCompletionRequest, EmbeddingRequest};
