//! LLM integration.
//!
//! [`ChatClient`] talks to an OpenAI-compatible chat-completions endpoint
//! behind the [`LlmProvider`] trait, authenticating with a lazily resolved
//! [`ApiKey`].

pub mod client;
pub mod credentials;

pub use client::{
    ChatClient, Choice, GenerationRequest, GenerationResponse, LlmProvider, Message, Usage,
};
pub use credentials::ApiKey;
