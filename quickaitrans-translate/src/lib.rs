//! # quickaitrans-translate
//!
//! The translation collaborator: a blocking chat-completion client with
//! an explicit bounded retry policy, plus the size-bounded chunker that
//! feeds diff payloads through it.
//!
//! The orchestrator talks to this crate through the [`Translator`] trait
//! and plain nested string mappings (`serde_json::Map`) — no ordering
//! contract crosses this boundary in either direction.

pub mod chunk;
pub mod client;
pub mod error;

pub use chunk::{AiTranslator, TranslationRequest, Translator, MAX_CHUNK_BYTES};
pub use client::{AiClientConfig, ChatBackend, ChatClient, ChatMessage, RetryPolicy};
pub use error::TranslateError;
