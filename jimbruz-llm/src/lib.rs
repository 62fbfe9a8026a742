//! # jimbruz-llm — chat collaborator for Jimbruz
//!
//! A thin client for OpenAI-compatible chat-completion APIs. It is the only
//! part of Jimbruz that touches the network.
//!
//! Every failure comes back as a typed [`LlmError`], so the caller can tell
//! "no credential configured" apart from "the service fell over". Jimbruz
//! itself downgrades all of them to a local fallback reply.

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{LlmClient, LlmProvider};
pub use error::LlmError;
pub use types::{LlmRequest, LlmResponse};
