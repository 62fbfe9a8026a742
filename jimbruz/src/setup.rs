//! Turning configuration and environment into a live [`Companion`].

use jimbruz_core::config::{JimbruzConfig, LlmConfig};
use jimbruz_core::error::Result;
use jimbruz_core::pet::Pet;
use jimbruz_llm::{LlmClient, LlmProvider};
use tracing::info;

use crate::companion::{ChatSettings, Companion};

/// Build the chat client.
///
/// The collaborator is only attempted when the provider is enabled, offline
/// mode is off, and `api_key` (normally read from `llm.api_key_env`) is a
/// non-blank string.
#[must_use]
pub fn llm_client(config: &LlmConfig, api_key: Option<String>, offline: bool) -> LlmClient {
    if offline || !config.is_enabled() {
        info!("Chat collaborator disabled; using local replies");
        return LlmClient::none();
    }

    match api_key.filter(|k| !k.trim().is_empty()) {
        Some(api_key) => {
            info!(base_url = %config.base_url, model = %config.model, "Chat collaborator enabled");
            LlmClient::new(
                LlmProvider::OpenAiCompatible {
                    base_url: config.base_url.clone(),
                    api_key,
                },
                config.model.clone(),
                config.max_retries,
            )
        }
        None => {
            info!(env = %config.api_key_env, "No API key set; using local replies");
            LlmClient::none()
        }
    }
}

/// Request shaping taken from the `[llm]` section.
#[must_use]
pub fn chat_settings(config: &LlmConfig) -> ChatSettings {
    ChatSettings {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        timeout_ms: config.request_timeout_ms,
    }
}

/// Summon the pet and connect it to its collaborator.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn companion(config: &JimbruzConfig, offline: bool) -> Result<Companion> {
    let api_key = std::env::var(&config.llm.api_key_env).ok();
    let pet = Pet::open(config)?;
    let llm = llm_client(&config.llm, api_key, offline);
    Ok(Companion::new(pet, llm, chat_settings(&config.llm)))
}
