//! Configuration for Jimbruz.
//!
//! Maps directly to `jimbruz.toml`. Every field has a default, so an empty
//! file (or no file at all) yields a working setup.
//!
//! ```toml
//! [pet]
//! name = "Jimbruz"
//! feed_accept_chance = 0.75
//!
//! [storage]
//! data_dir = "data"
//!
//! [llm]
//! provider = "openai"
//! model = "gpt-4o-mini"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{JimbruzError, Result};
use crate::types::PetState;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JimbruzConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Persona and stat tuning.
    #[serde(default)]
    pub pet: PetConfig,
    /// Where memories and session events are written.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Chat-completion collaborator settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

impl JimbruzConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `JimbruzError::Config` if the TOML is invalid or fails validation.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| JimbruzError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Reject values that would make the pet misbehave.
    ///
    /// # Errors
    /// Returns `JimbruzError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let chance = self.pet.feed_accept_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(JimbruzError::Config(format!(
                "pet.feed_accept_chance must be within [0, 1], got {chance}"
            )));
        }
        if self.pet.name.trim().is_empty() {
            return Err(JimbruzError::Config("pet.name must not be empty".into()));
        }
        if self.storage.memory_file.as_os_str().is_empty() {
            return Err(JimbruzError::Config(
                "storage.memory_file must not be empty".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(JimbruzError::Config(format!(
                "llm.temperature must be within [0, 2], got {}",
                self.llm.temperature
            )));
        }
        if self.llm.request_timeout_ms == 0 {
            return Err(JimbruzError::Config(
                "llm.request_timeout_ms must be positive".into(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(JimbruzError::Config("llm.model must not be empty".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error. `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Persona and stat tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetConfig {
    /// What the pet is called.
    #[serde(default = "default_name")]
    pub name: String,
    /// What the pet is.
    #[serde(default = "default_species")]
    pub species: String,
    /// Starting energy.
    #[serde(default = "default_energy")]
    pub initial_energy: f32,
    /// Starting happiness.
    #[serde(default = "default_happiness")]
    pub initial_happiness: f32,
    /// Starting trust. Low, because introvert.
    #[serde(default = "default_trust")]
    pub initial_trust: f32,
    /// Probability that food is accepted while trust is below 4.
    #[serde(default = "default_feed_chance")]
    pub feed_accept_chance: f64,
    /// Seed for the pet's RNG. `None` seeds from OS entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl PetConfig {
    /// The configured starting stats, clamped.
    #[must_use]
    pub fn initial_state(&self) -> PetState {
        PetState::new(
            self.initial_energy,
            self.initial_happiness,
            self.initial_trust,
        )
    }
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            species: default_species(),
            initial_energy: default_energy(),
            initial_happiness: default_happiness(),
            initial_trust: default_trust(),
            feed_accept_chance: default_feed_chance(),
            rng_seed: None,
        }
    }
}

/// Storage locations and history sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding both files. Created on startup.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Memory file name, relative to `data_dir`.
    #[serde(default = "default_memory_file")]
    pub memory_file: PathBuf,
    /// Session log name, relative to `data_dir`.
    #[serde(default = "default_session_log")]
    pub session_log: PathBuf,
    /// How many recent notes are sent to the collaborator as context.
    #[serde(default = "default_6")]
    pub context_memories: usize,
    /// How many entries the `memories` command lists.
    #[serde(default = "default_20")]
    pub listing_limit: usize,
}

impl StorageConfig {
    /// Full path of the memory file.
    #[must_use]
    pub fn memory_path(&self) -> PathBuf {
        self.data_dir.join(&self.memory_file)
    }

    /// Full path of the session log.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(&self.session_log)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            memory_file: default_memory_file(),
            session_log: default_session_log(),
            context_memories: 6,
            listing_limit: 20,
        }
    }
}

/// Chat-completion collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "openai" (any OpenAI-compatible API) or "none".
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Base URL for the API, without the `/v1/...` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key. Unset → no collaborator.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Response length cap in tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Hard timeout for a single call in milliseconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_ms: u64,
    /// Extra attempts after the first failure before falling back.
    #[serde(default = "default_1")]
    pub max_retries: u32,
}

impl LlmConfig {
    /// Whether the provider is switched on at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.provider.eq_ignore_ascii_case("none")
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_ms: default_timeout(),
            max_retries: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "warn".to_string() }
fn default_name() -> String { "Jimbruz".to_string() }
fn default_species() -> String { "Snow Beast".to_string() }
fn default_energy() -> f32 { 5.0 }
fn default_happiness() -> f32 { 3.0 }
fn default_trust() -> f32 { 1.0 }
fn default_feed_chance() -> f64 { 0.75 }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_memory_file() -> PathBuf { PathBuf::from("memories.json") }
fn default_session_log() -> PathBuf { PathBuf::from("session.log") }
fn default_provider() -> String { "openai".to_string() }
fn default_base_url() -> String { "https://api.openai.com".to_string() }
fn default_model() -> String { "gpt-4o-mini".to_string() }
fn default_api_key_env() -> String { "OPENAI_API_KEY".to_string() }
fn default_temperature() -> f32 { 0.85 }
fn default_max_tokens() -> u32 { 200 }
fn default_timeout() -> u64 { 15_000 }
fn default_1() -> u32 { 1 }
fn default_6() -> usize { 6 }
fn default_20() -> usize { 20 }
