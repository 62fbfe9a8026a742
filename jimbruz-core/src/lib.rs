//! # Jimbruz Core Library
//!
//! The stateful heart of Jimbruz, the introverted Snow Beast:
//!
//! - **Mood model** — three bounded stats (energy, happiness, trust) and a
//!   mood label derived from them
//! - **Memory log** — an append-only JSON record of timestamped interaction
//!   notes, reloaded in full on every write
//! - **Session log** — a plain-text event trail, append-only and never read back
//! - **Fallback replies** — keyword-matched local answers used whenever the
//!   chat collaborator is unavailable
//!
//! Nothing here talks to the network. The chat client lives in `jimbruz-llm`
//! and the two are composed by the `jimbruz` front-end.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod fallback;
pub mod memory;
pub mod pet;
pub mod session;
pub mod types;

pub use config::JimbruzConfig;
pub use error::JimbruzError;
pub use memory::{MemoryEntry, MemoryLog};
pub use pet::Pet;
pub use session::SessionLog;
pub use types::*;
