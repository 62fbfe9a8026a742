//! # jimbruz — terminal front-end
//!
//! Bridges `jimbruz-core` (stats, memories) and `jimbruz-llm` (chat
//! collaborator) into something you can talk to.
//!
//! ## Modules
//!
//! - `companion` — the pet plus its chat client; owns the `ask` flow
//! - `command` — parsing of the verb surface (`feed`, `ask <text>`, ...)
//! - `input` — line input read on its own thread
//! - `repl` — the interactive loop, generic over output
//! - `setup` — turning configuration and environment into a live companion

pub mod command;
pub mod companion;
pub mod input;
pub mod repl;
pub mod setup;

pub use command::{Command, CommandError};
pub use companion::Companion;
