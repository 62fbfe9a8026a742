//! The mood model: the pet's stats, reactions and memories.
//!
//! A [`Pet`] owns its stats, its [`MemoryLog`] and its [`SessionLog`]. Every
//! stat-affecting operation clamps afterwards and writes exactly one memory
//! entry plus one session event. [`Pet::status`] is a pure read.
//!
//! Free-text questions are split in two so this crate stays offline:
//! [`Pet::chat_context`] builds what to send to a collaborator, and
//! [`Pet::record_answer`] stores whatever came back (or the local fallback).

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, warn};

use crate::config::{JimbruzConfig, PetConfig};
use crate::error::Result;
use crate::fallback;
use crate::memory::{MemoryEntry, MemoryLog};
use crate::session::SessionLog;
use crate::types::{Answer, AnswerSource, PetState, Reaction, ReactionKind, Status};

/// Trust at or above which food is always accepted.
pub const ALWAYS_EATS_TRUST: f32 = 4.0;
/// Trust below which play is refused.
pub const PLAY_TRUST: f32 = 3.0;
/// Energy at or below which play is too tiring.
pub const PLAY_ENERGY: f32 = 1.0;
/// Energy after a nap.
pub const SLEEP_ENERGY: f32 = 8.0;

/// The virtual pet.
pub struct Pet {
    name: String,
    species: String,
    state: PetState,
    feed_accept_chance: f64,
    context_memories: usize,
    listing_limit: usize,
    memory: MemoryLog,
    session: SessionLog,
    rng: Box<dyn RngCore + Send>,
}

impl std::fmt::Debug for Pet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pet")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}

impl Pet {
    /// Summon a pet from configuration, opening both logs under the data dir.
    ///
    /// The RNG is seeded from `pet.rng_seed` when set, else from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the data directory cannot be created.
    pub fn open(config: &JimbruzConfig) -> Result<Self> {
        let rng = match config.pet.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::open_with_rng(config, rng)
    }

    /// Like [`Pet::open`], with a caller-supplied random source.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the data directory cannot be created.
    pub fn open_with_rng<R>(config: &JimbruzConfig, rng: R) -> Result<Self>
    where
        R: RngCore + Send + 'static,
    {
        let memory = MemoryLog::open(config.storage.memory_path())?;
        let session = SessionLog::open(config.storage.session_path())?;
        let mut pet = Self::from_parts(&config.pet, memory, session, rng);
        pet.context_memories = config.storage.context_memories;
        pet.listing_limit = config.storage.listing_limit;
        Ok(pet)
    }

    /// Assemble a pet from already-opened logs.
    #[must_use]
    pub fn from_parts<R>(config: &PetConfig, memory: MemoryLog, session: SessionLog, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            name: config.name.clone(),
            species: config.species.clone(),
            state: config.initial_state(),
            feed_accept_chance: config.feed_accept_chance,
            context_memories: 6,
            listing_limit: 20,
            memory,
            session,
            rng: Box::new(rng),
        }
    }

    /// The pet's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pet's species.
    #[must_use]
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Current stats.
    #[must_use]
    pub fn state(&self) -> PetState {
        self.state
    }

    /// Overwrite the stats (clamped).
    pub fn set_state(&mut self, state: PetState) {
        self.state = state;
        self.state.clamp();
    }

    /// The memory log this pet writes to.
    #[must_use]
    pub fn memory(&self) -> &MemoryLog {
        &self.memory
    }

    /// The session log this pet writes to.
    #[must_use]
    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    // ------------------------------------------------------------------
    // Stat operations
    // ------------------------------------------------------------------

    /// Offer food.
    ///
    /// Accepted with probability `feed_accept_chance`, or always once trust
    /// reaches [`ALWAYS_EATS_TRUST`]. Refusal costs a little trust.
    pub fn feed(&mut self) -> Reaction {
        let roll: f64 = self.rng.r#gen();
        let accepted = roll < self.feed_accept_chance || self.state.trust >= ALWAYS_EATS_TRUST;

        let reaction = if accepted {
            self.state.energy += 2.0;
            self.state.happiness += 1.0;
            self.state.trust += 1.0;
            self.state.clamp();
            self.remember_note(format!(
                "Accepted food. Energy->{:.1}, Trust->{:.1}",
                self.state.energy, self.state.trust
            ));
            self.session.record("feed");
            Reaction::new(
                ReactionKind::Accepted,
                format!(
                    "{} eats slowly and nods. It seems calmer. Energy {:.1}, Trust {:.1}",
                    self.name, self.state.energy, self.state.trust
                ),
            )
        } else {
            self.state.trust -= 0.2;
            self.state.clamp();
            self.remember_note("Refused food (too shy).");
            self.session.record("feed-refuse");
            Reaction::new(
                ReactionKind::Refused,
                format!("{} sniffs and steps away, not ready yet.", self.name),
            )
        };

        debug!(roll, accepted, state = ?self.state, "feed");
        reaction
    }

    /// Try to play.
    pub fn play(&mut self) -> Reaction {
        let reaction = if self.state.trust < PLAY_TRUST {
            self.state.happiness -= 0.5;
            self.state.clamp();
            self.remember_note("Tried to play but it hid.");
            self.session.record("play-fail");
            Reaction::new(
                ReactionKind::TooShy,
                format!("{} retreats into the snowbank. Too shy to play.", self.name),
            )
        } else if self.state.energy <= PLAY_ENERGY {
            self.state.energy -= 0.5;
            self.state.clamp();
            self.remember_note("Too tired to play.");
            self.session.record("play-tired");
            Reaction::new(
                ReactionKind::TooTired,
                format!("{} yawns. Too tired for games.", self.name),
            )
        } else {
            self.state.happiness += 2.0;
            self.state.energy -= 1.0;
            self.state.trust += 0.7;
            self.state.clamp();
            self.remember_note("Played together. Happiness increased.");
            self.session.record("play");
            Reaction::new(
                ReactionKind::Played,
                format!("{} allows a gentle romp. It snorts happily.", self.name),
            )
        };

        debug!(kind = ?reaction.kind, state = ?self.state, "play");
        reaction
    }

    /// Let the pet rest.
    pub fn sleep(&mut self) -> Reaction {
        self.state.energy = SLEEP_ENERGY;
        self.state.happiness += 0.5;
        self.state.clamp();
        self.remember_note("Slept; energy restored.");
        self.session.record("sleep");
        Reaction::new(
            ReactionKind::Slept,
            format!("{} curls up in a drift and sleeps quietly...", self.name),
        )
    }

    /// Current stats and mood. Pure read.
    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            name: self.name.clone(),
            species: self.species.clone(),
            state: self.state,
            mood: self.state.mood(),
        }
    }

    /// Store a user-supplied note verbatim.
    pub fn remember(&mut self, note: &str) -> Reaction {
        self.remember_note(note);
        self.session.record(&format!("remember: {note}"));
        Reaction::new(
            ReactionKind::Remembered,
            format!("{} tilts its head and seems to store that memory.", self.name),
        )
    }

    /// The most recent entries for the `memories` listing.
    #[must_use]
    pub fn memories(&self) -> Vec<MemoryEntry> {
        self.memory.recent(self.listing_limit)
    }

    // ------------------------------------------------------------------
    // Questions
    // ------------------------------------------------------------------

    /// The user message to send a collaborator: the prompt followed by the
    /// most recent memory notes.
    #[must_use]
    pub fn chat_context(&self, prompt: &str) -> String {
        let recent = self.memory.recent(self.context_memories);
        if recent.is_empty() {
            return prompt.to_string();
        }
        let notes: Vec<&str> = recent.iter().map(|m| m.note.as_str()).collect();
        format!("{prompt} Recent memories: {}", notes.join(" | "))
    }

    /// A locally generated answer.
    pub fn fallback_answer(&mut self, prompt: &str) -> Answer {
        Answer::new(
            fallback::fallback_reply(prompt, &mut *self.rng),
            AnswerSource::Fallback,
        )
    }

    /// Store the outcome of a question as exactly one memory entry.
    pub fn record_answer(&mut self, prompt: &str, answer: &Answer) {
        let tag = answer.source.tag();
        self.remember_note(format!("Q:{prompt} -> {} ({tag})", answer.text));
        self.session.record(&format!("ask-{tag}"));
    }

    fn remember_note(&mut self, note: impl Into<String>) {
        if let Err(e) = self.memory.append(note) {
            warn!(path = %self.memory.path().display(), error = %e, "Could not save memory");
        }
    }
}
