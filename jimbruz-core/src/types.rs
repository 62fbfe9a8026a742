//! Core type definitions for the Jimbruz mood model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound shared by every stat.
pub const STAT_MIN: f32 = 0.0;
/// Upper bound shared by every stat.
pub const STAT_MAX: f32 = 10.0;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// The three bounded mood attributes.
///
/// Every field stays within [`STAT_MIN`]..=[`STAT_MAX`] once [`PetState::clamp`]
/// has run; [`crate::Pet`] clamps after each mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PetState {
    /// How rested the pet is.
    pub energy: f32,
    /// How cheerful the pet is.
    pub happiness: f32,
    /// How much the pet trusts you. Starts low.
    pub trust: f32,
}

impl PetState {
    /// Create a state, clamping every stat into range.
    #[must_use]
    pub fn new(energy: f32, happiness: f32, trust: f32) -> Self {
        let mut state = Self {
            energy,
            happiness,
            trust,
        };
        state.clamp();
        state
    }

    /// Pull every stat back into `[0, 10]`.
    pub fn clamp(&mut self) {
        self.energy = clamp_stat(self.energy);
        self.happiness = clamp_stat(self.happiness);
        self.trust = clamp_stat(self.trust);
    }

    /// The mood label for these stats.
    #[must_use]
    pub fn mood(&self) -> Mood {
        Mood::from_state(self)
    }
}

impl Default for PetState {
    fn default() -> Self {
        Self {
            energy: 5.0,
            happiness: 3.0,
            trust: 1.0,
        }
    }
}

fn clamp_stat(value: f32) -> f32 {
    // NaN would slip through `clamp`; treat it as the floor.
    if value.is_nan() {
        STAT_MIN
    } else {
        value.clamp(STAT_MIN, STAT_MAX)
    }
}

// ---------------------------------------------------------------------------
// Mood
// ---------------------------------------------------------------------------

/// Mood label derived from a [`PetState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// Trust is high enough that nothing else matters.
    Friendly,
    /// Cheerful, though not yet trusting.
    Content,
    /// Running low on energy.
    Tired,
    /// The default: polite, wary, elsewhere.
    Distant,
}

impl Mood {
    /// Derive the mood by priority: trust, then happiness, then energy.
    #[must_use]
    pub fn from_state(state: &PetState) -> Self {
        if state.trust >= 6.0 {
            Self::Friendly
        } else if state.happiness >= 7.0 {
            Self::Content
        } else if state.energy <= 2.0 {
            Self::Tired
        } else {
            Self::Distant
        }
    }

    /// Lowercase label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Content => "content",
            Self::Tired => "tired",
            Self::Distant => "distant",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// Which branch a stat operation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    /// Food was eaten.
    Accepted,
    /// Food was sniffed at and declined.
    Refused,
    /// A gentle romp happened.
    Played,
    /// Trust too low to play; the pet hid.
    TooShy,
    /// Energy too low to play.
    TooTired,
    /// Slept and restored energy.
    Slept,
    /// A user-supplied note was stored.
    Remembered,
}

/// Outcome of a pet operation: the branch taken plus what to show the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Which branch ran.
    pub kind: ReactionKind,
    /// Human-readable description.
    pub message: String,
}

impl Reaction {
    /// Create a new reaction.
    #[must_use]
    pub fn new(kind: ReactionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Snapshot returned by [`crate::Pet::status`].
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    /// Pet name.
    pub name: String,
    /// Pet species.
    pub species: String,
    /// Stats at the time of the call.
    pub state: PetState,
    /// Mood derived from `state`.
    pub mood: Mood,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} the {} — Energy: {:.1}, Happiness: {:.1}, Trust: {:.1} ({})",
            self.name,
            self.species,
            self.state.energy,
            self.state.happiness,
            self.state.trust,
            self.mood
        )
    }
}

/// Where an answer to `ask` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    /// The external chat-completion service.
    Collaborator,
    /// The local keyword/random fallback.
    Fallback,
}

impl AnswerSource {
    /// Short tag used in memory notes and session events.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Collaborator => "ai",
            Self::Fallback => "fallback",
        }
    }
}

/// A reply to a free-text question.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// The reply text. Never empty.
    pub text: String,
    /// Who produced it.
    pub source: AnswerSource,
}

impl Answer {
    /// Create a new answer.
    #[must_use]
    pub fn new(text: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_matches_fresh_pet() {
        let state = PetState::default();
        assert!((state.energy - 5.0).abs() < f32::EPSILON);
        assert!((state.happiness - 3.0).abs() < f32::EPSILON);
        assert!((state.trust - 1.0).abs() < f32::EPSILON);
        assert_eq!(state.mood(), Mood::Distant);
    }

    #[test]
    fn new_clamps_out_of_range_values() {
        let state = PetState::new(-3.0, 42.0, f32::NAN);
        assert!((state.energy - STAT_MIN).abs() < f32::EPSILON);
        assert!((state.happiness - STAT_MAX).abs() < f32::EPSILON);
        assert!((state.trust - STAT_MIN).abs() < f32::EPSILON);
    }

    #[test]
    fn mood_priority_order() {
        // Trust wins even when every other rule would also match.
        assert_eq!(PetState::new(1.0, 9.0, 6.0).mood(), Mood::Friendly);
        assert_eq!(PetState::new(1.0, 7.0, 5.9).mood(), Mood::Content);
        assert_eq!(PetState::new(2.0, 6.9, 0.0).mood(), Mood::Tired);
        assert_eq!(PetState::new(2.1, 6.9, 5.9).mood(), Mood::Distant);
    }

    #[test]
    fn status_display_reads_naturally() {
        let status = Status {
            name: "Jimbruz".into(),
            species: "Snow Beast".into(),
            state: PetState::default(),
            mood: Mood::Distant,
        };
        assert_eq!(
            status.to_string(),
            "Jimbruz the Snow Beast — Energy: 5.0, Happiness: 3.0, Trust: 1.0 (distant)"
        );
    }

    #[test]
    fn answer_source_tags() {
        assert_eq!(AnswerSource::Collaborator.tag(), "ai");
        assert_eq!(AnswerSource::Fallback.tag(), "fallback");
    }
}
