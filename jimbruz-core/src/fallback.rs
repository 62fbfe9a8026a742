//! Local replies used when the chat collaborator is unavailable.
//!
//! Keyword rules are checked in order against the lowercased prompt; the
//! first match wins. Anything else gets a uniformly random generic reply.

use rand::Rng;
use rand::seq::SliceRandom;

/// Reply to anything mentioning a joke.
pub const JOKE_REPLY: &str =
    "A snow beast walks into a blizzard... and politely asks for directions.";
/// Reply to questions about the pet's name.
pub const NAME_REPLY: &str = "They call me Jimbruz. I prefer the quiet.";
/// Reply when the user sounds low.
pub const COMFORT_REPLY: &str = "Hm. Sit with me for a while. The quiet helps.";
/// Reply to a blank prompt.
pub const SILENCE_REPLY: &str = "You should say something, or I will stare into the snow.";

/// Generic replies chosen at random when no keyword matches.
pub const GENERIC_REPLIES: &[&str] = &[
    "I sense frost and faint curiosity. Go on.",
    "Hmm. That deserves a patient nod and a half-smile.",
    "I don't always answer quickly; I think slowly like the snowfall.",
];

const COMFORT_KEYWORDS: &[&str] = &["sad", "bad", "tired"];

/// Pick a local reply for `prompt`. Never returns an empty string.
#[must_use]
pub fn fallback_reply<R: Rng + ?Sized>(prompt: &str, rng: &mut R) -> String {
    let p = prompt.to_lowercase();

    if p.contains("joke") {
        return JOKE_REPLY.to_string();
    }
    if p.contains("name") {
        return NAME_REPLY.to_string();
    }
    if COMFORT_KEYWORDS.iter().any(|k| p.contains(k)) {
        return COMFORT_REPLY.to_string();
    }
    if p.trim().is_empty() {
        return SILENCE_REPLY.to_string();
    }

    GENERIC_REPLIES
        .choose(rng)
        .copied()
        .unwrap_or(SILENCE_REPLY)
        .to_string()
}
