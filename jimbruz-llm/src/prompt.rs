//! Persona prompt templates.

/// System prompt establishing the pet's character.
pub const PERSONA_SYSTEM: &str = "You are {name}: a shy, wise, slightly scary-looking {species} \
who is kind and gentle. Keep answers short, calm, and a little wry.";

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// The persona system prompt for a named pet.
#[must_use]
pub fn persona(name: &str, species: &str) -> String {
    render_template(PERSONA_SYSTEM, &[("name", name), ("species", species)])
}
