//! Canonical place identity.
//!
//! Every de-duplication decision in the planner, whether within a block,
//! within a day or across the trip, goes through [`KeyNormaliser`]. A place's
//! canonical key is, in order of preference:
//!
//! 1. `id:<id>` when it carries a non-empty provider identifier;
//! 2. `name:<normalised name>` when its name survives normalisation;
//! 3. `geo:<lat>:<lon>` rounded to four decimal places (about 11 m);
//! 4. `anon:<category>` as a last resort.

use std::fmt;

use crate::Place;

/// Generic descriptor tokens removed from names before comparison.
pub const DEFAULT_GENERIC_TOKENS: &[&str] = &[
    "tower",
    "night view",
    "night-view",
    "plaza",
    "observatory",
    "branch",
    "main entrance",
    "entrance",
];

/// Opaque identity of a place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deterministic name normalisation driven by a configurable token list.
///
/// Names are lowercased, punctuation other than `-` becomes whitespace, each
/// generic token is removed wherever it appears as a whole-word sequence and
/// the remaining words are joined by single spaces. When stripping removes
/// every word the unstripped form is kept, so a place literally called
/// "Tower" still has a name key.
///
/// # Examples
/// ```
/// use itinerant_core::KeyNormaliser;
///
/// let keys = KeyNormaliser::default();
/// assert_eq!(keys.normalise("N Seoul  TOWER"), "n seoul");
/// assert_eq!(keys.normalise("N Seoul Tower (Night View)"), "n seoul");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<String>", into = "Vec<String>")
)]
pub struct KeyNormaliser {
    tokens: Vec<String>,
    sequences: Vec<Vec<String>>,
}

impl Default for KeyNormaliser {
    fn default() -> Self {
        Self::new(DEFAULT_GENERIC_TOKENS.iter().copied())
    }
}

impl From<Vec<String>> for KeyNormaliser {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}

impl From<KeyNormaliser> for Vec<String> {
    fn from(value: KeyNormaliser) -> Self {
        value.tokens
    }
}

impl KeyNormaliser {
    /// Build a normaliser stripping the given tokens.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let mut sequences: Vec<Vec<String>> = tokens
            .iter()
            .map(|token| words(token))
            .filter(|seq| !seq.is_empty())
            .collect();
        // Longer sequences first so "main entrance" wins over "entrance".
        sequences.sort_by(|a, b| b.len().cmp(&a.len()));
        sequences.dedup();
        Self { tokens, sequences }
    }

    /// Tokens as configured.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Lowercased, whitespace-collapsed form without token stripping.
    #[must_use]
    pub fn collapse(name: &str) -> String {
        words(name).join(" ")
    }

    /// Normalise a display name for comparison.
    #[must_use]
    pub fn normalise(&self, name: &str) -> String {
        let original = words(name);
        let mut remaining = original.clone();
        for seq in &self.sequences {
            remaining = strip_sequence(remaining, seq);
        }
        if remaining.is_empty() {
            original.join(" ")
        } else {
            remaining.join(" ")
        }
    }

    /// Canonical key of `place`.
    #[must_use]
    pub fn canonical_key(&self, place: &Place) -> CanonicalKey {
        if let Some(id) = place.id.as_deref().map(str::trim)
            && !id.is_empty()
        {
            return CanonicalKey(format!("id:{id}"));
        }
        let name = self.normalise(&place.name);
        if !name.is_empty() {
            return CanonicalKey(format!("name:{name}"));
        }
        if let Some(coord) = place.valid_location() {
            return CanonicalKey(format!("geo:{:.4}:{:.4}", coord.y, coord.x));
        }
        CanonicalKey(format!("anon:{}", Self::collapse(&place.category)))
    }

    /// Every key under which `place` is recorded in a ledger.
    ///
    /// This is the canonical key plus the raw and normalised name keys, so a
    /// place listed under a different identifier but the same label is still
    /// recognised.
    #[must_use]
    pub fn identity_keys(&self, place: &Place) -> Vec<CanonicalKey> {
        let canonical = self.canonical_key(place);
        let raw = Self::collapse(&place.name);
        if raw.is_empty() {
            return vec![canonical];
        }
        let name = CanonicalKey(format!("name:{}", self.normalise(&place.name)));
        let mut keys = vec![canonical, CanonicalKey(format!("raw:{raw}"))];
        if !keys.contains(&name) {
            keys.push(name);
        }
        keys
    }
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

fn strip_sequence(words: Vec<String>, seq: &[String]) -> Vec<String> {
    if seq.is_empty() || words.len() < seq.len() {
        return words;
    }
    let mut out = Vec::with_capacity(words.len());
    let mut rest = words.as_slice();
    while !rest.is_empty() {
        if rest.starts_with(seq) {
            rest = rest.get(seq.len()..).unwrap_or_default();
            continue;
        }
        if let Some((head, tail)) = rest.split_first() {
            out.push(head.clone());
            rest = tail;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn keys() -> KeyNormaliser {
        KeyNormaliser::default()
    }

    #[rstest]
    #[case("Lotte World Tower", "lotte world")]
    #[case("  Namsan   Plaza ", "namsan")]
    #[case("Seoul Sky Observatory", "seoul sky")]
    #[case("Starbucks - Gangnam Branch", "starbucks - gangnam")]
    #[case("Gwanghwamun Main Entrance", "gwanghwamun")]
    #[case("Tower", "tower")]
    #[case("Towers of Light", "towers of light")]
    fn normalises_names(keys: KeyNormaliser, #[case] raw: &str, #[case] expected: &str) {
        assert_eq!(keys.normalise(raw), expected);
    }

    #[rstest]
    fn id_takes_precedence(keys: KeyNormaliser) {
        let place = Place::new("abc", "Anything", "museum");
        assert_eq!(keys.canonical_key(&place).as_str(), "id:abc");
    }

    #[rstest]
    fn blank_id_falls_back_to_name(keys: KeyNormaliser) {
        let place = Place::new("  ", "N Seoul Tower", "landmark");
        assert_eq!(keys.canonical_key(&place).as_str(), "name:n seoul");
    }

    #[rstest]
    fn nameless_place_uses_rounded_coordinates(keys: KeyNormaliser) {
        let place = Place::unidentified("", "park").at(37.512_345, 127.098_765);
        assert_eq!(keys.canonical_key(&place).as_str(), "geo:37.5123:127.0988");
    }

    #[rstest]
    fn nothing_known_uses_category(keys: KeyNormaliser) {
        let place = Place::unidentified("", "Street Food");
        assert_eq!(keys.canonical_key(&place).as_str(), "anon:street food");
    }

    #[rstest]
    fn label_variants_share_a_name_key(keys: KeyNormaliser) {
        let a = Place::new("1", "N Seoul Tower", "landmark");
        let b = Place::new("2", "N Seoul Tower Night View", "landmark");
        let a_keys = keys.identity_keys(&a);
        let b_keys = keys.identity_keys(&b);
        assert!(a_keys.iter().any(|k| b_keys.contains(k)));
    }

    #[rstest]
    fn custom_tokens_are_respected() {
        let keys = KeyNormaliser::new(["market"]);
        assert_eq!(keys.normalise("Gwangjang Market"), "gwangjang");
        assert_eq!(keys.normalise("Lotte World Tower"), "lotte world tower");
    }
}
