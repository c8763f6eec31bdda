//! Portfolio slug generation.
//!
//! Slugs are globally unique. Generic portfolio names get a friendly
//! adjective-noun slug instead of a slugified literal; collisions are
//! retried with numeric suffixes and finally a random suffix.

use rand::seq::IndexedRandom;
use rand::Rng;

/// How many numeric-suffix attempts are made before the random fallback.
pub const MAX_SLUG_ATTEMPTS: u32 = 10;

/// Maximum slug length.
const MAX_SLUG_LEN: usize = 64;

/// Portfolio names that should not be slugified literally.
const GENERIC_NAMES: [&str; 5] = [
    "new portfolio",
    "untitled",
    "portfolio",
    "my portfolio",
    "untitled portfolio",
];

const ADJECTIVES: [&str; 30] = [
    "creative", "modern", "bold", "elegant", "minimal", "vibrant", "sleek", "dynamic",
    "polished", "innovative", "artistic", "professional", "clever", "unique", "bright",
    "fresh", "smart", "swift", "cosmic", "digital", "stellar", "vivid", "urban", "serene",
    "radiant", "quantum", "nexus", "prime", "apex", "fusion",
];

const NOUNS: [&str; 30] = [
    "studio", "portfolio", "showcase", "gallery", "space", "works", "labs", "design",
    "creative", "hub", "project", "collection", "archive", "profile", "realm", "vision",
    "craft", "canvas", "forge", "atelier", "workshop", "vault", "sphere", "nexus", "core",
    "base", "zone", "deck", "grid", "matrix",
];

/// A random `adjective-noun` slug, e.g. `"creative-studio"`.
pub fn generate_friendly_slug() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES.choose(&mut rng).expect("non-empty list");
    let noun = NOUNS.choose(&mut rng).expect("non-empty list");
    format!("{adjective}-{noun}")
}

/// Base slug for a portfolio name.
///
/// Generic names ("Untitled Portfolio", "New Portfolio", empty, ...) get
/// a friendly preset; everything else is slugified: lowercase,
/// non-alphanumeric runs collapse to `-`, trimmed, capped at 64 chars.
pub fn create_base_slug(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() || GENERIC_NAMES.contains(&trimmed.to_lowercase().as_str()) {
        return generate_friendly_slug();
    }
    slugify(trimmed)
}

/// `attempt` 0 returns the base unchanged; attempt `n` returns
/// `"{base}-{n}"` (`studio`, `studio-1`, `studio-2`, ...).
pub fn generate_slug_with_suffix(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

/// A 5-character lowercase alphanumeric suffix for the last-ditch retry.
pub fn random_suffix() -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..5)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = false;

    for c in name.to_lowercase().chars() {
        // Apostrophes drop out entirely ("Jane's" -> "janes").
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_dash = false;
        } else if !last_was_dash && !slug.is_empty() {
            slug.push('-');
            last_was_dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(MAX_SLUG_LEN);
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}
