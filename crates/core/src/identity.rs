//! Identity widget content and theme palette.

use serde::{Deserialize, Serialize};

/// Number of gradient themes in the fixed palette.
pub const THEME_COUNT: u8 = 7;

/// The seven gradient themes selectable from the identity widget.
pub const THEME_PALETTE: [&str; THEME_COUNT as usize] = [
    "from-rose-500/70 to-pink-500/70",
    "from-blue-500/70 to-cyan-500/70",
    "from-purple-500/70 to-blue-500/70",
    "from-green-500/70 to-emerald-500/70",
    "from-orange-500/70 to-red-500/70",
    "from-teal-500/70 to-blue-500/70",
    "from-neutral-500/70 to-neutral-600/70",
];

/// Index into [`THEME_PALETTE`], clamped to `0..=6`.
///
/// Out-of-range values arriving from external input (the onboarding
/// flow, stored props) are clamped, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ThemeIndex(u8);

impl ThemeIndex {
    pub fn new(raw: impl Into<i64>) -> Self {
        let raw = raw.into();
        Self(raw.clamp(0, (THEME_COUNT - 1) as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The gradient class for this theme.
    pub fn gradient(self) -> &'static str {
        THEME_PALETTE[self.0 as usize]
    }
}

impl Default for ThemeIndex {
    fn default() -> Self {
        Self(0)
    }
}

impl<'de> Deserialize<'de> for ThemeIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(ThemeIndex::new(raw))
    }
}

/// Content of the identity widget: the page owner's card.
///
/// Field names match the stored `props` JSON (camelCase).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityContent {
    pub name: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub bio: Option<String>,
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub selected_color: ThemeIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Strip a leading `@` from a handle, if present.
pub fn normalize_handle(handle: &str) -> &str {
    handle.strip_prefix('@').unwrap_or(handle)
}
