//! Tone presets and the stylist that applies them to raw captions.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::emoji::pick_emojis;
use super::hashtag::HashtagMatcher;

/// A named style preset controlling phrasing, emoji count and hashtags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMode {
    Casual,
    Professional,
    Promotional,
    Friendly,
    Informative,
}

impl ToneMode {
    /// All tones, in menu order (1-5).
    pub const ALL: [ToneMode; 5] = [
        ToneMode::Casual,
        ToneMode::Professional,
        ToneMode::Promotional,
        ToneMode::Friendly,
        ToneMode::Informative,
    ];

    /// Lowercase identifier, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneMode::Casual => "casual",
            ToneMode::Professional => "professional",
            ToneMode::Promotional => "promotional",
            ToneMode::Friendly => "friendly",
            ToneMode::Informative => "informative",
        }
    }

    /// Human-facing label for menus.
    pub fn label(&self) -> &'static str {
        match self {
            ToneMode::Casual => "Casual",
            ToneMode::Professional => "Professional",
            ToneMode::Promotional => "Promotional",
            ToneMode::Friendly => "Friendly",
            ToneMode::Informative => "Informative",
        }
    }

    /// One-line description of the tone.
    pub fn description(&self) -> &'static str {
        match self {
            ToneMode::Casual => "Relaxed, witty captions with a light vibe",
            ToneMode::Professional => "Polished and business-ready language",
            ToneMode::Promotional => "Bold call-to-action with hashtags",
            ToneMode::Friendly => "Warm, upbeat energy for everyday sharing",
            ToneMode::Informative => "Clear, descriptive explanation of the scene",
        }
    }

    /// Resolve a numeric menu choice ("1".."5"). Anything else is `None`.
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(ToneMode::Casual),
            "2" => Some(ToneMode::Professional),
            "3" => Some(ToneMode::Promotional),
            "4" => Some(ToneMode::Friendly),
            "5" => Some(ToneMode::Informative),
            _ => None,
        }
    }

    /// Number of emoji this tone draws.
    pub fn emoji_count(&self) -> usize {
        match self {
            ToneMode::Friendly | ToneMode::Casual | ToneMode::Promotional => 2,
            ToneMode::Professional | ToneMode::Informative => 1,
        }
    }
}

impl fmt::Display for ToneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a tone name outside the five presets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tone '{0}' (expected casual, professional, promotional, friendly or informative)")]
pub struct UnknownTone(pub String);

impl FromStr for ToneMode {
    type Err = UnknownTone;

    /// Exact, lowercase match. "Casual" is not a tone, mirroring the
    /// case-sensitive comparison the web form relies on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToneMode::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTone(s.to_string()))
    }
}

/// Trim, strip trailing periods and capitalize the first letter.
///
/// Only the first character changes case; the rest keeps its casing, so
/// "a trip to NYC" becomes "A trip to NYC".
///
/// Idempotent: normalizing an already-normalized caption returns it unchanged.
pub fn normalize_caption(raw: &str) -> String {
    let trimmed = raw
        .trim_start()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());

    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rewrites raw captions according to a tone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToneStylist {
    hashtags: HashtagMatcher,
}

impl ToneStylist {
    pub fn new(hashtags: HashtagMatcher) -> Self {
        Self { hashtags }
    }

    /// Style with thread-local randomness.
    pub fn style(&self, base_caption: &str, tone: Option<ToneMode>) -> String {
        self.style_with_rng(base_caption, tone, &mut rand::thread_rng())
    }

    /// Style one caption. `None` (an unrecognized tone) returns the
    /// normalized caption unchanged.
    ///
    /// Emoji and hashtags are only drawn for the templates that render them.
    pub fn style_with_rng<R: Rng + ?Sized>(
        &self,
        base_caption: &str,
        tone: Option<ToneMode>,
        rng: &mut R,
    ) -> String {
        let base = normalize_caption(base_caption);

        let Some(tone) = tone else {
            return base;
        };

        match tone {
            ToneMode::Friendly => {
                let emojis = pick_emojis(tone.emoji_count(), rng);
                format!("So cool! {base}! {emojis}")
            }
            ToneMode::Casual => {
                let emojis = pick_emojis(tone.emoji_count(), rng);
                format!("Just vibing — {base}! {emojis}")
            }
            ToneMode::Promotional => {
                let hashtags = self.hashtags.select(&base, rng);
                format!("{base}\nJoin the movement.\n{hashtags}")
            }
            ToneMode::Professional => {
                format!("{base}. A clear representation of the subject matter.")
            }
            ToneMode::Informative => {
                format!("This image illustrates {base}, highlighting key elements.")
            }
        }
    }
}
