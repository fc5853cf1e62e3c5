//! Caption post-processing: tone templates, emoji decoration and hashtags.
//!
//! Everything here is pure apart from the random source, which callers pass
//! in explicitly (`*_with_rng`) or take from the thread-local generator.
//!
//! ```rust
//! use rand::SeedableRng;
//! use tonecap_core::style::{ToneMode, ToneStylist};
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let styled = ToneStylist::default().style_with_rng(
//!     "a laptop on a desk.",
//!     Some(ToneMode::Professional),
//!     &mut rng,
//! );
//! assert_eq!(styled, "A laptop on a desk. A clear representation of the subject matter.");
//! ```

pub mod emoji;
pub mod hashtag;
pub mod tone;

pub use emoji::{pick_emojis, EMOJI_POOL};
pub use hashtag::{HashtagCategory, HashtagMatcher, CATEGORIES, FALLBACK_HASHTAGS, MAX_HASHTAGS};
pub use tone::{normalize_caption, ToneMode, ToneStylist, UnknownTone};
