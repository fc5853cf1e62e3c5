//! Emoji decoration drawn from a fixed pool.

use rand::seq::SliceRandom;
use rand::Rng;

/// The decoration pool. Draws never repeat a symbol within one call.
pub const EMOJI_POOL: [&str; 21] = [
    "📸", "✨", "🔥", "😊", "🌟", "🚀", "💫", "🎯", "💥", "⚡", "🎉", "🥳", "😎", "🤩", "💎",
    "📈", "📊", "💰", "🏆", "🧠", "🎨",
];

/// Draw `count` distinct emoji and join them with single spaces.
///
/// `count` is clamped to the pool size.
pub fn pick_emojis<R: Rng + ?Sized>(count: usize, rng: &mut R) -> String {
    EMOJI_POOL
        .choose_multiple(rng, count.min(EMOJI_POOL.len()))
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_pool_has_no_duplicates() {
        let unique: HashSet<&str> = EMOJI_POOL.iter().copied().collect();
        assert_eq!(unique.len(), 21);
    }

    #[test]
    fn test_pick_distinct_from_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let picked = pick_emojis(2, &mut rng);
            let parts: Vec<&str> = picked.split(' ').collect();
            assert_eq!(parts.len(), 2);
            assert_ne!(parts[0], parts[1]);
            assert!(parts.iter().all(|e| EMOJI_POOL.contains(e)));
        }
    }

    #[test]
    fn test_pick_clamps_to_pool_size() {
        let mut rng = StdRng::seed_from_u64(3);
        let picked = pick_emojis(50, &mut rng);
        assert_eq!(picked.split(' ').count(), EMOJI_POOL.len());
    }

    #[test]
    fn test_pick_zero_is_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_emojis(0, &mut rng), "");
    }
}
