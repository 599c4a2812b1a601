//! Glitch Effect
//!
//! Decorative corruption of the revealed status line. Corruption is a pure
//! function of its input and the injected RNG so seeded tests can replay it.

use rand::Rng;

/// A corrupted copy of the revealed text, shown until its revert timer fires
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlitchEvent {
    /// Text shown in place of the revealed prefix
    pub corrupted: String,
    /// How many characters of the true text the copy stands in for
    pub covers: usize,
}

/// Replace each character with a random `A..=Z` with the given probability
///
/// The probability is clamped to `[0, 1]`. The result always has the same
/// number of characters as `text`.
pub fn corrupt<R: Rng>(text: &str, per_char_probability: f64, rng: &mut R) -> String {
    let p = per_char_probability.clamp(0.0, 1.0);

    text.chars()
        .map(|ch| {
            if p > 0.0 && rng.gen_bool(p) {
                rng.gen_range(b'A'..=b'Z') as char
            } else {
                ch
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_probability_is_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(corrupt("NEURAL // LINK", 0.0, &mut rng), "NEURAL // LINK");
    }

    #[test]
    fn test_full_probability_replaces_everything_with_uppercase() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = corrupt("a b-c", 1.0, &mut rng);

        assert_eq!(out.chars().count(), 5);
        assert!(out.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_preserves_char_count_for_multibyte_text() {
        let mut rng = StdRng::seed_from_u64(42);
        let text = "ÉLITE — ░▒▓";
        let out = corrupt(text, 0.5, &mut rng);
        assert_eq!(out.chars().count(), text.chars().count());
    }

    #[test]
    fn test_untouched_positions_keep_their_character() {
        let mut rng = StdRng::seed_from_u64(3);
        let text = "quantum encryption specialist";
        let out = corrupt(text, 0.1, &mut rng);

        for (orig, new) in text.chars().zip(out.chars()) {
            assert!(orig == new || new.is_ascii_uppercase());
        }
    }

    #[test]
    fn test_out_of_range_probability_is_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(corrupt("abc", -3.0, &mut rng), "abc");
        assert!(corrupt("abc", 9.0, &mut rng)
            .chars()
            .all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_same_seed_same_corruption() {
        let text = "ELITE DIGITAL OPERATIVE";
        let a = corrupt(text, 0.3, &mut StdRng::seed_from_u64(99));
        let b = corrupt(text, 0.3, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
