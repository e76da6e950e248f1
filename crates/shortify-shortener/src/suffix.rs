use rand::Rng;
use shortify_core::base62::ALPHABET;
use shortify_core::shortcode::SUFFIX_LENGTH;

/// Source of the random tail appended to every short code.
///
/// Implementations are pure generators that don't interact with storage.
/// Each call yields [`SUFFIX_LENGTH`] base62 digit values (`0..62`).
pub trait SuffixGenerator: Send + Sync + 'static {
    fn generate(&self) -> [u8; SUFFIX_LENGTH];
}

/// Draws every suffix digit uniformly from the thread-local RNG.
///
/// The suffix is not a secret; it only makes codes harder to enumerate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSuffix;

impl SuffixGenerator for RandomSuffix {
    fn generate(&self) -> [u8; SUFFIX_LENGTH] {
        let mut rng = rand::rng();
        std::array::from_fn(|_| rng.random_range(0..ALPHABET.len() as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn digits_stay_in_alphabet() {
        let generator = RandomSuffix;
        for _ in 0..1_000 {
            assert!(generator
                .generate()
                .iter()
                .all(|&d| usize::from(d) < ALPHABET.len()));
        }
    }

    #[test]
    fn suffixes_vary_across_calls() {
        let generator = RandomSuffix;
        let seen: HashSet<_> = (0..100).map(|_| generator.generate()).collect();
        // 62^4 possible suffixes; 100 draws colliding down to a handful is
        // effectively impossible.
        assert!(seen.len() > 90);
    }
}
