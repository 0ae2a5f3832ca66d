//! Random draw helpers shared by the sampling routines.
//!
//! Every draw consumes exactly one `next_u32()` from the generator so that a
//! seeded search is reproducible draw for draw.

use crate::bitvect::Word;
use rand::Rng;

/// 50/50 branch: true when the next draw is even.
///
/// # Examples
///
/// ```
/// use bvsls::utils::coin_flip;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let heads = (0..1000).filter(|_| coin_flip(&mut rng)).count();
/// assert!(heads > 400 && heads < 600);
/// ```
#[inline]
pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.next_u32() % 2 == 0
}

/// A full word of random bits.
#[inline]
pub fn random_bits<R: Rng + ?Sized>(rng: &mut R) -> Word {
    rng.next_u32()
}

/// Uniform-ish draw in `[0, n)` by reduction; `n` must be non-zero.
///
/// # Examples
///
/// ```
/// use bvsls::utils::rand_below;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// for n in 1..20 {
///     assert!(rand_below(n, &mut rng) < n);
/// }
/// ```
#[inline]
pub fn rand_below<R: Rng + ?Sized>(n: u32, rng: &mut R) -> u32 {
    debug_assert!(n > 0);
    rng.next_u32() % n
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_rand_below_one() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(rand_below(1, &mut rng), 0);
        }
    }

    #[test]
    fn test_draws_deterministic() {
        let mut rng1 = rand::rngs::StdRng::seed_from_u64(42);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(42);

        let a: Vec<Word> = (0..16).map(|_| random_bits(&mut rng1)).collect();
        let b: Vec<Word> = (0..16).map(|_| random_bits(&mut rng2)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_coin_flip_both_sides() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let flips: Vec<bool> = (0..64).map(|_| coin_flip(&mut rng)).collect();
        assert!(flips.iter().any(|&f| f));
        assert!(flips.iter().any(|&f| !f));
    }
}
