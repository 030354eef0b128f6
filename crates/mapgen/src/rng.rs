//! Deterministic string-seeded random streams with named, order-independent forks.

use crate::error::GenerationError;

/// sfc32 stream seeded from a mixing hash of the seed string.
///
/// Every value depends only on the seed string and the number of draws so far, so the
/// same seed reproduces the same sequence on every platform. [`SeededRng::fork`] derives a
/// child from `"{seed}::{stream}"` without touching the parent's state.
#[derive(Clone, Debug)]
pub struct SeededRng {
    seed: String,
    state: [u32; 4],
}

impl SeededRng {
    pub fn new(seed: impl Into<String>) -> Self {
        let seed = seed.into();
        let state = hash_seed(&seed);
        Self { seed, state }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn fork(&self, stream: &str) -> SeededRng {
        SeededRng::new(format!("{}::{stream}", self.seed))
    }

    /// Uniform value in `[0, 1)` with 2^32 granularity.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform integer in the inclusive range spanned by `a` and `b`, in either order.
    pub fn int(&mut self, a: i32, b: i32) -> i32 {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        if high <= low {
            return low;
        }
        let span = i64::from(high) - i64::from(low) + 1;
        let offset = (self.next_f64() * span as f64).floor() as i64;
        (i64::from(low) + offset) as i32
    }

    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.int(0, (len - 1) as i32) as usize
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability.clamp(0.0, 1.0)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, GenerationError> {
        if items.is_empty() {
            return Err(GenerationError::EmptyChoice);
        }
        Ok(&items[self.index(items.len())])
    }

    /// In-place Fisher-Yates walking down from the last element.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in (1..items.len()).rev() {
            let swap_index = self.int(0, index as i32) as usize;
            items.swap(index, swap_index);
        }
    }

    fn next_u32(&mut self) -> u32 {
        let [a, b, c, d] = &mut self.state;
        let t = a.wrapping_add(*b).wrapping_add(*d);
        *d = d.wrapping_add(1);
        *a = *b ^ (*b >> 9);
        *b = c.wrapping_add(*c << 3);
        *c = c.rotate_left(21).wrapping_add(t);
        t
    }
}

fn hash_seed(seed: &str) -> [u32; 4] {
    let mut h1: u32 = 0x9e37_79b9;
    let mut h2: u32 = 0x243f_6a88;
    let mut h3: u32 = 0xb7e1_5162;
    let mut h4: u32 = 0xdead_beef;

    for code in seed.encode_utf16().map(u32::from) {
        h1 = (h1 ^ code).wrapping_mul(0x85eb_ca6b);
        h2 = (h2 ^ code).wrapping_mul(0xc2b2_ae35);
        h3 = (h3 ^ code).wrapping_mul(0x27d4_eb2f);
        h4 = (h4 ^ code).wrapping_mul(0x1656_67b1);
    }

    [
        (h1 ^ (h1 >> 16)).wrapping_mul(0x85eb_ca6b),
        (h2 ^ (h2 >> 13)).wrapping_mul(0xc2b2_ae35),
        (h3 ^ (h3 >> 16)).wrapping_mul(0x27d4_eb2f),
        (h4 ^ (h4 >> 13)).wrapping_mul(0x1656_67b1),
    ]
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn draws(rng: &mut SeededRng, count: usize) -> Vec<f64> {
        (0..count).map(|_| rng.next_f64()).collect()
    }

    #[test]
    fn raw_stream_is_pinned_for_known_seeds() {
        let mut rng = SeededRng::new("town-1");
        let words: Vec<u32> = (0..3).map(|_| rng.next_u32()).collect();
        assert_eq!(
            words,
            vec![3_463_969_473, 4_116_127_031, 1_573_856_475],
            "update pinned words only when the hash or generator intentionally changes"
        );

        let mut empty = SeededRng::new("");
        assert_eq!(empty.next_u32(), 1_896_751_115);
        assert_eq!(empty.next_u32(), 2_896_332_675);
    }

    #[test]
    fn int_sequence_is_pinned() {
        let mut rng = SeededRng::new("town-1");
        let rolls: Vec<i32> = (0..8).map(|_| rng.int(1, 6)).collect();
        assert_eq!(rolls, vec![5, 6, 3, 6, 2, 3, 1, 6]);
    }

    #[test]
    fn fork_matches_fresh_stream_with_joined_seed() {
        let parent = SeededRng::new("seed-x");
        let mut forked = parent.fork("a");
        let mut fresh = SeededRng::new("seed-x::a");
        assert_eq!(draws(&mut forked, 32), draws(&mut fresh, 32));
    }

    #[test]
    fn sibling_forks_do_not_affect_each_other() {
        let parent = SeededRng::new("seed-x");
        let mut a_alone = parent.fork("a");
        let expected = draws(&mut a_alone, 16);

        let parent = SeededRng::new("seed-x");
        let mut b = parent.fork("b");
        draws(&mut b, 5);
        let mut a_after_b = parent.fork("a");
        assert_eq!(draws(&mut a_after_b, 16), expected);
    }

    #[test]
    fn fork_does_not_consume_parent() {
        let mut untouched = SeededRng::new("parent");
        let mut forking = SeededRng::new("parent");
        let _child = forking.fork("child");
        assert_eq!(draws(&mut forking, 8), draws(&mut untouched, 8));
    }

    #[test]
    fn int_is_order_independent_and_degenerate_ranges_collapse() {
        let mut forward = SeededRng::new("order");
        let mut reverse = SeededRng::new("order");
        for _ in 0..50 {
            assert_eq!(forward.int(3, 9), reverse.int(9, 3));
        }
        let mut rng = SeededRng::new("order");
        assert_eq!(rng.int(4, 4), 4);
    }

    #[test]
    fn chance_clamps_probability() {
        let mut rng = SeededRng::new("chance");
        for _ in 0..100 {
            assert!(!rng.chance(-1.0));
            assert!(rng.chance(2.0));
        }
    }

    #[test]
    fn pick_on_empty_slice_is_an_error() {
        let mut rng = SeededRng::new("pick");
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), Err(GenerationError::EmptyChoice));
        assert_eq!(rng.pick(&[7_u8]), Ok(&7));
    }

    #[test]
    fn shuffle_is_a_deterministic_permutation() {
        let mut first: Vec<u32> = (0..20).collect();
        let mut second = first.clone();
        SeededRng::new("shuffle").shuffle(&mut first);
        SeededRng::new("shuffle").shuffle(&mut second);
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]
        #[test]
        fn int_stays_inside_inclusive_bounds(
            seed in "[a-z0-9:-]{0,16}",
            a in -1000_i32..1000,
            b in -1000_i32..1000,
        ) {
            let mut rng = SeededRng::new(seed);
            for _ in 0..16 {
                let value = rng.int(a, b);
                prop_assert!(value >= a.min(b) && value <= a.max(b));
            }
        }

        #[test]
        fn next_f64_is_in_unit_interval(seed in ".{0,24}") {
            let mut rng = SeededRng::new(seed);
            for _ in 0..64 {
                let value = rng.next_f64();
                prop_assert!((0.0..1.0).contains(&value));
            }
        }
    }
}
