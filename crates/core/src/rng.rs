//! RNG module - bag-based piece generation
//!
//! A level names its piece set; the queue shuffles that set into a bag and
//! draws from the bag until it is empty, then shuffles a new one. Repeating a
//! kind in the set weights it.
//!
//! Also provides a simple LCG so the sequence is deterministic per seed.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Bag piece generator over a level's piece set
#[derive(Debug, Clone)]
pub struct PieceQueue {
    set: Vec<PieceKind>,
    bag: Vec<PieceKind>,
    bag_index: usize,
    rng: SimpleRng,
}

impl PieceQueue {
    /// Create a queue over a non-empty piece set
    pub fn new(set: &[PieceKind], seed: u32) -> Self {
        debug_assert!(!set.is_empty());
        let mut queue = Self {
            set: set.to_vec(),
            bag: Vec::with_capacity(set.len()),
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        queue.refill_bag();
        queue
    }

    fn refill_bag(&mut self) {
        self.bag.clear();
        self.bag.extend_from_slice(&self.set);
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SET: [PieceKind; 4] = [PieceKind::I, PieceKind::O, PieceKind::T, PieceKind::Bomb];

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_queue_draws_whole_bag() {
        let mut queue = PieceQueue::new(&SET, 1);
        let mut drawn: Vec<_> = (0..SET.len()).map(|_| queue.draw()).collect();
        drawn.sort();
        let mut expected = SET.to_vec();
        expected.sort();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceQueue::new(&SET, 5);
        let mut b = PieceQueue::new(&SET, 5);
        for _ in 0..20 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    proptest::proptest! {
        #[test]
        fn every_bag_is_a_permutation(seed in proptest::prelude::any::<u32>(), bags in 1usize..5) {
            let mut queue = PieceQueue::new(&SET, seed);
            let mut expected = SET.to_vec();
            expected.sort();
            for _ in 0..bags {
                let mut drawn: Vec<_> = (0..SET.len()).map(|_| queue.draw()).collect();
                drawn.sort();
                proptest::prop_assert_eq!(&drawn, &expected);
            }
        }
    }
}
