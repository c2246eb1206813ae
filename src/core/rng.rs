//! RNG module - deterministic piece generation
//!
//! Draws piece kinds uniformly with a no-immediate-repeat rule: a fresh
//! draw is rerolled until it differs from the previously generated kind.
//! This is not a 7-bag; long droughts of a kind are possible, back-to-back
//! duplicates are not.
//!
//! Built on a simple LCG so the same seed always produces the same stream.

use crate::types::{PieceKind, NEXT_QUEUE_LEN};

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
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Current internal state (usable to reproduce the stream)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Upcoming-piece generator with a fixed 3-slot lookahead
#[derive(Debug, Clone)]
pub struct NextQueue {
    /// The visible lookahead, front (next to spawn) first
    lookahead: [PieceKind; NEXT_QUEUE_LEN],
    /// Most recently generated kind, for the no-repeat rule
    last: PieceKind,
    rng: SimpleRng,
    seed: u32,
}

impl NextQueue {
    /// Create a new queue with the given seed, filling all lookahead slots
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);

        let first = Self::draw(&mut rng, None);
        let mut lookahead = [first; NEXT_QUEUE_LEN];
        let mut last = first;
        for slot in lookahead.iter_mut().skip(1) {
            last = Self::draw(&mut rng, Some(last));
            *slot = last;
        }

        Self {
            lookahead,
            last,
            rng,
            seed,
        }
    }

    /// Uniform draw, rerolled until it differs from `previous`
    fn draw(rng: &mut SimpleRng, previous: Option<PieceKind>) -> PieceKind {
        loop {
            let kind = PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize];
            if Some(kind) != previous {
                return kind;
            }
        }
    }

    /// Take the front kind and refill the vacated slot at the back
    pub fn pop(&mut self) -> PieceKind {
        let front = self.lookahead[0];
        self.lookahead.rotate_left(1);
        self.last = Self::draw(&mut self.rng, Some(self.last));
        self.lookahead[NEXT_QUEUE_LEN - 1] = self.last;
        front
    }

    /// The current lookahead, front first
    pub fn peek(&self) -> [PieceKind; NEXT_QUEUE_LEN] {
        self.lookahead
    }

    /// The seed this queue was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for NextQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_normalized() {
        let mut a = SimpleRng::new(0);
        let mut b = SimpleRng::new(1);
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_rng_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(7) < 7);
        }
    }

    #[test]
    fn test_queue_deterministic() {
        let mut a = NextQueue::new(12345);
        let mut b = NextQueue::new(12345);
        for _ in 0..50 {
            assert_eq!(a.pop(), b.pop());
        }
    }

    #[test]
    fn test_queue_no_immediate_repeat() {
        let mut queue = NextQueue::new(98765);
        let mut previous = queue.pop();
        for _ in 0..1000 {
            let next = queue.pop();
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_queue_lookahead_consistent_with_pop() {
        let mut queue = NextQueue::new(555);
        for _ in 0..20 {
            let peeked = queue.peek();
            assert_eq!(queue.pop(), peeked[0]);
            assert_eq!(queue.peek()[0], peeked[1]);
            assert_eq!(queue.peek()[1], peeked[2]);
        }
    }

    #[test]
    fn test_queue_covers_all_kinds() {
        let mut queue = NextQueue::new(31337);
        let mut seen = [false; 7];
        for _ in 0..500 {
            let kind = queue.pop();
            let idx = PieceKind::ALL.iter().position(|&k| k == kind);
            seen[idx.unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s), "all kinds should appear: {seen:?}");
    }
}
