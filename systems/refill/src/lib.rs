#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic group generator that repopulates the drained queue.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotfall_core::{
    Command, Event, GroupSpec, GroupSpecError, PieceColor, PieceSpec, QueueSlot, Slot,
    MAX_GROUP_PIECES,
};
use tracing::error;

/// Configuration parameters required to construct the refill system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    min_pieces: usize,
    max_pieces: usize,
}

impl Config {
    /// Creates a configuration generating groups of 1 to 4 pieces.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            min_pieces: 1,
            max_pieces: MAX_GROUP_PIECES,
        }
    }

    /// Restricts generated group sizes to `min..=max`, clamped to `1..=4`.
    #[must_use]
    pub fn with_piece_range(mut self, min: usize, max: usize) -> Self {
        let min = min.clamp(1, MAX_GROUP_PIECES);
        self.min_pieces = min;
        self.max_pieces = max.clamp(min, MAX_GROUP_PIECES);
        self
    }
}

/// Pure system that answers refill requests with fresh groups.
#[derive(Debug)]
pub struct Refill {
    rng: ChaCha8Rng,
    min_pieces: usize,
    max_pieces: usize,
}

impl Refill {
    /// Creates a new refill system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            min_pieces: config.min_pieces,
            max_pieces: config.max_pieces,
        }
    }

    /// Emits one fill command per empty queue slot when a refill was requested.
    pub fn handle(&mut self, events: &[Event], empty_slots: &[QueueSlot], out: &mut Vec<Command>) {
        if !events.iter().any(|event| matches!(event, Event::RefillNeeded)) {
            return;
        }

        for slot in empty_slots {
            match self.generate_group() {
                Ok(group) => out.push(Command::FillQueueSlot { slot: *slot, group }),
                Err(reason) => error!(slot = slot.get(), %reason, "generated group is invalid"),
            }
        }
    }

    /// Draws a group: random size, shuffled distinct facings, random colours.
    pub fn generate_group(&mut self) -> Result<GroupSpec, GroupSpecError> {
        let count = self.rng.gen_range(self.min_pieces..=self.max_pieces);
        let mut facings = Slot::ALL;
        facings.shuffle(&mut self.rng);

        let pieces = facings
            .iter()
            .take(count)
            .map(|facing| PieceSpec::new(*facing, self.next_color()))
            .collect();
        GroupSpec::new(pieces)
    }

    fn next_color(&mut self) -> PieceColor {
        PieceColor::ALL[self.rng.gen_range(0..PieceColor::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_range_is_clamped() {
        let config = Config::new(7).with_piece_range(0, 9);
        assert_eq!((config.min_pieces, config.max_pieces), (1, 4));

        let inverted = Config::new(7).with_piece_range(3, 2);
        assert_eq!((inverted.min_pieces, inverted.max_pieces), (3, 3));
    }

    #[test]
    fn clamped_ranges_always_yield_valid_groups() {
        for (min, max) in [(0, 0), (0, 9), (4, 4), (9, 1)] {
            let mut refill = Refill::new(Config::new(5).with_piece_range(min, max));
            for _ in 0..64 {
                let group = refill.generate_group().expect("clamped range yields a valid group");
                assert!((refill.min_pieces..=refill.max_pieces).contains(&group.len()));
            }
        }
    }

    #[test]
    fn fixed_range_produces_fixed_sizes() {
        let mut refill = Refill::new(Config::new(11).with_piece_range(2, 2));
        for _ in 0..32 {
            assert_eq!(refill.generate_group().map(|group| group.len()), Ok(2));
        }
    }
}
