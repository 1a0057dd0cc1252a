//! Synthetic detector output for demos and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::detection::{Detection, FrameDetections};
use crate::round::TRICKS_PER_ROUND;
use crate::trick::PLAYERS;
use crate::{deck, shuffle, Card};

/// Labels a real detector tends to emit for things that are not cards.
const NOISE_LABELS: [&str; 3] = ["joker", "back", "1X"];

/// Deals a shuffled deck and plays it out as a camera would see it: every
/// frame shows all cards of the trick in progress, frames repeat, and some
/// carry a spurious label.
pub struct Simulator {
    rng: StdRng,
    /// Upper bound on identical frames per played card.
    pub max_repeats: usize,
    /// Chance that a frame carries a noise label.
    pub noise: f64,
}

impl Simulator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_repeats: 3,
            noise: 0.1,
        }
    }

    /// Cards of `tricks` tricks in play order, four per trick.
    pub fn deal(&mut self, tricks: usize) -> Vec<Card> {
        let mut cards = deck();
        shuffle(&mut cards, &mut self.rng);
        cards.truncate(tricks.min(TRICKS_PER_ROUND) * PLAYERS);
        cards
    }

    pub fn frames_for(&mut self, cards: &[Card]) -> Vec<FrameDetections> {
        let noise = if self.noise.is_nan() {
            0.0
        } else {
            self.noise.clamp(0.0, 1.0)
        };
        let mut frames = Vec::new();
        for trick in cards.chunks(PLAYERS) {
            for shown in 1..=trick.len() {
                let repeats = self.rng.gen_range(1..=self.max_repeats.max(1));
                for _ in 0..repeats {
                    let mut detections: Vec<Detection> = trick[..shown]
                        .iter()
                        .map(|c| Detection::with_confidence(c.to_string(), self.rng.gen_range(0.5..1.0)))
                        .collect();
                    if self.rng.gen_bool(noise) {
                        let label = NOISE_LABELS[self.rng.gen_range(0..NOISE_LABELS.len())];
                        detections.push(Detection::with_confidence(label, self.rng.gen_range(0.3..0.6)));
                    }
                    frames.push(FrameDetections::new(detections));
                }
            }
        }
        frames
    }

    /// Deal and render `tricks` tricks in one go.
    pub fn deal_round(&mut self, tricks: usize) -> (Vec<Card>, Vec<FrameDetections>) {
        let cards = self.deal(tricks);
        let frames = self.frames_for(&cards);
        (cards, frames)
    }
}
