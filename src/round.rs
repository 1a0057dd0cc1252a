use log::info;
use serde::Serialize;

use crate::trick::{Slot, TrickEvaluator, TrickState, PLAYERS};
use crate::{Card, Suit, TrickError};

/// 52 cards dealt to four players.
pub const TRICKS_PER_ROUND: usize = 13;

/// Settings fixed for a whole round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundConfig {
    pub trump: Suit,
    /// Seat that leads the first trick.
    pub first_leader: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            trump: Suit::Diamonds,
            first_leader: 0,
        }
    }
}

/// A finished trick together with the seats involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedTrick {
    pub leader: usize,
    pub cards: Vec<Card>,
    pub winner: Slot,
    pub winner_seat: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    pub trump: Suit,
    pub tricks: Vec<CompletedTrick>,
    /// Tricks taken by seats 0/2 and 1/3.
    pub team_tricks: [usize; 2],
}

/// Owns the trump designation and the tricks finished so far in a round.
pub struct RoundController {
    evaluator: TrickEvaluator,
    leader: usize,
    history: Vec<CompletedTrick>,
    team_tricks: [usize; 2],
}

impl RoundController {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            evaluator: TrickEvaluator::new(config.trump),
            leader: config.first_leader % PLAYERS,
            history: Vec::with_capacity(TRICKS_PER_ROUND),
            team_tricks: [0, 0],
        }
    }

    pub fn trump(&self) -> Suit {
        self.evaluator.trump()
    }

    pub fn evaluator(&self) -> &TrickEvaluator {
        &self.evaluator
    }

    /// Seat leading the trick in progress.
    pub fn leader(&self) -> usize {
        self.leader
    }

    /// Seat that played the card in `slot` of the current trick.
    pub fn seat_of(&self, slot: Slot) -> usize {
        (self.leader + slot.index()) % PLAYERS
    }

    pub fn start_new_trick(&self) -> TrickState {
        TrickState::new()
    }

    /// Archive a finished trick and pass the lead to its winner.
    pub fn record_completed_trick(&mut self, state: TrickState) -> Result<&CompletedTrick, TrickError> {
        let winner = match (state.is_complete(), state.winner()) {
            (true, Some(w)) => w,
            _ => return Err(TrickError::IncompleteTrick(state.played().len())),
        };
        let winner_seat = self.seat_of(winner);
        self.team_tricks[winner_seat % 2] += 1;
        info!(
            "trick {} won by {} player (seat {}) with {}",
            self.history.len() + 1,
            winner,
            winner_seat + 1,
            state.winning_card().map(|c| c.to_string()).unwrap_or_default()
        );
        self.history.push(CompletedTrick {
            leader: self.leader,
            cards: state.played().to_vec(),
            winner,
            winner_seat,
        });
        self.leader = winner_seat;
        Ok(&self.history[self.history.len() - 1])
    }

    pub fn history(&self) -> &[CompletedTrick] {
        &self.history
    }

    pub fn team_tricks(&self) -> [usize; 2] {
        self.team_tricks
    }

    /// True if `card` was played in an already finished trick of this round.
    pub fn already_played(&self, card: &Card) -> bool {
        self.history.iter().any(|t| t.cards.contains(card))
    }

    pub fn is_complete(&self) -> bool {
        self.history.len() >= TRICKS_PER_ROUND
    }

    pub fn report(&self) -> RoundReport {
        RoundReport {
            trump: self.trump(),
            tricks: self.history.clone(),
            team_tricks: self.team_tricks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(round: &RoundController, labels: &[&str]) -> TrickState {
        let mut state = round.start_new_trick();
        for l in labels {
            round.evaluator().apply_label(&mut state, l).unwrap();
        }
        state
    }

    #[test]
    fn new_round_has_no_history() {
        let round = RoundController::new(RoundConfig::default());
        assert_eq!(round.trump(), Suit::Diamonds);
        assert!(round.history().is_empty());
        assert_eq!(round.team_tricks(), [0, 0]);
        assert_eq!(round.leader(), 0);
    }

    #[test]
    fn incomplete_trick_is_rejected() {
        let mut round = RoundController::new(RoundConfig::default());
        let state = finished(&round, &["7C", "KC"]);
        assert_eq!(
            round.record_completed_trick(state),
            Err(TrickError::IncompleteTrick(2))
        );
        assert!(round.history().is_empty());
    }

    #[test]
    fn winner_leads_next_trick() {
        let mut round = RoundController::new(RoundConfig {
            trump: Suit::Diamonds,
            first_leader: 1,
        });
        // seat 1 leads, third card (seat 3) trumps
        let state = finished(&round, &["7C", "KC", "2D", "9C"]);
        let done = round.record_completed_trick(state).unwrap();
        assert_eq!(done.winner, Slot::Third);
        assert_eq!(done.winner_seat, 3);
        assert_eq!(round.leader(), 3);
        assert_eq!(round.team_tricks(), [0, 1]);

        // seat 3 leads, second card (seat 0) wins
        let state = finished(&round, &["4H", "AH", "2H", "3H"]);
        round.record_completed_trick(state).unwrap();
        assert_eq!(round.leader(), 0);
        assert_eq!(round.team_tricks(), [1, 1]);
    }

    #[test]
    fn already_played_checks_history_only() {
        let mut round = RoundController::new(RoundConfig::default());
        let state = finished(&round, &["7C", "KC", "2C", "9C"]);
        round.record_completed_trick(state).unwrap();
        assert!(round.already_played(&"KC".parse().unwrap()));
        assert!(!round.already_played(&"KD".parse().unwrap()));
    }

    #[test]
    fn report_serializes() {
        let mut round = RoundController::new(RoundConfig::default());
        let state = finished(&round, &["7C", "KC", "2C", "9C"]);
        round.record_completed_trick(state).unwrap();
        let json = serde_json::to_value(round.report()).unwrap();
        assert_eq!(json["trump"], "Diamonds");
        assert_eq!(json["tricks"][0]["winner"], "Second");
        assert_eq!(json["team_tricks"][1], 1);
    }
}
