use log::debug;
use serde::Serialize;

use crate::{Card, Suit, TrickError};

/// Cards in one trick, one per player.
pub const PLAYERS: usize = 4;

/// Position of a card within a trick, in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Slot {
    First,
    Second,
    Third,
    Fourth,
}

impl Slot {
    pub const ALL: [Slot; PLAYERS] = [Slot::First, Slot::Second, Slot::Third, Slot::Fourth];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Slot> {
        Slot::ALL.get(idx).copied()
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Slot::First => "First",
            Slot::Second => "Second",
            Slot::Third => "Third",
            Slot::Fourth => "Fourth",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    OnePlayed,
    TwoPlayed,
    ThreePlayed,
    Complete,
}

/// Cards played so far in the current trick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrickState {
    played: Vec<Card>,
    lead_suit: Option<Suit>,
    trumps_seen: Vec<Card>,
    winner: Option<Slot>,
}

impl TrickState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> &[Card] {
        &self.played
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.lead_suit
    }

    pub fn trumps_seen(&self) -> &[Card] {
        &self.trumps_seen
    }

    /// Slot currently holding the trick; final once the trick is complete.
    pub fn winner(&self) -> Option<Slot> {
        self.winner
    }

    pub fn winning_card(&self) -> Option<Card> {
        self.winner.and_then(|s| self.card_at(s))
    }

    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.played.get(slot.index()).copied()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.played.contains(card)
    }

    pub fn phase(&self) -> Phase {
        match self.played.len() {
            0 => Phase::Empty,
            1 => Phase::OnePlayed,
            2 => Phase::TwoPlayed,
            3 => Phase::ThreePlayed,
            _ => Phase::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }
}

/// Result of feeding one card to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The card took `slot`; `winner` is the leader afterwards.
    Played {
        slot: Slot,
        winner: Slot,
        overtook: bool,
    },
    /// The fourth card was played and `winner` is final.
    Completed { winner: Slot, overtook: bool },
    /// The card was already on the table; nothing changed.
    DuplicateIgnored(Card),
}

/// Trick resolution for a fixed trump suit.
///
/// Highest card of the led suit wins unless a trump is played, in which case
/// the highest trump wins. Cards of any other suit never take the trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickEvaluator {
    trump: Suit,
}

impl TrickEvaluator {
    pub fn new(trump: Suit) -> Self {
        Self { trump }
    }

    pub fn trump(&self) -> Suit {
        self.trump
    }

    /// Parse `label` and apply it. An unparseable label leaves `state` as is.
    pub fn apply_label(&self, state: &mut TrickState, label: &str) -> Result<Transition, TrickError> {
        let card: Card = label.parse()?;
        self.apply(state, card)
    }

    pub fn apply(&self, state: &mut TrickState, card: Card) -> Result<Transition, TrickError> {
        if state.contains(&card) {
            debug!("{} already in trick, ignoring", card);
            return Ok(Transition::DuplicateIgnored(card));
        }
        if state.is_complete() {
            return Err(TrickError::TrickAlreadyComplete);
        }

        let slot = match Slot::from_index(state.played.len()) {
            Some(s) => s,
            None => return Err(TrickError::TrickAlreadyComplete),
        };
        let overtook = match state.winner.and_then(|w| state.card_at(w)) {
            None => true,
            Some(best) => self.overtakes(state, card, best),
        };

        state.played.push(card);
        if slot == Slot::First {
            state.lead_suit = Some(card.suit);
        }
        if card.suit == self.trump {
            state.trumps_seen.push(card);
        }
        if overtook {
            state.winner = Some(slot);
        }
        // `winner` is always set once a card is on the table
        let winner = state.winner.unwrap_or(Slot::First);
        debug!("{} played as {}, winner {}", card, slot, winner);

        if state.is_complete() {
            Ok(Transition::Completed { winner, overtook })
        } else {
            Ok(Transition::Played {
                slot,
                winner,
                overtook,
            })
        }
    }

    fn overtakes(&self, state: &TrickState, card: Card, best: Card) -> bool {
        if card.suit == self.trump {
            return state.trumps_seen.iter().all(|t| card.rank > t.rank);
        }
        if Some(card.suit) == state.lead_suit && state.trumps_seen.is_empty() {
            return card.rank > best.rank;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rank;

    fn play(trump: Suit, labels: &[&str]) -> TrickState {
        let eval = TrickEvaluator::new(trump);
        let mut state = TrickState::new();
        for l in labels {
            eval.apply_label(&mut state, l).unwrap();
        }
        state
    }

    #[test]
    fn empty_trick_has_no_winner() {
        let state = TrickState::new();
        assert_eq!(state.phase(), Phase::Empty);
        assert_eq!(state.winner(), None);
        assert_eq!(state.lead_suit(), None);
    }

    #[test]
    fn first_card_sets_lead_and_winner() {
        let state = play(Suit::Diamonds, &["9S"]);
        assert_eq!(state.lead_suit(), Some(Suit::Spades));
        assert_eq!(state.winner(), Some(Slot::First));
        assert_eq!(state.phase(), Phase::OnePlayed);
    }

    #[test]
    fn higher_lead_card_overtakes() {
        let state = play(Suit::Diamonds, &["7C", "KC", "AC"]);
        assert_eq!(state.winner(), Some(Slot::Third));
    }

    #[test]
    fn off_suit_never_wins() {
        let state = play(Suit::Diamonds, &["2C", "AH", "AS", "3C"]);
        assert_eq!(state.winner(), Some(Slot::Fourth));
    }

    #[test]
    fn lead_suit_after_trump_cannot_win() {
        let state = play(Suit::Diamonds, &["7C", "2D", "AC", "KC"]);
        assert_eq!(state.winner(), Some(Slot::Second));
    }

    #[test]
    fn lower_trump_does_not_overtake_higher() {
        let state = play(Suit::Diamonds, &["7C", "QD", "2D", "AC"]);
        assert_eq!(state.winner(), Some(Slot::Second));
        assert_eq!(state.trumps_seen().len(), 2);
    }

    #[test]
    fn trump_lead_competes_with_later_trumps() {
        let state = play(Suit::Diamonds, &["5D", "AS", "4D", "9D"]);
        assert_eq!(state.winner(), Some(Slot::Fourth));
        assert_eq!(state.lead_suit(), Some(Suit::Diamonds));
        assert_eq!(state.trumps_seen().len(), 3);
    }

    #[test]
    fn duplicate_card_is_ignored() {
        let eval = TrickEvaluator::new(Suit::Diamonds);
        let mut state = TrickState::new();
        eval.apply_label(&mut state, "7C").unwrap();
        eval.apply_label(&mut state, "KC").unwrap();
        let before = state.clone();
        let t = eval.apply_label(&mut state, "kc").unwrap();
        assert_eq!(t, Transition::DuplicateIgnored(Card::new(Suit::Clubs, Rank::King)));
        assert_eq!(state, before);
    }

    #[test]
    fn invalid_label_leaves_state_untouched() {
        let eval = TrickEvaluator::new(Suit::Diamonds);
        let mut state = play(Suit::Diamonds, &["7C"]);
        let before = state.clone();
        let err = eval.apply_label(&mut state, "ZZ").unwrap_err();
        assert_eq!(err, TrickError::InvalidCardLabel("ZZ".to_string()));
        assert_eq!(state, before);
    }

    #[test]
    fn fourth_card_completes_trick() {
        let eval = TrickEvaluator::new(Suit::Diamonds);
        let mut state = play(Suit::Diamonds, &["7C", "KC", "2C"]);
        let t = eval.apply_label(&mut state, "9C").unwrap();
        assert_eq!(
            t,
            Transition::Completed {
                winner: Slot::Second,
                overtook: false
            }
        );
        assert!(state.is_complete());
        assert_eq!(
            eval.apply_label(&mut state, "AC"),
            Err(TrickError::TrickAlreadyComplete)
        );
        assert_eq!(state.played().len(), 4);
    }

    #[test]
    fn duplicate_on_complete_trick_is_still_a_no_op() {
        let eval = TrickEvaluator::new(Suit::Diamonds);
        let mut state = play(Suit::Diamonds, &["7C", "KC", "2C", "9C"]);
        let t = eval.apply_label(&mut state, "9C").unwrap();
        assert!(matches!(t, Transition::DuplicateIgnored(_)));
    }

    #[test]
    fn slots_map_to_indices() {
        for (i, s) in Slot::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
            assert_eq!(Slot::from_index(i), Some(*s));
        }
        assert_eq!(Slot::from_index(4), None);
    }
}
