use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Letter used in detector labels
    pub fn letter(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }

    pub fn from_letter(c: char) -> Option<Suit> {
        match c.to_ascii_uppercase() {
            'C' => Some(Suit::Clubs),
            'D' => Some(Suit::Diamonds),
            'H' => Some(Suit::Hearts),
            'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Hearts => "Hearts",
            Suit::Spades => "Spades",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Suit {
    type Err = ParseSuitError;

    /// Accepts the suit letter or the full name, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(suit) = Suit::from_letter(c) {
                return Ok(suit);
            }
        }
        Suit::ALL
            .into_iter()
            .find(|suit| suit.to_string().eq_ignore_ascii_case(t))
            .ok_or_else(|| ParseSuitError(s.to_string()))
    }
}

/// Card ranks in ascending order; the derived `Ord` is the trick order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Label token as printed by the detector
    pub fn token(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    pub fn from_token(token: &str) -> Option<Rank> {
        Rank::ALL
            .into_iter()
            .find(|r| r.token().eq_ignore_ascii_case(token))
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }
}

/// Renders the normalized detector label, e.g. `10D` or `KC`.
impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.letter())
    }
}

/// Parses `<rank><suit-letter>`: everything but the last character is the
/// rank, the last character is the suit.
impl std::str::FromStr for Card {
    type Err = ParseCardError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let t = label.trim();
        let invalid = || ParseCardError(label.to_string());
        let (split, suit_char) = t.char_indices().last().ok_or_else(invalid)?;
        let suit = Suit::from_letter(suit_char).ok_or_else(invalid)?;
        let rank = Rank::from_token(&t[..split]).ok_or_else(invalid)?;
        Ok(Card::new(suit, rank))
    }
}

/// Return a standard 52 card deck
pub fn deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for &suit in &Suit::ALL {
        for &rank in &Rank::ALL {
            cards.push(Card::new(suit, rank));
        }
    }
    cards
}

/// Shuffle a deck of cards in place
pub fn shuffle<R: rand::Rng + ?Sized>(deck: &mut [Card], rng: &mut R) {
    use rand::seq::SliceRandom;
    deck.shuffle(rng);
}

pub mod detection;
pub mod error;
pub mod overlay;
pub mod round;
pub mod session;
pub mod simulate;
pub mod trick;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::{DetectionError, ParseCardError, ParseSuitError, TrickError};
