use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const TWO_OF_CLUBS: Card = Card::new(Rank::Two, Suit::Clubs);
    pub const QUEEN_OF_SPADES: Card = Card::new(Rank::Queen, Suit::Spades);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn is_penalty(self) -> bool {
        matches!(self.suit, Suit::Hearts) || self.is_queen_of_spades()
    }

    pub const fn is_queen_of_spades(self) -> bool {
        matches!(self.rank, Rank::Queen) && matches!(self.suit, Suit::Spades)
    }

    pub fn penalty_value(self) -> u8 {
        if self.is_queen_of_spades() {
            13
        } else if self.suit == Suit::Hearts {
            1
        } else {
            0
        }
    }

    /// Suit first, then rank. Only meaningful for laying out a hand.
    pub fn display_cmp(&self, other: &Card) -> Ordering {
        self.suit.cmp(&other.suit).then(self.rank.cmp(&other.rank))
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display_cmp(other)
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCardError {
    Empty,
    UnknownRank(String),
    UnknownSuit(String),
}

impl fmt::Display for ParseCardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCardError::Empty => write!(f, "empty card token"),
            ParseCardError::UnknownRank(token) => write!(f, "unknown rank in {token:?}"),
            ParseCardError::UnknownSuit(token) => write!(f, "unknown suit in {token:?}"),
        }
    }
}

impl std::error::Error for ParseCardError {}

/// Parses `<rank><suit>` tokens such as `10♣`, `QS` or `2h`.
impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let last = token.chars().last().ok_or(ParseCardError::Empty)?;
        let (rank_part, suit_part) = token.split_at(token.len() - last.len_utf8());
        let suit = Suit::from_token(suit_part)
            .ok_or_else(|| ParseCardError::UnknownSuit(token.to_string()))?;
        let rank = Rank::from_token(rank_part)
            .ok_or_else(|| ParseCardError::UnknownRank(token.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

/// Reads the suit-switching shorthand used to write hands by hand:
/// `"H 10 2 C A"` is `[10H, 2H, AC]`. Suit tokens change the current suit
/// (Hearts until the first one), bare ranks emit a card, and full card tokens
/// are accepted as-is.
pub fn parse_cards(text: &str) -> Result<Vec<Card>, ParseCardError> {
    let mut suit = Suit::Hearts;
    let mut cards = Vec::new();
    for token in text.split_whitespace() {
        if let Some(next) = Suit::from_token(token) {
            suit = next;
        } else if let Some(rank) = Rank::from_token(token) {
            cards.push(Card::new(rank, suit));
        } else {
            cards.push(token.parse()?);
        }
    }
    Ok(cards)
}
