use crate::model::card::Card;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TRICK_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    leader: Seat,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

impl Play {
    pub const fn new(card: Card, seat: Seat) -> Self {
        Self { seat, card }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickComplete,
    OutOfTurn { expected: Seat, actual: Seat },
    AlreadyPlayed(Seat),
    Empty,
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickComplete => write!(f, "trick already complete"),
            TrickError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play next but got {actual}")
            }
            TrickError::AlreadyPlayed(seat) => {
                write!(f, "{seat} has already played this trick")
            }
            TrickError::Empty => write!(f, "a trick needs at least one play"),
        }
    }
}

impl std::error::Error for TrickError {}

impl Trick {
    pub fn new(leader: Seat) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(TRICK_SIZE),
        }
    }

    /// Rebuilds a trick from recorded plays, checking clockwise order.
    pub fn from_plays(plays: &[Play]) -> Result<Self, TrickError> {
        let first = plays.first().ok_or(TrickError::Empty)?;
        let mut trick = Trick::new(first.seat);
        for play in plays {
            trick.play(play.seat, play.card)?;
        }
        Ok(trick)
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == TRICK_SIZE
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit)
    }

    pub fn last_play(&self) -> Option<&Play> {
        self.plays.last()
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.plays.iter().map(|play| play.card)
    }

    pub fn contains_heart(&self) -> bool {
        self.cards().any(|card| card.suit.is_heart())
    }

    /// Seat expected to play next; the leader while the trick is empty.
    pub fn expected_seat(&self) -> Seat {
        self.plays
            .last()
            .map(|play| play.seat.next())
            .unwrap_or(self.leader)
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.plays.iter().any(|play| play.seat == seat) {
            return Err(TrickError::AlreadyPlayed(seat));
        }

        let expected = self.expected_seat();
        if expected != seat {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        self.record(seat, card);
        Ok(())
    }

    pub(crate) fn record(&mut self, seat: Seat, card: Card) {
        self.plays.push(Play { seat, card });
    }

    /// Only a play of the leading suit with a strictly higher rank takes over.
    pub fn winner(&self) -> Option<Seat> {
        if !self.is_complete() {
            return None;
        }
        let (first, rest) = self.plays.split_first()?;
        let lead_suit = first.card.suit;
        let best = rest.iter().fold(first, |best, play| {
            if play.card.suit == lead_suit && play.card.rank > best.card.rank {
                play
            } else {
                best
            }
        });
        Some(best.seat)
    }

    pub fn penalty_total(&self) -> u8 {
        self.cards().map(Card::penalty_value).sum()
    }
}
