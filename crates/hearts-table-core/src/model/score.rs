use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};

/// Every heart plus the queen of spades.
pub const MOON_POINTS: u32 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: [u32; 4],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 4] }
    }

    /// Settles raw penalty points into final scores. A seat holding all
    /// 26 points drops to zero and every other seat takes 26 instead.
    pub fn settle(raw: [u32; 4]) -> Self {
        match moon_shooter(&raw) {
            Some(shooter) => {
                let mut board = Self::new();
                for seat in Seat::LOOP {
                    if seat != shooter {
                        board.add_penalty(seat, MOON_POINTS);
                    }
                }
                board
            }
            None => Self { totals: raw },
        }
    }

    pub fn add_penalty(&mut self, seat: Seat, points: u32) {
        self.totals[seat.index()] += points;
    }

    pub fn score(&self, seat: Seat) -> u32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[u32; 4] {
        &self.totals
    }

    pub fn total(&self) -> u32 {
        self.totals.iter().sum()
    }

    /// All seats sharing the lowest score, in seat order.
    pub fn winners(&self) -> Vec<Seat> {
        let low = self.totals.iter().copied().min().unwrap_or(0);
        Seat::LOOP
            .iter()
            .copied()
            .filter(|seat| self.score(*seat) == low)
            .collect()
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

pub fn moon_shooter(raw: &[u32; 4]) -> Option<Seat> {
    Seat::LOOP
        .iter()
        .copied()
        .find(|seat| raw[seat.index()] == MOON_POINTS)
}
