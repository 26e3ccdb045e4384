use crate::game::controller::{TableState, UiState};
use crate::model::card::Card;
use crate::model::seat::Seat;
use crate::model::trick::{Play, Trick};
use serde::{Deserialize, Serialize};

/// Read-only snapshot of a table for renderers and logs. Nothing here feeds
/// back into play.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableView {
    pub turn: Seat,
    pub ui_state: UiState,
    pub is_over: bool,
    pub seats: Vec<SeatView>,
    pub current_trick: Vec<Play>,
    pub displayed_trick: Vec<Play>,
    pub tricks: Vec<Vec<Play>>,
    pub legal_moves: Vec<Card>,
    pub hearts_broken: bool,
    pub winners: Vec<Seat>,
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatView {
    pub seat: Seat,
    pub name: String,
    pub hand: Vec<Card>,
    pub score: u32,
    pub points_taken: u32,
    pub tricks_won: u8,
}

impl TableView {
    pub fn capture(state: &TableState) -> Self {
        let game = state.game();
        let score = game.score();
        let points = game.points_taken();
        let tricks_won = game.tricks_won();
        let is_over = game.is_over();

        let seats = Seat::LOOP
            .iter()
            .map(|&seat| SeatView {
                seat,
                name: game.name(seat).to_string(),
                hand: game.hand(seat).cards().to_vec(),
                score: score.score(seat),
                points_taken: points[seat.index()],
                tricks_won: tricks_won[seat.index()],
            })
            .collect();

        TableView {
            turn: game.turn(),
            ui_state: state.ui_state(),
            is_over,
            seats,
            current_trick: game.current_trick().plays().to_vec(),
            displayed_trick: state.displayed_trick().plays().to_vec(),
            tricks: game
                .tricks()
                .iter()
                .map(|trick: &Trick| trick.plays().to_vec())
                .collect(),
            legal_moves: game.playable_cards(),
            hearts_broken: game.hearts_broken(),
            winners: if is_over { score.winners() } else { Vec::new() },
            outcome: game.outcome_text(),
        }
    }

    pub fn to_json(state: &TableState) -> serde_json::Result<String> {
        serde_json::to_string(&Self::capture(state))
    }

    pub fn to_json_pretty(state: &TableState) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::capture(state))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
