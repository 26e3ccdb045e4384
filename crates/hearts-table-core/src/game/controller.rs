use crate::game::engine::Game;
use crate::model::card::Card;
use crate::model::trick::Trick;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

/// Whether the table waits for the human to look at a finished trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    Normal,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The human picked a card.
    Play(Card),
    /// The seat to act plays a random legal card.
    AiMove,
    /// Acknowledge a pause.
    Continue,
    NewGame,
}

/// Everything a renderer needs: the game plus the pause bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    game: Game,
    ui_state: UiState,
}

impl TableState {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            ui_state: UiState::Normal,
        }
    }

    pub fn deal<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Game::dealt(rng))
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn ui_state(&self) -> UiState {
        self.ui_state
    }

    pub fn is_paused(&self) -> bool {
        self.ui_state == UiState::Paused
    }

    /// The trick to draw in the middle of the table: the one just finished
    /// while paused, otherwise the one in progress.
    pub fn displayed_trick(&self) -> &Trick {
        match (self.ui_state, self.game.previous_trick()) {
            (UiState::Paused, Some(trick)) => trick,
            _ => self.game.current_trick(),
        }
    }

    /// Computes the next state. Bad input is ignored rather than reported: an
    /// illegal human card leaves the state unchanged.
    pub fn advance<R: rand::Rng + ?Sized>(self, action: Action, rng: &mut R) -> TableState {
        match (self.ui_state, action) {
            (_, Action::NewGame) => {
                let names = self.game.names().clone();
                event!(target: "hearts_table::controller", Level::INFO, "new game dealt");
                TableState::new(Game::dealt(rng).with_names(names))
            }
            (UiState::Paused, Action::Play(_) | Action::Continue) => self.resume(),
            (UiState::Normal, Action::Continue) => self,
            (_, Action::AiMove) => self.computer_turn(rng),
            (UiState::Normal, Action::Play(card)) => {
                if !self.game.turn().is_human() {
                    return self.computer_turn(rng);
                }
                if self.game.can_play(card) {
                    self.apply(card)
                } else {
                    event!(
                        target: "hearts_table::controller",
                        Level::DEBUG,
                        card = %card,
                        "ignored illegal play"
                    );
                    self
                }
            }
        }
    }

    fn resume(self) -> TableState {
        TableState {
            ui_state: UiState::Normal,
            ..self
        }
    }

    fn computer_turn<R: rand::Rng + ?Sized>(self, rng: &mut R) -> TableState {
        let choice = self.game.playable_cards().choose(rng).copied();
        match choice {
            Some(card) => self.apply(card),
            None => self,
        }
    }

    fn apply(self, card: Card) -> TableState {
        let seat = self.game.turn();
        let game = self.game.play(card);
        event!(
            target: "hearts_table::controller",
            Level::DEBUG,
            seat = seat.label(),
            card = %card,
            "card played"
        );

        if game.is_start_of_trick() {
            if let Some(winner) = game.previous_trick().and_then(Trick::winner) {
                event!(
                    target: "hearts_table::controller",
                    Level::INFO,
                    trick = game.tricks().len() as u32,
                    winner = winner.label(),
                    "trick complete"
                );
            }
        }
        if game.is_over() {
            let score = game.score();
            event!(
                target: "hearts_table::controller",
                Level::INFO,
                scores = ?score.standings(),
                "game over"
            );
        }

        let ui_state = if is_pause_worthy(&game) {
            UiState::Paused
        } else {
            UiState::Normal
        };
        TableState { game, ui_state }
    }
}

/// True right after a trick was closed by a computer seat, so the human gets
/// to see the last card before the trick is cleared.
pub fn is_pause_worthy(game: &Game) -> bool {
    game.is_start_of_trick()
        && game
            .previous_trick()
            .and_then(Trick::last_play)
            .is_some_and(|play| !play.seat.is_human())
}
