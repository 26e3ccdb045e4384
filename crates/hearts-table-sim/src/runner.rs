use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use hearts_table_core::game::controller::{Action, TableState};
use hearts_table_core::game::engine::{DEFAULT_NAMES, Game};
use hearts_table_core::game::view::TableView;
use hearts_table_core::model::score::moon_shooter;
use hearts_table_core::model::seat::Seat;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, SimConfig};
use crate::summary::{GameRecord, SummaryCollector, SummaryError};

/// Plays a batch of all-computer games and writes one JSONL row per game.
pub struct SimulationRunner {
    config: SimConfig,
    outputs: ResolvedOutputs,
    names: [String; 4],
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Everything the runner learned while driving one game to the end.
#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub view: TableView,
    pub actions: usize,
    pub pauses: usize,
}

#[derive(Debug, Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    game_id: String,
    seed: u64,
    scores: [u32; 4],
    points_taken: [u32; 4],
    tricks_won: [u8; 4],
    winners: Vec<&'static str>,
    moon_shooter: Option<&'static str>,
    pauses: usize,
    actions: usize,
    outcome: Option<&'a str>,
}

impl SimulationRunner {
    pub fn new(config: SimConfig, outputs: ResolvedOutputs) -> Self {
        let names = config
            .names
            .clone()
            .unwrap_or_else(|| DEFAULT_NAMES.map(String::from));
        Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            names,
        }
    }

    /// Execute every configured game, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut master = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut collector = SummaryCollector::new();
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let seed = master.next_u64();
            let outcome = self.play_game(game_index, seed)?;
            collector.record_game(&record_for(&outcome.view, outcome.pauses));
            write_game_row(&mut writer, &self.config.run_id, game_index, seed, &outcome)?;
            rows_written += 1;
        }

        writer.flush()?;

        let table = collector.finalize(&self.names)?;
        table.write_markdown(&self.config.run_id, &self.outputs.summary_md)?;

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    /// Deals from `seed` and lets the computer act for every seat, the
    /// human included, acknowledging each pause as it comes.
    pub fn play_game(&self, game_index: usize, seed: u64) -> Result<GameOutcome, RunnerError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let game = Game::dealt(&mut rng).with_names(self.names.clone());
        let mut state = TableState::new(game);
        let mut actions = 0usize;
        let mut pauses = 0usize;

        while !state.game().is_over() {
            if actions >= self.config.games.max_actions {
                return Err(RunnerError::Stalled {
                    game_index,
                    actions,
                });
            }
            let action = if state.is_paused() {
                pauses += 1;
                Action::Continue
            } else {
                Action::AiMove
            };
            state = state.advance(action, &mut rng);
            actions += 1;
        }

        let view = TableView::capture(&state);
        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            let scores: Vec<u32> = view.seats.iter().map(|seat| seat.score).collect();
            event!(
                target: "hearts_table_sim::runner",
                Level::INFO,
                run_id = %self.config.run_id,
                game_index,
                seed,
                actions,
                pauses,
                scores = ?scores,
                outcome = view.outcome.as_deref().unwrap_or(""),
                "game finished"
            );
        }

        Ok(GameOutcome {
            view,
            actions,
            pauses,
        })
    }
}

fn record_for(view: &TableView, pauses: usize) -> GameRecord {
    GameRecord {
        scores: scores_of(view),
        winners: view.winners.clone(),
        moon_shooter: moon_shooter_of(view),
        pauses,
    }
}

fn scores_of(view: &TableView) -> [u32; 4] {
    let mut scores = [0u32; 4];
    for seat in &view.seats {
        scores[seat.seat.index()] = seat.score;
    }
    scores
}

fn moon_shooter_of(view: &TableView) -> Option<Seat> {
    let mut raw = [0u32; 4];
    for seat in &view.seats {
        raw[seat.seat.index()] = seat.points_taken;
    }
    moon_shooter(&raw)
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_row(
    writer: &mut BufWriter<File>,
    run_id: &str,
    game_index: usize,
    seed: u64,
    outcome: &GameOutcome,
) -> Result<(), RunnerError> {
    let view = &outcome.view;
    let mut points_taken = [0u32; 4];
    let mut tricks_won = [0u8; 4];
    for seat in &view.seats {
        points_taken[seat.seat.index()] = seat.points_taken;
        tricks_won[seat.seat.index()] = seat.tricks_won;
    }

    let row = GameLogRow {
        run_id,
        game_id: format!("G{game_index:05}"),
        seed,
        scores: scores_of(view),
        points_taken,
        tricks_won,
        winners: view.winners.iter().map(|seat| seat.label()).collect(),
        moon_shooter: moon_shooter_of(view).map(|seat| seat.label()),
        pauses: outcome.pauses,
        actions: outcome.actions,
        outcome: view.outcome.as_deref(),
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error("game {game_index} did not finish within {actions} actions")]
    Stalled { game_index: usize, actions: usize },
}
