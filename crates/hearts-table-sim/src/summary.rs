use std::fs;
use std::path::Path;

use hearts_table_core::model::seat::Seat;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("no games were recorded")]
    Empty,
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Result of one finished game as seen by the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub scores: [u32; 4],
    pub winners: Vec<Seat>,
    pub moon_shooter: Option<Seat>,
    pub pauses: usize,
}

#[derive(Debug, Default)]
pub struct SummaryCollector {
    games: usize,
    pauses: usize,
    seats: [SeatAccumulator; 4],
}

#[derive(Debug, Default, Clone, Copy)]
struct SeatAccumulator {
    total_score: u64,
    wins: usize,
    moon_shots: usize,
}

impl SummaryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every seat tied at the lowest score is credited with a win.
    pub fn record_game(&mut self, record: &GameRecord) {
        self.games += 1;
        self.pauses += record.pauses;
        for seat in Seat::LOOP {
            let acc = &mut self.seats[seat.index()];
            acc.total_score += u64::from(record.scores[seat.index()]);
            if record.winners.contains(&seat) {
                acc.wins += 1;
            }
            if record.moon_shooter == Some(seat) {
                acc.moon_shots += 1;
            }
        }
    }

    pub fn games(&self) -> usize {
        self.games
    }

    pub fn finalize(self, names: &[String; 4]) -> Result<RunSummaryTable, SummaryError> {
        if self.games == 0 {
            return Err(SummaryError::Empty);
        }

        let games = self.games as f64;
        let seats = Seat::LOOP
            .iter()
            .map(|&seat| {
                let acc = self.seats[seat.index()];
                SeatReport {
                    seat,
                    name: names[seat.index()].clone(),
                    avg_score: acc.total_score as f64 / games,
                    wins: acc.wins,
                    win_rate: acc.wins as f64 / games,
                    moon_shots: acc.moon_shots,
                }
            })
            .collect();

        Ok(RunSummaryTable {
            games: self.games,
            pauses: self.pauses,
            seats,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatReport {
    pub seat: Seat,
    pub name: String,
    pub avg_score: f64,
    pub wins: usize,
    pub win_rate: f64,
    pub moon_shots: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummaryTable {
    pub games: usize,
    pub pauses: usize,
    pub seats: Vec<SeatReport>,
}

impl RunSummaryTable {
    pub fn to_markdown(&self, run_id: &str) -> String {
        let mut rows = String::new();
        rows.push_str(&format!("# Simulation Summary: {run_id}\n\n"));
        rows.push_str(&format!(
            "Games played: {}, trick pauses acknowledged: {}\n\n",
            self.games, self.pauses
        ));
        rows.push_str("| Seat | Name | Avg Score | Wins | Win % | Moon Shots |\n");
        rows.push_str("|------|------|-----------|------|-------|------------|\n");

        for seat in &self.seats {
            rows.push_str(&format!(
                "| {seat} | {name} | {avg:.2} | {wins} | {win:.1}% | {moon} |\n",
                seat = seat.seat,
                name = seat.name,
                avg = seat.avg_score,
                wins = seat.wins,
                win = seat.win_rate * 100.0,
                moon = seat.moon_shots,
            ));
        }

        rows
    }

    pub fn write_markdown(&self, run_id: &str, path: impl AsRef<Path>) -> Result<(), SummaryError> {
        fs::write(path.as_ref(), self.to_markdown(run_id)).map_err(|e| SummaryError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }
}
