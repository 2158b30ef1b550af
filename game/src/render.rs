//! Text shown to the player

use crate::board::Board;
use crate::client::RankingEntry;

pub const LOADING_RANKING: &str = "Carregando...";
pub const EMPTY_RANKING: &str = "Ninguém jogou ainda. Seja o primeiro!";
pub const RANKING_FAILED: &str = "Erro ao carregar o ranking.";
pub const SAVING_TIME: &str = "Enviando seu recorde...";
pub const SAVE_FAILED: &str = "Erro ao conectar com o servidor para salvar.";

/// Cards per row when drawing the board
const BOARD_COLUMNS: usize = 4;

pub fn clock(seconds: u64) -> String {
    format!("Tempo: {}s", seconds)
}

pub fn final_time(seconds: f64) -> String {
    format!("{:.2}", seconds)
}

pub fn ranking_line(position: usize, entry: &RankingEntry) -> String {
    format!("{}. {} - {:.2} segundos", position, entry.nome, entry.tempo)
}

pub fn ranking_lines(entries: &[RankingEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec![EMPTY_RANKING.to_string()];
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| ranking_line(i + 1, entry))
        .collect()
}

/// Draws the board as a grid. Each card is labelled with the 1-based number
/// the player types to flip it.
pub fn board_grid(board: &Board) -> String {
    board
        .cards()
        .chunks(BOARD_COLUMNS)
        .enumerate()
        .map(|(row, cards)| {
            cards
                .iter()
                .enumerate()
                .map(|(col, card)| {
                    format!("{:>2}:{}", row * BOARD_COLUMNS + col + 1, card.face())
                })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
