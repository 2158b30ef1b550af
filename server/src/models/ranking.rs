use ntex::http::StatusCode;
use serde::{Deserialize, Serialize};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Nome e tempo são obrigatórios.";
pub const FETCH_FAILED_MESSAGE: &str = "Erro ao buscar ranking";
pub const SAVE_FAILED_MESSAGE: &str = "Erro ao salvar tempo";

/// A player's best time; serialized with the field names the game client reads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub nome: String,
    pub tempo: f64,
}

/// Raw body of a save request. Both fields are optional here so that a
/// missing field is reported as a validation failure instead of a parse error.
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub nome: Option<String>,
    pub tempo: Option<f64>,
}

/// A validated save request
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSubmission {
    pub nome: String,
    pub tempo: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No entry existed for the player, one was created
    FirstRecord,
    /// The submitted time beat the stored best and replaced it
    NewRecord,
    /// The stored best was kept
    NotBeaten,
}

impl SaveOutcome {
    pub fn message(self) -> &'static str {
        match self {
            SaveOutcome::FirstRecord => "Seu primeiro tempo foi salvo!",
            SaveOutcome::NewRecord => "Novo recorde de tempo salvo!",
            SaveOutcome::NotBeaten => "Você não bateu seu recorde anterior.",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            SaveOutcome::FirstRecord => StatusCode::CREATED,
            SaveOutcome::NewRecord | SaveOutcome::NotBeaten => StatusCode::OK,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl From<SaveOutcome> for MessageResponse {
    fn from(outcome: SaveOutcome) -> Self {
        MessageResponse {
            message: outcome.message(),
        }
    }
}
