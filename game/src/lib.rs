//! Card matching game: the board, the session state machine that drives a
//! play-through, and the client for the ranking server.

pub mod board;
pub mod client;
pub mod render;
pub mod session;
