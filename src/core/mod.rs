//! Core module - pure game logic with no external I/O
//!
//! Contains the board, piece geometry, deterministic piece generation, and
//! the lifecycle orchestrator. Nothing here renders, times frames, or
//! touches storage; the embedding layer drives it with intents and ticks
//! and drains its events.

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;

// Re-export commonly used types
pub use board::Board;
pub use game_state::{GameState, Piece};
pub use pieces::{cells_at, get_shape, kick_offsets, try_rotate};
pub use rng::{NextQueue, SimpleRng};
