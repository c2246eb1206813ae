//! gridfall - a deterministic falling-block puzzle engine
//!
//! This crate is the piece/board core of a Tetris-style game: the 10x20
//! cell grid, the active falling piece with wall-kick rotation, collision
//! legality, ghost projection and hard drop, locking, line clears with
//! downward compaction, the hold slot, and a no-immediate-repeat next
//! queue.
//!
//! It deliberately owns nothing else. Rendering, audio, scoring policy,
//! level-to-speed mapping, and persistence live in an embedding layer that
//! feeds the engine [`Intent`](types::Intent)s plus a gravity tick, and
//! drains [`GameEvent`](types::GameEvent)s in return.
//!
//! # Example
//!
//! ```
//! use gridfall::core::GameState;
//! use gridfall::types::{GameEvent, Intent};
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! // One frame: intents first, then the gravity tick
//! game.apply_intent(Intent::MoveRight);
//! game.apply_intent(Intent::HardDrop);
//! game.tick(16);
//!
//! // The presentation layer reacts to events
//! for event in game.drain_events() {
//!     if let GameEvent::LinesCleared { count, .. } = event {
//!         println!("cleared {count} rows");
//!     }
//! }
//! ```
//!
//! # Determinism
//!
//! The same seed always produces the same piece stream, and every engine
//! operation is a bounded, synchronous function of the current state. The
//! embedder guarantees frame ordering: at most one intent and one tick per
//! frame, intents applied first.

pub mod core;
pub mod types;

pub use crate::core::{Board, GameState, NextQueue, Piece};
pub use crate::types::{Cell, GameEvent, Intent, Orientation, PieceKind};
