//! Game state module - piece lifecycle orchestration
//!
//! Ties together board, pieces, and the next queue. Sequences
//! spawn -> fall/move/rotate/hold -> lock -> clear -> next spawn, applies
//! input intents, runs the gravity tick, and queues events for the
//! embedding layer.
//!
//! The active piece's 4 cells are mirrored on the board as `Falling` cells
//! at all times; every successful shift or rotation erases the old cells
//! and draws the new ones, so a renderer can read the board directly.

use crate::core::{
    cells_at,
    pieces::{self, SPAWN_ORIGIN, SPAWN_RETRY_ORIGIN},
    Board, NextQueue,
};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub kind: PieceKind,
    pub orientation: Orientation,
    pub x: i8,
    pub y: i8,
    /// Milliseconds accumulated toward the next gravity step
    pub elapsed_ms: u32,
}

impl Piece {
    fn new(kind: PieceKind, x: i8, y: i8) -> Self {
        Self {
            kind,
            orientation: Orientation::North,
            x,
            y,
            elapsed_ms: 0,
        }
    }

    /// The 4 board cells this piece occupies
    pub fn cells(&self) -> [Coord; 4] {
        cells_at(self.kind, self.orientation, self.x, self.y)
    }
}

/// Complete engine state
///
/// Single-threaded and tick-driven: the embedder applies at most one
/// intent and one `tick` per frame, intents first.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<Piece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    queue: NextQueue,
    /// Gravity delay configured by the embedder (level mapping lives there)
    fall_delay_ms: u32,
    soft_dropping: bool,
    paused: bool,
    game_over: bool,
    started: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            board: Board::new(),
            active: None,
            hold: None,
            can_hold: true,
            queue: NextQueue::new(seed),
            fall_delay_ms: DEFAULT_FALL_DELAY_MS,
            soft_dropping: false,
            paused: false,
            game_over: false,
            started: false,
            events: Vec::new(),
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_next();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn next_queue(&self) -> [PieceKind; NEXT_QUEUE_LEN] {
        self.queue.peek()
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Set the gravity delay (milliseconds per row). The level-to-speed
    /// table is owned by the orchestrating layer.
    pub fn set_fall_delay(&mut self, ms: u32) {
        self.fall_delay_ms = ms.max(1);
    }

    pub fn fall_delay_ms(&self) -> u32 {
        self.fall_delay_ms
    }

    /// Gravity delay currently in effect, accounting for soft drop
    pub fn effective_fall_delay_ms(&self) -> u32 {
        if self.soft_dropping {
            if self.fall_delay_ms > SOFT_DROP_DELAY_MS {
                SOFT_DROP_DELAY_MS
            } else {
                (self.fall_delay_ms / 2).max(1)
            }
        } else {
            self.fall_delay_ms
        }
    }

    /// Drain the queued events (called once per frame by the embedder)
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Draw the next kind from the queue and spawn it
    fn spawn_next(&mut self) -> bool {
        let kind = self.queue.pop();
        self.events.push(GameEvent::NextQueueChanged {
            queue: self.queue.peek(),
        });
        self.spawn(kind)
    }

    /// Spawn a piece of the given kind at the standard position, retrying
    /// one row up; both blocked means game over and no piece is created.
    fn spawn(&mut self, kind: PieceKind) -> bool {
        let mut origin = SPAWN_ORIGIN;
        let mut cells = cells_at(kind, Orientation::North, origin.0, origin.1);

        if !self.board.is_legal(&cells) {
            origin = SPAWN_RETRY_ORIGIN;
            cells = cells_at(kind, Orientation::North, origin.0, origin.1);
            if !self.board.is_legal(&cells) {
                self.game_over = true;
                self.events.push(GameEvent::SpawnFailed);
                return false;
            }
        }

        let piece = Piece::new(kind, origin.0, origin.1);
        self.board.set_falling(&cells, kind);
        self.active = Some(piece);
        self.can_hold = true;
        self.events.push(GameEvent::PieceSpawned { kind, cells });
        true
    }

    /// Try to shift the active piece by (dx, dy).
    /// The piece and board are unchanged when the shift is illegal.
    pub fn try_shift(&mut self, dx: i8, dy: i8) -> bool {
        let Some(piece) = self.active else {
            return false;
        };

        let old_cells = piece.cells();
        let new_cells = old_cells.map(|(x, y)| (x + dx, y + dy));

        if !self.board.is_legal(&new_cells) {
            return false;
        }

        self.board.clear_cells(&old_cells);
        self.board.set_falling(&new_cells, piece.kind);
        self.active = Some(Piece {
            x: piece.x + dx,
            y: piece.y + dy,
            ..piece
        });
        self.events.push(GameEvent::PieceMoved { cells: new_cells });
        true
    }

    /// Try to rotate the active piece, walking the kick candidates.
    /// O succeeds in place; a rejected rotation leaves the piece unchanged.
    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        let Some(piece) = self.active else {
            return false;
        };

        let result = pieces::try_rotate(
            piece.kind,
            piece.orientation,
            piece.x,
            piece.y,
            clockwise,
            |x, y| self.board.is_legal_cell(x, y),
        );

        let Some((_, new_orientation, (dx, dy))) = result else {
            return false;
        };

        let old_cells = piece.cells();
        let moved = Piece {
            orientation: new_orientation,
            x: piece.x + dx,
            y: piece.y + dy,
            ..piece
        };
        let new_cells = moved.cells();

        self.board.clear_cells(&old_cells);
        self.board.set_falling(&new_cells, piece.kind);
        self.active = Some(moved);
        self.events.push(GameEvent::PieceRotated { cells: new_cells });
        true
    }

    /// Where the active piece would land if dropped straight down.
    /// Pure query, no board mutation.
    pub fn ghost_cells(&self) -> Option<[Coord; 4]> {
        let piece = self.active?;
        let cells = piece.cells();

        let mut drop: i8 = 0;
        loop {
            let shifted = cells.map(|(x, y)| (x, y + drop + 1));
            if self.board.is_legal(&shifted) {
                drop += 1;
            } else {
                break;
            }
        }

        Some(cells.map(|(x, y)| (x, y + drop)))
    }

    /// Teleport the active piece to its ghost position and lock it
    /// immediately, with no further fall ticks.
    pub fn hard_drop(&mut self) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let Some(ghost) = self.ghost_cells() else {
            return false;
        };

        let old_cells = piece.cells();
        if ghost != old_cells {
            let drop = ghost[0].1 - old_cells[0].1;
            self.board.clear_cells(&old_cells);
            self.board.set_falling(&ghost, piece.kind);
            self.active = Some(Piece {
                y: piece.y + drop,
                ..piece
            });
            self.events.push(GameEvent::PieceMoved { cells: ghost });
        }

        self.lock_active();
        true
    }

    /// Stash the active piece, swapping with any held kind; once per spawn.
    pub fn hold(&mut self) -> bool {
        if !self.can_hold {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let stashed = piece.kind;
        self.board.clear_cells(&piece.cells());
        self.active = None;

        // An empty slot pulls the replacement from the queue instead
        let next = match self.hold.take() {
            Some(held) => held,
            None => {
                let kind = self.queue.pop();
                self.events.push(GameEvent::NextQueueChanged {
                    queue: self.queue.peek(),
                });
                kind
            }
        };

        self.hold = Some(stashed);
        self.events.push(GameEvent::HoldChanged { held: stashed });

        let spawned = self.spawn(next);
        self.can_hold = false;
        spawned
    }

    /// Lock the active piece, clear full rows, and spawn the next piece
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let cells = piece.cells();
        self.board.lock_cells(&cells, piece.kind);
        self.events.push(GameEvent::PieceLocked { cells });

        let cleared = self.board.clear_full_rows();
        if !cleared.is_empty() {
            self.events.push(GameEvent::LinesCleared {
                count: cleared.len() as u8,
                rows: cleared,
            });
        }

        self.spawn_next();
    }

    /// Advance the gravity timer by `elapsed_ms`.
    /// Returns true when the piece fell or locked this tick.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.paused || self.game_over || !self.started {
            return false;
        }
        let delay = self.effective_fall_delay_ms();
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        piece.elapsed_ms += elapsed_ms;
        if piece.elapsed_ms < delay {
            return false;
        }
        piece.elapsed_ms = 0;

        // A downward tick that cannot shift locks the piece
        if !self.try_shift(0, 1) {
            self.lock_active();
        }
        true
    }

    /// Apply an input intent. While paused only `Pause` is honored;
    /// intents with no active piece are no-ops.
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        if self.paused && intent != Intent::Pause {
            return false;
        }

        match intent {
            Intent::MoveLeft => self.try_shift(-1, 0),
            Intent::MoveRight => self.try_shift(1, 0),
            Intent::RotateCw => self.try_rotate(true),
            Intent::RotateCcw => self.try_rotate(false),
            Intent::SoftDropBegin => {
                self.soft_dropping = true;
                true
            }
            Intent::SoftDropEnd => {
                self.soft_dropping = false;
                true
            }
            Intent::HardDrop => self.hard_drop(),
            Intent::Hold => self.hold(),
            Intent::Pause => {
                // The fall timer is carried in the piece and simply stops
                // accumulating, so elapsed time is suspended, not reset
                self.paused = !self.paused;
                true
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u32) -> GameState {
        let mut state = GameState::new(seed);
        state.start();
        state
    }

    /// Board falling cells must equal the active piece's cells exactly
    fn assert_falling_invariant(state: &GameState) {
        let mut falling = state.board().falling_cells();
        falling.sort_unstable();
        let mut expected: Vec<Coord> = match state.active() {
            Some(piece) => piece.cells().to_vec(),
            None => Vec::new(),
        };
        expected.sort_unstable();
        assert_eq!(falling, expected);
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);
        assert!(!state.started());
        assert!(!state.game_over());
        assert!(!state.paused());
        assert!(state.can_hold());
        assert!(state.active().is_none());
        assert!(state.hold_piece().is_none());
        assert_eq!(state.fall_delay_ms(), DEFAULT_FALL_DELAY_MS);
    }

    #[test]
    fn test_start_spawns_and_reports() {
        let mut state = started(12345);
        assert!(state.active().is_some());
        assert_falling_invariant(&state);

        let events: Vec<_> = state.drain_events().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::PieceSpawned { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::NextQueueChanged { .. })));
    }

    #[test]
    fn test_spawn_matches_queue_front() {
        let mut state = GameState::new(12345);
        let front = state.next_queue()[0];
        state.start();
        assert_eq!(state.active().map(|p| p.kind), Some(front));
    }

    #[test]
    fn test_shift_moves_falling_cells() {
        let mut state = started(12345);
        let before = state.active().map(|p| p.x);

        assert!(state.try_shift(1, 0));
        assert_eq!(state.active().map(|p| p.x), before.map(|x| x + 1));
        assert_falling_invariant(&state);

        assert!(state.try_shift(-1, 0));
        assert_eq!(state.active().map(|p| p.x), before);
        assert_falling_invariant(&state);
    }

    #[test]
    fn test_shift_rejected_at_wall() {
        let mut state = started(12345);
        for _ in 0..BOARD_WIDTH {
            state.try_shift(-1, 0);
        }
        let min_x = state
            .active()
            .and_then(|p| p.cells().iter().map(|&(x, _)| x).min());
        assert_eq!(min_x, Some(0));
        assert!(!state.try_shift(-1, 0));
        assert_falling_invariant(&state);
    }

    #[test]
    fn test_upward_shift_rejected_above_board() {
        let mut state = started(12345);
        // Pieces spawn one row below the top edge; at most two upward
        // shifts fit (two for I, one for the 2-row kinds) before the
        // board runs out
        let mut ups = 0;
        while state.try_shift(0, -1) {
            ups += 1;
            assert!(ups <= 2, "shifted above the board");
        }
        assert!(!state.try_shift(0, -1));
        assert_falling_invariant(&state);
    }

    #[test]
    fn test_rotate_cw_four_times_round_trips() {
        let mut state = started(12345);
        // Center the piece so no kick is needed
        state.try_shift(1, 0);
        state.try_shift(0, 3);
        let before = state.active().map(|p| p.cells());

        for _ in 0..4 {
            assert!(state.try_rotate(true));
            assert_falling_invariant(&state);
        }
        assert_eq!(state.active().map(|p| p.cells()), before);
        assert_eq!(
            state.active().map(|p| p.orientation),
            Some(Orientation::North)
        );
    }

    #[test]
    fn test_o_rotation_is_noop_success() {
        let mut state = GameState::new(1);
        for seed in 1.. {
            state = GameState::new(seed);
            if state.next_queue()[0] == PieceKind::O {
                break;
            }
        }
        state.start();
        assert_eq!(state.active().map(|p| p.kind), Some(PieceKind::O));

        let before = state.active().map(|p| p.cells());
        assert!(state.try_rotate(true));
        assert_eq!(state.active().map(|p| p.cells()), before);
        assert_falling_invariant(&state);
    }

    #[test]
    fn test_ghost_is_maximal_and_legal() {
        let state = started(12345);
        let ghost = state.ghost_cells().unwrap();
        assert!(state.board().is_legal(&ghost));

        let below = ghost.map(|(x, y)| (x, y + 1));
        assert!(!state.board().is_legal(&below));
    }

    #[test]
    fn test_ghost_has_no_side_effects() {
        let state = started(12345);
        let before = state.board().clone();
        let _ = state.ghost_cells();
        assert_eq!(state.board(), &before);
    }

    #[test]
    fn test_hard_drop_locks_immediately() {
        let mut state = started(12345);
        let ghost = state.ghost_cells().unwrap();

        assert!(state.apply_intent(Intent::HardDrop));

        // Ghost cells are now locked and a fresh piece is falling
        for (x, y) in ghost {
            assert!(state.board().get(x, y).unwrap().is_locked());
        }
        assert!(state.active().is_some());
        assert_falling_invariant(&state);

        let events: Vec<_> = state.drain_events().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::PieceLocked { .. })));
    }

    #[test]
    fn test_gravity_tick_accumulates() {
        let mut state = started(12345);
        let y0 = state.active().unwrap().y;

        assert!(!state.tick(500));
        assert_eq!(state.active().unwrap().y, y0);

        assert!(state.tick(500));
        assert_eq!(state.active().unwrap().y, y0 + 1);
        assert_falling_invariant(&state);
    }

    #[test]
    fn test_blocked_down_tick_locks() {
        let mut state = started(12345);
        // Walk the piece to the floor
        while state.try_shift(0, 1) {}
        let cells = state.active().unwrap().cells();

        state.tick(DEFAULT_FALL_DELAY_MS);

        // A single piece cannot complete a row, so its cells stay locked
        // and the replacement spawns at the top
        for (x, y) in cells {
            assert!(state.board().get(x, y).unwrap().is_locked());
        }
        assert!(state.active().is_some());
        assert_falling_invariant(&state);
    }

    #[test]
    fn test_soft_drop_adjusts_delay() {
        let mut state = started(12345);
        assert_eq!(state.effective_fall_delay_ms(), DEFAULT_FALL_DELAY_MS);

        state.apply_intent(Intent::SoftDropBegin);
        assert_eq!(state.effective_fall_delay_ms(), SOFT_DROP_DELAY_MS);

        state.apply_intent(Intent::SoftDropEnd);
        assert_eq!(state.effective_fall_delay_ms(), DEFAULT_FALL_DELAY_MS);

        // Delays already at or below the clamp are halved instead
        state.set_fall_delay(60);
        state.apply_intent(Intent::SoftDropBegin);
        assert_eq!(state.effective_fall_delay_ms(), 30);
    }

    #[test]
    fn test_hold_swaps_once_per_piece() {
        let mut state = started(12345);
        let first = state.active().unwrap().kind;
        let queued = state.next_queue()[0];

        assert!(state.apply_intent(Intent::Hold));
        assert_eq!(state.hold_piece(), Some(first));
        assert_eq!(state.active().map(|p| p.kind), Some(queued));
        assert_falling_invariant(&state);

        // Second hold for the same piece is a no-op
        assert!(!state.apply_intent(Intent::Hold));
        assert_eq!(state.hold_piece(), Some(first));
        assert_eq!(state.active().map(|p| p.kind), Some(queued));

        // After the next spawn, hold swaps with the slot content
        let second = state.active().unwrap().kind;
        state.apply_intent(Intent::HardDrop);
        if state.game_over() {
            return;
        }
        assert!(state.can_hold());
        let third = state.active().unwrap().kind;
        assert!(state.apply_intent(Intent::Hold));
        assert_eq!(state.hold_piece(), Some(third));
        assert_eq!(state.active().map(|p| p.kind), Some(first));
        let _ = second;
    }

    #[test]
    fn test_hold_emits_events() {
        let mut state = started(12345);
        state.drain_events().for_each(drop);

        state.apply_intent(Intent::Hold);
        let events: Vec<_> = state.drain_events().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::HoldChanged { .. })));
        // Empty slot pulls from the queue, which advances
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::NextQueueChanged { .. })));
    }

    #[test]
    fn test_spawn_failure_is_terminal() {
        let mut state = GameState::new(12345);
        // Block both spawn rows across the middle columns
        for y in 0..=2 {
            for x in 3..=6 {
                state.board_mut().set(x, y, Cell::Locked(PieceKind::I));
            }
        }
        state.start();

        assert!(state.game_over());
        assert!(state.active().is_none());
        let events: Vec<_> = state.drain_events().collect();
        assert!(events.iter().any(|e| matches!(e, GameEvent::SpawnFailed)));
        assert_falling_invariant(&state);
    }

    #[test]
    fn test_spawn_retries_one_row_up() {
        let mut state = GameState::new(12345);
        // Block only the primary spawn rows (1-2): retry row 0 stays open
        // for kinds whose bottom row would collide
        for x in 0..BOARD_WIDTH as i8 {
            state.board_mut().set(x, 2, Cell::Locked(PieceKind::I));
        }
        state.start();

        if !state.game_over() {
            let piece = state.active().unwrap();
            assert_eq!(piece.y, SPAWN_RETRY_ORIGIN.1);
            assert_falling_invariant(&state);
        }
    }

    #[test]
    fn test_pause_freezes_timer_and_intents() {
        let mut state = started(12345);
        let y0 = state.active().unwrap().y;

        state.apply_intent(Intent::Pause);
        assert!(state.paused());

        // Ticks and intents are suppressed while paused
        for _ in 0..100 {
            state.tick(DEFAULT_FALL_DELAY_MS);
        }
        assert!(!state.apply_intent(Intent::MoveLeft));
        assert!(!state.apply_intent(Intent::HardDrop));
        assert_eq!(state.active().unwrap().y, y0);

        // Accumulated time survives the pause
        state.apply_intent(Intent::Pause);
        state.tick(DEFAULT_FALL_DELAY_MS - 1);
        state.apply_intent(Intent::Pause);
        state.apply_intent(Intent::Pause);
        assert!(state.tick(1));
        assert_eq!(state.active().unwrap().y, y0 + 1);
    }

    #[test]
    fn test_intents_without_piece_are_noops() {
        let mut state = GameState::new(12345);
        // Not started: no active piece exists yet
        assert!(!state.apply_intent(Intent::MoveLeft));
        assert!(!state.apply_intent(Intent::RotateCw));
        assert!(!state.apply_intent(Intent::HardDrop));
        assert!(!state.apply_intent(Intent::Hold));
        assert!(!state.tick(DEFAULT_FALL_DELAY_MS));
    }

    #[test]
    fn test_o_drop_completes_bottom_row() {
        let mut state = GameState::new(1);
        for seed in 1.. {
            state = GameState::new(seed);
            if state.next_queue()[0] == PieceKind::O {
                break;
            }
        }
        state.start();

        // Fill row 19 except the two columns the O will land on
        for x in 0..BOARD_WIDTH as i8 {
            if x != 8 && x != 9 {
                state.board_mut().set(x, 19, Cell::Locked(PieceKind::I));
            }
        }

        // O spawns on columns 4-5; four right shifts put it on 8-9
        for _ in 0..4 {
            assert!(state.apply_intent(Intent::MoveRight));
        }
        state.drain_events().for_each(drop);
        state.apply_intent(Intent::HardDrop);

        let events: Vec<_> = state.drain_events().collect();
        let cleared = events.iter().find_map(|e| match e {
            GameEvent::LinesCleared { count, rows } => Some((*count, rows.clone())),
            _ => None,
        });
        let (count, rows) = cleared.expect("locking the O must clear row 19");
        assert_eq!(count, 1);
        assert_eq!(rows.as_slice(), &[19]);

        // The O's top half compacts down onto the cleared bottom row
        assert_eq!(state.board().get(8, 19), Some(Cell::Locked(PieceKind::O)));
        assert_eq!(state.board().get(9, 19), Some(Cell::Locked(PieceKind::O)));
        assert_eq!(state.board().get(8, 18), Some(Cell::Empty));
    }

    #[test]
    fn test_lock_clears_completed_row() {
        let mut state = started(12345);
        // Fill the bottom row except where the piece will land
        let ghost = state.ghost_cells().unwrap();
        for x in 0..BOARD_WIDTH as i8 {
            if !ghost.contains(&(x, 19)) {
                state.board_mut().set(x, 19, Cell::Locked(PieceKind::I));
            }
        }
        let bottom_count = ghost.iter().filter(|&&(_, y)| y == 19).count();
        if bottom_count == 0 {
            return;
        }

        state.apply_intent(Intent::HardDrop);
        let events: Vec<_> = state.drain_events().collect();
        let cleared = events
            .iter()
            .find(|e| matches!(e, GameEvent::LinesCleared { .. }));
        assert!(cleared.is_some());
        if let Some(GameEvent::LinesCleared { count, rows }) = cleared {
            assert!(*count >= 1);
            assert!(rows.contains(&19));
        }
    }
}
