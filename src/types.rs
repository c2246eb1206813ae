//! Core types shared across the engine
//! This module contains pure data types with no external dependencies

use arrayvec::ArrayVec;

/// Board dimensions
pub const BOARD_WIDTH: u8 = 10;
pub const BOARD_HEIGHT: u8 = 20;

/// Default gravity delay until the embedder supplies one (milliseconds)
pub const DEFAULT_FALL_DELAY_MS: u32 = 1000;

/// Soft drop clamps the fall delay to this value; delays already at or
/// below it are halved instead
pub const SOFT_DROP_DELAY_MS: u32 = 70;

/// Lookahead slots in the next queue
pub const NEXT_QUEUE_LEN: usize = 3;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All seven kinds, in a fixed order usable for uniform draws
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// Rotation states (North = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    /// Rotate clockwise
    pub fn rotate_cw(&self) -> Self {
        match self {
            Orientation::North => Orientation::East,
            Orientation::East => Orientation::South,
            Orientation::South => Orientation::West,
            Orientation::West => Orientation::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Orientation::North => Orientation::West,
            Orientation::West => Orientation::South,
            Orientation::South => Orientation::East,
            Orientation::East => Orientation::North,
        }
    }
}

/// A single cell coordinate on the board: (x = column, y = row)
pub type Coord = (i8, i8);

/// State of one board cell
///
/// Falling cells belong to the active piece; Locked cells are permanent
/// until a line clear removes them. Both retain the kind for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Falling(PieceKind),
    Locked(PieceKind),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_falling(&self) -> bool {
        matches!(self, Cell::Falling(_))
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Cell::Locked(_))
    }

    /// The visual kind, if any
    pub fn kind(&self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Falling(k) | Cell::Locked(k) => Some(*k),
        }
    }
}

/// Discrete input intents consumed by the engine
///
/// Soft drop is stateful (begin/end) because it adjusts the gravity delay
/// rather than performing a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    SoftDropBegin,
    SoftDropEnd,
    HardDrop,
    Hold,
    Pause,
}

/// Events reported to the embedding layer
///
/// The engine never renders or plays audio; it queues these and the
/// presentation layer drains them once per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PieceSpawned {
        kind: PieceKind,
        cells: [Coord; 4],
    },
    PieceMoved {
        cells: [Coord; 4],
    },
    PieceRotated {
        cells: [Coord; 4],
    },
    PieceLocked {
        cells: [Coord; 4],
    },
    LinesCleared {
        count: u8,
        rows: ArrayVec<usize, 4>,
    },
    /// Both spawn positions were blocked: game over
    SpawnFailed,
    HoldChanged {
        held: PieceKind,
    },
    NextQueueChanged {
        queue: [PieceKind; NEXT_QUEUE_LEN],
    },
}
