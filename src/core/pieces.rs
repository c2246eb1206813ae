//! Pieces module - tetromino shapes and the wall-kick rotation search
//!
//! Shapes are stored as data: one set of 4 mino offsets per kind and
//! orientation (24 sets for the six rotating kinds, plus O). Rotation is a
//! single table lookup followed by a generic candidate-testing loop over
//! the kick list for (kind, from-orientation, direction).

use crate::types::{Coord, Orientation, PieceKind};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Primary spawn origin: pieces occupy rows 1-2 near the top-middle
pub const SPAWN_ORIGIN: Coord = (3, 1);

/// Fallback spawn origin, one row up, tried when the primary overlaps
pub const SPAWN_RETRY_ORIGIN: Coord = (3, 0);

/// Get the shape (mino offsets) for a piece kind and orientation
pub fn get_shape(kind: PieceKind, orientation: Orientation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(orientation),
        PieceKind::J => get_j_shape(orientation),
        PieceKind::L => get_l_shape(orientation),
        PieceKind::O => get_o_shape(orientation),
        PieceKind::S => get_s_shape(orientation),
        PieceKind::T => get_t_shape(orientation),
        PieceKind::Z => get_z_shape(orientation),
    }
}

/// I piece shapes
fn get_i_shape(orientation: Orientation) -> PieceShape {
    match orientation {
        // N: horizontal, centered on row 1
        Orientation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        // E: vertical, right-aligned
        Orientation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        // S: horizontal, centered on row 2
        Orientation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        // W: vertical, left-aligned
        Orientation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece shapes (same for all orientations)
fn get_o_shape(_orientation: Orientation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

/// T piece shapes
fn get_t_shape(orientation: Orientation) -> PieceShape {
    match orientation {
        Orientation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Orientation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Orientation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Orientation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// S piece shapes
fn get_s_shape(orientation: Orientation) -> PieceShape {
    match orientation {
        Orientation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Orientation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Orientation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Orientation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// Z piece shapes
fn get_z_shape(orientation: Orientation) -> PieceShape {
    match orientation {
        Orientation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Orientation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Orientation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Orientation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

/// J piece shapes
fn get_j_shape(orientation: Orientation) -> PieceShape {
    match orientation {
        Orientation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Orientation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Orientation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Orientation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

/// L piece shapes
fn get_l_shape(orientation: Orientation) -> PieceShape {
    match orientation {
        Orientation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Orientation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Orientation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Orientation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Kick candidate lists: identity first, then up to 3 fallbacks.
///
/// Rotations that land in a vertical orientation kick along rows (the
/// floor is the likely obstruction); rotations that land horizontal kick
/// along columns (a wall is). The I piece spans 4 cells and gets a
/// 2-cell kick on each axis; the 3-wide kinds only ever need 1 cell.
const I_KICKS_VERTICAL: &[MinoOffset] = &[(0, 0), (0, -1), (0, -2), (0, 1)];
const I_KICKS_HORIZONTAL: &[MinoOffset] = &[(0, 0), (-1, 0), (1, 0), (-2, 0)];
const JLSTZ_KICKS_VERTICAL: &[MinoOffset] = &[(0, 0), (0, -1), (0, 1)];
const JLSTZ_KICKS_HORIZONTAL: &[MinoOffset] = &[(0, 0), (-1, 0), (1, 0)];
const O_KICKS: &[MinoOffset] = &[(0, 0)];

/// Ordered kick offsets for rotating `kind` from `from` in the given
/// direction. The list is fixed per (kind, from, direction).
pub fn kick_offsets(kind: PieceKind, from: Orientation, clockwise: bool) -> &'static [MinoOffset] {
    if kind == PieceKind::O {
        return O_KICKS;
    }

    let target = if clockwise {
        from.rotate_cw()
    } else {
        from.rotate_ccw()
    };

    let vertical = matches!(target, Orientation::East | Orientation::West);
    match (kind, vertical) {
        (PieceKind::I, true) => I_KICKS_VERTICAL,
        (PieceKind::I, false) => I_KICKS_HORIZONTAL,
        (_, true) => JLSTZ_KICKS_VERTICAL,
        (_, false) => JLSTZ_KICKS_HORIZONTAL,
    }
}

/// Try to rotate a piece with wall kicks.
///
/// Returns `Some(new_shape, new_orientation, kick_offset)` on the first
/// legal candidate, `None` if every candidate fails. The O piece keeps its
/// cells and always succeeds with the identity kick.
pub fn try_rotate(
    kind: PieceKind,
    orientation: Orientation,
    x: i8,
    y: i8,
    clockwise: bool,
    is_legal: impl Fn(i8, i8) -> bool,
) -> Option<(PieceShape, Orientation, MinoOffset)> {
    let new_orientation = if clockwise {
        orientation.rotate_cw()
    } else {
        orientation.rotate_ccw()
    };

    let new_shape = get_shape(kind, new_orientation);
    let kicks = kick_offsets(kind, orientation, clockwise);

    for &(dx, dy) in kicks {
        let new_x = x + dx;
        let new_y = y + dy;

        let legal = new_shape
            .iter()
            .all(|&(mx, my)| is_legal(new_x + mx, new_y + my));

        if legal {
            return Some((new_shape, new_orientation, (dx, dy)));
        }
    }

    None
}

/// Absolute board cells for a piece at the given origin
pub fn cells_at(kind: PieceKind, orientation: Orientation, x: i8, y: i8) -> [Coord; 4] {
    let shape = get_shape(kind, orientation);
    shape.map(|(dx, dy)| (x + dx, y + dy))
}
