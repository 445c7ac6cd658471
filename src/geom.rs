//! Coarse grid coordinates, fine drawing coordinates, and the closed
//! compass-direction enum that ties the two spaces together.
//!
//! Grid coordinates are the layout space where each node occupies a 3x3
//! block and edges step one cell at a time; drawing coordinates are the
//! final character canvas. The two are never mixed implicitly — callers
//! convert explicitly via the layout's column/row tables.

/// A coordinate in the coarse layout grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A coordinate on the character canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawingCoord {
    pub x: i32,
    pub y: i32,
}

impl DrawingCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One of the eight compass directions, plus `Middle`.
///
/// Each variant carries a fixed offset within a node's 3x3 grid block:
/// `Up=(1,0) Down=(1,2) Left=(0,1) Right=(2,1) Middle=(1,1)`, with the
/// four corners at the obvious combinations. The router anchors a path's
/// endpoints on the border of a node's reservation using this offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
    Middle,
}

impl Direction {
    /// Offset of this direction within a node's 3x3 reservation.
    pub fn offset(self) -> (i32, i32) {
        use Direction::*;
        match self {
            Up => (1, 0),
            Down => (1, 2),
            Left => (0, 1),
            Right => (2, 1),
            UpperLeft => (0, 0),
            UpperRight => (2, 0),
            LowerLeft => (0, 2),
            LowerRight => (2, 2),
            Middle => (1, 1),
        }
    }

    /// The direction pointing the opposite way.
    pub fn opposite(self) -> Direction {
        use Direction::*;
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
            UpperLeft => LowerRight,
            UpperRight => LowerLeft,
            LowerLeft => UpperRight,
            LowerRight => UpperLeft,
            Middle => Middle,
        }
    }

    /// `true` for the four cardinal directions (not a corner, not `Middle`).
    pub fn is_axis_aligned(self) -> bool {
        matches!(self, Direction::Up | Direction::Down | Direction::Left | Direction::Right)
    }
}

/// Apply a direction's grid offset to a coordinate.
pub fn apply(c: GridCoord, dir: Direction) -> GridCoord {
    let (dx, dy) = dir.offset();
    GridCoord::new(c.x + dx, c.y + dy)
}

/// The compass direction from `from` to `to` in grid space.
pub fn determine_direction(from: GridCoord, to: GridCoord) -> Direction {
    use Direction::*;
    if from.x == to.x {
        if from.y < to.y { Down } else { Up }
    } else if from.y == to.y {
        if from.x < to.x { Right } else { Left }
    } else if from.x < to.x {
        if from.y < to.y { LowerRight } else { UpperRight }
    } else if from.y < to.y {
        LowerLeft
    } else {
        UpperLeft
    }
}

/// The compass direction from `from` to `to` in drawing space. Identical
/// logic to [`determine_direction`] but kept distinct so grid and drawing
/// coordinates are never accidentally compared against each other.
pub fn determine_direction_drawing(from: DrawingCoord, to: DrawingCoord) -> Direction {
    use Direction::*;
    if from.x == to.x {
        if from.y < to.y { Down } else { Up }
    } else if from.y == to.y {
        if from.x < to.x { Right } else { Left }
    } else if from.x < to.x {
        if from.y < to.y { LowerRight } else { UpperRight }
    } else if from.y < to.y {
        LowerLeft
    } else {
        UpperLeft
    }
}
