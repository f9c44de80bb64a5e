use std::fmt;
use std::ops::Sub;

use crate::direction::Direction;

/// A position in a Sokoban level given as (x,y) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: isize,
    pub y: isize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position {
            x: x as isize,
            y: y as isize,
        }
    }

    pub fn from_index(index: usize, columns: usize) -> Self {
        Position {
            x: (index % columns) as isize,
            y: (index / columns) as isize,
        }
    }

    /// The row-major index of this position. Only meaningful for positions inside the grid.
    pub fn to_index(self, columns: usize) -> usize {
        self.x as usize + self.y as usize * columns
    }

    /// Return the neighbouring Position in the given direction.
    pub fn neighbour(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl Sub for Position {
    type Output = (isize, isize);
    fn sub(self, other: Position) -> (isize, isize) {
        (self.x - other.x, self.y - other.y)
    }
}
