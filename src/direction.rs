use std::convert::TryFrom;
use std::fmt;

use crate::position::Position;

/// Any of the directions needed for Sokoban.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Return the opposite direction. This is used when undoing a move.
    pub fn reverse(self) -> Self {
        use self::Direction::*;
        match self {
            Left => Right,
            Right => Left,
            Up => Down,
            Down => Up,
        }
    }

    /// The offset `(dx, dy)` of one step in this direction.
    pub fn delta(self) -> (isize, isize) {
        use self::Direction::*;
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// The character used in saved move lists. Pushes are written in upper case.
    pub fn to_char(self, pushes_crate: bool) -> char {
        let c = match self {
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Up => 'u',
            Direction::Down => 'd',
        };
        if pushes_crate {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char(false))
    }
}

impl TryFrom<char> for Direction {
    type Error = char;

    fn try_from(c: char) -> Result<Direction, char> {
        use self::Direction::*;
        Ok(match c.to_ascii_lowercase() {
            'l' => Left,
            'r' => Right,
            'u' => Up,
            'd' => Down,
            _ => return Err(c),
        })
    }
}

/// All directions, in the order in which neighbours are expanded while searching for paths.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

/// How two positions relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionResult {
    /// Both positions are the same.
    SamePosition,

    /// The positions share a row or column; `to` is `distance` cells away from `from`.
    Straight {
        direction: Direction,
        distance: usize,
    },

    /// Neither in the same row nor in the same column.
    Other,
}

/// Find out in which direction you have to move to get from `from` to `to`, if there is such a
/// direction.
pub fn direction(from: Position, to: Position) -> DirectionResult {
    use self::Direction::*;
    let (dx, dy) = to - from;
    if dx == 0 && dy == 0 {
        DirectionResult::SamePosition
    } else if dx == 0 {
        DirectionResult::Straight {
            direction: if dy < 0 { Up } else { Down },
            distance: dy.unsigned_abs(),
        }
    } else if dy == 0 {
        DirectionResult::Straight {
            direction: if dx < 0 { Left } else { Right },
            distance: dx.unsigned_abs(),
        }
    } else {
        DirectionResult::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_is_an_involution() {
        for &dir in &DIRECTIONS {
            assert_ne!(dir, dir.reverse());
            assert_eq!(dir, dir.reverse().reverse());
        }
    }

    #[test]
    fn char_round_trip() {
        for &dir in &DIRECTIONS {
            assert_eq!(Ok(dir), Direction::try_from(dir.to_char(false)));
            assert_eq!(Ok(dir), Direction::try_from(dir.to_char(true)));
        }
        assert_eq!(Err('x'), Direction::try_from('x'));
    }

    #[test]
    fn direction_between_positions() {
        let origin = Position::new(2, 2);
        assert_eq!(direction(origin, origin), DirectionResult::SamePosition);
        assert_eq!(
            direction(origin, Position::new(2, 5)),
            DirectionResult::Straight {
                direction: Direction::Down,
                distance: 3
            }
        );
        assert_eq!(
            direction(origin, Position::new(0, 2)),
            DirectionResult::Straight {
                direction: Direction::Left,
                distance: 2
            }
        );
        assert_eq!(direction(origin, Position::new(3, 3)), DirectionResult::Other);
    }
}
