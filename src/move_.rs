use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::direction::*;
use crate::level_map::{LevelMap, MapDelta};
use crate::position::Position;

/// The worker moving a single cell, possibly pushing a crate along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motion {
    /// Where was the worker heading?
    pub direction: Direction,

    /// Was a crate moved?
    pub moves_crate: bool,
}

impl Motion {
    pub fn new(direction: Direction, moves_crate: bool) -> Self {
        Motion {
            direction,
            moves_crate,
        }
    }

    pub fn to_char(self) -> char {
        self.direction.to_char(self.moves_crate)
    }

    /// Perform this motion on `map`.
    pub(crate) fn apply(self, map: &mut LevelMap) -> Option<MapDelta> {
        let target = map.worker_position().neighbour(self.direction);
        if self.moves_crate {
            map.try_push(target)
        } else {
            map.try_step(target)
        }
    }

    /// Take back this motion, assuming it was the last thing that happened on `map`.
    pub(crate) fn revert(self, map: &mut LevelMap) -> Option<MapDelta> {
        if self.moves_crate {
            map.unpush(self.direction)
        } else {
            map.unstep(self.direction)
        }
    }
}

impl TryFrom<char> for Motion {
    type Error = char;

    fn try_from(c: char) -> Result<Motion, char> {
        let direction = Direction::try_from(c)?;
        Ok(Motion::new(direction, c.is_ascii_uppercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseMoveError {
    #[error("missing start position in '{0}'")]
    MissingStart(String),

    #[error("invalid start position '{0}'")]
    InvalidStart(String),

    #[error("invalid motion '{0}'")]
    InvalidMotion(char),

    #[error("'{0}' is empty, walks after pushing or changes direction while pushing")]
    Malformed(String),
}

/// One user action: the worker walks, possibly along several straight segments, and then
/// pushes a crate along one straight line. This contains everything needed to do or undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    start: Position,
    motions: Vec<Motion>,
    finished: bool,
}

impl Move {
    /// Start recording a move at the worker's current position.
    pub fn new(start: Position) -> Self {
        Move {
            start,
            motions: vec![],
            finished: false,
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// Where the worker ends up after this move.
    pub fn end(&self) -> Position {
        self.motions
            .iter()
            .fold(self.start, |pos, motion| pos.neighbour(motion.direction))
    }

    pub fn motions(&self) -> &[Motion] {
        &self.motions
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    fn has_push(&self) -> bool {
        self.motions.last().map_or(false, |m| m.moves_crate)
    }

    pub fn number_of_moves(&self) -> usize {
        self.motions.len()
    }

    pub fn number_of_pushes(&self) -> usize {
        self.motions.iter().filter(|m| m.moves_crate).count()
    }

    /// Walk along a straight line from the current end of the move to `to`.
    pub fn step(&mut self, to: Position) {
        assert!(!self.finished, "Cannot extend a finished move");
        assert!(!self.has_push(), "Cannot walk after pushing");
        self.segment(to, false);
    }

    /// Push a crate along a straight line from the current end of the move to `to`.
    pub fn push(&mut self, to: Position) {
        assert!(!self.finished, "Cannot extend a finished move");
        assert!(!self.has_push(), "A move contains at most one push phase");
        self.segment(to, true);
    }

    fn segment(&mut self, to: Position, moves_crate: bool) {
        let from = self.end();
        match direction(from, to) {
            DirectionResult::Straight {
                direction,
                distance,
            } => {
                let motion = Motion::new(direction, moves_crate);
                self.motions.extend(std::iter::repeat(motion).take(distance));
            }
            DirectionResult::SamePosition => {}
            DirectionResult::Other => panic!("{} and {} are not in a straight line", from, to),
        }
    }

    /// The finished move made up of the first `motions` motions of this one.
    pub fn prefix(&self, motions: usize) -> Move {
        Move {
            start: self.start,
            motions: self.motions[..motions.min(self.motions.len())].to_vec(),
            finished: true,
        }
    }

    /// Seal the move. Only finished moves can be recorded in the history.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Take the move back on `map` all at once, last motion first. The worker has to be at the
    /// end of the move. Return false and leave `map` untouched if that is not possible.
    pub fn undo(&self, map: &mut LevelMap) -> bool {
        if map.worker_position() != self.end() {
            return false;
        }

        for (i, motion) in self.motions.iter().enumerate().rev() {
            if motion.revert(map).is_none() {
                warn!("Failed to undo motion {} of {}", i, self);
                for motion in &self.motions[i + 1..] {
                    motion.apply(map);
                }
                return false;
            }
        }
        true
    }

    /// Perform the move on `map` all at once. Return false and leave `map` untouched if any
    /// part of it is not possible.
    pub fn redo(&self, map: &mut LevelMap) -> bool {
        if map.worker_position() != self.start {
            return false;
        }

        for (i, motion) in self.motions.iter().enumerate() {
            if motion.apply(map).is_none() {
                debug!("Failed to redo motion {} of {}", i, self);
                for motion in self.motions[..i].iter().rev() {
                    motion.revert(map);
                }
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}:", self.start.x, self.start.y)?;
        for motion in &self.motions {
            write!(f, "{}", motion.to_char())?;
        }
        Ok(())
    }
}

/// Parse a finished move from the form produced by `Display`, e.g. `3,4:llU`.
impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Move, ParseMoveError> {
        let (start, motions) = s
            .split_once(':')
            .ok_or_else(|| ParseMoveError::MissingStart(s.to_string()))?;

        let invalid_start = || ParseMoveError::InvalidStart(start.to_string());
        let (x, y) = start.split_once(',').ok_or_else(invalid_start)?;
        let x = x.trim().parse().map_err(|_| invalid_start())?;
        let y = y.trim().parse().map_err(|_| invalid_start())?;

        let motions = motions
            .chars()
            .map(Motion::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ParseMoveError::InvalidMotion)?;

        if motions.is_empty() {
            return Err(ParseMoveError::Malformed(s.to_string()));
        }

        // Walking is only allowed before the push phase, which goes in a single direction.
        let first_push = motions.iter().position(|m| m.moves_crate);
        if let Some(i) = first_push {
            let direction = motions[i].direction;
            if motions[i..]
                .iter()
                .any(|m| !m.moves_crate || m.direction != direction)
            {
                return Err(ParseMoveError::Malformed(s.to_string()));
            }
        }

        Ok(Move {
            start: Position { x, y },
            motions,
            finished: true,
        })
    }
}
