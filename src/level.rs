mod builder;

use std::fmt;

use crate::position::Position;
use crate::util::SokobanError;

pub(crate) use self::builder::LevelBuilder;

/// Static part of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Background {
    /// Outside of the walls.
    Empty,
    Wall,
    Floor,
    Goal,
}

impl Background {
    pub fn is_wall(self) -> bool {
        self == Background::Wall
    }

    /// Can a worker or a crate ever be on a cell with this background?
    pub fn is_interior(self) -> bool {
        match self {
            Background::Floor | Background::Goal => true,
            Background::Empty | Background::Wall => false,
        }
    }
}

/// Reasons why a level that could be parsed still cannot be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelDefect {
    /// Number of goals minus number of crates.
    CratesGoalsMismatch(i32),
    NoCrates,
    /// The worker can leave the area enclosed by walls.
    NotEnclosed,
    /// A crate or goal the worker can never get to.
    Unreachable(Position),
}

impl fmt::Display for LevelDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LevelDefect::CratesGoalsMismatch(n) => {
                write!(f, "there are {} more goals than crates", n)
            }
            LevelDefect::NoCrates => write!(f, "there are no crates"),
            LevelDefect::NotEnclosed => write!(f, "the level is not surrounded by walls"),
            LevelDefect::Unreachable(pos) => write!(f, "{} cannot be reached", pos),
        }
    }
}

/// A level exactly as it was loaded from a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Index of this level in its collection, starting at 0.
    pub(crate) index: usize,
    pub(crate) columns: usize,
    pub(crate) rows: usize,

    /// `columns * rows` cells’ backgrounds in row-major order
    pub(crate) background: Vec<Background>,

    /// Initial crate positions. A crate's id is its index in this list.
    pub(crate) crates: Vec<Position>,

    pub(crate) worker_position: Position,

    pub(crate) defects: Vec<LevelDefect>,
}

impl Level {
    /// Parse the ASCII representation of a level.
    pub fn parse(index: usize, string: &str) -> Result<Level, SokobanError> {
        LevelBuilder::new(index, string).map(LevelBuilder::build)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn worker_position(&self) -> Position {
        self.worker_position
    }

    pub fn crates(&self) -> &[Position] {
        &self.crates
    }

    pub fn background(&self) -> &[Background] {
        &self.background
    }

    /// Everything that makes this level unplayable.
    pub fn defects(&self) -> &[LevelDefect] {
        &self.defects
    }

    /// Is the level structurally sound, so that it makes sense to play it?
    pub fn is_good(&self) -> bool {
        self.defects.is_empty()
    }
}
