use std::fmt;

use crate::direction::Direction;
use crate::level::Background;
use crate::position::Position;

/// Notifications sent from the play field to whoever subscribed to it. None of them require an
/// answer; a front end may ignore any of them.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A level has been (re)loaded. This contains everything needed to draw it from scratch.
    InitialLevelState {
        level: usize,
        columns: usize,
        rows: usize,
        background: Vec<Background>,
        worker_position: Position,
        crates: Vec<Position>,
    },
    MoveWorker {
        from: Position,
        to: Position,
        direction: Direction,
    },
    MoveCrate {
        id: usize,
        from: Position,
        to: Position,
    },
    LevelCompleted {
        level: usize,
        moves: usize,
        pushes: usize,
    },

    // Errors
    BrokenLevel,
    NothingToUndo,
    NothingToRedo,
    NoPathFound,
    CannotMove,
    FirstLevel,
    LastLevel,
    LevelNotCompleted,
    BadBookmark,
}

impl Event {
    /// Does this event tell the user that a request was refused?
    pub fn is_error(&self) -> bool {
        use self::Event::*;
        match self {
            InitialLevelState { .. }
            | MoveWorker { .. }
            | MoveCrate { .. }
            | LevelCompleted { .. } => false,
            _ => true,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::Event::*;
        match self {
            InitialLevelState { level, .. } => write!(f, "Level {}", level + 1),
            MoveWorker {
                from,
                to,
                direction,
            } => write!(f, "Worker moved {} from {} to {}", direction, from, to),
            MoveCrate { id, from, to } => write!(f, "Crate #{} moved from {} to {}", id, from, to),
            LevelCompleted { moves, pushes, .. } => write!(
                f,
                "Level completed with {} moves and {} pushes",
                moves, pushes
            ),
            BrokenLevel => write!(f, "This level is broken."),
            NothingToUndo => write!(f, "Nothing to undo."),
            NothingToRedo => write!(f, "Nothing to redo."),
            NoPathFound => write!(f, "The worker cannot get there."),
            CannotMove => write!(f, "The worker cannot move there."),
            FirstLevel => write!(f, "This is the first level in the current collection."),
            LastLevel => write!(f, "This is the last level in the current collection."),
            LevelNotCompleted => write!(f, "You have not completed this level yet."),
            BadBookmark => write!(f, "The bookmark does not fit this level."),
        }
    }
}
