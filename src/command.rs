use crate::config::AnimationSpeed;
use crate::direction::*;
use crate::position::*;

/// Movement requests. Anything that changes the worker's position goes through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Movement {
    /// Move one cell in the given direction, pushing a crate if there is one.
    Step { direction: Direction },

    /// Walk in the given direction until something is in the way.
    WalkTillObstacle { direction: Direction },

    /// Walk and then push in the given direction until something is in the way.
    PushTillObstacle { direction: Direction },

    /// Walk towards a position in the same row or column without moving crates.
    StepTo { position: Position },

    /// Walk towards a position in the same row or column and push the first crate in the way.
    PushTo { position: Position },

    /// Walk to any reachable position along a shortest path.
    WalkTo { position: Position },

    Undo,
    Redo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelManagement {
    ResetLevel,
    NextLevel,
    PreviousLevel,

    /// Switch to the level collection with the given short name.
    LoadCollection(String),
}

/// Anything the user can ask the back end to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Do not do anything. This exists solely to eliminate the need of using Option<Command>.
    Nothing,

    Movement(Movement),
    LevelManagement(LevelManagement),
    ChangeAnimation(AnimationSpeed),
}

impl Command {
    pub fn is_empty(&self) -> bool {
        *self == Command::Nothing
    }
}

impl From<Movement> for Command {
    fn from(movement: Movement) -> Self {
        Command::Movement(movement)
    }
}

impl From<LevelManagement> for Command {
    fn from(lm: LevelManagement) -> Self {
        Command::LevelManagement(lm)
    }
}
