pub mod pathfinding;

use std::collections::HashMap;
use std::fmt;

use crate::direction::*;
use crate::level::{Background, Level};
use crate::position::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FromTo {
    pub from: Position,
    pub to: Position,
}

/// A crate changing its place. The id is the crate's index in the level file, so a front end
/// knows which sprite to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrateMove {
    pub id: usize,
    pub from: Position,
    pub to: Position,
}

/// What a single step, push or its inverse changed on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapDelta {
    /// The direction the worker is facing afterwards.
    pub direction: Direction,
    pub worker: FromTo,
    pub crate_move: Option<CrateMove>,
}

/// The state of the level currently being played.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelMap {
    /// Index of the level in its collection, starting at 0.
    level: usize,
    collection_name: String,

    columns: usize,
    rows: usize,

    /// `columns * rows` cells’ backgrounds in row-major order
    background: Vec<Background>,

    /// Positions of all crates together with their ids
    crates: HashMap<Position, usize>,

    /// The number of goals that have to be filled to solve the level
    empty_goals: usize,

    /// Where the worker is at the moment
    worker_position: Position,

    total_moves: usize,
    total_pushes: usize,

    good: bool,
}

/// Queries. None of these change an existing `LevelMap`. {{{
impl LevelMap {
    pub fn new(collection_name: &str, level: &Level) -> Self {
        let crates: HashMap<_, _> = level
            .crates
            .iter()
            .enumerate()
            .map(|(id, &pos)| (pos, id))
            .collect();
        let empty_goals = level
            .background
            .iter()
            .enumerate()
            .filter(|&(i, &bg)| {
                bg == Background::Goal
                    && !crates.contains_key(&Position::from_index(i, level.columns))
            })
            .count();

        LevelMap {
            level: level.index,
            collection_name: collection_name.to_string(),
            columns: level.columns,
            rows: level.rows,
            background: level.background.clone(),
            crates,
            empty_goals,
            worker_position: level.worker_position,
            total_moves: 0,
            total_pushes: 0,
            good: level.is_good(),
        }
    }

    /// The index of this level in its collection.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn worker_position(&self) -> Position {
        self.worker_position
    }

    /// How many times the worker moved to reach the current state, pushes included.
    pub fn total_moves(&self) -> usize {
        self.total_moves
    }

    /// How many times crates have been moved to reach the current state.
    pub fn total_pushes(&self) -> usize {
        self.total_pushes
    }

    /// Was the level structurally valid when it was loaded? Nothing may be moved otherwise.
    pub fn good_level(&self) -> bool {
        self.good
    }

    /// Check whether the level is completed, i.e. every goal has a crate on it.
    pub fn completed(&self) -> bool {
        self.empty_goals == 0
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.columns as isize && pos.y < self.rows as isize
    }

    /// The background at `pos`; everything outside of the grid counts as `Empty`.
    pub fn background(&self, pos: Position) -> Background {
        if self.in_bounds(pos) {
            self.background[pos.to_index(self.columns)]
        } else {
            Background::Empty
        }
    }

    pub fn background_cells(&self) -> &[Background] {
        &self.background
    }

    /// Is there a crate at the given position?
    pub fn is_crate(&self, pos: Position) -> bool {
        self.crates.contains_key(&pos)
    }

    pub fn crate_id(&self, pos: Position) -> Option<usize> {
        self.crates.get(&pos).cloned()
    }

    /// Is the cell with the given coordinates empty, i.e. could a crate be moved into it?
    pub fn is_empty(&self, pos: Position) -> bool {
        self.background(pos).is_interior() && !self.is_crate(pos)
    }

    pub fn is_worker(&self, pos: Position) -> bool {
        pos == self.worker_position
    }

    /// Get an ordered list of the crates’ positions where the id of a crate is its index in the
    /// list.
    pub fn crate_positions(&self) -> Vec<Position> {
        let mut crates: Vec<_> = self.crates.iter().collect();
        crates.sort_by_key(|&(_pos, id)| id);
        crates.into_iter().map(|(&pos, _id)| pos).collect()
    }

    /// The direction of `to` as seen from the worker, provided it is a direct neighbour.
    fn adjacent_direction(&self, to: Position) -> Option<Direction> {
        match direction(self.worker_position, to) {
            DirectionResult::Straight {
                direction,
                distance: 1,
            } => Some(direction),
            _ => None,
        }
    }
}
// }}}

/// Movement, i.e. everything that *does* change the `LevelMap`. {{{
impl LevelMap {
    /// Move the worker to the neighbouring cell `to` if it is free.
    pub fn step(&mut self, to: Position) -> bool {
        self.try_step(to).is_some()
    }

    /// Move the worker to the neighbouring cell `to`, pushing the crate located there one cell
    /// further in the same direction.
    pub fn push(&mut self, to: Position) -> bool {
        self.try_push(to).is_some()
    }

    pub(crate) fn try_step(&mut self, to: Position) -> Option<MapDelta> {
        let direction = self.adjacent_direction(to)?;
        if !self.is_empty(to) {
            return None;
        }

        let worker = self.move_worker_to(to);
        self.total_moves += 1;

        Some(MapDelta {
            direction,
            worker,
            crate_move: None,
        })
    }

    pub(crate) fn try_push(&mut self, to: Position) -> Option<MapDelta> {
        let direction = self.adjacent_direction(to)?;
        let beyond = to.neighbour(direction);
        if !self.is_crate(to) || !self.is_empty(beyond) {
            return None;
        }

        let crate_move = self.move_crate_to(to, beyond)?;
        let worker = self.move_worker_to(to);
        self.total_moves += 1;
        self.total_pushes += 1;

        Some(MapDelta {
            direction,
            worker,
            crate_move: Some(crate_move),
        })
    }

    /// Revert a step in `direction`, i.e. walk backwards.
    pub(crate) fn unstep(&mut self, direction: Direction) -> Option<MapDelta> {
        let to = self.worker_position.neighbour(direction.reverse());
        if !self.is_empty(to) {
            return None;
        }

        let worker = self.move_worker_to(to);
        self.total_moves = self.total_moves.saturating_sub(1);

        Some(MapDelta {
            direction,
            worker,
            crate_move: None,
        })
    }

    /// Revert a push in `direction`, i.e. walk backwards and pull the crate along.
    pub(crate) fn unpush(&mut self, direction: Direction) -> Option<MapDelta> {
        let crate_position = self.worker_position.neighbour(direction);
        let to = self.worker_position.neighbour(direction.reverse());
        if !self.is_crate(crate_position) || !self.is_empty(to) {
            return None;
        }

        let crate_move = self.move_crate_to(crate_position, self.worker_position)?;
        let worker = self.move_worker_to(to);
        self.total_moves = self.total_moves.saturating_sub(1);
        self.total_pushes = self.total_pushes.saturating_sub(1);

        Some(MapDelta {
            direction,
            worker,
            crate_move: Some(crate_move),
        })
    }

    fn move_worker_to(&mut self, to: Position) -> FromTo {
        let from = self.worker_position;
        self.worker_position = to;
        FromTo { from, to }
    }

    fn move_crate_to(&mut self, from: Position, to: Position) -> Option<CrateMove> {
        let id = self.crates.remove(&from)?;
        self.crates.insert(to, id);

        if self.background(from) == Background::Goal {
            self.empty_goals += 1;
        }
        if self.background(to) == Background::Goal {
            self.empty_goals -= 1;
        }

        Some(CrateMove { id, from, to })
    }
}
// }}}

fn cell_to_char(background: Background, worker: bool, crate_: bool) -> char {
    match (background, worker, crate_) {
        (Background::Wall, _, _) => '#',
        (Background::Goal, true, _) => '+',
        (Background::Goal, _, true) => '*',
        (Background::Goal, false, false) => '.',
        (_, true, _) => '@',
        (_, _, true) => '$',
        (Background::Floor, false, false) | (Background::Empty, false, false) => ' ',
    }
}

impl fmt::Display for LevelMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows() {
            if y != 0 {
                writeln!(f)?;
            }
            let line: String = (0..self.columns())
                .map(|x| {
                    let pos = Position::new(x, y);
                    cell_to_char(self.background(pos), self.is_worker(pos), self.is_crate(pos))
                })
                .collect();
            write!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
