use std::collections::VecDeque;

use crate::direction::*;
use crate::level_map::LevelMap;
use crate::move_::Move;
use crate::position::*;

/// A crate the worker could push right now, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PossiblePush {
    pub crate_position: Position,
    pub direction: Direction,
}

/// Finds walking paths for the worker. It also keeps track of which cells the worker can reach
/// and which crates it can push, so that a front end can highlight them.
#[derive(Debug, Clone, Default)]
pub struct PathFinder {
    columns: usize,
    reachable: Vec<bool>,
    possible_pushes: Vec<PossiblePush>,
}

/// The number of steps the worker needs to get to each cell without moving crates, or
/// `usize::MAX` where it cannot get at all.
fn walking_distances(map: &LevelMap) -> Vec<usize> {
    let columns = map.columns();
    let mut distances = vec![std::usize::MAX; columns * map.rows()];
    let start = map.worker_position();
    distances[start.to_index(columns)] = 0;

    let mut queue = VecDeque::with_capacity(500);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        let new_dist = distances[pos.to_index(columns)] + 1;
        for neighbour in DIRECTIONS.iter().map(|&dir| pos.neighbour(dir)) {
            if !map.is_empty(neighbour) {
                continue;
            }
            let neighbour_dist = &mut distances[neighbour.to_index(columns)];
            if *neighbour_dist > new_dist {
                *neighbour_dist = new_dist;
                queue.push_back(neighbour);
            }
        }
    }

    distances
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a shortest path from the worker's current position to `to` that does not move any
    /// crates. Return `None` if there is no such path or the worker is already there.
    pub fn search(&self, map: &LevelMap, to: Position) -> Option<Move> {
        let worker = map.worker_position();
        if worker == to || !map.is_empty(to) {
            return None;
        }

        let columns = map.columns();
        let distances = walking_distances(map);
        if distances[to.to_index(columns)] == std::usize::MAX {
            debug!("No path from {} to {}", worker, to);
            return None;
        }

        // Walk back from the target, always to a neighbour one step closer to the worker.
        let mut positions = vec![to];
        let mut pos = to;
        while pos != worker {
            let dist = distances[pos.to_index(columns)];
            pos = DIRECTIONS
                .iter()
                .map(|&dir| pos.neighbour(dir))
                .find(|&n| map.in_bounds(n) && distances[n.to_index(columns)] == dist - 1)?;
            positions.push(pos);
        }

        let mut mv = Move::new(worker);
        for &pos in positions.iter().rev().skip(1) {
            mv.step(pos);
        }
        mv.finish();

        Some(mv)
    }

    /// Recompute which cells are reachable and which crates can be pushed. This has to be
    /// called whenever `map` changed for the answers to be up to date.
    pub fn update_possible_moves(&mut self, map: &LevelMap) {
        let columns = map.columns();
        let distances = walking_distances(map);

        self.columns = columns;
        self.reachable = distances.iter().map(|&d| d != std::usize::MAX).collect();

        let reachable = &self.reachable;
        let is_reachable = |pos: Position| map.in_bounds(pos) && reachable[pos.to_index(columns)];
        self.possible_pushes = map
            .crate_positions()
            .into_iter()
            .flat_map(|crate_position| {
                DIRECTIONS.iter().map(move |&direction| PossiblePush {
                    crate_position,
                    direction,
                })
            })
            .filter(|push| {
                is_reachable(push.crate_position.neighbour(push.direction.reverse()))
                    && map.is_empty(push.crate_position.neighbour(push.direction))
            })
            .collect();
    }

    /// Could the worker walk to `pos` when `update_possible_moves` was last called?
    pub fn is_reachable(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.columns
            && self
                .reachable
                .get(pos.to_index(self.columns))
                .cloned()
                .unwrap_or(false)
    }

    pub fn possible_pushes(&self) -> &[PossiblePush] {
        &self.possible_pushes
    }
}
