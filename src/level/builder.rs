use std::collections::VecDeque;

use crate::direction::DIRECTIONS;
use crate::level::{Background, Level, LevelDefect};
use crate::position::*;
use crate::util::*;

/// Dynamic part of a cell as found in a level file.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Foreground {
    None,
    Worker,
    Crate,
}

fn char_to_cell(chr: char) -> Option<(Background, Foreground)> {
    match chr {
        '#' => Some((Background::Wall, Foreground::None)),
        ' ' | '-' | '_' => Some((Background::Empty, Foreground::None)),
        '$' => Some((Background::Empty, Foreground::Crate)),
        '@' => Some((Background::Empty, Foreground::Worker)),
        '.' => Some((Background::Goal, Foreground::None)),
        '*' => Some((Background::Goal, Foreground::Crate)),
        '+' => Some((Background::Goal, Foreground::Worker)),
        _ => None,
    }
}

fn is_empty_or_comment(s: &str) -> bool {
    s.trim().is_empty() || s.trim().starts_with(';')
}

pub(crate) struct LevelBuilder {
    index: usize,
    columns: usize,
    rows: usize,
    background: Vec<Background>,
    crates: Vec<Position>,
    goals: Vec<Position>,
    worker_position: Position,
}

impl LevelBuilder {
    pub fn new(index: usize, level_string: &str) -> Result<Self, SokobanError> {
        let rank = index + 1;
        let lines: Vec<_> = level_string
            .lines()
            .map(|x| x.trim_end_matches('\r'))
            .filter(|x| !is_empty_or_comment(x))
            .collect();
        let rows = lines.len();
        let columns = lines.iter().map(|x| x.chars().count()).max().unwrap_or(0);
        if rows == 0 || columns == 0 {
            return Err(SokobanError::NoLevel(rank));
        }

        let mut worker_position = None;
        let mut background = vec![Background::Empty; columns * rows];
        let mut crates = Vec::with_capacity(20);
        let mut goals = Vec::with_capacity(20);

        for (y, line) in lines.iter().enumerate() {
            for (x, chr) in line.chars().enumerate() {
                let (bg, fg) = char_to_cell(chr).ok_or(SokobanError::InvalidCharacter {
                    rank,
                    chr,
                    line: y,
                    column: x,
                })?;
                let pos = Position::new(x, y);
                background[pos.to_index(columns)] = bg;

                if bg == Background::Goal {
                    goals.push(pos);
                }
                match fg {
                    Foreground::Crate => crates.push(pos),
                    Foreground::Worker if worker_position.is_some() => {
                        return Err(SokobanError::TwoWorkers(rank));
                    }
                    Foreground::Worker => worker_position = Some(pos),
                    Foreground::None => {}
                }
            }
        }

        let worker_position = worker_position.ok_or(SokobanError::NoWorker(rank))?;

        Ok(Self {
            index,
            columns,
            rows,
            background,
            crates,
            goals,
            worker_position,
        })
    }

    pub fn build(mut self) -> Level {
        let mut defects = vec![];

        let goals_minus_crates = self.goals.len() as i32 - self.crates.len() as i32;
        if goals_minus_crates != 0 {
            defects.push(LevelDefect::CratesGoalsMismatch(goals_minus_crates));
        }
        if self.crates.is_empty() {
            defects.push(LevelDefect::NoCrates);
        }

        let mut seeds = vec![self.worker_position];
        seeds.extend(self.crates.iter().chain(self.goals.iter()).cloned());
        let (inside, enclosed) = self.flood_fill(&seeds);
        if !enclosed {
            defects.push(LevelDefect::NotEnclosed);
        }

        // Everything reachable from any crate, goal or the worker is on the inside.
        for (bg, inside) in self.background.iter_mut().zip(inside) {
            if inside && *bg == Background::Empty {
                *bg = Background::Floor;
            }
        }

        let (reachable, _) = self.flood_fill(&[self.worker_position]);
        for &pos in self.crates.iter().chain(self.goals.iter()) {
            if !reachable[pos.to_index(self.columns)] {
                defects.push(LevelDefect::Unreachable(pos));
            }
        }

        for defect in &defects {
            warn!("Level {} is broken: {}", self.index + 1, defect);
        }

        Level {
            index: self.index,
            columns: self.columns,
            rows: self.rows,
            background: self.background,
            crates: self.crates,
            worker_position: self.worker_position,
            defects,
        }
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.columns as isize && pos.y < self.rows as isize
    }

    /// Mark every cell that can be reached from one of `seeds` without crossing a wall. The
    /// second return value is false if the fill ran into the edge of the grid.
    fn flood_fill(&self, seeds: &[Position]) -> (Vec<bool>, bool) {
        let columns = self.columns;
        let mut visited = vec![false; self.background.len()];
        let mut enclosed = true;

        let mut queue: VecDeque<Position> = seeds.iter().cloned().collect();
        while let Some(pos) = queue.pop_front() {
            let i = pos.to_index(columns);
            if visited[i] || self.background[i].is_wall() {
                continue;
            }
            visited[i] = true;

            for &dir in &DIRECTIONS {
                let n = pos.neighbour(dir);
                if !self.in_bounds(n) {
                    enclosed = false;
                } else if !visited[n.to_index(columns)] {
                    queue.push_back(n);
                }
            }
        }

        (visited, enclosed)
    }
}
