use crate::level_map::{LevelMap, MapDelta};
use crate::move_::{Motion, Move};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubStep {
    Forward(Motion),
    Backward(Motion),
}

/// One or more moves broken down into single-cell sub-steps that are applied one at a time.
/// This is what a front end replays at its own pace when animating.
#[derive(Debug, Clone)]
pub struct MoveSequence {
    steps: Vec<SubStep>,

    /// Index of the next sub-step to apply.
    cursor: usize,

    backward: bool,

    /// What the most recently applied sub-step changed.
    delta: Option<MapDelta>,
}

impl MoveSequence {
    /// Replay a single move.
    pub fn new(mv: &Move) -> Self {
        Self::forward(std::slice::from_ref(mv))
    }

    /// Replay the given moves in order.
    pub fn forward(moves: &[Move]) -> Self {
        let steps = moves
            .iter()
            .flat_map(|mv| mv.motions().iter().cloned().map(SubStep::Forward))
            .collect();
        Self::from_steps(steps, false)
    }

    /// Take back the given moves, starting with the last motion of the last move.
    pub fn backward(moves: &[Move]) -> Self {
        let steps = moves
            .iter()
            .rev()
            .flat_map(|mv| mv.motions().iter().rev().cloned().map(SubStep::Backward))
            .collect();
        Self::from_steps(steps, true)
    }

    fn from_steps(steps: Vec<SubStep>, backward: bool) -> Self {
        MoveSequence {
            steps,
            cursor: 0,
            backward,
            delta: None,
        }
    }

    /// Apply exactly one sub-step to `map`. Return true if there are more sub-steps left.
    ///
    /// A sub-step that cannot be applied because `map` was changed behind the sequence's back
    /// ends the sequence early.
    pub fn next(&mut self, map: &mut LevelMap) -> bool {
        let step = match self.steps.get(self.cursor) {
            Some(&step) => step,
            None => {
                self.delta = None;
                return false;
            }
        };

        self.delta = match step {
            SubStep::Forward(motion) => motion.apply(map),
            SubStep::Backward(motion) => motion.revert(map),
        };

        if self.delta.is_none() {
            error!(
                "Sub-step {} of {} ({:?}) is not possible here:\n{}",
                self.cursor,
                self.steps.len(),
                step,
                map
            );
            self.steps.truncate(self.cursor);
            return false;
        }

        self.cursor += 1;
        self.cursor < self.steps.len()
    }

    /// Apply all remaining sub-steps.
    pub fn drain(&mut self, map: &mut LevelMap) {
        while self.next(map) {}
    }

    /// What the most recent call to `next` changed, if anything.
    pub fn delta(&self) -> Option<&MapDelta> {
        self.delta.as_ref()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The number of sub-steps applied so far.
    pub fn applied(&self) -> usize {
        self.cursor
    }

    /// Does this sequence take moves back?
    pub fn is_backward(&self) -> bool {
        self.backward
    }

    /// The number of sub-steps not yet applied.
    pub fn remaining(&self) -> usize {
        self.steps.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}
