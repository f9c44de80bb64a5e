use crate::level_map::LevelMap;
use crate::move_::{Move, ParseMoveError};
use crate::move_sequence::MoveSequence;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum HistoryError {
    #[error("move #{index} cannot be parsed: {source}")]
    Syntax {
        index: usize,
        source: ParseMoveError,
    },

    #[error("move #{index} cannot be performed")]
    IllegalMove { index: usize },
}

/// The moves performed so far. Everything after the first `moves_performed` moves can be redone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    moves: Vec<Move>,
    moves_performed: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a move that has just been performed. Any moves that could have been redone are
    /// lost.
    pub fn add(&mut self, mv: Move) {
        assert!(mv.is_finished(), "Only finished moves can be recorded");
        assert!(self.moves_performed <= self.moves.len());

        self.moves.truncate(self.moves_performed);
        self.moves.push(mv);
        self.moves_performed += 1;
    }

    /// Step back one move and return the sequence taking it back on the map.
    pub fn defer_undo(&mut self) -> Option<MoveSequence> {
        assert!(self.moves_performed <= self.moves.len());
        if self.moves_performed == 0 {
            return None;
        }

        self.moves_performed -= 1;
        let mv = &self.moves[self.moves_performed];
        Some(MoveSequence::backward(std::slice::from_ref(mv)))
    }

    /// Step forward one move and return the sequence performing it on the map.
    pub fn defer_redo(&mut self) -> Option<MoveSequence> {
        assert!(self.moves_performed <= self.moves.len());
        let sequence = self.moves.get(self.moves_performed).map(MoveSequence::new)?;
        self.moves_performed += 1;
        Some(sequence)
    }

    /// Undo the most recent move on `map` right away.
    pub fn undo(&mut self, map: &mut LevelMap) -> bool {
        if self.moves_performed == 0 || !self.moves[self.moves_performed - 1].undo(map) {
            return false;
        }
        self.moves_performed -= 1;
        true
    }

    /// Redo the most recently undone move on `map` right away.
    pub fn redo(&mut self, map: &mut LevelMap) -> bool {
        match self.moves.get(self.moves_performed) {
            Some(mv) if mv.redo(map) => {
                self.moves_performed += 1;
                true
            }
            _ => false,
        }
    }

    /// The sequence returned by the last `defer_undo` or `defer_redo`, or the replay of the
    /// last added move, was stopped after `sequence.applied()` sub-steps. Shorten the affected
    /// move to the motions that are actually on the map. Moves that could have been redone are
    /// lost.
    pub fn cut_short(&mut self, sequence: &MoveSequence) {
        let (index, kept) = if sequence.is_backward() {
            let index = self.moves_performed;
            match self.moves.get(index) {
                Some(mv) => (index, mv.number_of_moves().saturating_sub(sequence.applied())),
                None => return,
            }
        } else if self.moves_performed > 0 {
            (self.moves_performed - 1, sequence.applied())
        } else {
            return;
        };

        let mv = self.moves[index].prefix(kept);
        self.moves.truncate(index);
        if !mv.is_empty() {
            self.moves.push(mv);
        }
        self.moves_performed = self.moves.len();
    }

    pub fn clear(&mut self) {
        self.moves.clear();
        self.moves_performed = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.moves_performed > 0
    }

    pub fn can_redo(&self) -> bool {
        self.moves_performed < self.moves.len()
    }

    /// The moves leading to the current state.
    pub fn performed(&self) -> &[Move] {
        &self.moves[..self.moves_performed]
    }

    /// The number of moves leading to the current state.
    pub fn len(&self) -> usize {
        self.moves_performed
    }

    pub fn is_empty(&self) -> bool {
        self.moves_performed == 0
    }

    /// Write the moves leading to the current state as text, one move per word.
    pub fn save(&self) -> String {
        self.performed()
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Replace the history by the moves in `text`, performing them on `map` one after the other.
    /// `map` should be in the level's initial state.
    ///
    /// Nothing happens if `text` cannot be parsed. If a move cannot be performed, `map` and the
    /// history are left in the state after the last move that could be performed.
    pub fn load(&mut self, map: &mut LevelMap, text: &str) -> Result<(), HistoryError> {
        let moves = text
            .split_whitespace()
            .enumerate()
            .map(|(index, word)| {
                word.parse::<Move>()
                    .map_err(|source| HistoryError::Syntax { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.clear();
        for (index, mv) in moves.into_iter().enumerate() {
            if !mv.redo(map) {
                warn!("Cannot replay move #{} ({}):\n{}", index, mv, map);
                return Err(HistoryError::IllegalMove { index });
            }
            self.add(mv);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::{Direction, DIRECTIONS};
    use crate::level::Level;
    use crate::position::Position;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    const ROOM: &str = "#########\n\
                        #   .   #\n\
                        # $ @ $ #\n\
                        #   .   #\n\
                        #########";

    impl Arbitrary for Direction {
        fn arbitrary(g: &mut Gen) -> Self {
            *g.choose(&DIRECTIONS).unwrap()
        }
    }

    fn room() -> LevelMap {
        LevelMap::new("test", &Level::parse(0, ROOM).unwrap())
    }

    /// Walk or push one cell in `direction` and return the move if that was possible.
    fn one_cell(map: &mut LevelMap, direction: Direction) -> Option<Move> {
        let start = map.worker_position();
        let to = start.neighbour(direction);
        let mut mv = Move::new(start);
        if map.step(to) {
            mv.step(to);
        } else if map.push(to) {
            mv.push(to);
        } else {
            return None;
        }
        mv.finish();
        Some(mv)
    }

    fn play(map: &mut LevelMap, history: &mut History, walk: &[Direction]) {
        for &dir in walk {
            if let Some(mv) = one_cell(map, dir) {
                history.add(mv);
            }
        }
    }

    #[test]
    fn empty_should_return_none() {
        let mut sut = History::new();
        assert!(sut.defer_undo().is_none());
        assert!(sut.defer_redo().is_none());
        assert!(!sut.undo(&mut room()));
        assert!(!sut.redo(&mut room()));
    }

    #[test]
    #[should_panic]
    fn unfinished_moves_are_rejected() {
        History::new().add(Move::new(Position::new(1, 1)));
    }

    #[quickcheck]
    fn undo_then_redo_everything(walk: Vec<Direction>) {
        let mut map = room();
        let initial = map.clone();
        let mut history = History::new();
        play(&mut map, &mut history, &walk);
        let after = map.clone();
        let n = history.len();

        for _ in 0..n {
            history.defer_undo().unwrap().drain(&mut map);
        }
        assert!(history.defer_undo().is_none());
        assert_eq!(map, initial);

        for _ in 0..n {
            history.defer_redo().unwrap().drain(&mut map);
        }
        assert!(history.defer_redo().is_none());
        assert_eq!(map, after);
    }

    #[quickcheck]
    fn adding_after_undo_discards_redo(walk: Vec<Direction>, undos: usize) {
        let mut map = room();
        let mut history = History::new();
        play(&mut map, &mut history, &walk);
        if history.is_empty() {
            return;
        }

        let k = 1 + undos % history.len();
        for _ in 0..k {
            assert!(history.undo(&mut map));
        }
        assert!(history.can_redo());

        let mv = DIRECTIONS.iter().find_map(|&dir| one_cell(&mut map, dir));
        if let Some(mv) = mv {
            let len = history.len();
            history.add(mv);
            assert_eq!(history.len(), len + 1);
            assert!(history.defer_redo().is_none());
        }
    }

    #[quickcheck]
    fn save_and_load_reproduce_the_map(walk: Vec<Direction>) {
        let mut map = room();
        let mut history = History::new();
        play(&mut map, &mut history, &walk);

        let text = history.save();
        let mut fresh = room();
        let mut loaded = History::new();
        assert_eq!(loaded.load(&mut fresh, &text), Ok(()));
        assert_eq!(fresh, map);
        assert_eq!(loaded.performed(), history.performed());
    }

    #[test]
    fn save_skips_undone_moves() {
        let mut map = room();
        let mut history = History::new();
        play(&mut map, &mut history, &[Direction::Left, Direction::Left]);
        assert_eq!(history.save(), "4,2:l 3,2:L");
        assert!(history.undo(&mut map));
        assert_eq!(history.save(), "4,2:l");
    }

    #[test]
    fn cut_short_keeps_what_was_applied() {
        let mut map = room();
        let initial = map.clone();
        let mut history = History::new();
        play(&mut map, &mut history, &[Direction::Up, Direction::Left]);
        let after_two = map.clone();

        let start = map.worker_position();
        let mut mv = Move::new(start);
        mv.step(Position { x: start.x + 2, y: start.y });
        mv.finish();

        // Only the first of two motions makes it onto the map.
        history.add(mv.clone());
        let mut replay = MoveSequence::new(&mv);
        assert!(replay.next(&mut map));
        history.cut_short(&replay);
        assert_eq!(history.len(), 3);
        assert_eq!(history.performed()[2].number_of_moves(), 1);
        assert!(history.undo(&mut map));
        assert_eq!(map, after_two);

        // Taking back a move is stopped before anything happened.
        let untouched = history.defer_undo().unwrap();
        history.cut_short(&untouched);
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(map, after_two);

        // Nothing of a move is left after taking back all of its motions.
        let mut undo = history.defer_undo().unwrap();
        undo.drain(&mut map);
        history.cut_short(&undo);
        assert_eq!(history.len(), 1);
        assert!(!history.can_redo());
        history.defer_undo().unwrap().drain(&mut map);
        assert_eq!(map, initial);
    }

    #[test]
    fn loading_stops_at_first_illegal_move() {
        let mut map = room();
        let mut history = History::new();
        // The third move walks into the crate that was just pushed against the wall.
        let res = history.load(&mut map, "4,2:l 3,2:L 2,2:l");
        assert_eq!(res, Err(HistoryError::IllegalMove { index: 2 }));
        assert_eq!(history.len(), 2);
        assert_eq!(map.worker_position(), Position::new(2, 2));
        assert!(map.is_crate(Position::new(1, 2)));
        assert_eq!(map.total_pushes(), 1);
    }

    #[test]
    fn syntax_errors_change_nothing() {
        let mut map = room();
        let mut history = History::new();
        play(&mut map, &mut history, &[Direction::Up]);
        let before = (map.clone(), history.clone());

        let res = history.load(&mut map, "4,2:l 3,2:X");
        assert!(matches!(res, Err(HistoryError::Syntax { index: 1, .. })));
        assert_eq!((map, history), before);
    }
}
