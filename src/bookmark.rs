use crate::history::History;
use crate::level_map::LevelMap;

/// A snapshot of the game that can be returned to later: which level was being played and how
/// the worker got to the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub collection: String,
    pub level: usize,
    pub moves: usize,
    pub history: String,
}

impl Bookmark {
    pub fn new(map: &LevelMap, history: &History) -> Self {
        Bookmark {
            collection: map.collection_name().to_string(),
            level: map.level(),
            moves: map.total_moves(),
            history: history.save(),
        }
    }

    /// Replay the bookmarked moves on `map`, which has to be the bookmarked level in its initial
    /// state. Return false if the bookmark does not fit.
    pub fn go_to(&self, map: &mut LevelMap, history: &mut History) -> bool {
        if map.collection_name() != self.collection || map.level() != self.level {
            return false;
        }
        if let Err(e) = history.load(map, &self.history) {
            warn!("Bad bookmark for level {}: {}", self.level + 1, e);
            return false;
        }
        map.total_moves() == self.moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::move_::Move;
    use crate::position::Position;

    fn map() -> LevelMap {
        LevelMap::new("test", &Level::parse(3, "######\n#@ $.#\n######").unwrap())
    }

    #[test]
    fn set_and_go_to() {
        let mut lvl = map();
        let mut history = History::new();
        let mut mv = Move::new(lvl.worker_position());
        assert!(lvl.step(Position::new(2, 1)));
        assert!(lvl.push(Position::new(3, 1)));
        mv.step(Position::new(2, 1));
        mv.push(Position::new(3, 1));
        mv.finish();
        history.add(mv);

        let bookmark = Bookmark::new(&lvl, &history);
        assert_eq!(bookmark.level, 3);
        assert_eq!(bookmark.moves, 2);
        assert_eq!(bookmark.history, "1,1:rR");

        let mut fresh = map();
        let mut fresh_history = History::new();
        assert!(bookmark.go_to(&mut fresh, &mut fresh_history));
        assert_eq!(fresh, lvl);
        assert_eq!(fresh_history, history);
    }

    #[test]
    fn wrong_level() {
        let bookmark = Bookmark {
            collection: "other".to_string(),
            level: 3,
            moves: 0,
            history: String::new(),
        };
        assert!(!bookmark.go_to(&mut map(), &mut History::new()));
    }

    #[test]
    fn corrupt_history() {
        let bookmark = Bookmark {
            collection: "test".to_string(),
            level: 3,
            moves: 1,
            history: "1,1:l".to_string(),
        };
        assert!(!bookmark.go_to(&mut map(), &mut History::new()));
    }
}
