use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::bookmark::Bookmark;
use crate::collection::LevelCollection;
use crate::command::*;
use crate::config::{AnimationSpeed, Settings};
use crate::direction::*;
use crate::event::Event;
use crate::history::History;
use crate::level_map::pathfinding::PathFinder;
use crate::level_map::{LevelMap, MapDelta};
use crate::move_::Move;
use crate::move_sequence::MoveSequence;
use crate::position::*;
use crate::progress::CollectionProgress;
use crate::util::SokobanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,

    /// A move sequence is being replayed. No new moves are accepted until it is done.
    Animating,
}

/// The game controller. It turns the user's requests into moves, records them, and replays
/// them on the level map one step per tick.
pub struct PlayField {
    collection: LevelCollection,
    progress: CollectionProgress,
    settings: Settings,

    level_map: LevelMap,
    history: History,
    path_finder: PathFinder,

    move_sequence: Option<MoveSequence>,
    state: State,

    listeners: Vec<Sender<Event>>,
}

impl PlayField {
    /// Start playing the first level of `collection`.
    pub fn new(collection: LevelCollection, settings: Settings) -> Result<Self, SokobanError> {
        let level_map = match collection.level(0) {
            Some(level) => LevelMap::new(collection.short_name(), level),
            None => return Err(SokobanError::NoLevel(0)),
        };
        let mut path_finder = PathFinder::new();
        path_finder.update_possible_moves(&level_map);

        Ok(PlayField {
            progress: CollectionProgress::new(collection.short_name()),
            collection,
            settings,
            level_map,
            history: History::new(),
            path_finder,
            move_sequence: None,
            state: State::Idle,
            listeners: vec![],
        })
    }

    pub fn with_progress(mut self, progress: CollectionProgress) -> Self {
        self.set_progress(progress);
        self
    }

    /// Take over the record of solved levels and continue with the first unsolved one.
    pub fn set_progress(&mut self, progress: CollectionProgress) {
        if progress.name != self.collection.short_name() {
            warn!(
                "Using progress of '{}' for collection '{}'",
                progress.name,
                self.collection.short_name()
            );
        }
        let last = self.collection.number_of_levels() - 1;
        let level = progress.completed_levels.min(last);
        self.progress = progress;
        self.set_level(level);
    }
}

/// Handling events
impl PlayField {
    /// Register a listener. It immediately receives the current level's state.
    pub fn subscribe(&mut self, sender: Sender<Event>) {
        if sender.send(self.initial_level_state()).is_ok() {
            self.listeners.push(sender);
        } else {
            debug!("Not subscribing a disconnected listener");
        }
    }

    fn notify(&mut self, event: Event) {
        self.listeners.retain(|sender| match sender.send(event.clone()) {
            Ok(()) => true,
            Err(e) => {
                debug!("Dropping listener: {}", e);
                false
            }
        });
    }

    fn initial_level_state(&self) -> Event {
        Event::InitialLevelState {
            level: self.level_map.level(),
            columns: self.level_map.columns(),
            rows: self.level_map.rows(),
            background: self.level_map.background_cells().to_vec(),
            worker_position: self.level_map.worker_position(),
            crates: self.level_map.crate_positions(),
        }
    }

    fn notify_delta(&mut self, delta: MapDelta) {
        self.notify(Event::MoveWorker {
            from: delta.worker.from,
            to: delta.worker.to,
            direction: delta.direction,
        });
        if let Some(crate_move) = delta.crate_move {
            self.notify(Event::MoveCrate {
                id: crate_move.id,
                from: crate_move.from,
                to: crate_move.to,
            });
        }
    }
}

/// Moving the worker
impl PlayField {
    fn can_move_now(&mut self) -> bool {
        if self.state == State::Animating {
            return false;
        }
        if !self.level_map.good_level() {
            self.notify(Event::BrokenLevel);
            return false;
        }
        true
    }

    /// Walk towards `to` along the worker's row or column as long as nothing is in the way.
    /// Return true if the worker started moving.
    pub fn step(&mut self, to: Position) -> bool {
        if !self.can_move_now() {
            return false;
        }

        let start = self.level_map.worker_position();
        let direction = match straight_direction(start, to) {
            Some(direction) => direction,
            None => return false,
        };

        let end = self.walk_towards(to, direction);
        if end == start {
            self.notify(Event::CannotMove);
            return false;
        }

        let mut mv = Move::new(start);
        mv.step(end);
        mv.finish();
        self.record_and_replay(mv);
        true
    }

    /// Walk towards `to` along the worker's row or column, then push the crate in the way
    /// towards `to` as long as possible. Return true if the worker started moving.
    pub fn push(&mut self, to: Position) -> bool {
        if !self.can_move_now() {
            return false;
        }

        let start = self.level_map.worker_position();
        let direction = match straight_direction(start, to) {
            Some(direction) => direction,
            None => return false,
        };

        let walked = self.walk_towards(to, direction);
        let mut end = walked;
        while end != to && self.level_map.push(end.neighbour(direction)) {
            end = end.neighbour(direction);
        }

        if end == start {
            self.notify(Event::CannotMove);
            return false;
        }

        let mut mv = Move::new(start);
        mv.step(walked);
        if end != walked {
            mv.push(end);
        }
        mv.finish();
        self.record_and_replay(mv);
        true
    }

    /// Walk to any cell the worker can reach without moving crates.
    pub fn walk_to(&mut self, to: Position) -> bool {
        if !self.can_move_now() || to == self.level_map.worker_position() {
            return false;
        }

        match self.path_finder.search(&self.level_map, to) {
            Some(mv) => {
                self.history.add(mv.clone());
                self.start_moving(MoveSequence::new(&mv));
                true
            }
            None => {
                self.notify(Event::NoPathFound);
                false
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_move_now() {
            return false;
        }
        match self.history.defer_undo() {
            Some(sequence) => {
                self.start_moving(sequence);
                true
            }
            None => {
                self.notify(Event::NothingToUndo);
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_move_now() {
            return false;
        }
        match self.history.defer_redo() {
            Some(sequence) => {
                self.start_moving(sequence);
                true
            }
            None => {
                self.notify(Event::NothingToRedo);
                false
            }
        }
    }

    /// Step the worker towards `to` on the map and return where it ended up.
    fn walk_towards(&mut self, to: Position, direction: Direction) -> Position {
        let mut pos = self.level_map.worker_position();
        while pos != to && self.level_map.step(pos.neighbour(direction)) {
            pos = pos.neighbour(direction);
        }
        pos
    }

    /// The move has just been performed on the map to find out how far the worker gets. Take it
    /// back and replay it, so the map only ever changes through a move sequence.
    fn record_and_replay(&mut self, mv: Move) {
        if !mv.undo(&mut self.level_map) {
            error!("Cannot take back {}:\n{}", mv, self.level_map);
            return;
        }
        let sequence = MoveSequence::new(&mv);
        self.history.add(mv);
        self.start_moving(sequence);
    }

    fn start_moving(&mut self, sequence: MoveSequence) {
        assert!(self.move_sequence.is_none() && self.state == State::Idle);
        self.move_sequence = Some(sequence);
        self.state = State::Animating;
        self.tick();
    }

    /// Discard whatever is left of the current move sequence. The map stays as it is, and the
    /// history is shortened to the sub-steps that were applied.
    pub fn stop_moving(&mut self) {
        if let Some(sequence) = self.move_sequence.take() {
            if !sequence.is_exhausted() {
                debug!(
                    "Stopped after {} of {} sub-steps",
                    sequence.applied(),
                    sequence.len()
                );
                self.history.cut_short(&sequence);
            }
        }
        self.state = State::Idle;
        self.path_finder.update_possible_moves(&self.level_map);
    }

    /// Advance the current move sequence. Without animation, the whole sequence is applied at
    /// once. Return true if there is more to do, i.e. `tick` should be called again after
    /// `tick_interval`.
    pub fn tick(&mut self) -> bool {
        let mut sequence = match self.move_sequence.take() {
            Some(sequence) => sequence,
            None => {
                self.state = State::Idle;
                return false;
            }
        };

        let (more, completed) = if self.settings.animation_speed.is_instant() {
            loop {
                let (more, completed) = self.advance(&mut sequence);
                if !more || completed {
                    break (false, completed);
                }
            }
        } else {
            self.advance(&mut sequence)
        };

        self.move_sequence = Some(sequence);
        if completed {
            self.stop_moving();
            self.on_level_completed();
            false
        } else if more {
            true
        } else {
            self.stop_moving();
            false
        }
    }

    /// Apply one sub-step. Return whether there are more and whether it solved the level.
    fn advance(&mut self, sequence: &mut MoveSequence) -> (bool, bool) {
        let more = sequence.next(&mut self.level_map);
        match sequence.delta().cloned() {
            Some(delta) => {
                let completed = delta.crate_move.is_some() && self.level_map.completed();
                self.notify_delta(delta);
                (more, completed)
            }
            None => (more, false),
        }
    }

    fn on_level_completed(&mut self) {
        let level = self.level_map.level();
        info!(
            "Level {} completed with {} moves and {} pushes",
            level + 1,
            self.level_map.total_moves(),
            self.level_map.total_pushes()
        );
        self.progress.level_completed(level);
        self.notify(Event::LevelCompleted {
            level,
            moves: self.level_map.total_moves(),
            pushes: self.level_map.total_pushes(),
        });
    }

    pub fn tick_interval(&self) -> Duration {
        self.settings.animation_speed.delay()
    }

    /// Execute whatever command we get from the frontend.
    pub fn execute(&mut self, command: &Command) {
        match command {
            Command::Nothing => {}
            Command::Movement(movement) => self.execute_movement(movement),
            Command::LevelManagement(lm) => self.execute_level_management(lm),
            Command::ChangeAnimation(speed) => self.change_anim(*speed),
        }
    }

    fn execute_movement(&mut self, movement: &Movement) {
        use self::Movement::*;
        let worker = self.level_map.worker_position();
        match *movement {
            Step { direction } => {
                self.push(worker.neighbour(direction));
            }
            WalkTillObstacle { direction } => {
                self.step(self.edge(direction));
            }
            PushTillObstacle { direction } => {
                self.push(self.edge(direction));
            }
            StepTo { position } => {
                self.step(position);
            }
            PushTo { position } => {
                self.push(position);
            }
            WalkTo { position } => {
                self.walk_to(position);
            }
            Undo => {
                self.undo();
            }
            Redo => {
                self.redo();
            }
        }
    }

    fn execute_level_management(&mut self, lm: &LevelManagement) {
        match lm {
            LevelManagement::ResetLevel => self.restart_level(),
            LevelManagement::NextLevel => self.next_level(),
            LevelManagement::PreviousLevel => self.previous_level(),
            LevelManagement::LoadCollection(name) => self.load_collection(name),
        }
    }

    /// The cell at the edge of the grid in the given direction from the worker.
    fn edge(&self, direction: Direction) -> Position {
        let Position { x, y } = self.level_map.worker_position();
        let last_column = self.level_map.columns() as isize - 1;
        let last_row = self.level_map.rows() as isize - 1;
        match direction {
            Direction::Up => Position { x, y: 0 },
            Direction::Down => Position { x, y: last_row },
            Direction::Left => Position { x: 0, y },
            Direction::Right => Position { x: last_column, y },
        }
    }
}

/// Level management
impl PlayField {
    /// Load the level with the given index in its initial state. Return false if there is no
    /// such level.
    pub fn set_level(&mut self, index: usize) -> bool {
        let level_map = match self.collection.level(index) {
            Some(level) => LevelMap::new(self.collection.short_name(), level),
            None => return false,
        };
        self.level_map = level_map;
        self.history.clear();
        self.stop_moving();
        if !self.level_map.good_level() {
            warn!("Level {} is broken", index + 1);
        }
        let initial_state = self.initial_level_state();
        self.notify(initial_state);
        true
    }

    pub fn restart_level(&mut self) {
        self.set_level(self.level_map.level());
    }

    pub fn next_level(&mut self) {
        let level = self.level_map.level();
        if level + 1 >= self.collection.number_of_levels() {
            self.notify(Event::LastLevel);
        } else if level >= self.progress.completed_levels {
            self.notify(Event::LevelNotCompleted);
        } else {
            self.set_level(level + 1);
        }
    }

    pub fn previous_level(&mut self) {
        let level = self.level_map.level();
        if level == 0 {
            self.notify(Event::FirstLevel);
        } else {
            self.set_level(level - 1);
        }
    }

    /// Switch to another collection and start at its first level. Nothing happens if it is the
    /// collection currently being played.
    pub fn change_collection(&mut self, collection: LevelCollection) {
        if collection.short_name() == self.collection.short_name() {
            return;
        }
        if collection.number_of_levels() == 0 {
            warn!("Collection '{}' has no levels", collection.short_name());
            return;
        }
        self.progress = CollectionProgress::new(collection.short_name());
        self.collection = collection;
        self.set_level(0);
    }

    fn load_collection(&mut self, name: &str) {
        if name == self.collection.short_name() {
            return;
        }
        match LevelCollection::load(name) {
            Ok(collection) => {
                self.change_collection(collection);
                self.set_progress(CollectionProgress::load(name));
            }
            Err(e) => error!("Failed to load collection '{}': {}", name, e),
        }
    }

    pub fn change_anim(&mut self, speed: AnimationSpeed) {
        self.settings.animation_speed = speed;
    }
}

/// Bookmarks
impl PlayField {
    pub fn set_bookmark(&self) -> Option<Bookmark> {
        if !self.level_map.good_level() {
            return None;
        }
        Some(Bookmark::new(&self.level_map, &self.history))
    }

    /// Load the bookmarked level and replay the moves leading to the bookmarked state.
    pub fn go_to_bookmark(&mut self, bookmark: &Bookmark) -> bool {
        if bookmark.collection != self.collection.short_name() || !self.set_level(bookmark.level)
        {
            self.notify(Event::BadBookmark);
            return false;
        }

        let ok = bookmark.go_to(&mut self.level_map, &mut self.history);
        self.path_finder.update_possible_moves(&self.level_map);
        if !ok {
            self.notify(Event::BadBookmark);
        }
        let state = self.initial_level_state();
        self.notify(state);
        ok
    }
}

// Accessor methods
impl PlayField {
    pub fn level(&self) -> usize {
        self.level_map.level()
    }

    pub fn collection(&self) -> &LevelCollection {
        &self.collection
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    pub fn total_moves(&self) -> usize {
        self.level_map.total_moves()
    }

    pub fn total_pushes(&self) -> usize {
        self.level_map.total_pushes()
    }

    pub fn level_map(&self) -> &LevelMap {
        &self.level_map
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn path_finder(&self) -> &PathFinder {
        &self.path_finder
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state == State::Animating
    }

    pub fn completed_levels(&self) -> usize {
        self.progress.completed_levels
    }

    pub fn progress(&self) -> &CollectionProgress {
        &self.progress
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

fn straight_direction(from: Position, to: Position) -> Option<Direction> {
    match direction(from, to) {
        DirectionResult::Straight { direction, .. } => Some(direction),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use std::sync::mpsc::{channel, Receiver};

    const CORRIDOR: &str = "#######\n#@ $ .#\n#######";
    const SHAFT: &str = "###\n#@#\n#$#\n#.#\n###";
    const BROKEN: &str = "#####\n#@$ #\n#####";

    fn collection() -> LevelCollection {
        let levels = [CORRIDOR, SHAFT, BROKEN]
            .iter()
            .enumerate()
            .map(|(i, s)| Level::parse(i, s).unwrap())
            .collect();
        LevelCollection::from_levels("test", levels)
    }

    fn setup(speed: u8) -> (PlayField, Receiver<Event>) {
        let settings = Settings {
            animation_speed: AnimationSpeed::new(speed).unwrap(),
        };
        let mut play_field = PlayField::new(collection(), settings).unwrap();
        let (sender, receiver) = channel();
        play_field.subscribe(sender);
        (play_field, receiver)
    }

    fn events(receiver: &Receiver<Event>) -> Vec<Event> {
        receiver.try_iter().collect()
    }

    fn finish_level(play_field: &mut PlayField) {
        assert!(play_field.push(Position::new(5, 1)));
        while play_field.tick() {}
        assert!(play_field.level_map().completed());
    }

    #[test]
    fn subscribing_sends_initial_state() {
        let (_play_field, receiver) = setup(0);
        match events(&receiver).as_slice() {
            [Event::InitialLevelState {
                level: 0,
                columns: 7,
                rows: 3,
                ..
            }] => {}
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn push_then_undo() {
        let (mut play_field, receiver) = setup(0);
        assert!(play_field.set_level(1));
        events(&receiver);

        assert!(play_field.push(Position::new(1, 3)));
        assert_eq!(play_field.state(), State::Idle);
        assert_eq!(play_field.total_pushes(), 1);
        let map = play_field.level_map();
        assert_eq!(map.worker_position(), Position::new(1, 2));
        assert!(map.is_crate(Position::new(1, 3)));
        assert!(map.completed());
        assert_eq!(play_field.completed_levels(), 2);

        let events = events(&receiver);
        assert!(events.contains(&Event::MoveCrate {
            id: 0,
            from: Position::new(1, 2),
            to: Position::new(1, 3)
        }));
        assert_eq!(
            events.last(),
            Some(&Event::LevelCompleted {
                level: 1,
                moves: 1,
                pushes: 1
            })
        );

        assert!(play_field.undo());
        let map = play_field.level_map();
        assert_eq!(map.worker_position(), Position::new(1, 1));
        assert!(map.is_crate(Position::new(1, 2)));
        assert!(!map.completed());
        assert_eq!(play_field.total_pushes(), 0);
    }

    #[test]
    fn walk_and_push_in_one_move() {
        let (mut play_field, receiver) = setup(0);
        assert!(play_field.push(Position::new(5, 1)));
        assert_eq!(play_field.history().len(), 1);
        assert_eq!(play_field.history().save(), "1,1:rRR");
        assert_eq!(play_field.total_moves(), 3);
        assert_eq!(play_field.total_pushes(), 2);
        assert!(events(&receiver).contains(&Event::LevelCompleted {
            level: 0,
            moves: 3,
            pushes: 2
        }));
    }

    #[test]
    fn animated_moves_take_several_ticks() {
        let (mut play_field, receiver) = setup(3);
        assert_eq!(play_field.tick_interval(), Duration::from_millis(60));

        assert!(play_field.push(Position::new(5, 1)));
        assert!(play_field.is_animating());
        assert_eq!(play_field.level_map().worker_position(), Position::new(2, 1));

        // Requests are refused while the worker is moving.
        assert!(!play_field.undo());
        assert!(!play_field.step(Position::new(1, 1)));
        assert_eq!(play_field.history().len(), 1);

        assert!(play_field.tick());
        assert!(!play_field.tick());
        assert_eq!(play_field.state(), State::Idle);
        assert_eq!(play_field.level_map().worker_position(), Position::new(4, 1));
        assert!(!play_field.tick());

        let moves = events(&receiver)
            .into_iter()
            .filter(|e| matches!(e, Event::MoveWorker { .. }))
            .count();
        assert_eq!(moves, 3);
    }

    #[test]
    fn stop_moving_keeps_partial_state() {
        let (mut play_field, _receiver) = setup(1);
        let initial = play_field.level_map().clone();
        assert!(play_field.push(Position::new(5, 1)));
        play_field.stop_moving();
        assert_eq!(play_field.state(), State::Idle);
        assert_eq!(play_field.level_map().worker_position(), Position::new(2, 1));
        assert!(!play_field.tick());
        assert_eq!(play_field.history().save(), "1,1:r");

        assert!(play_field.undo());
        assert_eq!(play_field.level_map(), &initial);
        assert!(!play_field.redo());
    }

    fn single_level(level: &str, speed: u8) -> PlayField {
        let levels = vec![Level::parse(0, level).unwrap()];
        let settings = Settings {
            animation_speed: AnimationSpeed::new(speed).unwrap(),
        };
        PlayField::new(LevelCollection::from_levels("single", levels), settings).unwrap()
    }

    #[test]
    fn pushing_past_the_goal_stops_on_it() {
        for &speed in &[0, 2] {
            let mut play_field = single_level("#######\n#@ $. #\n#######", speed);
            let initial = play_field.level_map().clone();

            assert!(play_field.push(Position::new(5, 1)));
            while play_field.tick() {}
            let solved = play_field.level_map().clone();
            assert!(solved.completed());
            assert_eq!(solved.worker_position(), Position::new(3, 1));
            assert_eq!(play_field.history().save(), "1,1:rR");

            assert!(play_field.undo());
            while play_field.tick() {}
            assert_eq!(play_field.level_map(), &initial);

            assert!(play_field.redo());
            while play_field.tick() {}
            assert_eq!(play_field.level_map(), &solved);
        }
    }

    #[test]
    fn undo_stops_when_the_crate_is_back_on_its_goal() {
        for &speed in &[0, 2] {
            let mut play_field = single_level("#######\n#@ *  #\n#######", speed);
            let initial = play_field.level_map().clone();

            assert!(play_field.push(Position::new(5, 1)));
            while play_field.tick() {}
            assert!(play_field.level_map().is_crate(Position::new(5, 1)));

            assert!(play_field.undo());
            while play_field.tick() {}
            assert!(play_field.level_map().completed());
            assert_eq!(play_field.level_map().worker_position(), Position::new(2, 1));
            assert_eq!(play_field.history().save(), "1,1:r");
            assert!(!play_field.history().can_redo());

            assert!(play_field.undo());
            while play_field.tick() {}
            assert_eq!(play_field.level_map(), &initial);
        }
    }

    #[test]
    fn blocked_moves() {
        let (mut play_field, receiver) = setup(0);
        events(&receiver);
        assert!(!play_field.step(Position::new(1, 0)));
        assert_eq!(events(&receiver), vec![Event::CannotMove]);

        // Walking stops in front of the crate.
        assert!(play_field.step(Position::new(5, 1)));
        assert_eq!(play_field.level_map().worker_position(), Position::new(2, 1));

        // Targets off the worker's row and column are ignored.
        assert!(!play_field.step(Position::new(4, 2)));
        assert!(!play_field.push(Position::new(4, 2)));
        assert_eq!(play_field.history().len(), 1);
    }

    #[test]
    fn nothing_to_undo_or_redo() {
        let (mut play_field, receiver) = setup(0);
        events(&receiver);
        assert!(!play_field.undo());
        assert!(!play_field.redo());
        assert_eq!(
            events(&receiver),
            vec![Event::NothingToUndo, Event::NothingToRedo]
        );
    }

    #[test]
    fn walk_to() {
        let (mut play_field, receiver) = setup(0);
        events(&receiver);
        assert!(!play_field.walk_to(Position::new(4, 1)));
        assert_eq!(events(&receiver), vec![Event::NoPathFound]);

        assert!(play_field.walk_to(Position::new(2, 1)));
        assert_eq!(play_field.level_map().worker_position(), Position::new(2, 1));
        assert!(play_field.undo());
        assert_eq!(play_field.level_map().worker_position(), Position::new(1, 1));
        assert!(play_field.redo());
        assert_eq!(play_field.level_map().worker_position(), Position::new(2, 1));
    }

    #[test]
    fn broken_level_refuses_moves() {
        let (mut play_field, receiver) = setup(0);
        assert!(play_field.set_level(2));
        events(&receiver);
        assert!(!play_field.push(Position::new(2, 1)));
        assert_eq!(events(&receiver), vec![Event::BrokenLevel]);
        assert!(play_field.set_bookmark().is_none());
    }

    #[test]
    fn level_navigation() {
        let (mut play_field, receiver) = setup(0);
        events(&receiver);

        play_field.previous_level();
        play_field.next_level();
        assert_eq!(
            events(&receiver),
            vec![Event::FirstLevel, Event::LevelNotCompleted]
        );
        assert_eq!(play_field.level(), 0);

        finish_level(&mut play_field);
        assert_eq!(play_field.completed_levels(), 1);
        play_field.next_level();
        assert_eq!(play_field.level(), 1);
        assert_eq!(play_field.total_moves(), 0);
        assert!(play_field.history().is_empty());

        assert!(play_field.set_level(2));
        events(&receiver);
        play_field.next_level();
        assert_eq!(events(&receiver), vec![Event::LastLevel]);
        play_field.previous_level();
        assert_eq!(play_field.level(), 1);
        assert!(!play_field.set_level(3));
    }

    #[test]
    fn restart_level() {
        let (mut play_field, _receiver) = setup(0);
        play_field.execute(&Movement::Step {
            direction: Direction::Right,
        }
        .into());
        assert_eq!(play_field.total_moves(), 1);
        play_field.execute(&LevelManagement::ResetLevel.into());
        assert_eq!(play_field.total_moves(), 0);
        assert!(play_field.history().is_empty());
        assert_eq!(play_field.level_map().worker_position(), Position::new(1, 1));
    }

    #[test]
    fn directional_commands() {
        let (mut play_field, _receiver) = setup(0);
        play_field.execute(&Movement::WalkTillObstacle {
            direction: Direction::Right,
        }
        .into());
        assert_eq!(play_field.level_map().worker_position(), Position::new(2, 1));

        play_field.execute(&Movement::PushTillObstacle {
            direction: Direction::Right,
        }
        .into());
        assert_eq!(play_field.level_map().worker_position(), Position::new(4, 1));
        assert!(play_field.level_map().completed());

        play_field.execute(&Movement::Undo.into());
        play_field.execute(&Movement::Undo.into());
        assert_eq!(play_field.level_map().worker_position(), Position::new(1, 1));
        play_field.execute(&Movement::Redo.into());
        assert_eq!(play_field.level_map().worker_position(), Position::new(2, 1));
    }

    #[test]
    fn change_animation_speed() {
        let (mut play_field, _receiver) = setup(0);
        play_field.execute(&Command::ChangeAnimation(AnimationSpeed::new(1).unwrap()));
        assert_eq!(play_field.tick_interval(), Duration::from_millis(15));
        assert!(play_field.step(Position::new(2, 1)));
        assert!(!play_field.is_animating());
    }

    #[test]
    fn bookmarks() {
        let (mut play_field, receiver) = setup(0);
        assert!(play_field.step(Position::new(2, 1)));
        let bookmark = play_field.set_bookmark().unwrap();
        assert_eq!(bookmark.history, "1,1:r");

        play_field.restart_level();
        assert!(play_field.go_to_bookmark(&bookmark));
        assert_eq!(play_field.level_map().worker_position(), Position::new(2, 1));
        assert_eq!(play_field.history().len(), 1);

        events(&receiver);
        let bad = Bookmark {
            moves: 5,
            ..bookmark
        };
        assert!(!play_field.go_to_bookmark(&bad));
        assert!(events(&receiver).contains(&Event::BadBookmark));
    }

    #[test]
    fn progress_selects_level() {
        let mut progress = CollectionProgress::new("test");
        progress.level_completed(0);
        let (play_field, _receiver) = setup(0);
        let play_field = play_field.with_progress(progress);
        assert_eq!(play_field.level(), 1);
        assert_eq!(play_field.completed_levels(), 1);
    }

    #[test]
    fn same_collection_is_not_reloaded() {
        let (mut play_field, _receiver) = setup(0);
        assert!(play_field.set_level(1));
        play_field.change_collection(collection());
        assert_eq!(play_field.level(), 1);

        let other = LevelCollection::from_levels("other", vec![Level::parse(0, SHAFT).unwrap()]);
        play_field.change_collection(other);
        assert_eq!(play_field.level(), 0);
        assert_eq!(play_field.collection_name(), "other");
        assert_eq!(play_field.completed_levels(), 0);
    }
}
