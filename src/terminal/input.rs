use skladnik_backend::{AnimationSpeed, Command, Direction, LevelManagement, Movement, Position};

/// What a line typed by the user asks for.
#[derive(Debug)]
pub enum Input {
    Commands(Vec<Command>),
    SetBookmark,
    GoToBookmark,
    Help,
    Quit,
}

/// Parse one line of user input.
pub fn parse_line(line: &str) -> Result<Input, String> {
    use self::Command::*;
    use self::LevelManagement::*;
    use self::Movement::*;

    let words: Vec<&str> = line.split_whitespace().collect();
    let single = |command: Command| -> Result<Input, String> {
        Ok(Input::Commands(vec![command]))
    };

    match words.as_slice() {
        [] => Ok(Input::Commands(vec![])),
        ["q"] | ["quit"] => Ok(Input::Quit),
        ["?"] | ["help"] => Ok(Input::Help),
        ["z"] | ["undo"] => single(Movement(Undo)),
        ["y"] | ["redo"] => single(Movement(Redo)),
        ["n"] | ["next"] => single(LevelManagement(NextLevel)),
        ["p"] | ["previous"] => single(LevelManagement(PreviousLevel)),
        ["r"] | ["reset"] => single(LevelManagement(ResetLevel)),
        ["b"] | ["bookmark"] => Ok(Input::SetBookmark),
        ["g"] | ["goto"] => Ok(Input::GoToBookmark),
        ["load", name] => single(LevelManagement(LoadCollection(name.to_string()))),
        ["speed", n] => {
            let speed = n
                .parse::<u8>()
                .map_err(|e| e.to_string())
                .and_then(|n| AnimationSpeed::new(n).map_err(|e| e.to_string()))?;
            single(ChangeAnimation(speed))
        }
        ["walk", dir] => {
            let direction = word_to_direction(dir)?;
            single(Movement(WalkTillObstacle { direction }))
        }
        ["go", x, y] => single(Movement(WalkTo {
            position: parse_position(x, y)?,
        })),
        ["step", x, y] => single(Movement(StepTo {
            position: parse_position(x, y)?,
        })),
        ["push", x, y] => single(Movement(PushTo {
            position: parse_position(x, y)?,
        })),
        [moves] => moves
            .chars()
            .map(char_to_movement)
            .collect::<Result<Vec<_>, _>>()
            .map(Input::Commands),
        _ => Err(format!("Unknown command: {}", line.trim())),
    }
}

/// Lower case letters move a single cell, upper case letters push as far as possible.
fn char_to_movement(c: char) -> Result<Command, String> {
    let direction = match c.to_ascii_lowercase() {
        'w' => Direction::Up,
        'a' => Direction::Left,
        's' => Direction::Down,
        'd' => Direction::Right,
        _ => return Err(format!("Unknown move '{}'", c)),
    };
    Ok(Command::Movement(if c.is_ascii_uppercase() {
        Movement::PushTillObstacle { direction }
    } else {
        Movement::Step { direction }
    }))
}

fn word_to_direction(word: &str) -> Result<Direction, String> {
    match word {
        "w" | "up" => Ok(Direction::Up),
        "a" | "left" => Ok(Direction::Left),
        "s" | "down" => Ok(Direction::Down),
        "d" | "right" => Ok(Direction::Right),
        _ => Err(format!("Unknown direction '{}'", word)),
    }
}

fn parse_position(x: &str, y: &str) -> Result<Position, String> {
    let x = x.parse().map_err(|_| format!("Invalid column '{}'", x))?;
    let y = y.parse().map_err(|_| format!("Invalid row '{}'", y))?;
    Ok(Position::new(x, y))
}

pub const HELP: &str = "\
w a s d        move one cell, pushing a crate if there is one
W A S D        push as far as possible
walk DIR       walk until something is in the way
go X Y         walk to the given cell
step X Y       walk towards the given cell in the same row or column
push X Y       push towards the given cell in the same row or column
z / y          undo / redo
r / n / p      restart / next level / previous level
b / g          set bookmark / go to bookmark
speed N        animation speed from 0 (none) to 3 (slow)
load NAME      switch to another collection
q              quit";
