mod input;

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use ansi_term::Colour::{Blue, Green, Red, White, Yellow};
use ansi_term::Style;

use skladnik_backend::*;

use self::input::Input;

/// A line-based front end. Every line read from stdin is turned into commands for the play
/// field, and the level is redrawn after every step.
pub struct Terminal {
    play_field: PlayField,
    events: Receiver<Event>,
    bookmark: Option<Bookmark>,
}

impl Terminal {
    pub fn new(mut play_field: PlayField) -> Self {
        let (sender, events) = channel();
        play_field.subscribe(sender);
        Terminal {
            play_field,
            events,
            bookmark: None,
        }
    }

    pub fn main_loop(mut self) -> io::Result<()> {
        self.handle_events();
        self.render()?;

        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match input::parse_line(&line?) {
                Ok(Input::Quit) => break,
                Ok(Input::Help) => println!("{}", input::HELP),
                Ok(Input::Commands(commands)) => {
                    for command in &commands {
                        self.play_field.execute(command);
                        self.animate()?;
                    }
                }
                Ok(Input::SetBookmark) => {
                    self.bookmark = self.play_field.set_bookmark();
                    if self.bookmark.is_some() {
                        println!("{}", Green.paint("Bookmark set"));
                    }
                }
                Ok(Input::GoToBookmark) => match self.bookmark.clone() {
                    Some(bookmark) => {
                        self.play_field.go_to_bookmark(&bookmark);
                    }
                    None => println!("{}", Yellow.paint("No bookmark set")),
                },
                Err(msg) => println!("{} (type ? for help)", Red.paint(msg)),
            }

            self.handle_events();
            self.render()?;
        }

        Ok(())
    }

    /// Replay the current move sequence at the configured speed.
    fn animate(&mut self) -> io::Result<()> {
        while self.play_field.is_animating() {
            self.render()?;
            thread::sleep(self.play_field.tick_interval());
            if !self.play_field.tick() {
                break;
            }
        }
        Ok(())
    }

    fn handle_events(&mut self) {
        for event in self.events.try_iter().collect::<Vec<_>>() {
            match event {
                Event::MoveWorker { .. } | Event::MoveCrate { .. } => trace!("{}", event),
                Event::InitialLevelState { .. } => info!("{}", event),
                Event::LevelCompleted { .. } => {
                    println!("{}", Green.bold().paint(event.to_string()));
                    if let Err(e) = self.play_field.progress().save() {
                        error!("Failed to save progress: {}", e);
                    }
                }
                _ if event.is_error() => println!("{}", Yellow.paint(event.to_string())),
                _ => {}
            }
        }
    }

    fn render(&self) -> io::Result<()> {
        let map = self.play_field.level_map();
        let stdout = io::stdout();
        let mut out = stdout.lock();

        writeln!(
            out,
            "{} level {}/{}  moves: {}  pushes: {}",
            White.bold().paint(self.play_field.collection_name()),
            self.play_field.level() + 1,
            self.play_field.collection().number_of_levels(),
            self.play_field.total_moves(),
            self.play_field.total_pushes()
        )?;
        for line in map.to_string().lines() {
            for c in line.chars() {
                write!(out, "{}", cell_style(c).paint(c.to_string()))?;
            }
            writeln!(out)?;
        }
        out.flush()
    }
}

fn cell_style(c: char) -> Style {
    match c {
        '#' => Blue.normal(),
        '$' => Yellow.normal(),
        '*' => Yellow.bold(),
        '.' => Red.normal(),
        '@' | '+' => Green.bold(),
        _ => Style::new(),
    }
}

pub fn print_collections_table() -> Result<(), SokobanError> {
    println!(
        " {}               {}",
        Yellow.bold().paint("File name"),
        Yellow.bold().paint("Collection name")
    );
    println!("{0}{0}{0}{0}{0}", "----------------");

    for name in available_collections()? {
        let collection = match LevelCollection::load(&name) {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Skipping '{}': {}", name, e);
                continue;
            }
        };
        let num_solved = CollectionProgress::load(&name).completed_levels;

        let padded_short_name = format!("{:<24}", name);
        let padded_full_name = format!("{:<36}", collection.name());

        if num_solved >= collection.number_of_levels() {
            println!(
                " {}{}{:>10} {}",
                Green.paint(padded_short_name),
                Green.bold().paint(padded_full_name),
                "",
                Green.paint("done")
            );
        } else {
            let solved = if num_solved == 0 {
                White.paint("solved")
            } else {
                Blue.paint("solved")
            };
            println!(
                " {}{}{:>10} {}",
                padded_short_name,
                White.bold().paint(padded_full_name),
                format!("{}/{}", num_solved, collection.number_of_levels()),
                solved
            );
        }
    }
    Ok(())
}
