#[macro_use]
extern crate log;

mod terminal;

use std::process;

use clap::{Arg, ArgAction};

use skladnik_backend::*;

use crate::terminal::Terminal;

fn main() {
    colog::init();

    let matches = clap::Command::new("skladnik")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Play Sokoban in the terminal")
        .arg(
            Arg::new("collection")
                .value_name("NAME")
                .help("The level collection to play")
                .default_value("tutorial"),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("level")
                .value_name("N")
                .help("Start at the given level, counting from 1")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("anim-speed")
                .short('s')
                .long("anim-speed")
                .value_name("SPEED")
                .help("Animation speed from 0 (none) to 3 (slow)")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List all available level collections")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_one::<bool>("list").copied().unwrap_or(false) {
        if let Err(e) = terminal::print_collections_table() {
            error!("Failed to list collections: {}", e);
            process::exit(1);
        }
        return;
    }

    let mut settings = Settings::load();
    if let Some(&speed) = matches.get_one::<u8>("anim-speed") {
        match AnimationSpeed::new(speed) {
            Ok(speed) => settings.animation_speed = speed,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        }
    }

    let name = matches
        .get_one::<String>("collection")
        .map(String::as_str)
        .unwrap_or("tutorial");
    let play_field = LevelCollection::load(name)
        .and_then(|collection| PlayField::new(collection, settings))
        .map(|play_field| play_field.with_progress(CollectionProgress::load(name)));
    let mut play_field = match play_field {
        Ok(play_field) => play_field,
        Err(e) => {
            error!("Failed to load level set '{}': {}", name, e);
            process::exit(1);
        }
    };

    if let Some(&level) = matches.get_one::<usize>("level") {
        if level == 0 || !play_field.set_level(level - 1) {
            error!("There is no level {} in '{}'", level, name);
            process::exit(1);
        }
    }

    if let Err(e) = Terminal::new(play_field).main_loop() {
        error!("{}", e);
        process::exit(1);
    }
}
