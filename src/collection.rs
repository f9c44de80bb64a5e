use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::level::*;
use crate::util::*;

/// A collection of levels.
#[derive(Debug, Clone)]
pub struct LevelCollection {
    /// The full name of the collection.
    name: String,

    /// The name of the file containing the level collection.
    short_name: String,

    description: Option<String>,

    levels: Vec<Level>,
}

impl LevelCollection {
    pub fn from_levels(name: &str, levels: Vec<Level>) -> Self {
        LevelCollection {
            name: name.into(),
            short_name: name.into(),
            description: None,
            levels,
        }
    }

    /// Load a level set with the given name, whatever the format might be.
    pub fn load(short_name: &str) -> Result<Self, SokobanError> {
        let mut level_path = ASSETS.join("levels").join(short_name);
        level_path.set_extension("lvl");

        let collection = match File::open(&level_path) {
            Ok(mut file) => {
                let mut content = String::new();
                file.read_to_string(&mut content)?;
                Self::parse_lvl(short_name, &content)?
            }
            Err(_) => {
                level_path.set_extension("slc");
                let file = File::open(&level_path)?;
                Self::parse_xml(short_name, BufReader::new(file))?
            }
        };

        info!(
            "Loaded collection '{}' with {} levels",
            collection.name,
            collection.levels.len()
        );
        Ok(collection)
    }

    /// Parse a bunch of levels separated by empty lines, i.e. the usual ASCII format. A block of
    /// text before the first level is taken as the collection's title and description.
    pub fn parse_lvl(short_name: &str, content: &str) -> Result<Self, SokobanError> {
        let mut name = None;
        let mut description = None;
        let mut levels = vec![];

        for block in blocks(content) {
            if looks_like_level(&block) {
                levels.push(Level::parse(levels.len(), &block)?);
            } else if levels.is_empty() && name.is_none() {
                let mut lines = block.lines();
                name = lines.next().map(|l| l.trim().to_string());
                let rest = lines.collect::<Vec<_>>().join("\n");
                if !rest.trim().is_empty() {
                    description = Some(rest.trim().to_string());
                }
            }
        }

        if levels.is_empty() {
            return Err(SokobanError::NoLevel(0));
        }

        Ok(LevelCollection {
            name: name.unwrap_or_else(|| short_name.to_string()),
            short_name: short_name.to_string(),
            description,
            levels,
        })
    }

    /// Parse a level set in the XML-based .slc format.
    pub fn parse_xml<R: BufRead>(short_name: &str, input: R) -> Result<Self, SokobanError> {
        use quick_xml::events::Event as XmlEvent;
        use quick_xml::Reader;

        enum State {
            Nothing,
            Title,
            Description,
            Line,
        }

        let mut reader = Reader::from_reader(input);
        let mut state = State::Nothing;

        let mut title = String::new();
        let mut description = String::new();
        let mut levels = vec![];
        let mut level_lines = String::new();

        let mut buf = Vec::new();
        loop {
            match reader.read_event(&mut buf)? {
                XmlEvent::Start(ref e) => match e.name() {
                    b"Title" => {
                        state = State::Title;
                        title.clear();
                    }
                    b"Description" => state = State::Description,
                    b"Level" => level_lines.clear(),
                    b"L" => state = State::Line,
                    _ => {}
                },

                XmlEvent::End(ref e) => match e.name() {
                    b"Title" | b"Description" => state = State::Nothing,
                    b"Level" => levels.push(Level::parse(levels.len(), &level_lines)?),
                    b"L" => {
                        state = State::Nothing;
                        level_lines.push('\n');
                    }
                    _ => {}
                },

                XmlEvent::Empty(ref e) if e.name() == b"L" => level_lines.push('\n'),

                XmlEvent::Text(ref e) => {
                    let s = e.unescape_and_decode(&reader)?;
                    match state {
                        State::Nothing => {}
                        State::Title => title.push_str(&s),
                        State::Description => description.push_str(&s),
                        State::Line => level_lines.push_str(&s),
                    }
                }

                XmlEvent::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if levels.is_empty() {
            return Err(SokobanError::NoLevel(0));
        }

        let description = description.trim();
        Ok(LevelCollection {
            name: if title.trim().is_empty() {
                short_name.to_string()
            } else {
                title.trim().to_string()
            },
            short_name: short_name.to_string(),
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            levels,
        })
    }

    // Accessor methods

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn number_of_levels(&self) -> usize {
        self.levels.len()
    }
}

/// Split the content of a .lvl file at empty lines.
fn blocks(content: &str) -> Vec<String> {
    let mut result = vec![];
    let mut current: Vec<&str> = vec![];
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                result.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        result.push(current.join("\n"));
    }
    result
}

/// Levels are the blocks with at least one line starting with a wall.
fn looks_like_level(block: &str) -> bool {
    block
        .lines()
        .any(|line| line.trim_start().starts_with('#'))
}

/// The short names of all collections in the assets directory, in natural order.
pub fn available_collections() -> Result<Vec<String>, SokobanError> {
    collections_in(&ASSETS.join("levels"))
}

fn collections_in(dir: &Path) -> Result<Vec<String>, SokobanError> {
    let mut names = vec![];
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_collection = path
            .extension()
            .map_or(false, |ext| ext == OsStr::new("lvl") || ext == OsStr::new("slc"));
        if let (true, Some(name)) = (is_collection, path.file_stem().and_then(|s| s.to_str())) {
            names.push(name.to_string());
        }
    }
    names.sort_by(|x, y| natord::compare(x, y));
    names.dedup();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LVL: &str = "Tiny Set\n\
                       Two small levels.\n\
                       \n\
                       ; 1\n\
                       #####\n\
                       #@$.#\n\
                       #####\n\
                       \n\
                       \n\
                       ; 2\n\
                       ######\n\
                       #@ $.#\n\
                       ######\n";

    #[test]
    fn parse_lvl() {
        let collection = LevelCollection::parse_lvl("tiny", LVL).unwrap();
        assert_eq!(collection.name(), "Tiny Set");
        assert_eq!(collection.short_name(), "tiny");
        assert_eq!(collection.description(), Some("Two small levels."));
        assert_eq!(collection.number_of_levels(), 2);
        assert_eq!(collection.level(1).unwrap().index(), 1);
        assert_eq!(collection.level(1).unwrap().columns(), 6);
        assert!(collection.level(2).is_none());
    }

    #[test]
    fn lvl_without_title() {
        let collection = LevelCollection::parse_lvl("plain", "####\n#@.#\n#$ #\n####").unwrap();
        assert_eq!(collection.name(), "plain");
        assert_eq!(collection.description(), None);
        assert_eq!(collection.number_of_levels(), 1);
    }

    #[test]
    fn lvl_errors() {
        assert!(LevelCollection::parse_lvl("empty", "Nothing here").is_err());
        assert!(LevelCollection::parse_lvl("bad", "####\n#@$.#\n####\n\n####\n#@$.#X\n####").is_err());
    }

    #[test]
    fn parse_slc() {
        let xml = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<SokobanLevels>
  <Title>XML Set</Title>
  <Description>
    One level only.
  </Description>
  <LevelCollection>
    <Level Id="1" Width="5" Height="3">
      <L>#####</L>
      <L>#@$.#</L>
      <L>#####</L>
    </Level>
  </LevelCollection>
</SokobanLevels>"#;
        let collection = LevelCollection::parse_xml("xml", xml.as_bytes()).unwrap();
        assert_eq!(collection.name(), "XML Set");
        assert_eq!(collection.description(), Some("One level only."));
        assert_eq!(collection.number_of_levels(), 1);

        let level = collection.level(0).unwrap();
        assert_eq!(level.columns(), 5);
        assert_eq!(level.rows(), 3);
        assert!(level.is_good());
    }

    #[test]
    fn bundled_collections() {
        let names = available_collections().unwrap();
        assert!(names.contains(&"tutorial".to_string()));
        for name in names {
            let collection = LevelCollection::load(&name).unwrap();
            assert!(collection.number_of_levels() > 0, "{} is empty", name);
        }
    }
}
