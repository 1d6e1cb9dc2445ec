//! Anki deck structures and `.apkg` packaging.
//!
//! A package is a zip archive holding a SQLite collection (`collection.anki2`), a `media` index
//! mapping numeric archive names to file names, and the media files themselves.
use sha2::{Digest, Sha256};

use crate::config::DeckConfig;
use crate::entry::Entry;

mod package;
mod schema;

pub use package::{Media, Package};

/// Characters used to encode note guids, as Anki does.
const BASE91_TABLE: &[u8; 91] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789\
!#$%&()*+,-./:;<=>?@[]^_`{|}~";

/// The CSS applied to every card of the default model.
const DEFAULT_CSS: &str = ".card {\n font-family: arial;\n font-size: 20px;\n text-align: center;\n color: black;\n background-color: white;\n}\n";

/// A card template of a note model.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Template {
    /// Name of the card type
    pub name: String,
    /// Question format
    pub qfmt: String,
    /// Answer format
    pub afmt: String,
}

/// A note model (note type): its fields and card templates.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Model {
    pub id: i64,
    pub name: String,
    pub fields: Vec<String>,
    pub templates: Vec<Template>,
    pub css: String,
}

/// A single note.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Note {
    /// Field values in model order
    pub fields: Vec<String>,
    /// Globally unique id Anki uses to match notes across imports
    pub guid: String,
    /// Space-separated tags
    pub tags: Vec<String>,
}

/// A deck of notes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub notes: Vec<Note>,
}

impl Model {
    /// The vocabulary model: the expression with its audio on the front, the meaning and extra
    /// information on the back.
    #[must_use]
    pub fn vocabulary(id: i64, name: impl Into<String>) -> Model {
        Model {
            id,
            name: name.into(),
            fields: vec![
                String::from("Expression"),
                String::from("Meaning"),
                String::from("Extra"),
            ],
            templates: vec![Template {
                name: String::from("Card 1"),
                qfmt: String::from("{{Expression}}"),
                afmt: String::from("{{FrontSide}}<hr id=answer>{{Meaning}}<br>{{Extra}}"),
            }],
            css: String::from(DEFAULT_CSS),
        }
    }

    /// Returns the model described by the deck configuration.
    #[must_use]
    pub fn from_config(config: &DeckConfig) -> Model {
        Model::vocabulary(config.model_id, &config.model_name)
    }

    /// Returns, per template, the ordinals of the fields referenced by its question.
    ///
    /// A card is generated when any of them is non-empty.
    #[must_use]
    pub fn required_fields(&self) -> Vec<Vec<usize>> {
        self.templates
            .iter()
            .map(|template| {
                self.fields
                    .iter()
                    .enumerate()
                    .filter(|(_, name)| template.qfmt.contains(&format!("{{{{{name}}}}}")))
                    .map(|(ord, _)| ord)
                    .collect()
            })
            .collect()
    }
}

impl Note {
    /// Creates a note whose guid is derived from its first field.
    #[must_use]
    pub fn new(fields: Vec<String>) -> Note {
        let guid = guid_for(fields.first().map_or("", String::as_str));

        Note {
            fields,
            guid,
            tags: Vec::new(),
        }
    }

    /// Creates a note for a vocabulary entry.
    #[must_use]
    pub fn from_entry(entry: &Entry) -> Note {
        Note::new(entry.fields())
    }
}

impl Deck {
    /// Creates an empty deck.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Deck {
        Deck {
            id,
            name: name.into(),
            notes: Vec::new(),
        }
    }

    /// Creates an empty deck from the deck configuration.
    #[must_use]
    pub fn from_config(config: &DeckConfig) -> Deck {
        Deck::new(config.id, &config.name)
    }

    /// Appends a note.
    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }
}

/// Returns a stable guid for `value`: the first 8 bytes of its SHA-256 digest, base91-encoded.
#[must_use]
pub fn guid_for(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);

    let mut num = u64::from_be_bytes(bytes);
    let mut encoded = Vec::new();

    while num > 0 {
        #[allow(clippy::cast_possible_truncation)]
        encoded.push(BASE91_TABLE[(num % 91) as usize]);
        num /= 91;
    }

    if encoded.is_empty() {
        encoded.push(BASE91_TABLE[0]);
    }

    encoded.reverse();

    String::from_utf8_lossy(&encoded).into_owned()
}
