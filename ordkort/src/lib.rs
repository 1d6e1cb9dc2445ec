//! Converts a list of Norwegian words into a flashcard deck.
//!
//! Every word is looked up in a local translation dictionary, a definition is scraped from an
//! online dictionary, verb conjugations are fetched from cooljugator.com, and pronunciation audio
//! is synthesized. The results are written as a JSON export and an Anki package.
pub mod audio;
pub mod config;
pub mod consts;
pub mod deck;
pub mod definition;
pub mod dictionary;
pub mod entry;
mod error;
pub mod export;
pub mod http;
pub mod processor;
pub mod telemetry;
pub mod utils;

pub use config::Config;
pub use entry::Entry;
pub use error::Error;
pub use processor::VocabProcessor;
