//! Error types

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Application errors for configuration, input files and package output.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The layered configuration could not be extracted.
    #[error("Could not load configuration")]
    #[diagnostic(code(ordkort::config))]
    Config(#[source] Box<figment::Error>),
    /// The shared HTTP client could not be built.
    #[error("Could not construct HTTP client")]
    #[diagnostic(code(ordkort::http_client))]
    BuildHttpClient(#[source] reqwest::Error),
    /// The translation dictionary could not be read.
    #[error("Could not read dictionary {}", path.display())]
    #[diagnostic(code(ordkort::dictionary_read))]
    ReadDictionary {
        /// Path of the dictionary file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The translation dictionary is not a JSON object of strings or string lists.
    #[error("Could not parse dictionary {}", path.display())]
    #[diagnostic(code(ordkort::dictionary_parse))]
    ParseDictionary {
        /// Path of the dictionary file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// Translations are enabled but the dictionary has no entries.
    #[error("Dictionary is empty or missing")]
    #[diagnostic(
        code(ordkort::empty_dictionary),
        help("check `dictionary_file`, or set `enable_translation = false`")
    )]
    EmptyDictionary,
    /// The word list could not be read.
    #[error("Could not read word list {}", path.display())]
    #[diagnostic(code(ordkort::words_read))]
    ReadWords {
        /// Path of the word list.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The word list contained nothing to process.
    #[error("No entries processed")]
    #[diagnostic(
        code(ordkort::no_entries),
        help("add one word per line; blank lines and lines starting with `#` are skipped")
    )]
    NoEntries,
    /// The JSON export could not be written.
    #[error("Could not write JSON export {}", path.display())]
    #[diagnostic(code(ordkort::json_write))]
    WriteJson {
        /// Path of the JSON export.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The entries could not be serialized.
    #[error("Could not serialize entries")]
    SerializeJson(#[source] serde_json::Error),
    /// The deck metadata could not be serialized.
    #[error("Could not serialize deck metadata")]
    SerializeDeck(#[source] serde_json::Error),
    /// The collection database could not be created or written.
    #[error("Could not write collection database")]
    #[diagnostic(code(ordkort::collection))]
    Collection(#[from] sqlx::Error),
    /// The package archive could not be written.
    #[error("Could not write package archive")]
    #[diagnostic(code(ordkort::archive))]
    Archive(#[from] zip::result::ZipError),
    /// A file needed for the package could not be read or written.
    #[error("Could not access {}", path.display())]
    #[diagnostic(code(ordkort::package_io))]
    PackageIo {
        /// Path of the file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}
