//! Translation lookup in a local JSON dictionary.
//!
//! Dictionary keys often carry alternate forms in parentheses, e.g. `"bok (bøker)"` or
//! `"gå (gikk)"`. On load, every key is indexed under a set of aliases so that a plain input word
//! like `bøker` still resolves to its entry.
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Error;
use crate::utils::strip_parentheticals;

/// Matches a word immediately followed by a parenthetical alternate form.
static ALTERNATE_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^\s(]+)\s*\(([^)]+)\)").expect("alternate form regex")
});

/// The translation of a dictionary key.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Translation {
    /// A single translation.
    One(String),
    /// Several translations, rendered separated by `"; "`.
    Many(Vec<String>),
}

/// A translation dictionary along with its alias index.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    /// Dictionary keys in file order.
    entries: IndexMap<String, Translation>,
    /// Maps every alias to the original key it was derived from.
    aliases: IndexMap<String, String>,
}

impl Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Translation::One(translation) => f.write_str(translation),
            Translation::Many(translations) => f.write_str(&translations.join("; ")),
        }
    }
}

impl Dictionary {
    /// Loads a dictionary from a JSON object mapping words to a translation or a list of
    /// translations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadDictionary`] if the file can't be read and [`Error::ParseDictionary`]
    /// if it isn't a JSON object of strings or lists of strings.
    pub fn load(path: impl AsRef<Path>) -> Result<Dictionary, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::ReadDictionary {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: IndexMap<String, Translation> =
            serde_json::from_str(&contents).map_err(|source| Error::ParseDictionary {
                path: path.to_path_buf(),
                source,
            })?;
        let dictionary = Dictionary::from_entries(entries);

        info!(
            ?path,
            num_entries = dictionary.len(),
            num_aliases = dictionary.aliases.len(),
            "loaded dictionary"
        );

        Ok(dictionary)
    }

    /// Builds a dictionary from `(key, translation)` pairs, preserving their order.
    pub fn from_entries<K>(entries: impl IntoIterator<Item = (K, Translation)>) -> Dictionary
    where
        K: Into<String>,
    {
        let entries: IndexMap<String, Translation> = entries
            .into_iter()
            .map(|(key, translation)| (key.into(), translation))
            .collect();
        let aliases = build_aliases(entries.keys());

        Dictionary { entries, aliases }
    }

    /// Returns the rendered translation of `word`, if any.
    ///
    /// The word is matched, in order, against the dictionary keys, the derived aliases, and
    /// finally the aliases ignoring case.
    #[must_use]
    pub fn translation(&self, word: &str) -> Option<String> {
        if let Some(translation) = self.entries.get(word) {
            return Some(translation.to_string());
        }

        let key = self.aliases.get(word).or_else(|| {
            let word = word.to_lowercase();

            self.aliases
                .iter()
                .find(|(alias, _)| alias.to_lowercase() == word)
                .map(|(_, key)| key)
        })?;

        debug!(%word, %key, "resolved word through alias");

        self.entries.get(key).map(ToString::to_string)
    }

    /// Returns the number of dictionary keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the dictionary has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derives the alias index for the given keys.
///
/// Each key maps to itself, and its parenthesis-free form maps to it as well; both overwrite
/// earlier mappings. Every `main (alternate)` pair inside the key adds `main` and `alternate`
/// only if they aren't mapped yet.
fn build_aliases<'a>(keys: impl Iterator<Item = &'a String>) -> IndexMap<String, String> {
    let mut aliases = IndexMap::new();

    for key in keys {
        aliases.insert(key.clone(), key.clone());

        let clean = strip_parentheticals(key);

        if clean != key.as_str() {
            aliases.insert(clean.into_owned(), key.clone());
        }

        for captures in ALTERNATE_FORM.captures_iter(key) {
            let (_, [main, alternate]) = captures.extract();

            aliases
                .entry(main.to_string())
                .or_insert_with(|| key.clone());
            aliases
                .entry(alternate.to_string())
                .or_insert_with(|| key.clone());
        }
    }

    aliases
}
