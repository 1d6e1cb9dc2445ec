//! Processed vocabulary entries.
use std::fmt::Write;
use std::path::PathBuf;

use cooljugator::ConjugationTable;
use serde::{Deserialize, Serialize};

/// A processed vocabulary item.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct Entry {
    /// The lowercased word
    pub word: String,
    /// Part of speech, `verb` when conjugations were found
    pub pos: String,
    /// Translation from the dictionary, empty if none was found
    pub translation: String,
    /// Definition from the online dictionary, empty if none was found
    pub definition: String,
    /// Conjugation table of the selected variants, if the word is a verb
    pub conjugations: Option<ConjugationTable>,
    /// `[sound:…]` tag of the pronunciation, empty if none was synthesized
    pub audio_tag: String,
    /// Location of the pronunciation on disk
    #[serde(skip)]
    pub audio_path: Option<PathBuf>,
}

impl Entry {
    /// The front of the card: the word followed by its sound tag.
    #[must_use]
    pub fn expression(&self) -> String {
        if self.audio_tag.is_empty() {
            self.word.clone()
        } else {
            format!("{} {}", self.word, self.audio_tag)
        }
    }

    /// The definition followed by the conjugation table, if any.
    #[must_use]
    pub fn extra(&self) -> String {
        let mut extra = self.definition.clone();

        if let Some(conjugations) = self.conjugations.as_ref().filter(|c| !c.is_empty()) {
            extra.push_str("<br><pre>");

            for (variant, tenses) in conjugations.iter() {
                let _ = write!(extra, "<b>{variant}</b>:<br>");

                for (tense, form) in tenses {
                    let _ = write!(extra, "{tense}: {form}<br>");
                }

                extra.push_str("<br>");
            }

            extra.push_str("</pre>");
        }

        extra
    }

    /// The note fields in model order: expression, meaning and extra.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        vec![self.expression(), self.translation.clone(), self.extra()]
    }
}

#[cfg(test)]
mod tests {
    use cooljugator::Tense;

    use super::*;

    fn entry() -> Entry {
        Entry {
            word: "hus".to_string(),
            pos: "noun".to_string(),
            translation: "house".to_string(),
            definition: "bygning".to_string(),
            conjugations: None,
            audio_tag: "[sound:hus.mp3]".to_string(),
            audio_path: Some(PathBuf::from("audio/hus.mp3")),
        }
    }

    #[test]
    fn fields_without_conjugations() {
        assert_eq!(
            entry().fields(),
            vec!["hus [sound:hus.mp3]", "house", "bygning"]
        );
    }

    #[test]
    fn expression_without_audio() {
        let entry = Entry {
            audio_tag: String::new(),
            ..entry()
        };

        assert_eq!(entry.expression(), "hus");
    }

    #[test]
    fn extra_with_conjugations() {
        let mut table = ConjugationTable::new();
        table.insert("Bokmål", Tense::Present, "snakker (speak)");
        table.insert("Bokmål", Tense::Past, "snakket (spoke)");
        table.insert("Nynorsk", Tense::Present, "snakkar (speak)");

        let entry = Entry {
            word: "snakke".to_string(),
            pos: "verb".to_string(),
            definition: "tale".to_string(),
            conjugations: Some(table),
            ..entry()
        };

        assert_eq!(
            entry.extra(),
            "tale<br><pre><b>Bokmål</b>:<br>present: snakker (speak)<br>past: snakket (spoke)<br>\
             <br><b>Nynorsk</b>:<br>present: snakkar (speak)<br><br></pre>"
        );
    }

    #[test]
    fn serializes_without_audio_path() {
        let json = serde_json::to_value(entry()).expect("json");

        assert_eq!(
            json,
            serde_json::json!({
                "word": "hus",
                "pos": "noun",
                "translation": "house",
                "definition": "bygning",
                "conjugations": null,
                "audio_tag": "[sound:hus.mp3]",
            })
        );
    }
}
