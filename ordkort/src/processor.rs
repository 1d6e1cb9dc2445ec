//! The word list to flashcard pipeline.
use std::fs;
use std::path::Path;

use cooljugator::ConjugationTable;
use tracing::{debug, info, warn};

use crate::audio::{AudioCache, GoogleTts, Synthesizer};
use crate::config::Config;
use crate::consts;
use crate::deck::Package;
use crate::definition::DefinitionFetcher;
use crate::dictionary::Dictionary;
use crate::entry::Entry;
use crate::export::save_json;
use crate::{Error, http};

/// Turns words into [`Entry`]s and writes the JSON export and the Anki package.
pub struct VocabProcessor<S = GoogleTts> {
    config: Config,
    dictionary: Dictionary,
    conjugator: cooljugator::Client,
    definitions: DefinitionFetcher,
    audio: Option<AudioCache<S>>,
}

impl VocabProcessor<GoogleTts> {
    /// Creates a processor with every source configured from `config`, sharing one HTTP client.
    ///
    /// The dictionary is only loaded when translations are enabled. A missing dictionary file
    /// is logged and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BuildHttpClient`] if the HTTP client can't be built, or a dictionary
    /// error if the dictionary exists but can't be read or parsed.
    pub fn from_config(config: Config) -> Result<Self, Error> {
        let client = http::build_client(&config.http)?;
        let dictionary = if config.enable_translation {
            load_dictionary(&config.dictionary_file)?
        } else {
            Dictionary::default()
        };
        let conjugator = cooljugator::Client::with_client(client.clone())
            .with_base_url(config.conjugation.base_url.as_str());
        let definitions = DefinitionFetcher::new(client.clone(), &config.definition);
        let audio = config.audio.enabled.then(|| {
            AudioCache::from_config(
                GoogleTts::new(client, config.audio.base_url.as_str()),
                &config.audio,
            )
        });

        Ok(VocabProcessor::new(
            config,
            dictionary,
            conjugator,
            definitions,
            audio,
        ))
    }
}

impl<S: Synthesizer> VocabProcessor<S> {
    /// Creates a processor from its parts.
    #[must_use]
    pub const fn new(
        config: Config,
        dictionary: Dictionary,
        conjugator: cooljugator::Client,
        definitions: DefinitionFetcher,
        audio: Option<AudioCache<S>>,
    ) -> Self {
        VocabProcessor {
            config,
            dictionary,
            conjugator,
            definitions,
            audio,
        }
    }

    /// Processes the configured word list, then writes the JSON export and the package.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDictionary`] if translations are enabled without a dictionary,
    /// [`Error::NoEntries`] if the word list holds no words, or an error writing either output.
    pub async fn run(&self) -> Result<Vec<Entry>, Error> {
        if self.config.enable_translation && self.dictionary.is_empty() {
            return Err(Error::EmptyDictionary);
        }

        let words = read_words(&self.config.words_file)?;
        let entries = self.process(&words).await;

        if entries.is_empty() {
            return Err(Error::NoEntries);
        }

        save_json(&self.config.output.json, &entries)?;

        Package::from_entries(&self.config.deck, &entries)
            .write_to_file(&self.config.output.package)
            .await?;

        info!("Created {} flashcards", entries.len());

        Ok(entries)
    }

    /// Processes `words` in order.
    pub async fn process(&self, words: &[String]) -> Vec<Entry> {
        let total = words.len();
        let mut entries = Vec::with_capacity(total);

        for (n, word) in words.iter().enumerate() {
            info!(%word, "processing {}/{total}", n + 1);

            entries.push(self.process_word(word).await);
        }

        entries
    }

    /// Builds the entry for a single word.
    ///
    /// Every source is optional: failures are logged and leave the corresponding field empty.
    #[tracing::instrument(skip(self))]
    pub async fn process_word(&self, word: &str) -> Entry {
        let conjugations = match self.conjugator.conjugate(word).await {
            Ok(table) => table.map(|table| self.select_variants(word, &table)),
            Err(err) => {
                warn!(%word, %err, "could not fetch conjugations");

                None
            }
        };
        let pos = if conjugations.is_some() {
            consts::VERB_POS.to_string()
        } else {
            self.config.default_pos.clone()
        };
        let translation = self.translation(word);
        let definition = match self.definitions.definition(word).await {
            Ok(definition) => definition.unwrap_or_default(),
            Err(err) => {
                warn!(%word, %err, "could not fetch definition");

                String::new()
            }
        };
        let audio = match &self.audio {
            Some(cache) => cache.create_audio(word).await,
            None => None,
        };
        let (audio_tag, audio_path) = audio.map_or_else(
            || (String::new(), None),
            |audio| (audio.tag, Some(audio.path)),
        );

        debug!(%word, %pos, "processed word");

        Entry {
            word: word.to_string(),
            pos,
            translation,
            definition,
            conjugations,
            audio_tag,
            audio_path,
        }
    }

    fn translation(&self, word: &str) -> String {
        if !self.config.enable_translation {
            return String::new();
        }

        self.dictionary.translation(word).unwrap_or_else(|| {
            warn!(%word, "no translation found");

            String::new()
        })
    }

    /// Narrows `table` to the configured variants, keeping all of them if none are present.
    fn select_variants(&self, word: &str, table: &ConjugationTable) -> ConjugationTable {
        let wanted = &self.config.variants;

        if !wanted.iter().any(|variant| table.get(variant).is_some()) {
            warn!(
                %word,
                ?wanted,
                available = ?table.variant_names().collect::<Vec<_>>(),
                "none of the configured variants found, keeping all"
            );
        }

        table.select_variants(wanted)
    }
}

/// Reads the word list at `path`: one word per line, trimmed and lowercased. Blank lines and
/// lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns [`Error::ReadWords`] if the file can't be read.
pub fn read_words(path: impl AsRef<Path>) -> Result<Vec<String>, Error> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| Error::ReadWords {
        path: path.to_path_buf(),
        source,
    })?;
    let words = parse_words(&contents);

    info!(?path, num_words = words.len(), "read word list");

    Ok(words)
}

fn parse_words(contents: &str) -> Vec<String> {
    contents
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

/// Loads the dictionary at `path`, or an empty one if the file doesn't exist.
fn load_dictionary(path: &Path) -> Result<Dictionary, Error> {
    if path.exists() {
        Dictionary::load(path)
    } else {
        warn!(?path, "dictionary file not found");

        Ok(Dictionary::default())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bytes::Bytes;
    use cooljugator::Tense;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::audio;
    use crate::definition::Source;
    use crate::dictionary::Translation;

    struct SilentSynthesizer;

    #[async_trait]
    impl Synthesizer for SilentSynthesizer {
        async fn synthesize(&self, _text: &str, _language: &str) -> Result<Bytes, audio::Error> {
            Ok(Bytes::from_static(b"ID3"))
        }
    }

    const CONJUGATION_PAGE: &str = r#"
        <html><body><section id="conjugations">
          <span class="tense-title-space">Bokmål present tense</span>
          <div class="forms-wrapper">
            <div class="meta-form">snakker</div><div class="meta-translation">speak</div>
          </div>
          <span class="tense-title-space">Nynorsk present tense</span>
          <div class="forms-wrapper">
            <div class="meta-form">snakkar</div><div class="meta-translation">speak</div>
          </div>
        </section></body></html>
    "#;

    fn processor(
        server: &MockServer,
        config: Config,
        audio_dir: Option<&Path>,
    ) -> VocabProcessor<SilentSynthesizer> {
        let client = reqwest::Client::new();
        let dictionary = Dictionary::from_entries([
            ("snakke", Translation::One("to speak".to_string())),
            ("hus", Translation::One("house".to_string())),
        ]);
        let conjugator = cooljugator::Client::with_client(client.clone()).with_base_url(server.uri());
        let definitions = DefinitionFetcher::with_base_url(
            client,
            Source::Ordbokene,
            format!("{}/def/", server.uri()),
        );
        let audio = audio_dir.map(|dir| AudioCache::new(SilentSynthesizer, dir, "no"));

        VocabProcessor::new(config, dictionary, conjugator, definitions, audio)
    }

    #[test]
    fn parse_word_list() {
        let words = parse_words("Hus\n\n  # comment\n  Snakke  \n#skip\nBOK (bøker)\n");

        assert_eq!(words, vec!["hus", "snakke", "bok (bøker)"]);
    }

    #[test]
    fn parse_word_list_with_any_line_ending() {
        let words = parse_words("hus\rbok\r\ngå\n");

        assert_eq!(words, vec!["hus", "bok", "gå"]);
    }

    #[test]
    fn read_missing_word_list() {
        let result = read_words("/nonexistent/words.txt");

        assert!(matches!(result, Err(Error::ReadWords { .. })));
    }

    #[tokio::test]
    async fn process_verb() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("temp dir");

        Mock::given(method("GET"))
            .and(path("/no/snakke"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CONJUGATION_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/def/snakke"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<div class="definition">si ord</div>"#),
            )
            .mount(&server)
            .await;

        let processor = processor(&server, Config::default(), Some(dir.path()));
        let entry = processor.process_word("snakke").await;

        assert_eq!(entry.pos, "verb");
        assert_eq!(entry.translation, "to speak");
        assert_eq!(entry.definition, "si ord");
        assert_eq!(entry.audio_tag, "[sound:snakke.mp3]");
        assert_eq!(entry.audio_path, Some(dir.path().join("snakke.mp3")));

        let conjugations = entry.conjugations.expect("conjugations");

        assert_eq!(conjugations.len(), 1);
        assert_eq!(
            conjugations.get("Bokmål").and_then(|t| t.get(&Tense::Present)),
            Some(&"snakker (speak)".to_string())
        );
    }

    #[tokio::test]
    async fn process_unknown_word() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let processor = processor(&server, Config::default(), None);
        let entry = processor.process_word("blåbærsyltetøy").await;

        assert_eq!(entry.pos, "noun");
        assert_eq!(entry.translation, "");
        assert_eq!(entry.definition, "");
        assert_eq!(entry.conjugations, None);
        assert_eq!(entry.audio_tag, "");
        assert_eq!(entry.expression(), "blåbærsyltetøy");
    }

    #[tokio::test]
    async fn keeps_all_variants_when_none_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/no/snakke"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CONJUGATION_PAGE))
            .mount(&server)
            .await;

        let config = Config {
            variants: vec!["Riksmål".to_string()],
            ..Config::default()
        };
        let processor = processor(&server, config, None);
        let entry = processor.process_word("snakke").await;

        assert_eq!(entry.conjugations.map(|c| c.len()), Some(2));
    }

    #[tokio::test]
    async fn run_without_dictionary() {
        let server = MockServer::start().await;
        let processor = VocabProcessor::<SilentSynthesizer>::new(
            Config::default(),
            Dictionary::default(),
            cooljugator::Client::with_client(reqwest::Client::new()).with_base_url(server.uri()),
            DefinitionFetcher::with_base_url(reqwest::Client::new(), Source::Naob, server.uri()),
            None,
        );

        assert!(matches!(processor.run().await, Err(Error::EmptyDictionary)));
    }

    #[tokio::test]
    async fn run_without_words() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("temp dir");
        let words_file = dir.path().join("words.txt");

        fs::write(&words_file, "# nothing here\n\n").expect("write words");

        let config = Config {
            words_file,
            ..Config::default()
        };
        let processor = processor(&server, config, None);

        assert!(matches!(processor.run().await, Err(Error::NoEntries)));
    }

    #[test]
    fn missing_dictionary_is_empty() {
        let dictionary = load_dictionary(Path::new("/nonexistent/dictionary.json")).expect("dict");

        assert!(dictionary.is_empty());
    }
}
