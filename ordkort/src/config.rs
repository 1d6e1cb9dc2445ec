//! Layered configuration.
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::consts;
use crate::definition::Source;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Path to the list of words, one per line
    pub words_file: PathBuf,
    /// Path to the JSON translation dictionary
    pub dictionary_file: PathBuf,
    /// Part of speech for words without conjugations
    pub default_pos: String,
    /// Conjugation variants to keep, in order
    pub variants: Vec<String>,
    /// Look up translations in the dictionary
    pub enable_translation: bool,
    /// Output configuration
    pub output: OutputConfig,
    /// Deck configuration
    pub deck: DeckConfig,
    /// Definition source configuration
    pub definition: DefinitionConfig,
    /// Conjugation source configuration
    pub conjugation: ConjugationConfig,
    /// Speech synthesis configuration
    pub audio: AudioConfig,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Tracing configuration
    pub tracing: TracingConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON export
    pub json: PathBuf,
    /// Path of the Anki package
    pub package: PathBuf,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Deck id, kept stable so re-imports update the same deck
    pub id: i64,
    /// Deck name
    pub name: String,
    /// Note model id
    pub model_id: i64,
    /// Note model name
    pub model_name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DefinitionConfig {
    /// Which online dictionary to scrape
    pub source: Source,
    /// Overrides the base URL of the source
    pub base_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ConjugationConfig {
    /// Base URL of the conjugation site
    pub base_url: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Synthesize pronunciation audio
    pub enabled: bool,
    /// Directory where audio files are cached
    pub directory: PathBuf,
    /// Language code passed to the speech synthesizer
    pub language: String,
    /// Base URL of the speech synthesis service
    pub base_url: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Maximum duration of a single request
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// The `User-Agent` header value
    pub user_agent: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Export spans over OTLP
    pub enabled: bool,
    /// Format of the log lines written to stdout
    pub format: LogFormat,
}

/// Output format of the stdout log layer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human readable output
    #[default]
    Compact,
    /// Multi-line human readable output
    Pretty,
    /// Newline-delimited JSON
    Json,
}

impl Config {
    /// Loads the configuration from defaults, the TOML file at `path` (if it exists) and
    /// `ORDKORT_`-prefixed environment variables, in increasing order of precedence.
    ///
    /// Nested keys are separated by `__` in environment variables, e.g.
    /// `ORDKORT_OUTPUT__PACKAGE=deck.apkg`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a provider contains invalid values.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, Error> {
        Config::figment(path)
            .extract()
            .map_err(|err| Error::Config(Box::new(err)))
    }

    /// Returns the layered configuration providers without extracting them.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(consts::ENV_PREFIX).split("__"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            words_file: PathBuf::from("words.txt"),
            dictionary_file: PathBuf::from("dictionary.json"),
            default_pos: String::from(consts::DEFAULT_POS),
            variants: vec![String::from(consts::DEFAULT_VARIANT)],
            enable_translation: true,
            output: OutputConfig::default(),
            deck: DeckConfig::default(),
            definition: DefinitionConfig::default(),
            conjugation: ConjugationConfig::default(),
            audio: AudioConfig::default(),
            http: HttpConfig::default(),
            tracing: TracingConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            json: PathBuf::from("vocab.json"),
            package: PathBuf::from("NorwegianVocab.apkg"),
        }
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        DeckConfig {
            id: consts::DEFAULT_DECK_ID,
            name: String::from(consts::DEFAULT_DECK_NAME),
            model_id: consts::DEFAULT_MODEL_ID,
            model_name: String::from(consts::DEFAULT_MODEL_NAME),
        }
    }
}

impl Default for ConjugationConfig {
    fn default() -> Self {
        ConjugationConfig {
            base_url: String::from("https://cooljugator.com"),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            enabled: true,
            directory: PathBuf::from("audio"),
            language: String::from(consts::DEFAULT_AUDIO_LANGUAGE),
            base_url: String::from("https://translate.google.com"),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout: consts::HTTP_TIMEOUT,
            user_agent: String::from(consts::HTTP_USER_AGENT),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!(
                "unknown log format `{other}`, expected compact, pretty or json"
            )),
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}
