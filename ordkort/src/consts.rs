//! Constants
use std::time::Duration;

/// The `User-Agent` header to send when issuing HTTP requests.
pub const HTTP_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:141.0) Gecko/20100101 Firefox/141.0";

/// The duration before a HTTP request times out.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// The maximum number of redirects to follow for a single request.
pub const HTTP_MAX_REDIRECTS: usize = 5;

/// The default path of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "ordkort.toml";

/// The prefix of environment variables that override configuration values.
pub const ENV_PREFIX: &str = "ORDKORT_";

/// The default deck id. Anki uses it to recognize a re-imported deck.
pub const DEFAULT_DECK_ID: i64 = 2_059_400_110;

/// The default note model id.
pub const DEFAULT_MODEL_ID: i64 = 1_607_392_319;

/// The default name of the deck.
pub const DEFAULT_DECK_NAME: &str = "Norwegian Vocabulary (Full Version)";

/// The default name of the note model.
pub const DEFAULT_MODEL_NAME: &str = "NO-EN Basic";

/// The part of speech assigned to words that are not detected as verbs.
pub const DEFAULT_POS: &str = "noun";

/// The part of speech assigned to words with a conjugation table.
pub const VERB_POS: &str = "verb";

/// The dialect variant kept from conjugation tables by default.
pub const DEFAULT_VARIANT: &str = "Bokmål";

/// The language code used for speech synthesis.
pub const DEFAULT_AUDIO_LANGUAGE: &str = "no";
