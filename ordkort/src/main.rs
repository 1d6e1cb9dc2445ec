use std::path::PathBuf;

use argh::FromArgs;
use miette::WrapErr;
use tracing::info;

use ordkort::config::LogFormat;
use ordkort::{Config, VocabProcessor, consts, telemetry};

/// Turns a list of Norwegian words into an Anki deck.
#[derive(Debug, FromArgs)]
struct Opts {
    /// path to config file
    #[argh(
        option,
        default = "PathBuf::from(consts::DEFAULT_CONFIG_PATH)"
    )]
    config: PathBuf,
    /// path to the word list, overrides `words_file`
    #[argh(option)]
    words: Option<PathBuf>,
    /// path to the translation dictionary, overrides `dictionary_file`
    #[argh(option)]
    dictionary: Option<PathBuf>,
    /// log format: compact, pretty or json
    #[argh(option)]
    format: Option<LogFormat>,
}

impl Opts {
    /// Applies the command-line overrides to `config`.
    fn apply(self, config: &mut Config) {
        if let Some(words) = self.words {
            config.words_file = words;
        }

        if let Some(dictionary) = self.dictionary {
            config.dictionary_file = dictionary;
        }

        if let Some(format) = self.format {
            config.tracing.format = format;
        }
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Parse command-line arguments
    let opts: Opts = argh::from_env();

    // Load the layered configuration
    let mut config = Config::load(&opts.config)?;
    opts.apply(&mut config);

    // Initialize logging
    let provider = telemetry::try_init(&config.tracing)?;

    info!(
        "{} v{} running",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let result = async {
        let processor = VocabProcessor::from_config(config)?;

        processor.run().await
    }
    .await
    .wrap_err("could not create flashcards");

    telemetry::shutdown(provider);

    result.map(|_| ())
}
