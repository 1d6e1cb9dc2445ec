//! Pronunciation audio synthesis with an on-disk cache.
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::fs;
use tracing::{debug, error, info};

use crate::config::AudioConfig;
use crate::utils::strip_parentheticals;

/// The maximum number of characters the speech endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Errors that can occur while synthesizing or caching audio.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    #[error("could not write audio file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("nothing to synthesize")]
    EmptyText,
}

/// A text-to-speech backend.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesizes `text` spoken in `language` and returns the encoded MP3 audio.
    async fn synthesize(&self, text: &str, language: &str) -> Result<Bytes, Error>;
}

/// Speech synthesis through the public Google Translate text-to-speech endpoint.
pub struct GoogleTts {
    client: reqwest::Client,
    base_url: String,
}

/// A synthesized (or cached) audio file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Audio {
    /// Path of the MP3 file on disk.
    pub path: PathBuf,
    /// The `[sound:…]` tag referencing the file from a note.
    pub tag: String,
}

/// Writes synthesized audio to a directory and reuses files that already exist.
pub struct AudioCache<S> {
    synthesizer: S,
    directory: PathBuf,
    language: String,
}

impl GoogleTts {
    /// Creates a synthesizer that sends requests below `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> GoogleTts {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        GoogleTts { client, base_url }
    }
}

#[async_trait]
impl Synthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Bytes, Error> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);

        if chunks.is_empty() {
            return Err(Error::EmptyText);
        }

        let total = chunks.len().to_string();
        let mut audio = BytesMut::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            let params = [
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", chunk.as_str()),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ];

            debug!(%chunk, %language, "requesting speech");

            let response = self
                .client
                .get(format!("{}/translate_tts", self.base_url))
                .query(&params)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(Error::Request)?;
            let body = response.bytes().await.map_err(Error::Request)?;

            audio.extend_from_slice(&body);
        }

        Ok(audio.freeze())
    }
}

impl<S: Synthesizer> AudioCache<S> {
    /// Creates a cache in `directory` that synthesizes missing files in `language`.
    pub fn new(synthesizer: S, directory: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        AudioCache {
            synthesizer,
            directory: directory.into(),
            language: language.into(),
        }
    }

    /// Creates a cache from the audio configuration.
    pub fn from_config(synthesizer: S, config: &AudioConfig) -> Self {
        AudioCache::new(synthesizer, &config.directory, &config.language)
    }

    /// Returns the path the audio for `word` is cached at, or `None` if nothing remains of the
    /// word once parentheticals are removed.
    #[must_use]
    pub fn path_for(&self, word: &str) -> Option<PathBuf> {
        let name = file_stem(word)?;

        Some(self.directory.join(format!("{name}.mp3")))
    }

    /// Returns the audio for `word`, synthesizing it if it isn't cached yet.
    ///
    /// Failures are logged and result in `None`.
    pub async fn create_audio(&self, word: &str) -> Option<Audio> {
        match self.try_create_audio(word).await {
            Ok(audio) => Some(audio),
            Err(err) => {
                error!(%word, error = %err, "audio generation failed");

                None
            }
        }
    }

    async fn try_create_audio(&self, word: &str) -> Result<Audio, Error> {
        let text = strip_parentheticals(word);
        let path = self.path_for(word).ok_or(Error::EmptyText)?;

        if fs::try_exists(&path).await.unwrap_or(false) {
            info!(%word, ?path, "audio cached");
        } else {
            fs::create_dir_all(&self.directory)
                .await
                .map_err(|source| Error::Write {
                    path: self.directory.clone(),
                    source,
                })?;

            let audio = self.synthesizer.synthesize(&text, &self.language).await?;

            fs::write(&path, &audio)
                .await
                .map_err(|source| Error::Write {
                    path: path.clone(),
                    source,
                })?;

            info!(%word, ?path, "audio generated");
        }

        Ok(Audio::from_path(path))
    }
}

impl Audio {
    /// Creates the audio reference for the file at `path`.
    ///
    /// Anki stores media flat by file name, so the tag only references the file name.
    #[must_use]
    pub fn from_path(path: PathBuf) -> Audio {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tag = format!("[sound:{name}]");

        Audio { path, tag }
    }
}

/// Returns the file stem used for `word`: parentheticals removed and path separators replaced.
fn file_stem(word: &str) -> Option<String> {
    let stem = strip_parentheticals(word).replace(['/', '\\'], "_");

    if stem.is_empty() { None } else { Some(stem) }
}

/// Splits `text` on whitespace into chunks of at most `max_chars` characters.
///
/// Words longer than `max_chars` are split as well.
fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_chars: Vec<char> = word.chars().collect();

        for piece in word_chars.chunks(max_chars) {
            let piece: String = piece.iter().collect();
            let current_len = current.chars().count();

            if current.is_empty() {
                current = piece;
            } else if current_len + 1 + piece.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(&piece);
            } else {
                chunks.push(std::mem::replace(&mut current, piece));
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
