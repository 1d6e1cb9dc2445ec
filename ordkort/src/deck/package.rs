use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use sha1::{Digest, Sha1};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::Connection;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::schema;
use super::{Deck, Model, Note};
use crate::Error;
use crate::config::DeckConfig;
use crate::entry::Entry;
use crate::utils::strip_html;

/// Name of the collection database inside the package.
const COLLECTION_NAME: &str = "collection.anki2";

/// Name of the media index inside the package.
const MEDIA_INDEX_NAME: &str = "media";

/// Media files bundled with a package, keyed by file name.
///
/// Anki stores media flat, so two files with the same name would collide; the first one added
/// wins.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Media {
    files: IndexMap<String, PathBuf>,
}

/// A deck, its note model and its media, ready to be written as an `.apkg` file.
#[derive(Debug, Clone)]
pub struct Package {
    /// The deck and its notes
    pub deck: Deck,
    /// The note model used by every note
    pub model: Model,
    /// Media files referenced by the notes
    pub media: Media,
}

impl Media {
    /// Creates an empty media list.
    #[must_use]
    pub fn new() -> Media {
        Media::default()
    }

    /// Collects the audio files referenced by `entries`.
    #[must_use]
    pub fn from_entries(entries: &[Entry]) -> Media {
        let mut media = Media::new();

        for path in entries.iter().filter_map(|entry| entry.audio_path.as_ref()) {
            media.add(path);
        }

        media
    }

    /// Adds the file at `path`. Returns `false` if a file with the same name was already added.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let path: PathBuf = path.into();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return false;
        };

        if self.files.contains_key(&name) {
            debug!(%name, "duplicate media file name, skipping");

            return false;
        }

        self.files.insert(name, path);

        true
    }

    /// Returns the number of media files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if there are no media files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates over `(file name, path)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.files
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

impl Package {
    /// Creates a package.
    #[must_use]
    pub const fn new(deck: Deck, model: Model, media: Media) -> Package {
        Package { deck, model, media }
    }

    /// Creates a package with one note per entry along with the audio files they reference.
    #[must_use]
    pub fn from_entries(config: &DeckConfig, entries: &[Entry]) -> Package {
        let mut deck = Deck::from_config(config);

        for entry in entries {
            deck.add_note(Note::from_entry(entry));
        }

        Package::new(deck, Model::from_config(config), Media::from_entries(entries))
    }

    /// Writes the package to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Collection`] if the collection database can't be written,
    /// [`Error::Archive`] if the archive can't be written and [`Error::PackageIo`] if a media file
    /// or the output can't be accessed.
    pub async fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let workdir = tempfile::tempdir().map_err(|source| Error::PackageIo {
            path: std::env::temp_dir(),
            source,
        })?;
        let collection_path = workdir.path().join(COLLECTION_NAME);

        self.write_collection(&collection_path, OffsetDateTime::now_utc())
            .await?;
        self.write_archive(path, &collection_path)?;

        info!(
            ?path,
            num_notes = self.deck.notes.len(),
            num_media = self.media.len(),
            "wrote package"
        );

        Ok(())
    }

    /// Creates the collection database at `path`.
    async fn write_collection(&self, path: &Path, now: OffsetDateTime) -> Result<(), Error> {
        let now_secs = now.unix_timestamp();
        let now_ms = now_secs * 1000 + i64::from(now.millisecond());
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete);
        let mut conn = SqliteConnection::connect_with(&options).await?;

        sqlx::raw_sql(schema::SCHEMA).execute(&mut conn).await?;

        let conf = serde_json::to_string(&schema::conf(&self.model)).map_err(Error::SerializeDeck)?;
        let models = serde_json::to_string(&schema::models(&self.model, &self.deck, now_secs))
            .map_err(Error::SerializeDeck)?;
        let decks = serde_json::to_string(&schema::decks(&self.deck, now_secs))
            .map_err(Error::SerializeDeck)?;
        let dconf = serde_json::to_string(&schema::dconf()).map_err(Error::SerializeDeck)?;

        let mut tx = conn.begin().await?;

        sqlx::query(schema::INSERT_COL)
            .bind(schema::COLLECTION_CREATED)
            .bind(now_ms)
            .bind(now_ms)
            .bind(schema::SCHEMA_VERSION)
            .bind(conf)
            .bind(models)
            .bind(decks)
            .bind(dconf)
            .execute(&mut *tx)
            .await?;

        for (index, note) in (0_i64..).zip(&self.deck.notes) {
            let id = now_ms + index;
            let sort_field = strip_html(note.fields.first().map_or("", String::as_str));

            sqlx::query(schema::INSERT_NOTE)
                .bind(id)
                .bind(&note.guid)
                .bind(self.model.id)
                .bind(now_secs)
                .bind(note.tags.join(" "))
                .bind(note.fields.join("\x1f"))
                .bind(&sort_field)
                .bind(checksum(&sort_field))
                .execute(&mut *tx)
                .await?;

            sqlx::query(schema::INSERT_CARD)
                .bind(id)
                .bind(id)
                .bind(self.deck.id)
                .bind(0_i64)
                .bind(now_secs)
                .bind(index)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        conn.close().await?;

        debug!(?path, num_notes = self.deck.notes.len(), "wrote collection");

        Ok(())
    }

    /// Zips the collection, the media index and the media files into `path`.
    fn write_archive(&self, path: &Path, collection_path: &Path) -> Result<(), Error> {
        let file = File::create(path).map_err(package_io(path))?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(file);

        zip.start_file(COLLECTION_NAME, options)?;
        copy_file(collection_path, &mut zip)?;

        let mut index = IndexMap::new();

        for (name, media_path) in self.media.iter() {
            if !media_path.exists() {
                warn!(path = ?media_path, "media file is missing, skipping");

                continue;
            }

            let key = index.len().to_string();

            debug!(%key, %name, "adding media file");

            zip.start_file(key.as_str(), options)?;
            copy_file(media_path, &mut zip)?;
            index.insert(key, name.to_string());
        }

        let index = serde_json::to_vec(&index).map_err(Error::SerializeDeck)?;

        zip.start_file(MEDIA_INDEX_NAME, options)?;
        zip.write_all(&index).map_err(package_io(path))?;
        zip.finish()?;

        Ok(())
    }
}

/// Copies the contents of the file at `path` into `writer`.
fn copy_file(path: &Path, writer: &mut impl Write) -> Result<(), Error> {
    let mut file = File::open(path).map_err(package_io(path))?;

    io::copy(&mut file, writer).map_err(package_io(path))?;

    Ok(())
}

/// Returns a mapper from an I/O error on `path` to [`Error::PackageIo`].
fn package_io(path: &Path) -> impl FnOnce(io::Error) -> Error + use<> {
    let path = path.to_path_buf();

    move |source| Error::PackageIo { path, source }
}

/// Returns the note checksum Anki uses for duplicate detection: the first 32 bits of the SHA-1
/// digest of the sort field.
fn checksum(sort_field: &str) -> i64 {
    let digest = Sha1::digest(sort_field.as_bytes());

    i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}
