//! JSON export of processed entries.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::Error;
use crate::entry::Entry;

/// Writes `entries` to `path` as a pretty-printed JSON array.
///
/// Non-ASCII characters are written as-is.
///
/// # Errors
///
/// Returns [`Error::WriteJson`] if the file can't be written and [`Error::SerializeJson`] if the
/// entries can't be serialized.
pub fn save_json(path: impl AsRef<Path>, entries: &[Entry]) -> Result<(), Error> {
    let path = path.as_ref();
    let write_error = |source| Error::WriteJson {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, entries).map_err(Error::SerializeJson)?;
    writer.flush().map_err(write_error)?;

    info!(?path, num_entries = entries.len(), "saved json export");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_entries() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("vocab.json");
        let entries = vec![Entry {
            word: "gå".to_string(),
            pos: "verb".to_string(),
            translation: "go".to_string(),
            definition: "bevege seg".to_string(),
            conjugations: None,
            audio_tag: String::new(),
            audio_path: None,
        }];

        save_json(&path, &entries).expect("save");

        let contents = std::fs::read_to_string(&path).expect("read");

        assert!(contents.contains("\"word\": \"gå\""));
        assert!(contents.starts_with("[\n  {"));

        let parsed: Vec<Entry> = serde_json::from_str(&contents).expect("parse");

        assert_eq!(parsed, entries);
    }

    #[test]
    fn save_to_missing_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = save_json(dir.path().join("missing/vocab.json"), &[]);

        assert!(matches!(result, Err(Error::WriteJson { .. })));
    }
}
