use crate::core::models::entry::PourbaixEntry;
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntryFileError {
    #[error("File I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },
    #[error("JSON error for '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Reads a serialized list of Pourbaix entries, gzip-compressed when the
/// path ends in `.gz`.
pub fn read_entries(path: &Path) -> Result<Vec<PourbaixEntry>, EntryFileError> {
    let io_err = |source| EntryFileError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(MultiGzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    serde_json::from_reader(reader).map_err(|source| EntryFileError::Json {
        path: path.to_string_lossy().to_string(),
        source,
    })
}

/// Writes entries as gzip-compressed JSON, creating parent directories.
pub fn write_entries(path: &Path, entries: &[PourbaixEntry]) -> Result<(), EntryFileError> {
    let io_err = |source| EntryFileError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, entries).map_err(|source| EntryFileError::Json {
        path: path.to_string_lossy().to_string(),
        source,
    })?;
    encoder
        .finish()
        .and_then(|mut inner| inner.flush())
        .map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chemistry::composition::Composition;
    use crate::core::models::entry::PhaseType;
    use tempfile::tempdir;

    fn sample() -> Vec<PourbaixEntry> {
        vec![PourbaixEntry {
            entry_id: "mp-13".to_string(),
            name: "Fe(s)".to_string(),
            phase_type: PhaseType::Solid,
            composition: Composition::from_pairs([("Fe", 1.0)]),
            energy: 0.0,
            charge: 0.0,
            concentration: 1.0,
        }]
    }

    #[test]
    fn written_entries_can_be_read_back_from_nested_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pourbaix_entries").join("Fe.json.gz");
        write_entries(&path, &sample()).unwrap();
        assert_eq!(read_entries(&path).unwrap(), sample());
    }

    #[test]
    fn read_entries_reports_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"entry_id\": 1}]").unwrap();
        assert!(matches!(
            read_entries(&path),
            Err(EntryFileError::Json { .. })
        ));
    }

    #[test]
    fn read_entries_reports_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_entries(&dir.path().join("absent.json.gz")),
            Err(EntryFileError::Io { .. })
        ));
    }
}
