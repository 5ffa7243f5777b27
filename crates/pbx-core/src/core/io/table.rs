use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Table '{path}' is missing required column(s): {}", .missing.join(", "))]
    MissingColumns { path: String, missing: Vec<String> },
    #[error("Header of '{path}' does not match the first table (expected [{expected}], found [{found}])")]
    HeaderMismatch {
        path: String,
        expected: String,
        found: String,
    },
}

fn display(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> TableError + '_ {
    move |source| TableError::Io {
        path: display(path),
        source,
    }
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> TableError + '_ {
    move |source| TableError::Csv {
        path: display(path),
        source,
    }
}

fn is_blank(path: &Path) -> Result<bool, TableError> {
    let metadata = std::fs::metadata(path).map_err(io_error(path))?;
    Ok(metadata.len() == 0)
}

fn open(path: &Path) -> Result<Box<dyn Read>, TableError> {
    let file = File::open(path).map_err(io_error(path))?;
    let reader = BufReader::new(file);
    if is_gzip(path) {
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Reads every row of a CSV table, decompressing `.gz` files transparently.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TableError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_error(path))?;
    debug!("Read {} row(s) from {:?}", rows.len(), path);
    Ok(rows)
}

/// Like [`read_table`], but a missing or empty file yields no rows.
pub fn read_table_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TableError> {
    if !path.exists() || is_blank(path)? {
        return Ok(Vec::new());
    }
    if header(path)?.is_empty() {
        return Ok(Vec::new());
    }
    read_table(path)
}

/// Column names of a table, empty for a file without a header row.
pub fn header(path: &Path) -> Result<Vec<String>, TableError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers = reader.headers().map_err(csv_error(path))?;
    Ok(headers
        .iter()
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect())
}

/// Fails with [`TableError::MissingColumns`] unless every name in `required`
/// is a column of the table.
pub fn require_columns(path: &Path, required: &[&str]) -> Result<(), TableError> {
    let columns = header(path)?;
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !columns.iter().any(|c| c == *name))
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TableError::MissingColumns {
            path: display(path),
            missing,
        })
    }
}

fn create_sink<F>(path: &Path, fill: F) -> Result<(), TableError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), TableError>,
{
    let file = File::create(path).map_err(io_error(path))?;
    let mut sink = BufWriter::new(file);
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(sink, Compression::default());
        fill(&mut encoder)?;
        encoder
            .finish()
            .and_then(|mut inner| inner.flush())
            .map_err(io_error(path))
    } else {
        fill(&mut sink)?;
        sink.flush().map_err(io_error(path))
    }
}

/// Writes rows as a CSV table, gzip-compressing when the path ends in `.gz`.
/// An existing file is replaced.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), TableError> {
    create_sink(path, |sink| {
        let mut writer = csv::Writer::from_writer(sink);
        for row in rows {
            writer.serialize(row).map_err(csv_error(path))?;
        }
        writer.flush().map_err(io_error(path))
    })?;
    debug!("Wrote {} row(s) to {:?}", rows.len(), path);
    Ok(())
}

/// Concatenates tables that share a header into `output`, in input order.
/// Empty inputs are skipped. Returns the number of data rows written.
pub fn concatenate(inputs: &[impl AsRef<Path>], output: &Path) -> Result<usize, TableError> {
    let mut expected: Option<csv::StringRecord> = None;
    let mut records = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if is_blank(path)? {
            debug!("Skipping empty table {:?}", path);
            continue;
        }
        let mut reader = csv::Reader::from_reader(open(path)?);
        let headers = reader.headers().map_err(csv_error(path))?.clone();
        if headers.is_empty() {
            debug!("Skipping empty table {:?}", path);
            continue;
        }
        match &expected {
            Some(first) if first != &headers => {
                return Err(TableError::HeaderMismatch {
                    path: display(path),
                    expected: first.iter().collect::<Vec<_>>().join(","),
                    found: headers.iter().collect::<Vec<_>>().join(","),
                });
            }
            Some(_) => {}
            None => expected = Some(headers),
        }
        for record in reader.records() {
            records.push(record.map_err(csv_error(path))?);
        }
    }

    create_sink(output, |sink| {
        let mut writer = csv::Writer::from_writer(sink);
        if let Some(headers) = &expected {
            writer.write_record(headers).map_err(csv_error(output))?;
        }
        for record in &records {
            writer.write_record(record).map_err(csv_error(output))?;
        }
        writer.flush().map_err(io_error(output))
    })?;

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        name: String,
        value: Option<f64>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "a".into(),
                value: Some(1.5),
            },
            Row {
                name: "b".into(),
                value: None,
            },
        ]
    }

    #[test]
    fn gzip_tables_are_compressed_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.csv.gz");
        write_table(&path, &rows()).unwrap();

        let raw = fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);
        assert_eq!(read_table::<Row>(&path).unwrap(), rows());
    }

    #[test]
    fn plain_tables_keep_header_and_null_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        write_table(&path, &rows()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "name,value\na,1.5\nb,\n");
    }

    #[test]
    fn read_table_if_exists_tolerates_missing_and_empty_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.csv.gz");
        assert!(read_table_if_exists::<Row>(&missing).unwrap().is_empty());

        let empty = dir.path().join("empty.csv");
        fs::write(&empty, "").unwrap();
        assert!(read_table_if_exists::<Row>(&empty).unwrap().is_empty());
    }

    #[test]
    fn read_table_reports_malformed_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "name,value\na,not-a-number\n").unwrap();
        assert!(matches!(
            read_table::<Row>(&path),
            Err(TableError::Csv { .. })
        ));
    }

    #[test]
    fn require_columns_lists_every_missing_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conditions.csv");
        fs::write(&path, "ph,other\n1,2\n").unwrap();

        require_columns(&path, &["ph"]).unwrap();
        match require_columns(&path, &["ph", "voltage", "material_id"]) {
            Err(TableError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["voltage", "material_id"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn concatenate_joins_tables_in_order() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("part_0.csv.gz");
        let second = dir.path().join("part_1.csv");
        let empty = dir.path().join("part_2.csv");
        write_table(&first, &rows()[..1]).unwrap();
        write_table(&second, &rows()[1..]).unwrap();
        fs::write(&empty, "").unwrap();

        let output = dir.path().join("merged.csv.gz");
        let count = concatenate(&[&first, &second, &empty], &output).unwrap();

        assert_eq!(count, 2);
        assert_eq!(read_table::<Row>(&output).unwrap(), rows());
    }

    #[test]
    fn concatenate_rejects_mismatched_headers() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        fs::write(&first, "name,value\na,1\n").unwrap();
        fs::write(&second, "name,other\nb,2\n").unwrap();

        let result = concatenate(&[&first, &second], &dir.path().join("out.csv"));
        assert!(matches!(result, Err(TableError::HeaderMismatch { .. })));
    }
}
