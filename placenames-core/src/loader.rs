//! Data file loading.
//!
//! The source is a CSV of `name,relevancy` records, usually gzip
//! compressed. The first record is a header and is skipped; extra fields
//! after the first two are ignored. Loading is all-or-nothing: the first
//! malformed record aborts the build and no partial index is produced.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;

use flate2::read::MultiGzDecoder;
use placenames_types::{BuildError, SuggestConfig};
use tracing::{debug, info};

use crate::index::{PrefixIndex, PrefixTrie};

/// Loads and finalizes an index from a data file.
///
/// Files whose name ends in `.gz` are decompressed on the fly (concatenated
/// gzip members included); anything else is read as plain CSV.
pub fn load_index(path: impl AsRef<Path>, config: SuggestConfig) -> Result<PrefixIndex, BuildError> {
    let path = path.as_ref();
    info!(path = %path.display(), k = config.capacity_per_node, "loading place names");
    load_reader(open_data(path)?, config)
}

/// Loads and finalizes an index from an uncompressed CSV stream.
pub fn load_reader<R: Read>(reader: R, config: SuggestConfig) -> Result<PrefixIndex, BuildError> {
    let start = Instant::now();

    let mut trie = PrefixTrie::with_config(config);
    read_records(reader, |line, name, relevancy| {
        trie.insert_at(line, name, relevancy).map(drop)
    })?;

    debug!(
        entries = trie.len(),
        nodes = trie.node_count(),
        "place names read"
    );

    let index = trie.finalize();
    info!(
        entries = index.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "index ready: {}",
        index.stats()
    );
    Ok(index)
}

/// Reads just the names from a data file, in file order.
///
/// Records are validated exactly as [`load_index`] validates them, so a file
/// that loads also lists.
pub fn read_names(path: impl AsRef<Path>) -> Result<Vec<String>, BuildError> {
    let path = path.as_ref();
    let names = read_names_from(open_data(path)?)?;
    info!(path = %path.display(), names = names.len(), "place names listed");
    Ok(names)
}

/// Reads just the names from an uncompressed CSV stream.
pub fn read_names_from<R: Read>(reader: R) -> Result<Vec<String>, BuildError> {
    let mut names = Vec::new();
    read_records(reader, |_, name, _| {
        names.push(name.to_owned());
        Ok(())
    })?;
    Ok(names)
}

fn open_data(path: &Path) -> Result<Box<dyn Read>, BuildError> {
    let file = File::open(path).map_err(|source| BuildError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Calls `visit(line, name, relevancy)` for every data record, skipping the
/// header. Stops at the first error, from the CSV layer or from `visit`.
fn read_records<R, F>(reader: R, mut visit: F) -> Result<(), BuildError>
where
    R: Read,
    F: FnMut(u64, &str, f64) -> Result<(), BuildError>,
{
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut record = csv::StringRecord::new();
    let mut line: u64 = 0;
    let mut header_seen = false;

    loop {
        match csv.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(err) => return Err(csv_error(err, line + 1)),
        }
        line = record.position().map_or(line + 1, |p| p.line());

        if !header_seen {
            header_seen = true;
            continue;
        }

        let (name, relevancy) = parse_record(&record, line)?;
        visit(line, name, relevancy)?;
    }
}

/// Extracts `(name, relevancy)` from one data record.
fn parse_record(record: &csv::StringRecord, line: u64) -> Result<(&str, f64), BuildError> {
    let (Some(name), Some(raw)) = (record.get(0), record.get(1)) else {
        return Err(BuildError::MissingField {
            line,
            found: record.len(),
        });
    };

    let relevancy: f64 = raw
        .trim()
        .parse()
        .map_err(|_| BuildError::InvalidRelevancy {
            line,
            value: raw.to_owned(),
        })?;

    if name.is_empty() {
        return Err(BuildError::EmptyName { line });
    }
    if !(0.0..=1.0).contains(&relevancy) {
        return Err(BuildError::RelevancyOutOfRange {
            line,
            value: relevancy,
        });
    }

    Ok((name, relevancy))
}

fn csv_error(err: csv::Error, fallback_line: u64) -> BuildError {
    let line = err.position().map_or(fallback_line, |p| p.line());
    if err.is_io_error() {
        if let csv::ErrorKind::Io(source) = err.into_kind() {
            return BuildError::Read { line, source };
        }
        return BuildError::Csv {
            line,
            reason: "I/O error".to_owned(),
        };
    }
    BuildError::Csv {
        line,
        reason: err.to_string(),
    }
}
