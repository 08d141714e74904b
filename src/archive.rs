//! Persistence for the article archive: one JSON array of
//! [`ArticleRecord`]s, newest first, rewritten in full on every run. The
//! archive is the site's only durable state, so saves go through a temp
//! file and a rename; a crash mid-write leaves the previous snapshot
//! intact instead of a truncated file.

use crate::article::ArticleRecord;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct Archive {
    path: PathBuf,
}

impl Archive {
    pub fn new<P: Into<PathBuf>>(path: P) -> Archive {
        Archive { path: path.into() }
    }

    /// Reads the full archive. A missing file is an empty archive; a file
    /// that exists but does not parse is an error, propagated so the
    /// operator can decide whether to repair or delete it rather than
    /// having the site's history silently reinitialized.
    pub fn load(&self) -> Result<Vec<ArticleRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(Error::Io(err)),
        };
        serde_json::from_reader(io::BufReader::new(file)).map_err(Error::Parse)
    }

    /// Overwrites the archive with the full snapshot. The temp file is
    /// created in the destination directory so the final rename never
    /// crosses a filesystem boundary.
    pub fn save(&self, records: &[ArticleRecord]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, records).map_err(Error::Parse)?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}

/// Concatenates the two runs' worth of records, new entries first.
/// Survivors keep their relative order; nothing is deduplicated or
/// mutated.
pub fn merge(new: Vec<ArticleRecord>, existing: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let mut merged = new;
    merged.extend(existing);
    merged
}

/// The result of a fallible archive operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or saving the archive.
#[derive(Debug)]
pub enum Error {
    /// An I/O error reading or writing the archive file.
    Io(io::Error),

    /// The archive file exists but is not a well-formed record array.
    Parse(serde_json::Error),

    /// The temp-file rename into place failed.
    Persist(tempfile::PersistError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Parse(err) => write!(f, "Parsing archive: {}", err),
            Error::Persist(err) => write!(f, "Replacing archive: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Persist(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts [`io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<tempfile::PersistError> for Error {
    /// Converts [`tempfile::PersistError`]s into [`Error`]. This allows us
    /// to use the `?` operator.
    fn from(err: tempfile::PersistError) -> Error {
        Error::Persist(err)
    }
}
