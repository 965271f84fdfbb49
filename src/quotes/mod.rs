//! Passage sources for the race.
//!
//! The core only ever sees the [`QuoteSource`] trait; production code plugs
//! in the bundled collection or a user-supplied quote file, tests plug in
//! deterministic fakes.

use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static QUOTES_DIR: Dir = include_dir!("src/quotes");

/// Attribution used when a source does not name an author.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// The one failure kind the core boundary knows about. Construction and
/// reset surface it; typing and the query accessors never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteFetchError {
    #[error("quote source returned an empty passage")]
    EmptyPassage,
    #[error("quote source unavailable: {0}")]
    Unavailable(String),
}

/// A passage to type, with attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    content: String,
    author: String,
}

impl Passage {
    /// Validates the passage text. Blank content is rejected here so a race
    /// can never begin already finished; a missing or blank author becomes
    /// [`UNKNOWN_AUTHOR`].
    pub fn new(
        content: impl Into<String>,
        author: Option<String>,
    ) -> Result<Self, QuoteFetchError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(QuoteFetchError::EmptyPassage);
        }

        let author = match author {
            Some(a) if !a.trim().is_empty() => a,
            _ => UNKNOWN_AUTHOR.to_string(),
        };

        Ok(Self { content, author })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}

/// Supplies passages on demand. Retry policy belongs to the caller.
pub trait QuoteSource {
    fn fetch(&self) -> Result<Passage, QuoteFetchError>;
}

#[derive(Deserialize, Clone, Debug)]
struct QuoteRecord {
    content: String,
    #[serde(default)]
    author: Option<String>,
}

impl QuoteRecord {
    fn into_passage(self) -> Result<Passage, QuoteFetchError> {
        Passage::new(self.content, self.author)
    }
}

/// The collection embedded in the binary.
pub struct BundledQuotes {
    records: Vec<QuoteRecord>,
}

impl BundledQuotes {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let file = QUOTES_DIR
            .get_file("quotes.json")
            .expect("Bundled quotes file not found");

        let file_as_str = file
            .contents_utf8()
            .expect("Unable to interpret quotes file as a string");

        let records =
            serde_json::from_str(file_as_str).expect("Unable to deserialize bundled quotes");

        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl QuoteSource for BundledQuotes {
    fn fetch(&self) -> Result<Passage, QuoteFetchError> {
        let record = self
            .records
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| QuoteFetchError::Unavailable("bundled collection is empty".into()))?;
        record.clone().into_passage()
    }
}

/// A user-supplied quote file: a JSON array of `{content, author?}` records.
#[derive(Debug, Clone)]
pub struct FileQuotes {
    path: PathBuf,
}

impl FileQuotes {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl QuoteSource for FileQuotes {
    fn fetch(&self) -> Result<Passage, QuoteFetchError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            QuoteFetchError::Unavailable(format!("unable to read {}: {}", self.path.display(), e))
        })?;

        let records: Vec<QuoteRecord> = serde_json::from_str(&raw)
            .map_err(|e| QuoteFetchError::Unavailable(format!("malformed quote file: {}", e)))?;

        let record = records
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| QuoteFetchError::Unavailable("quote file contains no passages".into()))?;

        record.clone().into_passage()
    }
}
