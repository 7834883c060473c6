//! Defines the [`Scanner`] and the logic for reading content files from the
//! file system into [`Document`]s.
//!
//! A content file is a Markdown file with the extension `.md`. Header lines
//! start with `;;` (leading whitespace is ignored) and carry a `key=value`
//! pair; every other line belongs to the body:
//!
//! ```md
//! ;;title=Chocolate bar
//! ;;created=2016-05-01 9:30
//! ;;category=Food, Sweets
//! # Chocolate bar
//!
//! Jelly beans candy canes halvah.
//! ```
//!
//! Recognized keys are `title`, `created`, `modified`, `noblog` (no value,
//! turns the document into a page) and `category` (comma-separated).

use crate::document::{Document, DocumentBuilder, DocumentKind};
use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use std::fmt;
use std::path::Path;
use walkdir::WalkDir;

/// The extension of content files.
pub const MARKDOWN_EXTENSION: &str = "md";

/// The `chrono` pattern for the `created` and `modified` headers
/// (`yyyy-MM-dd H:mm`).
pub const DATE_TIME_PATTERN: &str = "%Y-%m-%d %H:%M";

const HEADER_MARKER: &str = ";;";

lazy_static! {
    // chrono accepts single digits for `%m`, `%d` and `%M`
    static ref DATE_TIME_SHAPE_RE: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{1,2}:\d{2}$").unwrap();
}

/// Reads [`Document`]s from a content directory.
pub struct Scanner<'a> {
    /// The file name prefix of category pages, needed to build the
    /// categories' page paths.
    category_prefix: &'a str,
}

impl<'a> Scanner<'a> {
    /// Constructs a new scanner. See the fields on [`Scanner`] for argument
    /// descriptions.
    pub fn new(category_prefix: &'a str) -> Scanner<'a> {
        Scanner { category_prefix }
    }

    /// Recursively reads every `.md` file below `content_directory` and
    /// returns the valid documents. Other files are ignored. A file which
    /// can't be read is skipped with a warning; a failure to walk the tree
    /// fails the whole scan.
    pub fn scan(&self, content_directory: &Path) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for result in WalkDir::new(content_directory)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result?;
            if !entry.file_type().is_file() || !is_content_file(entry.path()) {
                continue;
            }

            // strip_prefix() should never fail; `entry` is below the root
            let relative_path = match entry.path().strip_prefix(content_directory) {
                Ok(relative_path) => relative_path,
                Err(_) => continue,
            };

            let contents = match std::fs::read_to_string(entry.path()) {
                Ok(contents) => contents,
                Err(err) => {
                    warn!("Reading {} failed: {}", entry.path().display(), err);
                    continue;
                }
            };

            match self.parse(entry.path(), relative_path, &contents) {
                Some(document) => {
                    info!("Found {} ({})", document.output_path, document.title);
                    documents.push(document);
                }
                None => debug!(
                    "Skipping {}: missing title, body or creation date",
                    entry.path().display()
                ),
            }
        }
        Ok(documents)
    }

    /// Parses the `contents` of the file at `source_path`, whose location
    /// relative to the content root is `relative_path`. Returns `None` if
    /// the result isn't a valid document.
    pub fn parse(
        &self,
        source_path: &Path,
        relative_path: &Path,
        contents: &str,
    ) -> Option<Document> {
        let (output_path, base_dir_prefix) = output_location(relative_path);
        let mut builder = DocumentBuilder::new(
            source_path,
            output_path,
            base_dir_prefix,
            self.category_prefix,
        );

        for line in contents.lines() {
            match parse_header(line) {
                None => builder.line(line),
                Some(header) => apply_header(&mut builder, header, source_path),
            }
        }
        builder.build()
    }
}

/// Computes the output path (`2016/post.html`) and the base directory prefix
/// (`../`) for a content file at `relative_path` below the content root.
pub fn output_location(relative_path: &Path) -> (String, String) {
    let parts: Vec<String> = relative_path
        .with_extension("html")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let base_dir_prefix = "../".repeat(parts.len().saturating_sub(1));
    (parts.join("/"), base_dir_prefix)
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .map_or(false, |extension| extension == MARKDOWN_EXTENSION)
}

/// A `;;key=value` header line, with the key trimmed and lower-cased and the
/// value trimmed.
#[derive(Debug, PartialEq)]
struct Header<'a> {
    key: String,
    value: &'a str,
}

fn parse_header(line: &str) -> Option<Header<'_>> {
    let header = line.trim().strip_prefix(HEADER_MARKER)?;
    let (key, value) = match header.find('=') {
        Some(i) => (&header[..i], &header[i + 1..]),
        None => (header, ""),
    };
    Some(Header {
        key: key.trim().to_lowercase(),
        value: value.trim(),
    })
}

fn apply_header(builder: &mut DocumentBuilder, header: Header, source_path: &Path) {
    match header.key.as_str() {
        "title" => builder.title(header.value),
        "created" => builder.created(parse_date(header.value)),
        "modified" => builder.modified(parse_date(header.value)),
        "noblog" => builder.kind(DocumentKind::Page),
        "category" => {
            for label in header.value.split(',') {
                builder.category(label);
            }
        }
        _ => warn!(
            "Unknown header {} in {}",
            header.key,
            source_path.display()
        ),
    }
}

/// Parses a `created`/`modified` header value. Year, month, day and minute
/// must have their full width; only the hour may have one digit. A value
/// which doesn't match [`DATE_TIME_PATTERN`] is logged and yields `None`.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let parsed = match DATE_TIME_SHAPE_RE.is_match(value) {
        true => NaiveDateTime::parse_from_str(value, DATE_TIME_PATTERN).ok(),
        false => None,
    };
    match parsed {
        Some(date) => Some(date),
        None => {
            warn!("{} does not match yyyy-MM-dd H:mm", value);
            None
        }
    }
}

/// Represents the result of a scan.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error scanning the content directory.
#[derive(Debug)]
pub enum Error {
    /// Returned when the content directory tree can't be walked.
    WalkDir(walkdir::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::WalkDir(err) => write!(f, "Scanning content failed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::WalkDir(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while walking the content tree.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}
