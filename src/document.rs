//! Defines the [`Document`] type, which represents one content file, and the
//! [`DocumentBuilder`] which accumulates a document while its source file is
//! being read.

use crate::category::Category;
use crate::markdown;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Whether a document is part of the chronological blog or a standalone page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    /// A blog post: sorted by date, linked to its neighbours, listed on the
    /// index and category pages.
    Post,

    /// A simple page (marked with `;;noblog`): rendered on its own only.
    Page,
}

/// A parsed and validated content file. Documents are created by the
/// [`crate::scanner::Scanner`], annotated with navigation links by
/// [`crate::site::Site::assemble`] and read-only afterwards.
#[derive(Clone, Debug)]
pub struct Document {
    /// The originating source file. Two documents are equal when they come
    /// from the same file.
    pub source_path: PathBuf,

    /// The HTML file relative to the output root, e.g. `2016/post.html`.
    pub output_path: String,

    /// The path from the directory of [`Document::output_path`] back to the
    /// output root, e.g. `../`. Empty for documents at the root.
    pub base_dir_prefix: String,

    pub title: String,
    pub created: NaiveDateTime,

    /// Equal to [`Document::created`] unless a `;;modified=` header was given.
    pub modified: NaiveDateTime,

    pub kind: DocumentKind,

    /// The trimmed Markdown body.
    pub body: String,

    /// The body rendered to HTML, with links exactly as authored.
    pub html: String,

    /// The link to the next older post, relative to this document.
    pub previous_link: Option<String>,

    /// The link to the next newer post, relative to this document.
    pub next_link: Option<String>,

    /// The link to this document's own page from its own location.
    pub short_link: Option<String>,

    /// The document's categories in declaration order, without duplicates.
    pub categories: Vec<Category>,
}

impl PartialEq for Document {
    /// Documents are equal when they originate from the same source file.
    fn eq(&self, other: &Self) -> bool {
        self.source_path == other.source_path
    }
}
impl Eq for Document {}

/// Accumulates the header values and body lines of a content file. Call
/// [`DocumentBuilder::build`] once the whole file has been read.
#[derive(Debug)]
pub struct DocumentBuilder {
    source_path: PathBuf,
    output_path: String,
    base_dir_prefix: String,
    category_prefix: String,
    title: String,
    created: Option<NaiveDateTime>,
    modified: Option<NaiveDateTime>,
    kind: DocumentKind,
    body: String,
    categories: Vec<Category>,
}

impl DocumentBuilder {
    /// Starts a document for the source file `source_path`.
    /// `category_prefix` is the configured file name prefix for category
    /// pages.
    pub fn new(
        source_path: &Path,
        output_path: String,
        base_dir_prefix: String,
        category_prefix: &str,
    ) -> DocumentBuilder {
        DocumentBuilder {
            source_path: source_path.to_owned(),
            output_path,
            base_dir_prefix,
            category_prefix: category_prefix.to_owned(),
            title: String::new(),
            created: None,
            modified: None,
            kind: DocumentKind::Post,
            body: String::new(),
            categories: Vec::new(),
        }
    }

    pub fn title(&mut self, title: &str) {
        self.title = title.trim().to_owned();
    }

    /// Sets the creation date. `None` stands for a date which failed to
    /// parse and makes the document invalid.
    pub fn created(&mut self, created: Option<NaiveDateTime>) {
        self.created = created;
    }

    pub fn modified(&mut self, modified: Option<NaiveDateTime>) {
        self.modified = modified;
    }

    pub fn kind(&mut self, kind: DocumentKind) {
        self.kind = kind;
    }

    /// Adds a category unless an equal one was added before.
    pub fn category(&mut self, label: &str) {
        if let Some(category) =
            Category::new(label, &self.category_prefix, &self.base_dir_prefix)
        {
            if !self.categories.contains(&category) {
                self.categories.push(category);
            }
        }
    }

    /// Appends a line of Markdown to the body.
    pub fn line(&mut self, line: &str) {
        self.body.push_str(line);
        self.body.push('\n');
    }

    /// A document is valid when it has a title, a non-blank body and a
    /// creation date.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.body.trim().is_empty() && self.created.is_some()
    }

    /// Finishes the document, or returns `None` if it isn't valid.
    pub fn build(self) -> Option<Document> {
        if !self.is_valid() {
            return None;
        }
        let created = self.created?;
        let body = self.body.trim().to_owned();
        let short_link = self
            .output_path
            .rsplit('/')
            .next()
            .map(|file_name| file_name.to_owned());

        Some(Document {
            html: markdown::to_html(&body),
            source_path: self.source_path,
            output_path: self.output_path,
            base_dir_prefix: self.base_dir_prefix,
            title: self.title,
            created,
            modified: self.modified.unwrap_or(created),
            kind: self.kind,
            body,
            previous_link: None,
            next_link: None,
            short_link,
            categories: self.categories,
        })
    }
}
