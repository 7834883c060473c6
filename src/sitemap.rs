//! Support for creating an XML sitemap (sitemaps.org 0.9) covering every
//! generated page.

use crate::config::Config;
use crate::site::{categorize, paginate, Site};
use chrono::NaiveDate;
use std::fmt;
use std::io::Write;
use url::Url;

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` element of the sitemap.
#[derive(Debug, PartialEq)]
pub struct UrlEntry {
    pub location: Url,
    pub last_modified: NaiveDate,
}

/// Lists every page of `site`: posts and pages with their modification
/// date, then the index and category pages with the `generated` date.
pub fn entries(config: &Config, site: &Site, generated: NaiveDate) -> Result<Vec<UrlEntry>> {
    let mut entries = Vec::new();
    for document in site.posts.iter().chain(site.pages.iter()) {
        entries.push(UrlEntry {
            location: config.base_url.join(&document.output_path)?,
            last_modified: document.modified.date(),
        });
    }

    let index_pages = paginate(&site.posts, config.index_page_size, &config.index_filename);
    let category_pages = categorize(&site.posts, &config.category_prefix);
    let listings = index_pages
        .iter()
        .map(|page| &page.file_name)
        .chain(category_pages.iter().map(|group| &group.file_name));
    for file_name in listings {
        entries.push(UrlEntry {
            location: config.base_url.join(file_name)?,
            last_modified: generated,
        });
    }
    Ok(entries)
}

/// Serializes `entries` into a sitemap document.
pub fn to_xml(entries: &[UrlEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NAMESPACE));
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            xml_escape(entry.location.as_str())
        ));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            entry.last_modified.format("%Y-%m-%d")
        ));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Creates the sitemap for `site` and writes it to a [`std::io::Write`].
pub fn write_sitemap<W: Write>(
    config: &Config,
    site: &Site,
    generated: NaiveDate,
    mut w: W,
) -> Result<()> {
    let entries = entries(config, site, generated)?;
    w.write_all(to_xml(&entries).as_bytes())?;
    Ok(())
}

/// Escapes the XML special characters in text content.
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// The result of a fallible sitemap operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a sitemap.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when a page path can't be joined to the base URL.
    Url(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Url(err) => write!(f, "Building sitemap URL: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Url(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible sitemap operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when building page URLs.
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}
