//! Support for creating an Atom feed from the newest posts.

use crate::config::Config;
use crate::document::Document;
use crate::links::make_links_absolute;
use atom_syndication::{Content, Entry, Error as AtomError, Feed, Link, Person};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::io::Write;
use url::Url;

/// The fixed date part of the feed's tag URI.
const FEED_ID_DATE: &str = "2016-01-01";

/// Creates a feed of the first `config.feed_posts` of the sorted `posts` and
/// writes the result to a [`std::io::Write`].
pub fn write_feed<W: Write>(config: &Config, posts: &[Document], w: W) -> Result<()> {
    feed(config, posts)?.write_to(w)?;
    Ok(())
}

/// Builds the feed of the first `config.feed_posts` of the sorted `posts`.
pub fn feed(config: &Config, posts: &[Document]) -> Result<Feed> {
    let posts = &posts[..config.feed_posts.min(posts.len())];
    let authority = tag_authority(&config.base_url);

    let updated = match posts.iter().map(|post| post.modified).max() {
        Some(modified) => to_fixed(&modified),
        None => to_fixed(&Utc::now().naive_utc()),
    };

    let mut link = Link::default();
    link.set_href(config.base_url.as_str());
    link.set_rel("self");

    let mut feed = Feed::default();
    feed.set_title(config.title.as_str());
    feed.set_id(format!(
        "tag:{},{}:/{}",
        authority, FEED_ID_DATE, config.feed_filename
    ));
    feed.set_links(vec![link]);
    feed.set_updated(updated);
    feed.set_authors(vec![person(&config.author)]);
    feed.set_entries(
        posts
            .iter()
            .map(|post| feed_entry(&config.base_url, &authority, post))
            .collect::<Result<Vec<Entry>>>()?,
    );
    Ok(feed)
}

fn feed_entry(base_url: &Url, authority: &str, post: &Document) -> Result<Entry> {
    let mut link = Link::default();
    link.set_href(base_url.join(&post.output_path)?.as_str());
    link.set_rel("alternate");

    let mut content = Content::default();
    content.set_content_type("html".to_owned());
    content.set_value(make_links_absolute(&post.html, base_url.as_str()).into_owned());

    let mut entry = Entry::default();
    entry.set_title(post.title.as_str());
    entry.set_id(format!(
        "tag:{},{}:/{}",
        authority,
        post.created.format("%Y-%m-%d"),
        post.output_path
    ));
    entry.set_updated(to_fixed(&post.modified));
    entry.set_published(to_fixed(&post.created));
    entry.set_links(vec![link]);
    entry.set_content(content);
    Ok(entry)
}

/// The base URL without its scheme and trailing slash, e.g.
/// `blog.example.com` or `example.org/blog`.
fn tag_authority(base_url: &Url) -> String {
    let host = base_url.host_str().unwrap_or_default();
    let host = match base_url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_owned(),
    };
    format!("{}{}", host, base_url.path().trim_end_matches('/'))
}

fn person(name: &str) -> Person {
    let mut person = Person::default();
    person.set_name(name);
    person
}

// Header timestamps carry no zone; they are published as UTC.
fn to_fixed(date: &NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(date).into()
}

/// The result of a fallible feed operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants inlude I/O, Atom, and
/// URL issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when a post's output path can't be joined to the base URL.
    Url(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::Url(err) => write!(f, "Building entry URL: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::Url(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when building entry links.
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}
