//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: cleaning the output directory
//! ([`clean`]), scanning the content files ([`crate::scanner`]), assembling
//! the posts ([`crate::site`]), rendering all pages ([`crate::write`]), copying
//! the static resources ([`copy_resources`]) and generating the Atom feed and
//! the sitemap.

use crate::config::Config;
use crate::document::DocumentKind;
use crate::feed::{write_feed, Error as FeedError};
use crate::scanner::{Error as ScanError, Scanner};
use crate::site::Site;
use crate::sitemap::{write_sitemap, Error as SitemapError};
use crate::write::{Error as WriteError, Templates, Writer};
use log::{info, warn};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The number of artifacts each phase of a build produced.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Summary {
    pub posts: usize,
    pub pages: usize,
    pub index_pages: usize,
    pub category_pages: usize,
    pub resources: usize,
}

/// Builds the site from a [`Config`] object. This calls into
/// [`Scanner::scan`], the render methods of [`Writer`] and
/// [`crate::feed::write_feed`] which do the heavy-lifting.
pub fn build_site(config: &Config) -> Result<Summary> {
    // Parse the templates first so a broken template leaves the previous
    // output in place.
    let templates = Templates::load(config)?;

    let removed = clean(&config.output_directory, &config.clean_ignore)?;
    info!("Removed {} files from the output directory", removed);

    let documents = Scanner::new(&config.category_prefix).scan(&config.content_directory)?;
    info!("Found {} documents", documents.len());
    let site = Site::assemble(documents);

    let writer = Writer::new(config, &templates);
    let mut summary = Summary::default();

    summary.posts = writer.render_documents(&site.posts, DocumentKind::Post);
    info!("Wrote {} of {} posts", summary.posts, site.posts.len());

    summary.pages = writer.render_documents(&site.pages, DocumentKind::Page);
    info!("Wrote {} of {} pages", summary.pages, site.pages.len());

    summary.index_pages = writer.render_index(&site.posts);
    info!("Wrote {} index pages", summary.index_pages);

    summary.category_pages = writer.render_category_pages(&site.posts);
    info!("Wrote {} category pages", summary.category_pages);

    summary.resources = copy_resources(&config.resources_directory, &config.output_directory)?;
    info!("Copied {} resources", summary.resources);

    write_feed(
        config,
        &site.posts,
        File::create(config.output_directory.join(&config.feed_filename))?,
    )?;
    info!("Wrote {}", config.feed_filename);

    write_sitemap(
        config,
        &site,
        chrono::Local::now().naive_local().date(),
        File::create(config.output_directory.join(&config.sitemap_filename))?,
    )?;
    info!("Wrote {}", config.sitemap_filename);

    Ok(summary)
}

/// Deletes every file below `output_directory` whose file name isn't listed
/// in `ignore`, then removes the directories left empty. The output
/// directory itself is kept (and created if it's missing). Returns the
/// number of deleted files.
pub fn clean(output_directory: &Path, ignore: &[String]) -> Result<usize> {
    if !output_directory.exists() {
        std::fs::create_dir_all(output_directory).map_err(|err| Error::Clean {
            path: output_directory.to_owned(),
            err,
        })?;
        return Ok(0);
    }

    let mut removed = 0;
    for result in WalkDir::new(output_directory).min_depth(1).contents_first(true) {
        let entry = result?;
        let path = entry.path();
        let clean_err = |err| Error::Clean {
            path: path.to_owned(),
            err,
        };

        if entry.file_type().is_dir() {
            let is_empty = std::fs::read_dir(path)
                .map_err(clean_err)?
                .next()
                .is_none();
            if is_empty {
                std::fs::remove_dir(path).map_err(clean_err)?;
            }
        } else {
            let ignored = ignore
                .iter()
                .any(|name| entry.file_name() == name.as_str());
            if !ignored {
                std::fs::remove_file(path).map_err(clean_err)?;
                removed += 1;
            }
        }
    }
    Ok(removed)
}

/// Copies every file below `resources_directory` to the same relative path
/// below `output_directory`. Files which already exist in the output are
/// skipped with a warning. Returns the number of copied files.
pub fn copy_resources(resources_directory: &Path, output_directory: &Path) -> Result<usize> {
    if !resources_directory.is_dir() {
        warn!(
            "No resources directory at {}",
            resources_directory.display()
        );
        return Ok(0);
    }

    let mut copied = 0;
    for result in WalkDir::new(resources_directory).min_depth(1) {
        let entry = result?;
        if entry.file_type().is_dir() {
            continue;
        }

        // strip_prefix() should never fail; `entry` is below the root
        let relative_path = match entry.path().strip_prefix(resources_directory) {
            Ok(relative_path) => relative_path,
            Err(_) => continue,
        };
        let target = output_directory.join(relative_path);
        if target.exists() {
            warn!("{} already exists; not copied", target.display());
            continue;
        }

        if let Some(dir) = target.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::copy(entry.path(), &target)?;
        copied += 1;
    }
    Ok(copied)
}

/// The result of a fallible build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during scanning,
/// template loading, cleaning the output directory, writing the feed or the
/// sitemap, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors while scanning the content directory.
    Scan(ScanError),

    /// Returned for errors loading the templates.
    Write(WriteError),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned when a directory tree can't be walked.
    WalkDir(walkdir::Error),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for errors writing the sitemap.
    Sitemap(SitemapError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Scan(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning '{}': {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
            Error::Feed(err) => write!(f, "Writing feed: {}", err),
            Error::Sitemap(err) => write!(f, "Writing sitemap: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Scan(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Sitemap(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<ScanError> for Error {
    /// Converts [`ScanError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ScanError) -> Error {
        Error::Scan(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<SitemapError> for Error {
    /// Converts [`SitemapError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: SitemapError) -> Error {
        Error::Sitemap(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative_path: &str, contents: &str) {
        let path = root.join(relative_path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_clean_keeps_ignored_files() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("blog");
        write(&out, "index.html", "old");
        write(&out, ".gitkeep", "");
        write(&out, "2016/post.html", "old");
        write(&out, "images/.gitkeep", "");
        fs::create_dir_all(out.join("empty/nested"))?;

        let removed = clean(&out, &[String::from(".gitkeep")])?;
        assert_eq!(2, removed);
        assert!(out.is_dir());
        assert!(out.join(".gitkeep").is_file());
        assert!(out.join("images/.gitkeep").is_file());
        assert!(!out.join("index.html").exists());
        assert!(!out.join("2016").exists());
        assert!(!out.join("empty").exists());
        Ok(())
    }

    #[test]
    fn test_clean_creates_missing_directory() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("blog");
        assert_eq!(0, clean(&out, &[])?);
        assert!(out.is_dir());
        Ok(())
    }

    #[test]
    fn test_copy_resources_skips_existing_files() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let resources = dir.path().join("resources");
        let out = dir.path().join("blog");
        write(&resources, "style.css", "body {}");
        write(&resources, "images/logo.png", "png");
        write(&out, "style.css", "keep me");

        assert_eq!(1, copy_resources(&resources, &out)?);
        assert_eq!("png", fs::read_to_string(out.join("images/logo.png"))?);
        assert_eq!("keep me", fs::read_to_string(out.join("style.css"))?);
        Ok(())
    }

    #[test]
    fn test_missing_resources_copy_nothing() -> Result<()> {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            0,
            copy_resources(&dir.path().join("resources"), &dir.path().join("blog"))?
        );
        Ok(())
    }
}
