//! Creates a new project directory with a starter configuration, templates,
//! a stylesheet and sample content which build into a working blog.

use crate::config::{
    CONFIG_FILE, CONTENT_DIRECTORY, OUTPUT_DIRECTORY, RESOURCES_DIRECTORY, TEMPLATES_DIRECTORY,
};
use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

/// The year folders created below the content directory.
const CONTENT_SUBDIRECTORIES: &[&str] = &["2016", "2017"];

/// The folders created below the resources directory.
const RESOURCES_SUBDIRECTORIES: &[&str] = &["images"];

/// The starter files as (path relative to the project root, contents).
const SKELETON: &[(&str, &str)] = &[
    (CONFIG_FILE, include_str!("../skeleton/scriptorium.yaml")),
    (
        "templates/base.html",
        include_str!("../skeleton/templates/base.html"),
    ),
    (
        "templates/post.html",
        include_str!("../skeleton/templates/post.html"),
    ),
    (
        "templates/page.html",
        include_str!("../skeleton/templates/page.html"),
    ),
    (
        "templates/index.html",
        include_str!("../skeleton/templates/index.html"),
    ),
    (
        "templates/category.html",
        include_str!("../skeleton/templates/category.html"),
    ),
    (
        "resources/style.css",
        include_str!("../skeleton/resources/style.css"),
    ),
    (
        "resources/images/cake.svg",
        include_str!("../skeleton/resources/images/cake.svg"),
    ),
    ("content/welcome.md", include_str!("../skeleton/content/welcome.md")),
    ("content/about.md", include_str!("../skeleton/content/about.md")),
    (
        "content/2016/chocolate_bar.md",
        include_str!("../skeleton/content/2016/chocolate_bar.md"),
    ),
    (
        "content/2016/halvah_pastry.md",
        include_str!("../skeleton/content/2016/halvah_pastry.md"),
    ),
    (
        "content/2017/jelly_bear.md",
        include_str!("../skeleton/content/2017/jelly_bear.md"),
    ),
];

/// Creates the project directory `directory` and fills it with the starter
/// files. Fails without touching anything if `directory` already exists.
pub fn initialize(directory: &Path) -> Result<()> {
    if directory.exists() {
        return Err(Error::Exists(directory.to_owned()));
    }

    std::fs::create_dir_all(directory)?;
    info!("Created project directory {}", directory.display());

    for name in &[
        OUTPUT_DIRECTORY,
        CONTENT_DIRECTORY,
        RESOURCES_DIRECTORY,
        TEMPLATES_DIRECTORY,
    ] {
        std::fs::create_dir(directory.join(name))?;
    }
    for year in CONTENT_SUBDIRECTORIES {
        std::fs::create_dir(directory.join(CONTENT_DIRECTORY).join(year))?;
    }
    for sub in RESOURCES_SUBDIRECTORIES {
        std::fs::create_dir(directory.join(RESOURCES_DIRECTORY).join(sub))?;
    }
    info!("Created project directories");

    for (path, contents) in SKELETON {
        std::fs::write(directory.join(path), contents)?;
    }
    info!("Wrote {} starter files", SKELETON.len());
    Ok(())
}

/// The result of initializing a project.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem initializing a project.
#[derive(Debug)]
pub enum Error {
    /// Returned when the project directory already exists.
    Exists(PathBuf),

    /// Returned when a directory or file can't be created.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Exists(path) => write!(
                f,
                "Directory '{}' already exists, initialization aborted",
                path.display()
            ),
            Error::Io(err) => write!(f, "Initialization failed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Exists(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while creating the project tree.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
