//! Defines the [`Config`] type and the logic for loading it from a project's
//! `scriptorium.yaml` file. The configuration is loaded once and then handed
//! by reference to the scanner, the writer and the build pipeline.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file which marks the root of a project.
pub const CONFIG_FILE: &str = "scriptorium.yaml";

/// The directory (relative to the project root) holding the Markdown sources.
pub const CONTENT_DIRECTORY: &str = "content";

/// The directory (relative to the project root) the site is written to.
pub const OUTPUT_DIRECTORY: &str = "blog";

/// The directory (relative to the project root) holding static resources.
pub const RESOURCES_DIRECTORY: &str = "resources";

/// The directory (relative to the project root) holding the templates.
pub const TEMPLATES_DIRECTORY: &str = "templates";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PageSize(pub usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(3)
    }
}

/// The template files for each artifact kind, relative to the templates
/// directory. Several files are concatenated before parsing, so shared
/// `{{define}}` blocks can live in their own file.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Templates {
    pub post: Vec<PathBuf>,
    pub page: Vec<PathBuf>,
    pub index: Vec<PathBuf>,
    pub category: Vec<PathBuf>,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            post: vec![PathBuf::from("post.html")],
            page: vec![PathBuf::from("page.html")],
            index: vec![PathBuf::from("index.html")],
            category: vec![PathBuf::from("category.html")],
        }
    }
}

/// The contents of a `scriptorium.yaml` file. Every key is optional.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub author: String,
    pub locale: String,
    pub base_url: Url,
    pub date_format: String,
    pub index_filename: String,
    pub index_posts: PageSize,
    pub feed_filename: String,
    pub feed_posts: usize,
    pub category_prefix: String,
    pub sitemap_filename: String,
    pub clean_ignore: Vec<String>,
    pub templates: Templates,
}

impl Default for Project {
    fn default() -> Self {
        Project {
            title: String::from("My Blog"),
            author: String::from("John Doe"),
            locale: String::from("en-US"),
            // a literal, known-good URL
            base_url: Url::parse("http://blog.example.com/").unwrap(),
            date_format: String::from("%Y-%m-%d %H:%M"),
            index_filename: String::from("index"),
            index_posts: PageSize::default(),
            feed_filename: String::from("feed.xml"),
            feed_posts: 3,
            category_prefix: String::from("category_"),
            sitemap_filename: String::from("sitemap.xml"),
            clean_ignore: vec![String::from(".gitkeep")],
            templates: Templates::default(),
        }
    }
}

/// The resolved configuration for a project: the settings from the project
/// file plus the absolute locations of the project directories.
#[derive(Debug, Clone)]
pub struct Config {
    pub root_directory: PathBuf,
    pub content_directory: PathBuf,
    pub output_directory: PathBuf,
    pub resources_directory: PathBuf,
    pub templates_directory: PathBuf,

    pub title: String,
    pub author: String,
    pub locale: String,

    /// The public URL of the output directory. Always ends with `/`.
    pub base_url: Url,
    pub date_format: String,
    pub index_filename: String,
    pub index_page_size: usize,
    pub feed_filename: String,
    pub feed_posts: usize,
    pub category_prefix: String,
    pub sitemap_filename: String,
    pub clean_ignore: Vec<String>,
    pub templates: Templates,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a `scriptorium.yaml`
    /// file and loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Config::from_project_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(Error::NotFound),
            }
        }
    }

    /// Loads the project file at `path`. The directory containing the file
    /// becomes the project root.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project = parse_project(&contents)?;
        match path.parent() {
            None => Err(Error::NoProjectRoot(path.to_owned())),
            Some(root) => Config::new(root, project),
        }
    }

    /// Resolves a [`Project`] against the project root directory `root`.
    pub fn new(root: &Path, project: Project) -> Result<Config> {
        if project.index_posts.0 < 1 {
            return Err(Error::InvalidPageSize);
        }

        let mut base_url = project.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Config {
            root_directory: root.to_owned(),
            content_directory: root.join(CONTENT_DIRECTORY),
            output_directory: root.join(OUTPUT_DIRECTORY),
            resources_directory: root.join(RESOURCES_DIRECTORY),
            templates_directory: root.join(TEMPLATES_DIRECTORY),
            title: project.title,
            author: project.author,
            locale: project.locale,
            base_url,
            date_format: project.date_format,
            index_filename: project.index_filename,
            index_page_size: project.index_posts.0,
            feed_filename: project.feed_filename,
            feed_posts: project.feed_posts,
            category_prefix: project.category_prefix,
            sitemap_filename: project.sitemap_filename,
            clean_ignore: project.clean_ignore,
            templates: project.templates,
        })
    }

    /// The language subtag of the configured locale (`en` for `en-US`).
    pub fn language(&self) -> &str {
        self.locale
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
    }
}

/// Parses the contents of a project file. A file without any keys (empty,
/// or only comments) yields the defaults.
pub fn parse_project(contents: &str) -> Result<Project> {
    let has_keys = contents.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    match has_keys {
        false => Ok(Project::default()),
        true => Ok(serde_yaml::from_str(contents)?),
    }
}

/// The result of loading a configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when no `scriptorium.yaml` exists in the directory or any of
    /// its ancestors.
    NotFound,

    /// Returned when the project file has no parent directory.
    NoProjectRoot(PathBuf),

    /// Returned when the project file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML for a [`Project`].
    DeserializeYaml(serde_yaml::Error),

    /// Returned when `index_posts` is zero.
    InvalidPageSize,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound => write!(
                f,
                "Could not find `{}` in any parent directory",
                CONFIG_FILE
            ),
            Error::NoProjectRoot(path) => write!(
                f,
                "Can't get parent directory for project file '{}'",
                path.display()
            ),
            Error::Open { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => {
                write!(f, "Loading configuration: {}", err)
            }
            Error::InvalidPageSize => {
                write!(f, "`index_posts` must be at least 1")
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound => None,
            Error::NoProjectRoot(_) => None,
            Error::Open { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::InvalidPageSize => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_for_empty_project() -> Result<()> {
        let project: Project = serde_yaml::from_str("{}")?;
        let config = Config::new(Path::new("/project"), project)?;
        assert_eq!("My Blog", config.title);
        assert_eq!(3, config.index_page_size);
        assert_eq!("category_", config.category_prefix);
        assert_eq!("http://blog.example.com/", config.base_url.as_str());
        assert_eq!(PathBuf::from("/project/content"), config.content_directory);
        assert_eq!(PathBuf::from("/project/blog"), config.output_directory);
        assert_eq!("en", config.language());
        Ok(())
    }

    #[test]
    fn test_base_url_gets_trailing_slash() -> Result<()> {
        let project: Project =
            serde_yaml::from_str("base_url: https://example.org/blog")?;
        let config = Config::new(Path::new("/project"), project)?;
        assert_eq!("https://example.org/blog/", config.base_url.as_str());
        Ok(())
    }

    #[test]
    fn test_zero_page_size_is_rejected() -> Result<()> {
        let project: Project = serde_yaml::from_str("index_posts: 0")?;
        match Config::new(Path::new("/project"), project) {
            Err(Error::InvalidPageSize) => Ok(()),
            other => panic!("wanted InvalidPageSize; found {:?}", other),
        }
    }

    #[test]
    fn test_project_file_without_keys_uses_defaults() -> Result<()> {
        let dir = TempDir::new().unwrap();
        for contents in &["", "\n  \n", "# only comments\n"] {
            std::fs::write(dir.path().join(CONFIG_FILE), contents).unwrap();
            let config = Config::from_directory(dir.path())?;
            assert_eq!("My Blog", config.title);
            assert_eq!(3, config.index_page_size);
        }
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_ancestors() -> Result<()> {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "title: Crumbs\nindex_posts: 5\ntemplates:\n  post: [base.html, post.html]\n",
        )
        .unwrap();
        let nested = dir.path().join("content").join("2016");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::from_directory(&nested)?;
        assert_eq!("Crumbs", config.title);
        assert_eq!(5, config.index_page_size);
        assert_eq!(dir.path(), config.root_directory.as_path());
        assert_eq!(
            vec![PathBuf::from("base.html"), PathBuf::from("post.html")],
            config.templates.post
        );
        assert_eq!(vec![PathBuf::from("page.html")], config.templates.page);
        Ok(())
    }
}
