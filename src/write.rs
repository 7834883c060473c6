//! Defines the [`Writer`], which applies the templates to documents, index
//! pages and category pages and writes the results to disk.
//!
//! Every page is rendered from a [`Value::Object`] with at least the fields
//! `blog` (`title`, `author`, `language`) and `basedir` (the path from the
//! page back to the output root). Standalone documents add `post` or `page`;
//! index pages add `posts`, `index_newer` and `index_older`; category pages
//! add `posts` and `category`.
//!
//! A page which fails to render or write is logged and skipped; the other
//! pages are still written.

use crate::config::Config;
use crate::document::{Document, DocumentKind};
use crate::site::{categorize, paginate};
use crate::value::{embedded_documents, RenderMode};
use gtmpl::{Context, Template, Value};
use log::{info, warn};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// The parsed templates, one per artifact kind.
pub struct Templates {
    pub post: Template,
    pub page: Template,
    pub index: Template,
    pub category: Template,
}

impl Templates {
    /// Loads and parses the templates named in `config`. Any failure here is
    /// fatal for the build.
    pub fn load(config: &Config) -> Result<Templates> {
        let dir = &config.templates_directory;
        Ok(Templates {
            post: parse_template(config.templates.post.iter().map(|p| dir.join(p)))?,
            page: parse_template(config.templates.page.iter().map(|p| dir.join(p)))?,
            index: parse_template(config.templates.index.iter().map(|p| dir.join(p)))?,
            category: parse_template(
                config.templates.category.iter().map(|p| dir.join(p)),
            )?,
        })
    }

    fn for_kind(&self, kind: DocumentKind) -> &Template {
        match kind {
            DocumentKind::Post => &self.post,
            DocumentKind::Page => &self.page,
        }
    }
}

/// Loads the template file contents, concatenates them and parses the result
/// into a single template. Files are joined with a newline; nothing is added
/// after the last one.
pub fn parse_template<P: AsRef<Path>>(
    template_files: impl Iterator<Item = P>,
) -> Result<Template> {
    let mut contents = String::new();
    for (i, template_file) in template_files.enumerate() {
        use std::io::Read;
        let template_file = template_file.as_ref();
        if i > 0 {
            contents.push('\n');
        }
        File::open(&template_file)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|err| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err,
            })?;
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

/// Responsible for templating and writing HTML pages to disk from
/// [`Document`] sources.
pub struct Writer<'a> {
    templates: &'a Templates,

    /// The directory all pages are written to.
    output_directory: &'a Path,

    /// The `blog` field shared by every page.
    site_info: Value,

    /// The `chrono` format for the `formatted` field of dates.
    date_format: &'a str,

    /// The number of posts per index page.
    index_page_size: usize,

    /// The base name of the index pages (`index` for `index.html`).
    index_filename: &'a str,

    /// The file name prefix of category pages.
    category_prefix: &'a str,
}

impl<'a> Writer<'a> {
    /// Constructs a new writer from the configuration and parsed templates.
    pub fn new(config: &'a Config, templates: &'a Templates) -> Writer<'a> {
        let mut blog: HashMap<String, Value> = HashMap::new();
        blog.insert("title".to_owned(), Value::String(config.title.clone()));
        blog.insert("author".to_owned(), Value::String(config.author.clone()));
        blog.insert(
            "language".to_owned(),
            Value::String(config.language().to_owned()),
        );

        Writer {
            templates,
            output_directory: &config.output_directory,
            site_info: Value::Object(blog),
            date_format: &config.date_format,
            index_page_size: config.index_page_size,
            index_filename: &config.index_filename,
            category_prefix: &config.category_prefix,
        }
    }

    /// Renders each document on its own page at its output path, using the
    /// post or page template according to `kind`. Returns the number of
    /// files written.
    pub fn render_documents(&self, documents: &[Document], kind: DocumentKind) -> usize {
        let key = match kind {
            DocumentKind::Post => "post",
            DocumentKind::Page => "page",
        };

        let mut written = 0;
        for document in documents {
            let mut m = self.base_context(&document.base_dir_prefix);
            m.insert(
                key.to_owned(),
                document.to_value(RenderMode::Standalone, self.date_format),
            );
            if self.write_page(
                self.templates.for_kind(kind),
                m,
                &document.output_path,
            ) {
                written += 1;
            }
        }
        written
    }

    /// Renders the paginated index of the sorted `posts`. Returns the number
    /// of index pages written.
    pub fn render_index(&self, posts: &[Document]) -> usize {
        let mut written = 0;
        for page in paginate(posts, self.index_page_size, self.index_filename) {
            let mut m = self.base_context("");
            m.insert(
                "posts".to_owned(),
                embedded_documents(page.posts.iter(), self.date_format),
            );
            m.insert(
                "index_newer".to_owned(),
                Value::String(page.newer.unwrap_or_default()),
            );
            m.insert(
                "index_older".to_owned(),
                Value::String(page.older.unwrap_or_default()),
            );
            if self.write_page(&self.templates.index, m, &page.file_name) {
                written += 1;
            }
        }
        written
    }

    /// Renders one page per category of the sorted `posts`. Returns the
    /// number of category pages written.
    pub fn render_category_pages(&self, posts: &[Document]) -> usize {
        let mut written = 0;
        for group in categorize(posts, self.category_prefix) {
            let mut m = self.base_context("");
            m.insert(
                "posts".to_owned(),
                embedded_documents(group.posts.iter().copied(), self.date_format),
            );
            m.insert("category".to_owned(), Value::String(group.name.clone()));
            if self.write_page(&self.templates.category, m, &group.file_name) {
                written += 1;
            }
        }
        written
    }

    fn base_context(&self, base_dir: &str) -> HashMap<String, Value> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("blog".to_owned(), self.site_info.clone());
        m.insert("basedir".to_owned(), Value::String(base_dir.to_owned()));
        m
    }

    /// Renders and writes one page, logging the outcome. Returns whether the
    /// file was written.
    fn write_page(
        &self,
        template: &Template,
        context: HashMap<String, Value>,
        output_path: &str,
    ) -> bool {
        let file_path = self.output_directory.join(output_path);
        match write_file(template, Value::Object(context), &file_path) {
            Ok(()) => {
                info!("Wrote {}", output_path);
                true
            }
            Err(err) => {
                warn!("Writing {} failed: {}", output_path, err);
                false
            }
        }
    }
}

/// Renders `value` with `template`.
pub fn render(template: &Template, value: Value) -> Result<String> {
    let context = Context::from(value)?;
    Ok(template.render(&context)?)
}

// Parent directories are created as needed.
fn write_file(template: &Template, value: Value, file_path: &Path) -> Result<()> {
    let output = render(template, value)?;
    if let Some(dir) = file_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(file_path, output)?;
    Ok(())
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => write!(f, "Parsing template: {}", err),
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Project;
    use crate::site::test::{date, document};
    use crate::site::Site;
    use std::fs;
    use tempfile::TempDir;

    const POST_TEMPLATE: &str =
        "{{.blog.title}}|{{.basedir}}|{{.post.title}}|{{.post.next}}|{{.post.previous}}|{{range .post.categories}}{{.link}};{{end}}|{{.post.content}}";
    const PAGE_TEMPLATE: &str = "{{.page.title}}|{{.page.content}}";
    const INDEX_TEMPLATE: &str =
        "{{.index_newer}}|{{.index_older}}|{{range .posts}}{{.link}}={{.content}}{{end}}";
    const CATEGORY_TEMPLATE: &str =
        "{{.category}}|{{.basedir}}|{{range .posts}}{{.link}};{{end}}";

    fn setup(dir: &Path, post_template: &str) -> Config {
        let templates = dir.join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("post.html"), post_template).unwrap();
        fs::write(templates.join("page.html"), PAGE_TEMPLATE).unwrap();
        fs::write(templates.join("index.html"), INDEX_TEMPLATE).unwrap();
        fs::write(templates.join("category.html"), CATEGORY_TEMPLATE).unwrap();

        let mut project = Project::default();
        project.title = String::from("Crumbs");
        project.index_posts = crate::config::PageSize(2);
        Config::new(dir, project).unwrap()
    }

    fn site() -> Site {
        Site::assemble(vec![
            document("2016/a.md", date(1), DocumentKind::Post, &["Food"]),
            document("b.md", date(2), DocumentKind::Post, &[" food "]),
            document("2017/c.md", date(3), DocumentKind::Post, &["Travel"]),
            document("about.md", date(4), DocumentKind::Page, &[]),
        ])
    }

    #[test]
    fn test_render_documents() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path(), POST_TEMPLATE);
        let templates = Templates::load(&config)?;
        let writer = Writer::new(&config, &templates);
        let site = site();

        assert_eq!(3, writer.render_documents(&site.posts, DocumentKind::Post));
        assert_eq!(1, writer.render_documents(&site.pages, DocumentKind::Page));

        let a = fs::read_to_string(config.output_directory.join("2016/a.html"))?;
        assert_eq!(
            "Crumbs|../|2016/a.md|../b.html||../category_food.html;|<p>Body of <a href=\"../other.html\">2016/a.md</a></p>\n",
            a
        );
        let about = fs::read_to_string(config.output_directory.join("about.html"))?;
        assert_eq!(
            "about.md|<p>Body of <a href=\"other.html\">about.md</a></p>\n",
            about
        );
        Ok(())
    }

    #[test]
    fn test_rendering_is_idempotent() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path(), POST_TEMPLATE);
        let templates = Templates::load(&config)?;
        let writer = Writer::new(&config, &templates);
        let site = site();
        let path = config.output_directory.join("2017/c.html");

        writer.render_documents(&site.posts, DocumentKind::Post);
        let first = fs::read(&path)?;
        writer.render_documents(&site.posts, DocumentKind::Post);
        assert_eq!(first, fs::read(&path)?);
        Ok(())
    }

    #[test]
    fn test_render_index() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path(), POST_TEMPLATE);
        let templates = Templates::load(&config)?;
        let writer = Writer::new(&config, &templates);
        let site = site();

        assert_eq!(2, writer.render_index(&site.posts));
        let first = fs::read_to_string(config.output_directory.join("index.html"))?;
        assert_eq!(
            "|index-1.html|2017/c.html=<p>Body of <a href=\"other.html\">2017/c.md</a></p>\nb.html=<p>Body of <a href=\"other.html\">b.md</a></p>\n",
            first
        );
        let second = fs::read_to_string(config.output_directory.join("index-1.html"))?;
        assert!(second.starts_with("index.html||2016/a.html="));
        Ok(())
    }

    #[test]
    fn test_render_category_pages() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path(), POST_TEMPLATE);
        let templates = Templates::load(&config)?;
        let writer = Writer::new(&config, &templates);
        let site = site();

        assert_eq!(2, writer.render_category_pages(&site.posts));
        assert_eq!(
            "Food||b.html;2016/a.html;",
            fs::read_to_string(config.output_directory.join("category_food.html"))?
        );
        assert_eq!(
            "Travel||2017/c.html;",
            fs::read_to_string(config.output_directory.join("category_travel.html"))?
        );
        Ok(())
    }

    #[test]
    fn test_failed_page_is_skipped() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path(), POST_TEMPLATE);
        let templates = Templates::load(&config)?;
        let writer = Writer::new(&config, &templates);
        let site = site();

        // a directory where b.html should go makes that one write fail
        fs::create_dir_all(config.output_directory.join("b.html"))?;
        assert_eq!(2, writer.render_documents(&site.posts, DocumentKind::Post));
        assert!(config.output_directory.join("2016/a.html").is_file());
        Ok(())
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = setup(dir.path(), POST_TEMPLATE);
        config.templates.index = vec![PathBuf::from("missing.html")];
        match Templates::load(&config) {
            Err(Error::OpenTemplateFile { .. }) => {}
            _ => panic!("wanted OpenTemplateFile"),
        }
    }

    #[test]
    fn test_concatenated_templates() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.html");
        let post = dir.path().join("post.html");
        fs::write(&base, r#"{{define "greeting"}}hello {{.}}{{end}}"#)?;
        fs::write(&post, r#"{{template "greeting" .name}}"#)?;
        let template = parse_template(vec![base, post].into_iter())?;

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), Value::String(String::from("world")));
        assert_eq!("\nhello world", render(&template, Value::Object(m))?);
        Ok(())
    }

    #[test]
    fn test_single_template_adds_nothing() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<{{.name}}>")?;
        let template = parse_template(vec![page].into_iter())?;

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), Value::String(String::from("x")));
        assert_eq!("<x>", render(&template, Value::Object(m))?);
        Ok(())
    }
}
