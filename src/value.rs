//! Conversions from the content model into template [`Value`]s.
//!
//! The same [`Document`] is rendered in two contexts: on its own page and
//! embedded in an index or category page. The context is chosen with a
//! [`RenderMode`] and only affects the `content` field.

use crate::document::Document;
use crate::links::make_links_relative;
use chrono::NaiveDateTime;
use gtmpl_value::Value;
use std::collections::HashMap;

/// Where a document's body ends up in the output tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// The document's own page at its output path. Links in the body are
    /// prefixed with the document's base directory prefix.
    Standalone,

    /// An excerpt inside a page at the output root. Links in the body are
    /// kept as authored.
    Embedded,
}

impl Document {
    /// The body HTML as it must appear in `mode`.
    pub fn content(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Standalone => {
                make_links_relative(&self.html, &self.base_dir_prefix).into_owned()
            }
            RenderMode::Embedded => self.html.clone(),
        }
    }

    /// Converts the document into a [`Value::Object`] with the fields
    /// `title`, `content`, `link`, `previous`, `next`, `shortlink`,
    /// `created`, `modified` and `categories`. Missing links are empty
    /// strings. Dates are formatted with `date_format` (see [`date_value`]).
    ///
    /// Only `content` depends on `mode`. `previous`, `next` and the
    /// categories' `link` stay relative to the document's own directory, so
    /// templates for index and category pages (which sit at the output
    /// root) must use `link` and the categories' `path` instead.
    pub fn to_value(&self, mode: RenderMode, date_format: &str) -> Value {
        let option_to_value = |opt: &Option<String>| match opt {
            Some(link) => Value::String(link.clone()),
            None => Value::String(String::new()),
        };

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("content".to_owned(), Value::String(self.content(mode)));
        m.insert("link".to_owned(), Value::String(self.output_path.clone()));
        m.insert("previous".to_owned(), option_to_value(&self.previous_link));
        m.insert("next".to_owned(), option_to_value(&self.next_link));
        m.insert("shortlink".to_owned(), option_to_value(&self.short_link));
        m.insert("created".to_owned(), date_value(&self.created, date_format));
        m.insert("modified".to_owned(), date_value(&self.modified, date_format));
        m.insert(
            "categories".to_owned(),
            Value::Array(self.categories.iter().map(|c| c.to_value()).collect()),
        );
        Value::Object(m)
    }
}

/// Converts a date into a [`Value::Object`] with the fields `formatted`
/// (using `date_format`), `date` (`2016-05-01`), `time` (`09:30`), `iso`
/// (`2016-05-01T09:30:00`), `year`, `month` and `day`.
pub fn date_value(date: &NaiveDateTime, date_format: &str) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    let mut insert = |key: &str, format: &str| {
        m.insert(key.to_owned(), Value::String(date.format(format).to_string()));
    };
    insert("formatted", date_format);
    insert("date", "%Y-%m-%d");
    insert("time", "%H:%M");
    insert("iso", "%Y-%m-%dT%H:%M:%S");
    insert("year", "%Y");
    insert("month", "%m");
    insert("day", "%d");
    Value::Object(m)
}

/// Wraps a list of documents for embedding in an index or category page.
pub fn embedded_documents<'a>(
    documents: impl Iterator<Item = &'a Document>,
    date_format: &str,
) -> Value {
    Value::Array(
        documents
            .map(|d| d.to_value(RenderMode::Embedded, date_format))
            .collect(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::DocumentKind;
    use crate::site::test::{date, document};

    fn field<'a>(value: &'a Value, key: &str) -> &'a str {
        match value {
            Value::Object(m) => match m.get(key) {
                Some(Value::String(s)) => s.as_str(),
                _ => panic!("missing string field `{}`", key),
            },
            _ => panic!("wanted an object"),
        }
    }

    #[test]
    fn test_standalone_content_is_rewritten() {
        let d = document("2016/a.md", date(1), DocumentKind::Post, &[]);
        assert_eq!(
            "<p>Body of <a href=\"../other.html\">2016/a.md</a></p>\n",
            d.content(RenderMode::Standalone)
        );
        assert_eq!(
            "<p>Body of <a href=\"other.html\">2016/a.md</a></p>\n",
            d.content(RenderMode::Embedded)
        );
    }

    #[test]
    fn test_root_document_is_identical_in_both_modes() {
        let d = document("a.md", date(1), DocumentKind::Page, &[]);
        assert_eq!(d.content(RenderMode::Embedded), d.content(RenderMode::Standalone));
    }

    #[test]
    fn test_navigation_fields_ignore_mode() {
        let site = crate::site::Site::assemble(vec![
            document("2016/a.md", date(1), DocumentKind::Post, &[]),
            document("2017/b.md", date(2), DocumentKind::Post, &[]),
        ]);
        let older = &site.posts[1];
        let embedded = older.to_value(RenderMode::Embedded, "%Y");
        let standalone = older.to_value(RenderMode::Standalone, "%Y");
        assert_eq!("../2017/b.html", field(&embedded, "next"));
        assert_eq!(field(&standalone, "next"), field(&embedded, "next"));
        assert_eq!("2016/a.html", field(&embedded, "link"));
    }

    #[test]
    fn test_to_value() {
        let d = document("2016/a.md", date(3), DocumentKind::Post, &["Food"]);
        let value = d.to_value(RenderMode::Embedded, "%d.%m.%Y");
        assert_eq!("2016/a.md", field(&value, "title"));
        assert_eq!("2016/a.html", field(&value, "link"));
        assert_eq!("", field(&value, "next"));
        assert_eq!("a.html", field(&value, "shortlink"));

        let created = match &value {
            Value::Object(m) => m.get("created").unwrap(),
            _ => panic!("wanted an object"),
        };
        assert_eq!("03.01.2016", field(created, "formatted"));
        assert_eq!("2016-01-03T10:00:00", field(created, "iso"));

        match &value {
            Value::Object(m) => match m.get("categories") {
                Some(Value::Array(categories)) => {
                    assert_eq!(1, categories.len());
                    assert_eq!("../category_food.html", field(&categories[0], "link"));
                    assert_eq!("category_food.html", field(&categories[0], "path"));
                }
                _ => panic!("wanted an array of categories"),
            },
            _ => panic!("wanted an object"),
        }
    }
}
