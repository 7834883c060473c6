//! Defines the [`Category`] type, which represents a category a
//! [`crate::document::Document`] declares in its `;;category=` header.

use gtmpl_value::Value;
use std::collections::HashMap;

/// Represents one category of a [`crate::document::Document`]. Categories are
/// created once per declaring document, so the same logical category exists
/// as several instances. Two instances are equal when their names match
/// ignoring case.
#[derive(Clone, Debug)]
pub struct Category {
    /// The category label as written in the header, with all whitespace
    /// removed.
    pub name: String,

    /// The name lower-cased and then capitalized on its first character.
    /// Category pages are grouped by this value.
    pub formatted_name: String,

    /// The file name of the category page, relative to the output root
    /// (`{prefix}{lower-cased name}.html`).
    pub page_path: String,

    /// [`Category::page_path`] as seen from the owning document's output
    /// location (the document's base directory prefix + the page path).
    pub relative_page_path: String,
}

impl Category {
    /// Creates a category from a raw header label. `prefix` is the
    /// configured category page prefix and `base_dir_prefix` is the owning
    /// document's path back to the output root. Returns `None` for a label
    /// which is empty once whitespace is removed.
    pub fn new(label: &str, prefix: &str, base_dir_prefix: &str) -> Option<Category> {
        let name: String = label.chars().filter(|c| !c.is_whitespace()).collect();
        if name.is_empty() {
            return None;
        }

        let page_path = page_path(prefix, &name);
        Some(Category {
            formatted_name: format_name(&name),
            relative_page_path: format!("{}{}", base_dir_prefix, page_path),
            page_path,
            name,
        })
    }

    /// Converts the category into a template [`Value`] with fields `name`,
    /// `path` and `link` (the relative page path).
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), Value::String(self.formatted_name.clone()));
        m.insert("path".to_owned(), Value::String(self.page_path.clone()));
        m.insert(
            "link".to_owned(),
            Value::String(self.relative_page_path.clone()),
        );
        Value::Object(m)
    }
}

impl PartialEq for Category {
    /// Implements [`PartialEq`] and [`Eq`] for [`Category`] by comparing the
    /// lower-cased names.
    fn eq(&self, other: &Self) -> bool {
        self.name.to_lowercase() == other.name.to_lowercase()
    }
}
impl Eq for Category {}

/// Lower-cases `name` and upper-cases its first character.
pub fn format_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// The file name of the page for the category `name`.
pub fn page_path(prefix: &str, name: &str) -> String {
    format!("{}{}.html", prefix, name.to_lowercase())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_whitespace_and_case_are_ignored() {
        let a = Category::new("Food", "category_", "").unwrap();
        let b = Category::new(" fo od ", "category_", "../").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.page_path, b.page_path);
        assert_eq!("category_food.html", b.page_path);
        assert_eq!("../category_food.html", b.relative_page_path);
    }

    #[test]
    fn test_formatted_name() {
        let category = Category::new("rUST lang", "c-", "").unwrap();
        assert_eq!("Rustlang", category.formatted_name);
        assert_eq!("rUSTlang", category.name);
        assert_eq!("c-rustlang.html", category.page_path);
    }

    #[test]
    fn test_blank_label_is_skipped() {
        assert!(Category::new("  \t", "category_", "").is_none());
    }

    #[test]
    fn test_to_value() {
        let category = Category::new("Travel", "category_", "../../").unwrap();
        let m = match category.to_value() {
            Value::Object(m) => m,
            _ => panic!("wanted an object"),
        };
        match (m.get("name"), m.get("link")) {
            (Some(Value::String(name)), Some(Value::String(link))) => {
                assert_eq!("Travel", name.as_str());
                assert_eq!("../../category_travel.html", link.as_str());
            }
            _ => panic!("wanted string fields `name` and `link`"),
        }
    }
}
