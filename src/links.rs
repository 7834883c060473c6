//! Pure string transforms for links inside rendered HTML, plus the
//! computation of links between two output files.
//!
//! Links inside a document body are authored as if the document lived at
//! the output root. [`make_links_relative`] fixes them up for a document
//! rendered deeper in the tree and [`make_links_absolute`] turns them into
//! absolute URLs for the feed.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;

lazy_static! {
    static ref LINK_ATTRIBUTE_RE: Regex =
        Regex::new(r#"(?P<lead>\s)(?P<attr>href|src)="(?P<url>[^"]*)""#).unwrap();
}

/// Prepends `prefix` to the value of every `href` and `src` attribute in
/// `html` that doesn't start with `http:` or `https:`.
pub fn make_links_relative<'a>(html: &'a str, prefix: &str) -> Cow<'a, str> {
    if prefix.is_empty() {
        return Cow::Borrowed(html);
    }
    prefix_links(html, prefix)
}

/// Like [`make_links_relative`] with the site's `base_url` as prefix. The
/// base URL is given a trailing `/` if it lacks one.
pub fn make_links_absolute<'a>(html: &'a str, base_url: &str) -> Cow<'a, str> {
    if base_url.ends_with('/') {
        prefix_links(html, base_url)
    } else {
        prefix_links(html, &format!("{}/", base_url))
    }
}

fn prefix_links<'a>(html: &'a str, prefix: &str) -> Cow<'a, str> {
    LINK_ATTRIBUTE_RE.replace_all(html, |caps: &Captures| {
        let url = &caps["url"];
        if url.starts_with("http:") || url.starts_with("https:") {
            caps[0].to_owned()
        } else {
            format!(r#"{}{}="{}{}""#, &caps["lead"], &caps["attr"], prefix, url)
        }
    })
}

/// Computes the link from the output file `from` to the output file `to`.
/// Both are `/`-separated paths relative to the output root.
pub fn relative_link(from: &str, to: &str) -> String {
    let from_dirs: Vec<&str> = match from.rfind('/') {
        Some(i) => from[..i].split('/').collect(),
        None => Vec::new(),
    };
    let to_parts: Vec<&str> = to.split('/').collect();
    let (to_dirs, to_file) = to_parts.split_at(to_parts.len() - 1);

    let common = from_dirs
        .iter()
        .zip(to_dirs.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut link = "../".repeat(from_dirs.len() - common);
    for dir in &to_dirs[common..] {
        link.push_str(dir);
        link.push('/');
    }
    link.push_str(to_file[0]);
    link
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_absolute_links_are_untouched() {
        let html = r#"<a href="http://x/y">x</a><img src="https://x/y.png">"#;
        assert_eq!(html, make_links_relative(html, "../../"));
    }

    #[test]
    fn test_relative_links_are_prefixed() {
        assert_eq!(
            r#"<a href="../../z.html">z</a>"#,
            make_links_relative(r#"<a href="z.html">z</a>"#, "../../")
        );
        assert_eq!(
            r#"<p><img src="../images/a.jpg" alt="" /></p>"#,
            make_links_relative(r#"<p><img src="images/a.jpg" alt="" /></p>"#, "../")
        );
    }

    #[test]
    fn test_other_attributes_are_untouched() {
        let html = r#"<a data-href="z.html" title="src" href="z.html">src="q"</a>"#;
        assert_eq!(
            r#"<a data-href="z.html" title="src" href="../z.html">src="q"</a>"#,
            make_links_relative(html, "../")
        );
    }

    #[test]
    fn test_empty_prefix_borrows() {
        let html = r#"<a href="z.html">z</a>"#;
        assert!(matches!(make_links_relative(html, ""), Cow::Borrowed(_)));
    }

    #[test]
    fn test_make_links_absolute() {
        let html = r#"<a href="2016/a.html">a</a> <a href="https://b.org/">b</a>"#;
        let wanted = r#"<a href="http://blog.example.com/2016/a.html">a</a> <a href="https://b.org/">b</a>"#;
        assert_eq!(wanted, make_links_absolute(html, "http://blog.example.com"));
        assert_eq!(wanted, make_links_absolute(html, "http://blog.example.com/"));

        // applying it twice changes nothing more
        let once = make_links_absolute(html, "http://blog.example.com/").into_owned();
        assert_eq!(once, make_links_absolute(&once, "http://blog.example.com/"));
    }

    #[test]
    fn test_relative_link_same_directory() {
        assert_eq!("b.html", relative_link("2016/a.html", "2016/b.html"));
        assert_eq!("b.html", relative_link("a.html", "b.html"));
    }

    #[test]
    fn test_relative_link_sibling_directory() {
        assert_eq!("../2017/b.html", relative_link("2016/a.html", "2017/b.html"));
    }

    #[test]
    fn test_relative_link_up_and_down() {
        assert_eq!("2016/b.html", relative_link("a.html", "2016/b.html"));
        assert_eq!("../b.html", relative_link("2016/a.html", "b.html"));
        assert_eq!(
            "../../b.html",
            relative_link("2016/05/a.html", "b.html")
        );
        assert_eq!(
            "../06/b.html",
            relative_link("2016/05/a.html", "2016/06/b.html")
        );
    }
}
