//! The library code for the `scriptorium` static blog generator. A build is
//! generally broken down into three distinct steps:
//!
//! 1. Scanning the Markdown content files into documents ([`crate::scanner`])
//! 2. Assembling the documents into a site: separating posts from pages,
//!    sorting the posts and linking each post to its neighbours
//!    ([`crate::site`])
//! 3. Rendering every page to disk ([`crate::write`]) plus the Atom feed
//!    ([`crate::feed`]) and the sitemap ([`crate::sitemap`])
//!
//! The third step is the more involved one, because the same document is
//! rendered into different places in the output tree: on its own page at its
//! output path and as an excerpt on the index and category pages at the
//! output root. Relative links in the document body are rewritten for each
//! place ([`crate::links`], [`crate::value`]) so they keep resolving.
//!
//! [`crate::build`] stitches the steps together and [`crate::init`] creates
//! new projects.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod category;
pub mod config;
pub mod document;
pub mod feed;
pub mod init;
pub mod links;
pub mod markdown;
pub mod scanner;
pub mod site;
pub mod sitemap;
pub mod value;
pub mod write;
