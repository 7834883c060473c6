//! Assembles scanned [`Document`]s into a [`Site`]: pages are separated from
//! posts, posts are sorted newest first and linked to their neighbours. Also
//! splits the sorted posts into index pages ([`paginate`]) and category
//! pages ([`categorize`]).

use crate::category;
use crate::document::{Document, DocumentKind};
use crate::links::relative_link;
use std::collections::HashMap;

/// The documents of a site, ready to be rendered.
pub struct Site {
    /// Blog posts, most recent first, with navigation links set.
    pub posts: Vec<Document>,

    /// Simple pages in scan order.
    pub pages: Vec<Document>,
}

impl Site {
    /// Partitions `documents` into posts and pages, sorts the posts by
    /// creation date (most recent first; ties keep their scan order) and
    /// sets every post's previous/next links.
    pub fn assemble(documents: Vec<Document>) -> Site {
        let (mut posts, pages): (Vec<Document>, Vec<Document>) = documents
            .into_iter()
            .partition(|document| document.kind == DocumentKind::Post);

        sort_posts(&mut posts);
        link_posts(&mut posts);
        Site { posts, pages }
    }
}

/// Sorts `posts` by creation date, most recent first. The sort is stable.
pub fn sort_posts(posts: &mut [Document]) {
    posts.sort_by(|a, b| b.created.cmp(&a.created));
}

/// Sets `next_link` (the newer neighbour) and `previous_link` (the older
/// neighbour) on each post of a sorted slice.
pub fn link_posts(posts: &mut [Document]) {
    for i in 0..posts.len() {
        let next = match i {
            0 => None,
            _ => Some(relative_link(&posts[i].output_path, &posts[i - 1].output_path)),
        };
        let previous = match i + 1 < posts.len() {
            false => None,
            true => Some(relative_link(&posts[i].output_path, &posts[i + 1].output_path)),
        };
        posts[i].next_link = next;
        posts[i].previous_link = previous;
    }
}

/// One page of the paginated post index.
#[derive(Debug)]
pub struct IndexPage<'a> {
    /// The file name of the page in the output root.
    pub file_name: String,

    /// The file name of the page with newer posts, if any.
    pub newer: Option<String>,

    /// The file name of the page with older posts, if any.
    pub older: Option<String>,

    pub posts: &'a [Document],
}

/// The file name of the `n`th (0-based) index page: `{index_name}.html` for
/// the first page and `{index_name}-{n}.html` for the others.
pub fn index_file_name(index_name: &str, n: usize) -> String {
    match n {
        0 => format!("{}.html", index_name),
        _ => format!("{}-{}.html", index_name, n),
    }
}

/// Splits the sorted `posts` into index pages of `page_size` posts each.
pub fn paginate<'a>(
    posts: &'a [Document],
    page_size: usize,
    index_name: &str,
) -> Vec<IndexPage<'a>> {
    let page_size = page_size.max(1);
    let total_pages = match posts.len() % page_size {
        0 => posts.len() / page_size,
        _ => posts.len() / page_size + 1,
    };

    posts
        .chunks(page_size)
        .enumerate()
        .map(|(i, chunk)| IndexPage {
            file_name: index_file_name(index_name, i),
            newer: match i {
                0 => None,
                _ => Some(index_file_name(index_name, i - 1)),
            },
            older: match i + 1 < total_pages {
                false => None,
                true => Some(index_file_name(index_name, i + 1)),
            },
            posts: chunk,
        })
        .collect()
}

/// The posts of one category.
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    /// The display name shared by all member categories.
    pub name: String,

    /// The file name of the category page in the output root.
    pub file_name: String,

    /// The member posts in the order of the input slice.
    pub posts: Vec<&'a Document>,
}

/// Groups the sorted `posts` by category. Categories are keyed by their
/// formatted name and returned in order of first appearance.
pub fn categorize<'a>(posts: &'a [Document], category_prefix: &str) -> Vec<CategoryGroup<'a>> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for post in posts {
        for category in post.categories.iter() {
            match positions.get(&category.formatted_name) {
                Some(&i) => groups[i].posts.push(post),
                None => {
                    positions.insert(category.formatted_name.clone(), groups.len());
                    groups.push(CategoryGroup {
                        name: category.formatted_name.clone(),
                        file_name: category::page_path(
                            category_prefix,
                            &category.formatted_name,
                        ),
                        posts: vec![post],
                    });
                }
            }
        }
    }
    groups
}
