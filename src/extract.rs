//! Content extraction: raw response body -> title + container blocks.
//!
//! Replaceable through [`Extractor`] for servers that answer with something
//! other than full HTML documents.

use crate::html;
use crate::log;
use crate::selector::Selector;

/// What a response body contributes to a [`Page`](crate::cache::Page).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageData {
    pub title: String,
    /// Outer markup per container match, in container-declaration order
    pub blocks: Vec<String>,
}

/// Turns a response body into page data.
pub trait Extractor {
    /// `None` means the body has an invalid structure.
    fn extract(&self, body: &str, containers: &[Selector]) -> Option<PageData>;
}

/// Extracts containers from a full HTML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, body: &str, containers: &[Selector]) -> Option<PageData> {
        let mut per_container: Vec<Vec<String>> = vec![Vec::new(); containers.len()];
        let parsed = html::for_each_element(body, |path, tag, parser| {
            for (i, selector) in containers.iter().enumerate() {
                if selector.matches(path) {
                    per_container[i].push(tag.outer_html(parser));
                }
            }
        });
        if !parsed {
            log!("warning"; "received page could not be parsed");
            return None;
        }

        let mut blocks = Vec::new();
        for (selector, found) in containers.iter().zip(per_container) {
            if found.is_empty() {
                log!("warning"; "container {} not found on page", selector.as_str());
            }
            blocks.extend(found);
        }

        Some(PageData {
            title: html::title(body).unwrap_or_default(),
            blocks,
        })
    }
}
