//! Search filtering
//!
//! Case-insensitive substring matching over title, URL and tags. Filtering
//! never reorders: results keep the order of the input collection.

use crate::models::{Link, SharedLink};

/// Whether `link` matches `query`
///
/// An empty query matches every link.
pub fn matches(link: &Link, query: &str) -> bool {
    let query = query.to_lowercase();
    if query.is_empty() {
        return true;
    }

    link.title.to_lowercase().contains(&query)
        || link.url.to_lowercase().contains(&query)
        || link.tags.iter().any(|t| t.to_lowercase().contains(&query))
}

/// Links matching `query`, in input order
pub fn filter_links<'a>(links: &'a [Link], query: &str) -> Vec<&'a Link> {
    links.iter().filter(|l| matches(l, query)).collect()
}

/// Shared links whose link matches `query`, in input order
pub fn filter_shared_links<'a>(shared: &'a [SharedLink], query: &str) -> Vec<&'a SharedLink> {
    shared.iter().filter(|s| matches(&s.link, query)).collect()
}
