//! Tag editing
//!
//! Turns free-text input into a deduplicated, ordered tag list. A comma
//! commits everything typed so far; text without a comma stays buffered.

use std::collections::HashMap;

use crate::models::Link;

/// Apply raw tag input to `tags`
///
/// When `raw` contains a comma it is split on commas, each piece is trimmed,
/// and pieces that are empty or already present (exact, case-sensitive match)
/// are dropped. The rest are appended in order and the returned input text is
/// empty. Without a comma nothing changes and `raw` comes back as the
/// remaining input.
pub fn append_tags_from_input(mut tags: Vec<String>, raw: &str) -> (Vec<String>, String) {
    if !raw.contains(',') {
        return (tags, raw.to_string());
    }

    for piece in raw.split(',').map(str::trim) {
        if !piece.is_empty() && !tags.iter().any(|t| t == piece) {
            tags.push(piece.to_string());
        }
    }

    (tags, String::new())
}

/// Drop the tag at `index`, keeping the order of the rest
///
/// An out-of-range index leaves the tags unchanged.
pub fn remove_tag_at(mut tags: Vec<String>, index: usize) -> Vec<String> {
    if index < tags.len() {
        tags.remove(index);
    }
    tags
}

/// Tags with the number of links using them, most used first
pub fn tag_counts(links: &[Link]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in links.iter().flat_map(|l| l.tags.iter()) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Stateful tag input for a link form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEditor {
    tags: Vec<String>,
    pending: String,
}

impl TagEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing tags
    pub fn with_tags(tags: Vec<String>) -> Self {
        Self {
            tags,
            pending: String::new(),
        }
    }

    /// Replace the input text with `raw`, committing it if it contains a comma
    pub fn input(&mut self, raw: &str) {
        let tags = std::mem::take(&mut self.tags);
        let (tags, pending) = append_tags_from_input(tags, raw);
        self.tags = tags;
        self.pending = pending;
    }

    /// Commit buffered text as if a trailing comma had been typed
    pub fn commit(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let raw = format!("{},", std::mem::take(&mut self.pending));
        self.input(&raw);
    }

    /// Remove the tag at `index`
    pub fn remove(&mut self, index: usize) {
        let tags = std::mem::take(&mut self.tags);
        self.tags = remove_tag_at(tags, index);
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Text typed since the last comma
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Commit any buffered text and return the tags
    pub fn into_tags(mut self) -> Vec<String> {
        self.commit();
        self.tags
    }
}
