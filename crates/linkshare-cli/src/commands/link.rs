//! Link command handlers

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use linkshare_core::{Link, LinkCollection, NewLink, TagEditor};

use crate::output::Output;

/// Create a new link, then reload the collection to show it
pub async fn create(
    collection: &LinkCollection,
    url: String,
    title: String,
    tags: Vec<String>,
    tag_input: Option<String>,
    output: &Output,
) -> Result<()> {
    let tags = build_tags(tag_input.as_deref(), &tags);
    let input = NewLink::new(title.trim(), url.trim()).with_tags(tags);

    collection
        .add_link(input.clone())
        .await
        .context("Failed to create link")?;
    collection.fetch_links().await?;

    output.success("Link added");
    if let Some(link) = collection
        .links()
        .iter()
        .find(|l| l.url == input.url && l.title == input.title)
    {
        output.print_link(link);
    }

    Ok(())
}

/// List the user's links, optionally filtered by a search query
pub async fn list(
    collection: &LinkCollection,
    search: Option<String>,
    output: &Output,
) -> Result<()> {
    collection.fetch_links().await?;
    let links = collection.filtered_links(search.as_deref().unwrap_or(""));
    output.print_links(&links);
    Ok(())
}

/// Show a single link
pub async fn show(collection: &LinkCollection, id: String, output: &Output) -> Result<()> {
    collection.fetch_links().await?;
    let link = find_link(&collection.links(), &id)?;
    output.print_link(&link);
    Ok(())
}

/// Share a link with another user by email
pub async fn share(
    collection: &LinkCollection,
    id: String,
    email: String,
    output: &Output,
) -> Result<()> {
    collection.fetch_links().await?;
    let link = find_link(&collection.links(), &id)?;

    collection
        .share_link(link.id, &email)
        .await
        .context("Failed to share link")?;

    output.success(&format!("Shared '{}' with {}", link.title, email.trim()));
    Ok(())
}

/// Open a link in the default browser
pub async fn open_link(collection: &LinkCollection, id: String, output: &Output) -> Result<()> {
    collection.fetch_links().await?;
    let link = find_link(&collection.links(), &id)?;

    open::that(&link.url).with_context(|| format!("Failed to open {}", link.url))?;

    output.message(&format!("Opened {}", link.url));
    Ok(())
}

/// Combine `--tags "a, b"` input and repeated `-t` values into one tag list
fn build_tags(tag_input: Option<&str>, tags: &[String]) -> Vec<String> {
    let mut editor = TagEditor::new();
    for raw in tag_input.into_iter().chain(tags.iter().map(String::as_str)) {
        editor.input(raw);
        editor.commit();
    }
    editor.into_tags()
}

/// Find a link by full UUID or unique prefix
fn find_link(links: &[Link], id: &str) -> Result<Link> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return links
            .iter()
            .find(|l| l.id == uuid)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Link not found: {}", id));
    }

    let matches: Vec<_> = links
        .iter()
        .filter(|l| l.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No link found matching: {}", id),
        1 => Ok(matches[0].clone()),
        _ => {
            eprintln!("Multiple links match '{}':", id);
            for link in &matches {
                eprintln!("  {} - {}", link.id, link.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn link(id: &str, title: &str) -> Link {
        Link {
            id: Uuid::parse_str(id).unwrap(),
            title: title.to_string(),
            url: format!("https://{}.example", title),
            tags: Vec::new(),
            user_id: Uuid::nil(),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Link> {
        vec![
            link("67e55044-10b1-426f-9247-bb680e5fe0c8", "alpha"),
            link("67e5aaaa-10b1-426f-9247-bb680e5fe0c8", "beta"),
            link("12345678-10b1-426f-9247-bb680e5fe0c8", "gamma"),
        ]
    }

    #[test]
    fn test_find_link_by_full_id() {
        let links = sample();
        let found = find_link(&links, "12345678-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(found.title, "gamma");

        assert!(find_link(&links, "00000000-0000-0000-0000-000000000000").is_err());
    }

    #[test]
    fn test_find_link_by_prefix() {
        let links = sample();
        assert_eq!(find_link(&links, "67e55").unwrap().title, "alpha");
        assert_eq!(find_link(&links, "1234").unwrap().title, "gamma");
    }

    #[test]
    fn test_find_link_ambiguous_or_missing() {
        let links = sample();
        let err = find_link(&links, "67e5").unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));

        let err = find_link(&links, "ffff").unwrap_err();
        assert!(err.to_string().contains("No link found"));
    }

    #[test]
    fn test_build_tags() {
        let tags = build_tags(
            Some("rust, web,"),
            &["async".to_string(), "rust".to_string()],
        );
        assert_eq!(tags, vec!["rust", "web", "async"]);

        assert!(build_tags(None, &[]).is_empty());
        assert_eq!(build_tags(Some("solo"), &[]), vec!["solo"]);
    }
}
