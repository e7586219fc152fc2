//! Shared link command handlers

use anyhow::Result;

use linkshare_core::LinkCollection;

use crate::output::Output;

/// List links shared with the current user, optionally filtered
pub async fn list(
    collection: &LinkCollection,
    search: Option<String>,
    output: &Output,
) -> Result<()> {
    collection.fetch_shared_links().await?;
    let shared = collection.filtered_shared_links(search.as_deref().unwrap_or(""));
    output.print_shared_links(&shared);
    Ok(())
}
