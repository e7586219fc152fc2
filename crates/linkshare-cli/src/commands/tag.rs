//! Tag command handlers

use anyhow::Result;

use linkshare_core::tags::tag_counts;
use linkshare_core::LinkCollection;

use crate::output::Output;

/// List all tags on the user's links with usage counts
pub async fn list(collection: &LinkCollection, output: &Output) -> Result<()> {
    collection.fetch_links().await?;
    let tags = tag_counts(&collection.links());
    output.print_tags(&tags);
    Ok(())
}
