//! Status command handler

use anyhow::Result;

use linkshare_core::{Config, LinkCollection, Session};

use crate::output::Output;

/// Show who is signed in and how much data they have
pub async fn show(
    config: &Config,
    session: &Session,
    collection: &LinkCollection,
    output: &Output,
) -> Result<()> {
    let counts = match session.user() {
        Some(_) => {
            collection.fetch_links().await?;
            collection.fetch_shared_links().await?;
            Some((collection.links().len(), collection.shared_links().len()))
        }
        None => None,
    };

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "user": session.user(),
                "data_dir": config.data_dir,
                "links": counts.map(|(links, _)| links),
                "shared_with_me": counts.map(|(_, shared)| shared),
            })
        );
    } else if output.is_quiet() {
        if let Some(user) = session.user() {
            println!("{}", user.email);
        }
    } else {
        match session.user() {
            Some(user) => println!("Signed in as:   {}", user.email),
            None => println!("Signed in as:   (signed out)"),
        }
        println!("Data directory: {}", config.data_dir.display());
        if let Some((links, shared)) = counts {
            println!("Links:          {}", links);
            println!("Shared with me: {}", shared);
        } else {
            println!();
            println!("Sign in with: linkshare login <email>");
        }
    }

    Ok(())
}
