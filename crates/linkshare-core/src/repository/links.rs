//! Link repository
//!
//! Reads and creates the signed-in user's own links. Ownership is always
//! explicit: reads filter by the resolved user id and inserts record it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::models::{Link, NewLink};
use crate::repository::require_user;
use crate::storage::{Gateway, LinkFilter, LinkInsert};

/// CRUD for a user's own links
#[derive(Clone)]
pub struct LinkRepository {
    gateway: Arc<dyn Gateway>,
    identity: Arc<dyn IdentityProvider>,
}

impl LinkRepository {
    pub fn new(gateway: Arc<dyn Gateway>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { gateway, identity }
    }

    /// All links owned by the current user, newest first
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Auth`] when nobody is signed in
    /// - [`crate::Error::Backend`] when the gateway fails; no partial result is returned
    pub async fn fetch_own_links(&self) -> Result<Vec<Link>> {
        let user = require_user(self.identity.as_ref(), "fetch links").await?;
        let links = self
            .gateway
            .select_links(LinkFilter::owned_by(user.id))
            .await?;
        debug!("Fetched {} link(s) for {}", links.len(), user.email);
        Ok(links)
    }

    /// Insert a link owned by the current user
    ///
    /// Only the gateway's own constraints apply here; required-field checks
    /// belong to the caller (see [`NewLink::validate`]). The stored record is
    /// not returned: callers refetch to observe it.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Auth`] when nobody is signed in
    /// - [`crate::Error::Backend`] when the gateway rejects the insert
    pub async fn create_link(&self, link: NewLink) -> Result<()> {
        let user = require_user(self.identity.as_ref(), "create link").await?;
        let stored = self
            .gateway
            .insert_link(LinkInsert {
                title: link.title,
                url: link.url,
                tags: link.tags,
                user_id: user.id,
            })
            .await?;
        info!("Created link {} ({})", stored.id, stored.url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::identity::Session;
    use crate::test_support::{signed_in, FailingGateway};

    #[tokio::test]
    async fn test_create_then_fetch() {
        let (gateway, user, session) = signed_in("alice@example.com");
        let repo = LinkRepository::new(gateway, session);

        repo.create_link(
            NewLink::new("Go Docs", "https://go.dev").with_tags(vec!["lang".to_string()]),
        )
        .await
        .unwrap();

        let links = repo.fetch_own_links().await.unwrap();
        let matching: Vec<_> = links
            .iter()
            .filter(|l| l.title == "Go Docs" && l.url == "https://go.dev")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].user_id, user.id);
        assert_eq!(matching[0].tags, vec!["lang"]);
    }

    #[tokio::test]
    async fn test_fetch_is_newest_first() {
        let (gateway, _user, session) = signed_in("alice@example.com");
        let repo = LinkRepository::new(gateway, session);

        for title in ["one", "two", "three"] {
            repo.create_link(NewLink::new(title, format!("https://{}.example", title)))
                .await
                .unwrap();
        }

        let links = repo.fetch_own_links().await.unwrap();
        assert_eq!(links.len(), 3);
        assert!(links
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
        assert_eq!(links[0].title, "three");
    }

    #[tokio::test]
    async fn test_fetch_only_own_links() {
        let (gateway, _alice, alice_session) = signed_in("alice@example.com");
        let bob = gateway.upsert_user("bob@example.com").unwrap();
        let bob_repo = LinkRepository::new(gateway.clone(), Arc::new(Session::signed_in(bob)));
        bob_repo
            .create_link(NewLink::new("Bob's", "https://bob.example"))
            .await
            .unwrap();

        let alice_repo = LinkRepository::new(gateway, alice_session);
        assert!(alice_repo.fetch_own_links().await.unwrap().is_empty());
        assert_eq!(bob_repo.fetch_own_links().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_user() {
        let (gateway, _user, _session) = signed_in("alice@example.com");
        let repo = LinkRepository::new(gateway.clone(), Arc::new(Session::anonymous()));

        let err = repo
            .create_link(NewLink::new("Rust", "https://rust-lang.org"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth { .. }));

        let all = gateway.select_links(LinkFilter::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_requires_user() {
        let gateway = Arc::new(FailingGateway::default());
        let repo = LinkRepository::new(gateway.clone(), Arc::new(Session::anonymous()));

        let err = repo.fetch_own_links().await.unwrap_err();
        assert!(matches!(err, Error::Auth { .. }));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_gateway_errors_propagate() {
        let (_gateway, user, _session) = signed_in("alice@example.com");
        let gateway = Arc::new(FailingGateway::default());
        let repo = LinkRepository::new(gateway.clone(), Arc::new(Session::signed_in(user)));

        let err = repo.fetch_own_links().await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));

        let err = repo
            .create_link(NewLink::new("Rust", "https://rust-lang.org"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_create_does_not_validate() {
        let (gateway, _user, session) = signed_in("alice@example.com");
        let repo = LinkRepository::new(gateway, session);

        // Whitespace passes the gateway's non-empty check
        repo.create_link(NewLink::new(" ", "not a url")).await.unwrap();
        assert_eq!(repo.fetch_own_links().await.unwrap().len(), 1);
    }
}
