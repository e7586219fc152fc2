//! Share repository
//!
//! Creates sharing relations and reads the links shared with the signed-in
//! user. The ownership check happens here, before anything is inserted,
//! instead of being left to gateway-side policies.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::identity::IdentityProvider;
use crate::models::SharedLink;
use crate::repository::require_user;
use crate::storage::{Gateway, LinkFilter, ShareFilter, ShareInsert};

/// Creation and retrieval of sharing relations
#[derive(Clone)]
pub struct ShareRepository {
    gateway: Arc<dyn Gateway>,
    identity: Arc<dyn IdentityProvider>,
}

impl ShareRepository {
    pub fn new(gateway: Arc<dyn Gateway>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { gateway, identity }
    }

    /// Share one of the current user's links with `recipient_email`
    ///
    /// The relation records the sharer's id and email. Sharing the same link
    /// with the same recipient twice creates two relations.
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] when nobody is signed in
    /// - [`Error::LinkNotFound`] when `link_id` does not exist
    /// - [`Error::NotOwner`] when the link belongs to another user
    /// - [`Error::Backend`] when the gateway rejects the read or insert
    pub async fn create_share(&self, link_id: Uuid, recipient_email: &str) -> Result<()> {
        let user = require_user(self.identity.as_ref(), "share link").await?;

        let link = self
            .gateway
            .select_links(LinkFilter::by_id(link_id))
            .await?
            .into_iter()
            .next()
            .ok_or(Error::LinkNotFound(link_id))?;

        if !link.is_owned_by(user.id) {
            warn!("{} tried to share link {} owned by {}", user.email, link_id, link.user_id);
            return Err(Error::NotOwner { link_id });
        }

        self.gateway
            .insert_share(ShareInsert {
                link_id,
                user_id: user.id,
                recipient_email: recipient_email.trim().to_string(),
                shared_by_email: user.email.clone(),
            })
            .await?;

        info!("Shared link {} with {}", link_id, recipient_email.trim());
        Ok(())
    }

    /// Links shared with the current user, newest share first
    ///
    /// Each entry carries the full link plus the sharer's email.
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] when nobody is signed in
    /// - [`Error::Backend`] when the gateway fails
    pub async fn fetch_shared_with_me(&self) -> Result<Vec<SharedLink>> {
        let user = require_user(self.identity.as_ref(), "fetch shared links").await?;
        let shared = self
            .gateway
            .select_shares(ShareFilter::for_recipient(user.email.as_str()))
            .await?;
        debug!("Fetched {} shared link(s) for {}", shared.len(), user.email);
        Ok(shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Session;
    use crate::models::NewLink;
    use crate::repository::LinkRepository;
    use crate::test_support::{signed_in, FailingGateway};

    #[tokio::test]
    async fn test_share_and_receive() {
        let (gateway, alice, alice_session) = signed_in("alice@example.com");
        let links = LinkRepository::new(gateway.clone(), alice_session.clone());
        links
            .create_link(
                NewLink::new("Go Docs", "https://go.dev").with_tags(vec!["lang".to_string()]),
            )
            .await
            .unwrap();
        let link = links.fetch_own_links().await.unwrap().remove(0);

        let alice_shares = ShareRepository::new(gateway.clone(), alice_session);
        alice_shares
            .create_share(link.id, " bob@example.com ")
            .await
            .unwrap();

        let bob = gateway.upsert_user("bob@example.com").unwrap();
        let bob_shares = ShareRepository::new(gateway, Arc::new(Session::signed_in(bob)));
        let received = bob_shares.fetch_shared_with_me().await.unwrap();

        assert_eq!(received.len(), 1);
        assert_eq!(received[0].link, link);
        assert_eq!(received[0].shared_by, alice.id);
        assert_eq!(received[0].shared_by_email, "alice@example.com");
        assert_eq!(received[0].recipient_email, "bob@example.com");
    }

    #[tokio::test]
    async fn test_one_entry_per_relation() {
        let (gateway, _alice, alice_session) = signed_in("alice@example.com");
        let links = LinkRepository::new(gateway.clone(), alice_session.clone());
        links
            .create_link(NewLink::new("Doc", "https://doc.example"))
            .await
            .unwrap();
        let link = links.fetch_own_links().await.unwrap().remove(0);

        let shares = ShareRepository::new(gateway.clone(), alice_session);
        shares.create_share(link.id, "bob@example.com").await.unwrap();
        shares.create_share(link.id, "bob@example.com").await.unwrap();
        shares.create_share(link.id, "carol@example.com").await.unwrap();

        let bob = gateway.upsert_user("bob@example.com").unwrap();
        let bob_shares = ShareRepository::new(gateway, Arc::new(Session::signed_in(bob)));
        assert_eq!(bob_shares.fetch_shared_with_me().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_share_requires_user() {
        let gateway = Arc::new(FailingGateway::default());
        let shares = ShareRepository::new(gateway.clone(), Arc::new(Session::anonymous()));

        let err = shares
            .create_share(Uuid::new_v4(), "bob@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth { .. }));
        assert_eq!(gateway.calls(), 0);

        let err = shares.fetch_shared_with_me().await.unwrap_err();
        assert!(matches!(err, Error::Auth { .. }));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_share_unknown_link() {
        let (gateway, _alice, session) = signed_in("alice@example.com");
        let shares = ShareRepository::new(gateway, session);

        let missing = Uuid::new_v4();
        let err = shares
            .create_share(missing, "bob@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LinkNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn test_cannot_share_someone_elses_link() {
        let (gateway, _alice, alice_session) = signed_in("alice@example.com");
        let links = LinkRepository::new(gateway.clone(), alice_session);
        links
            .create_link(NewLink::new("Private", "https://private.example"))
            .await
            .unwrap();
        let link = links.fetch_own_links().await.unwrap().remove(0);

        let mallory = gateway.upsert_user("mallory@example.com").unwrap();
        let shares = ShareRepository::new(gateway.clone(), Arc::new(Session::signed_in(mallory)));
        let err = shares
            .create_share(link.id, "mallory@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotOwner { link_id } if link_id == link.id));

        let all = gateway.select_shares(ShareFilter::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_errors_propagate() {
        let (_gateway, user, _session) = signed_in("alice@example.com");
        let gateway = Arc::new(FailingGateway::default());
        let shares = ShareRepository::new(gateway, Arc::new(Session::signed_in(user)));

        let err = shares.fetch_shared_with_me().await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));

        let err = shares
            .create_share(Uuid::new_v4(), "bob@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }
}
