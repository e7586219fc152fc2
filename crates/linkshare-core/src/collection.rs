//! Link collection controller
//!
//! Holds the session's in-memory view of links and shared links together
//! with a loading flag, and exposes the fetch/add/share operations the
//! presentation layer drives.
//!
//! ## Consistency
//!
//! Mutations never touch the local collections. After `add_link` or
//! `share_link` the caller refetches to observe the stored records, so no
//! record with a client-made identifier ever appears. Fetches are not
//! serialized: when two overlap, the one that finishes last wins.
//!
//! ## Observing state
//!
//! State lives in a [`tokio::sync::watch`] channel. Presentation code calls
//! [`LinkCollection::subscribe`] and re-renders on every change, including
//! the loading flag flipping while a fetch is in flight.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::models::{validate_email, Link, NewLink, SharedLink};
use crate::repository::{LinkRepository, ShareRepository};
use crate::search::{filter_links, filter_shared_links};
use crate::storage::Gateway;

/// Snapshot of the collection state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionState {
    /// The user's own links, newest first
    pub links: Vec<Link>,
    /// Links shared with the user, newest share first
    pub shared_links: Vec<SharedLink>,
    /// Whether a fetch is in flight
    pub loading: bool,
}

/// In-memory state holder over the link and share repositories
///
/// One instance per signed-in session; drop it (or call [`clear`](Self::clear))
/// on sign-out.
pub struct LinkCollection {
    links: LinkRepository,
    shares: ShareRepository,
    state: watch::Sender<CollectionState>,
}

impl LinkCollection {
    pub fn new(gateway: Arc<dyn Gateway>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::with_repositories(
            LinkRepository::new(gateway.clone(), identity.clone()),
            ShareRepository::new(gateway, identity),
        )
    }

    pub fn with_repositories(links: LinkRepository, shares: ShareRepository) -> Self {
        let (state, _) = watch::channel(CollectionState::default());
        Self {
            links,
            shares,
            state,
        }
    }

    /// Receive every state change from now on
    pub fn subscribe(&self) -> watch::Receiver<CollectionState> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> CollectionState {
        self.state.borrow().clone()
    }

    pub fn links(&self) -> Vec<Link> {
        self.state.borrow().links.clone()
    }

    pub fn shared_links(&self) -> Vec<SharedLink> {
        self.state.borrow().shared_links.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Reload the user's own links
    ///
    /// The loading flag is set for the duration of the call and cleared on
    /// both success and failure. On failure the previous links are kept and
    /// the error is returned unchanged.
    pub async fn fetch_links(&self) -> Result<()> {
        self.set_loading(true);
        let result = self.links.fetch_own_links().await;

        match result {
            Ok(links) => {
                debug!("Loaded {} link(s)", links.len());
                self.state.send_modify(|state| {
                    state.links = links;
                    state.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                warn!("Fetching links failed: {}", e);
                self.set_loading(false);
                Err(e)
            }
        }
    }

    /// Reload the links shared with the user
    ///
    /// Same loading and failure behaviour as [`fetch_links`](Self::fetch_links).
    pub async fn fetch_shared_links(&self) -> Result<()> {
        self.set_loading(true);
        let result = self.shares.fetch_shared_with_me().await;

        match result {
            Ok(shared) => {
                debug!("Loaded {} shared link(s)", shared.len());
                self.state.send_modify(|state| {
                    state.shared_links = shared;
                    state.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                warn!("Fetching shared links failed: {}", e);
                self.set_loading(false);
                Err(e)
            }
        }
    }

    /// Validate and store a new link
    ///
    /// Local state is untouched; call [`fetch_links`](Self::fetch_links)
    /// afterwards to see the new record.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Validation`] for a blank title or URL (the gateway is
    /// not called), otherwise whatever the repository returns.
    pub async fn add_link(&self, input: NewLink) -> Result<()> {
        input.validate()?;
        self.links.create_link(input).await
    }

    /// Validate the recipient and share one of the user's links
    ///
    /// Local state is untouched.
    pub async fn share_link(&self, link_id: Uuid, email: &str) -> Result<()> {
        validate_email(email)?;
        self.shares.create_share(link_id, email).await
    }

    /// Own links matching `query`, in collection order
    pub fn filtered_links(&self, query: &str) -> Vec<Link> {
        let state = self.state.borrow();
        filter_links(&state.links, query).into_iter().cloned().collect()
    }

    /// Shared links matching `query`, in collection order
    pub fn filtered_shared_links(&self, query: &str) -> Vec<SharedLink> {
        let state = self.state.borrow();
        filter_shared_links(&state.shared_links, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Discard all state (sign-out)
    pub fn clear(&self) {
        self.state.send_replace(CollectionState::default());
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.loading != loading;
            state.loading = loading;
            changed
        });
    }
}
