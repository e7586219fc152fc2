//! Repositories over the persistence gateway
//!
//! - [`LinkRepository`]: a user's own links
//! - [`ShareRepository`]: sharing relations between users

pub mod links;
pub mod shares;

pub use links::LinkRepository;
pub use shares::ShareRepository;

use crate::error::{Error, Result};
use crate::identity::IdentityProvider;
use crate::models::User;

/// Resolve the current user or fail with [`Error::Auth`]
async fn require_user(identity: &dyn IdentityProvider, operation: &'static str) -> Result<User> {
    match identity.current_user().await? {
        Some(user) => Ok(user),
        None => {
            tracing::warn!("Rejected {}: no signed-in user", operation);
            Err(Error::Auth { operation })
        }
    }
}
