//! Identity resolution
//!
//! Repositories ask an [`IdentityProvider`] who is signed in before every
//! operation that records or filters by owner. Authentication itself happens
//! elsewhere; this module only answers "who is the current user".

use async_trait::async_trait;

use crate::models::User;
use crate::storage::GatewayResult;

/// Resolves the currently authenticated user
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when unauthenticated
    async fn current_user(&self) -> GatewayResult<Option<User>>;
}

/// Identity of one application session
///
/// Created when the session starts and dropped on sign-out, together with
/// the link collection built on top of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// A session with nobody signed in
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session for an already resolved user
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

#[async_trait]
impl IdentityProvider for Session {
    async fn current_user(&self) -> GatewayResult<Option<User>> {
        Ok(self.user.clone())
    }
}
