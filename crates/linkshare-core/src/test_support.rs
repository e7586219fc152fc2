//! Shared fixtures for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::identity::Session;
use crate::models::{Link, SharedLink, User};
use crate::storage::{
    Gateway, GatewayError, GatewayResult, LinkFilter, LinkInsert, ShareFilter, ShareInsert,
    SqliteGateway,
};

/// In-memory gateway with a signed-in session for `email`
pub fn signed_in(email: &str) -> (Arc<SqliteGateway>, User, Arc<Session>) {
    let gateway = Arc::new(SqliteGateway::open_in_memory().unwrap());
    let user = gateway.upsert_user(email).unwrap();
    let session = Arc::new(Session::signed_in(user.clone()));
    (gateway, user, session)
}

/// Gateway that rejects every call and counts how often it was asked
#[derive(Default)]
pub struct FailingGateway {
    pub calls: AtomicUsize,
}

impl FailingGateway {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> GatewayResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GatewayError::Constraint("rejected by test gateway".to_string()))
    }
}

#[async_trait]
impl Gateway for FailingGateway {
    async fn select_links(&self, _filter: LinkFilter) -> GatewayResult<Vec<Link>> {
        self.fail()
    }

    async fn insert_link(&self, _record: LinkInsert) -> GatewayResult<Link> {
        self.fail()
    }

    async fn insert_share(&self, _record: ShareInsert) -> GatewayResult<()> {
        self.fail()
    }

    async fn select_shares(&self, _filter: ShareFilter) -> GatewayResult<Vec<SharedLink>> {
        self.fail()
    }
}
