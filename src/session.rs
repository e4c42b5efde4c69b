//! # Session Gate
//!
//! The authentication layer is an external collaborator. The core only asks two
//! questions of it, both answered from a cached session without a network call:
//! is someone logged in, and who is it.
//!
//! The gate is injected into [`OrderDraftController`](crate::draft::OrderDraftController)
//! and [`AdminOrderManager`](crate::admin::AdminOrderManager) as an
//! `Arc<dyn SessionGate>`, so tests swap in a [`StaticSession`].

use crate::model::SessionUser;
use std::sync::RwLock;
use tracing::info;

/// Read-only view of the current session.
pub trait SessionGate: Send + Sync {
    /// Whether a user is authenticated.
    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// The authenticated user, if any.
    fn current_user(&self) -> Option<SessionUser>;
}

/// A session held in memory. Token issuance happens elsewhere; whoever obtains a
/// token calls [`StaticSession::login`] with the resulting user.
#[derive(Debug, Default)]
pub struct StaticSession {
    user: RwLock<Option<SessionUser>>,
}

impl StaticSession {
    /// A session with nobody logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session already logged in as `user`.
    pub fn logged_in(user: SessionUser) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn login(&self, user: SessionUser) {
        info!(user_id = %user.id, role = ?user.role, "Logged in");
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(user);
    }

    pub fn logout(&self) {
        info!("Logged out");
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl SessionGate for StaticSession {
    fn current_user(&self) -> Option<SessionUser> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_logout() {
        let session = StaticSession::anonymous();
        assert!(!session.is_authenticated());

        session.login(SessionUser::admin("u1", "Admin"));
        assert!(session.is_authenticated());
        assert!(session.current_user().unwrap().is_admin());

        session.logout();
        assert!(session.current_user().is_none());
    }
}
