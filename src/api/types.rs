//! Shared types for the API layer.

use std::sync::Arc;

use crate::core_state::CoreState;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Authenticated caller, injected into request extensions by the auth
/// middleware after successful token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// `sub` claim of the bearer token; owner key for every record.
    pub user_id: String,
}
