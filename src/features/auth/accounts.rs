use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;

/// Source of truth for who a token subject currently is.
///
/// Tokens only identify the account; name and role are re-read on every
/// request so demotions and deletions apply immediately.
#[async_trait]
pub trait AccountLookup: Send + Sync {
    /// `None` when the account no longer exists
    async fn find_account(&self, user_id: Uuid) -> Result<Option<AuthenticatedUser>>;
}
