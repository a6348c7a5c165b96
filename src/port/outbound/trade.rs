//! Read-side ports over the trade journal.

use async_trait::async_trait;

use crate::domain::{id::UserId, trade::Trade};
use crate::error::Result;

/// Read access to a user's trade history.
///
/// Implementations return trades in a stable order of their choosing; the
/// analytics engine re-sorts where it needs a specific order.
#[async_trait]
pub trait TradeRepository: Send + Sync {
    /// Load every trade, with legs, owned by `user_id`.
    async fn list_trades(&self, user_id: &UserId) -> Result<Vec<Trade>>;
}

/// Enumerates the users known to the journal.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// List all user IDs, in a stable order.
    async fn list_users(&self) -> Result<Vec<UserId>>;
}
