//! First-party user persistence.
//!
//! The pipeline only ever checks existence and inserts; there is no
//! update path. Repeated page views must not overwrite an earlier,
//! possibly more complete, identity snapshot with an emptier later one.

pub mod postgres;
pub mod record;

pub use postgres::PgUserStore;
pub use record::UserRecord;

use async_trait::async_trait;
use relay_core::Result;

/// Store handle for first-party user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<UserRecord>>;

    /// Insert the record if no row with its external id exists yet.
    ///
    /// An empty external id is a no-op. A concurrent duplicate insert is
    /// treated as success: the unique constraint keeps the first snapshot
    /// and the loser of the race must not surface an error.
    async fn ensure_user(&self, record: &UserRecord) -> Result<()>;

    /// Cheap connectivity probe for health reporting.
    async fn ping(&self) -> bool;
}
