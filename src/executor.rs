//! Storage seam: the capability the entity core needs from the database.

use crate::decode::RowCursor;
use crate::error::EntityError;
use crate::record::EntityMeta;
use crate::sql::QueryBuf;
use async_trait::async_trait;

/// Parameterized query execution against a pooled connection.
/// Implementations acquire and release a connection per call.
#[async_trait]
pub trait QueryExecutor: Clone + Send + Sync + 'static {
    type Row: RowCursor + Send + Sync;

    /// First row of the result, if any. Further rows are discarded.
    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Self::Row>, EntityError>;

    /// All rows, in result order.
    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Self::Row>, EntityError>;

    /// Run `sql` and map each row into the static [`EntityMeta`] shape.
    async fn fetch_entity_meta(&self, sql: &str) -> Result<Vec<EntityMeta>, EntityError>;

    /// Connectivity check for readiness checks.
    async fn ping(&self) -> Result<(), EntityError>;
}
