//! Entity gateway: read arbitrary PostgreSQL tables over REST without per-table code.

pub mod config;
pub mod decode;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod record;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::GatewayConfig;
pub use decode::{decode, ColumnDescriptor, RowCursor, ScanError};
pub use error::{AppError, ConfigError, EntityError};
pub use executor::QueryExecutor;
pub use record::{EntityMeta, FieldValue, GenericRecord, PaginationOptions};
pub use routes::{common_routes, entity_routes, gateway_router};
pub use service::{EntityMetaLister, EntityReader};
pub use sql::{canonicalize, CanonicalEntityName};
pub use state::AppState;
pub use store::{connect_pool, PgExecutor};
