//! Entity reads over any [`QueryExecutor`](crate::executor::QueryExecutor).

mod meta;
mod reader;
pub use meta::EntityMetaLister;
pub use reader::EntityReader;
