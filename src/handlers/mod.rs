//! HTTP handlers: translate requests into entity reads and results into JSON.

pub mod entity;
pub mod meta;
pub use entity::*;
pub use meta::*;
