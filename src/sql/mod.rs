//! Safe SQL construction: identifiers canonicalized and quoted, values as parameters.

mod builder;
pub mod ident;
pub use builder::*;
pub use ident::{canonicalize, CanonicalEntityName};
