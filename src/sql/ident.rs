//! Entity name canonicalization. Caller-supplied names end up as table
//! identifiers, which cannot be bound as parameters, so they are restricted to
//! `[A-Za-z0-9_-]` before any SQL is built and quoted again on interpolation.

use crate::error::EntityError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static ENTITY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[A-Za-z0-9_-]+$").expect("entity name pattern is valid")
});

/// A validated, lowercase entity name with `-` folded to `_`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalEntityName(String);

impl CanonicalEntityName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted identifier for interpolation into SQL.
    pub fn quoted(&self) -> String {
        quoted(&self.0)
    }
}

impl fmt::Display for CanonicalEntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalEntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate and normalize an entity name. Empty names are rejected.
pub fn canonicalize(name: &str) -> Result<CanonicalEntityName, EntityError> {
    if !ENTITY_NAME.is_match(name) {
        return Err(EntityError::InvalidIdentifier(name.to_string()));
    }
    Ok(CanonicalEntityName(name.replace('-', "_").to_ascii_lowercase()))
}

/// Quote identifier for PostgreSQL.
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
