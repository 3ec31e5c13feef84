//! Builds parameterized single-table SELECTs for a canonical entity name.

use crate::record::PaginationOptions;
use crate::sql::CanonicalEntityName;

/// Fixed metadata table; never caller-controlled.
pub const ENTITY_META_SQL: &str = "SELECT * FROM entities";

/// Generated SQL and its positional parameters (`$1` is `params[0]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<i64>,
}

impl QueryBuf {
    fn new(sql: String) -> Self {
        QueryBuf {
            sql,
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: i64) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// SELECT by `id`; the id is bound as `$1`, never interpolated.
pub fn select_by_id(entity: &CanonicalEntityName, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new(format!("SELECT * FROM {}", entity.quoted()));
    let n = q.push_param(id);
    q.sql.push_str(&format!(" WHERE id = ${}", n));
    q
}

/// SELECT all rows with optional OFFSET then LIMIT. Zero means the clause is omitted.
/// Placeholders are numbered by how many parameters precede them.
pub fn select_page(entity: &CanonicalEntityName, options: &PaginationOptions) -> QueryBuf {
    let mut q = QueryBuf::new(format!("SELECT * FROM {}", entity.quoted()));
    if options.skip > 0 {
        let n = q.push_param(clamp_to_i64(options.skip));
        q.sql.push_str(&format!(" OFFSET ${}", n));
    }
    if options.take > 0 {
        let n = q.push_param(clamp_to_i64(options.take));
        q.sql.push_str(&format!(" LIMIT ${}", n));
    }
    q
}

fn clamp_to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
