//! In-memory executor and rows for unit tests.

use crate::decode::{ColumnDescriptor, RowCursor, ScanError};
use crate::error::EntityError;
use crate::executor::QueryExecutor;
use crate::record::{EntityMeta, FieldValue};
use crate::sql::QueryBuf;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub struct MockRow {
    cells: Vec<(String, FieldValue)>,
    broken: Option<usize>,
}

impl MockRow {
    pub fn new<K: Into<String>>(cells: impl IntoIterator<Item = (K, FieldValue)>) -> Self {
        MockRow {
            cells: cells.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            broken: None,
        }
    }

    /// Make scanning fail on the given column.
    pub fn failing_at(mut self, ordinal: usize) -> Self {
        self.broken = Some(ordinal);
        self
    }
}

impl RowCursor for MockRow {
    fn column_descriptors(&self) -> Vec<ColumnDescriptor> {
        self.cells
            .iter()
            .enumerate()
            .map(|(ordinal, (name, _))| ColumnDescriptor {
                name: name.clone(),
                ordinal,
            })
            .collect()
    }

    fn scan_values(&self) -> Result<Vec<FieldValue>, ScanError> {
        if let Some(ordinal) = self.broken {
            return Err(ScanError {
                ordinal,
                source: "mismatched types".into(),
            });
        }
        Ok(self.cells.iter().map(|(_, v)| v.clone()).collect())
    }
}

/// Returns canned rows for every query and records what was issued.
#[derive(Clone, Default)]
pub struct ScriptedExecutor {
    rows: Arc<Vec<MockRow>>,
    meta: Arc<Vec<EntityMeta>>,
    failure: Option<Arc<str>>,
    issued: Arc<Mutex<Vec<QueryBuf>>>,
    issued_meta: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExecutor {
    pub fn with_rows(rows: Vec<MockRow>) -> Self {
        ScriptedExecutor {
            rows: Arc::new(rows),
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        ScriptedExecutor {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_meta(mut self, meta: Vec<EntityMeta>) -> Self {
        self.meta = Arc::new(meta);
        self
    }

    pub fn issued(&self) -> Vec<QueryBuf> {
        self.issued.lock().unwrap().clone()
    }

    pub fn issued_meta_sql(&self) -> Vec<String> {
        self.issued_meta.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), EntityError> {
        match &self.failure {
            Some(msg) => Err(EntityError::Query(sqlx::Error::Protocol(msg.to_string()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    type Row = MockRow;

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<MockRow>, EntityError> {
        self.issued.lock().unwrap().push(q.clone());
        self.check()?;
        Ok(self.rows.first().cloned())
    }

    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<MockRow>, EntityError> {
        self.issued.lock().unwrap().push(q.clone());
        self.check()?;
        Ok(self.rows.as_ref().clone())
    }

    async fn fetch_entity_meta(&self, sql: &str) -> Result<Vec<EntityMeta>, EntityError> {
        self.issued_meta.lock().unwrap().push(sql.to_string());
        self.check()?;
        Ok(self.meta.as_ref().clone())
    }

    async fn ping(&self) -> Result<(), EntityError> {
        self.check()
    }
}

pub fn sample_meta(id: i64, name: &str) -> EntityMeta {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    EntityMeta {
        id,
        name: name.to_string(),
        created_at: at,
        created_by: 1,
        updated_at: at,
        updated_by: 1,
        deleted: false,
    }
}
