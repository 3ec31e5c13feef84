//! Generic single-table reads: canonicalize, build, execute, decode.

use crate::decode::decode;
use crate::error::EntityError;
use crate::executor::QueryExecutor;
use crate::record::{GenericRecord, PaginationOptions};
use crate::sql::{canonicalize, select_by_id, select_page};

/// Reads rows of arbitrary tables by caller-supplied name. Stateless apart from the executor.
#[derive(Clone)]
pub struct EntityReader<E> {
    executor: E,
}

impl<E: QueryExecutor> EntityReader<E> {
    pub fn new(executor: E) -> Self {
        EntityReader { executor }
    }

    /// Fetch the row whose `id` matches. `Ok(None)` when no row exists.
    /// If several rows share the id, the first one returned by the database wins.
    pub async fn get_single(&self, entity_name: &str, id: i64) -> Result<Option<GenericRecord>, EntityError> {
        let entity = canonicalize(entity_name)?;
        let q = select_by_id(&entity, id);
        match self.executor.fetch_optional(&q).await? {
            Some(row) => Ok(Some(decode(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetch a page of rows in database order. Empty tables give an empty vec.
    /// Any failure discards rows decoded so far.
    pub async fn get_all(
        &self,
        entity_name: &str,
        options: PaginationOptions,
    ) -> Result<Vec<GenericRecord>, EntityError> {
        let entity = canonicalize(entity_name)?;
        let q = select_page(&entity, &options);
        let rows = self.executor.fetch_all(&q).await?;
        rows.iter().map(decode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use crate::testing::{MockRow, ScriptedExecutor};

    fn widget(id: i64, name: &str) -> MockRow {
        MockRow::new([
            ("id", FieldValue::Int(id)),
            ("name", FieldValue::from(name)),
            ("deleted", FieldValue::Bool(false)),
        ])
    }

    #[tokio::test]
    async fn get_single_returns_decoded_row() {
        let exec = ScriptedExecutor::with_rows(vec![widget(1, "widget")]);
        let reader = EntityReader::new(exec.clone());
        let rec = reader.get_single("Widgets", 1).await.unwrap().unwrap();
        assert_eq!(rec.get("name"), Some(&FieldValue::from("widget")));

        let issued = exec.issued();
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].sql, "SELECT * FROM \"widgets\" WHERE id = $1");
        assert_eq!(issued[0].params, vec![1]);
    }

    #[tokio::test]
    async fn get_single_missing_row_is_none() {
        let reader = EntityReader::new(ScriptedExecutor::with_rows(vec![]));
        assert!(reader.get_single("widgets", 404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_single_keeps_first_of_many() {
        let reader = EntityReader::new(ScriptedExecutor::with_rows(vec![widget(1, "first"), widget(1, "second")]));
        let rec = reader.get_single("widgets", 1).await.unwrap().unwrap();
        assert_eq!(rec.get("name"), Some(&FieldValue::from("first")));
    }

    #[tokio::test]
    async fn invalid_name_never_reaches_the_database() {
        let exec = ScriptedExecutor::with_rows(vec![widget(1, "widget")]);
        let reader = EntityReader::new(exec.clone());
        let err = reader.get_single("widgets;drop table x", 1).await.unwrap_err();
        assert!(matches!(err, EntityError::InvalidIdentifier(_)));
        let err = reader.get_all("", PaginationOptions::default()).await.unwrap_err();
        assert!(matches!(err, EntityError::InvalidIdentifier(_)));
        assert!(exec.issued().is_empty());
    }

    #[tokio::test]
    async fn get_all_unbounded_by_default() {
        let exec = ScriptedExecutor::with_rows(vec![widget(1, "a"), widget(2, "b"), widget(3, "c")]);
        let reader = EntityReader::new(exec.clone());
        let rows = reader.get_all("widgets", PaginationOptions::default()).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.get("id").cloned()).collect();
        assert_eq!(ids, vec![Some(FieldValue::Int(1)), Some(FieldValue::Int(2)), Some(FieldValue::Int(3))]);
        assert_eq!(exec.issued()[0].sql, "SELECT * FROM \"widgets\"");
        assert!(exec.issued()[0].params.is_empty());
    }

    #[tokio::test]
    async fn get_all_binds_offset_then_limit() {
        let exec = ScriptedExecutor::with_rows(vec![]);
        let reader = EntityReader::new(exec.clone());
        reader
            .get_all("Order-Items", PaginationOptions { skip: 5, take: 10 })
            .await
            .unwrap();
        let q = &exec.issued()[0];
        assert_eq!(q.sql, "SELECT * FROM \"order_items\" OFFSET $1 LIMIT $2");
        assert_eq!(q.params, vec![5, 10]);
    }

    #[tokio::test]
    async fn get_all_on_empty_table_is_empty_vec() {
        let reader = EntityReader::new(ScriptedExecutor::with_rows(vec![]));
        let rows = reader.get_all("widgets", PaginationOptions::default()).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn decode_failure_aborts_whole_page() {
        let rows = vec![widget(1, "ok"), widget(2, "bad").failing_at(1)];
        let reader = EntityReader::new(ScriptedExecutor::with_rows(rows));
        let err = reader.get_all("widgets", PaginationOptions::default()).await.unwrap_err();
        assert!(matches!(err, EntityError::Decode { ref column, .. } if column == "name"));
    }

    #[tokio::test]
    async fn query_failure_propagates() {
        let reader = EntityReader::new(ScriptedExecutor::failing("connection reset"));
        assert!(matches!(reader.get_single("widgets", 1).await, Err(EntityError::Query(_))));
        assert!(matches!(
            reader.get_all("widgets", PaginationOptions::default()).await,
            Err(EntityError::Query(_))
        ));
    }
}
