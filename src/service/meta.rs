//! Lists registered entities from the fixed `entities` table.

use crate::error::EntityError;
use crate::executor::QueryExecutor;
use crate::record::EntityMeta;
use crate::sql::ENTITY_META_SQL;

#[derive(Clone)]
pub struct EntityMetaLister<E> {
    executor: E,
}

impl<E: QueryExecutor> EntityMetaLister<E> {
    pub fn new(executor: E) -> Self {
        EntityMetaLister { executor }
    }

    pub async fn list_entity_meta(&self) -> Result<Vec<EntityMeta>, EntityError> {
        self.executor.fetch_entity_meta(ENTITY_META_SQL).await
    }
}
