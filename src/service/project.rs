use std::sync::Arc;

use serde_json::Value;

use crate::config::IndexConfig;
use crate::error::Error;
use crate::search::SearchIndex;
use crate::store::{Entity, EntityStore};

/// Payload field holding the project identifier.
pub const CODE: &str = "code";

/// Project service pairing the entity store with the project search index.
///
/// Every mutation goes to the store first and is then mirrored into the
/// index under the same id; reads are served by the store alone. The two
/// writes are not transactional: if the index write fails, the store write
/// stays committed and the index error is returned to the caller. The next
/// successful write of the same id brings the index back in line.
///
/// `ProjectService` is itself an [`EntityStore`], so it can stand in wherever
/// a plain store is expected.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use content_aggregator::{
///     Entity, EntityStore, IndexConfig, MemoryEntityStore, MemorySearchIndex, ProjectService,
/// };
///
/// let index = Arc::new(MemorySearchIndex::new());
/// let service = ProjectService::new(
///     Arc::new(MemoryEntityStore::new()),
///     index.clone(),
///     IndexConfig::default(),
/// );
///
/// service.create_with_id("hibernate", Entity::new()).unwrap();
/// assert!(index.document("projects", "project", "hibernate").is_some());
/// ```
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn EntityStore>,
    index: Arc<dyn SearchIndex>,
    config: IndexConfig,
}

impl ProjectService {
    /// Creates a project service over the given store and index.
    pub fn new(
        store: Arc<dyn EntityStore>,
        index: Arc<dyn SearchIndex>,
        config: IndexConfig,
    ) -> Self {
        Self {
            store,
            index,
            config,
        }
    }

    /// Returns the index coordinates projects are mirrored to.
    pub fn index_config(&self) -> &IndexConfig {
        &self.config
    }

    fn update_search_index(&self, id: &str, entity: &Entity) -> Result<(), Error> {
        tracing::debug!(
            index = %self.config.index_name,
            index_type = %self.config.index_type,
            id,
            "mirroring project into search index"
        );
        self.index
            .upsert(&self.config.index_name, &self.config.index_type, id, entity)?;
        Ok(())
    }
}

impl EntityStore for ProjectService {
    fn get_all(
        &self,
        from: Option<usize>,
        size: Option<usize>,
        fields_to_remove: &[String],
    ) -> Result<Vec<Entity>, Error> {
        self.store.get_all(from, size, fields_to_remove)
    }

    fn get(&self, id: &str) -> Result<Option<Entity>, Error> {
        self.store.get(id)
    }

    /// The store assigns the id; `code` is then set to it and the stamped
    /// entity is saved back before it is mirrored into the index.
    fn create(&self, mut entity: Entity) -> Result<String, Error> {
        let id = self.store.create(entity.clone())?;
        entity.insert(CODE.to_string(), Value::String(id.clone()));
        self.store.create_with_id(&id, entity.clone())?;
        self.update_search_index(&id, &entity)?;
        Ok(id)
    }

    fn create_with_id(&self, id: &str, entity: Entity) -> Result<(), Error> {
        self.store.create_with_id(id, entity.clone())?;
        self.update_search_index(id, &entity)
    }

    fn update(&self, id: &str, entity: Entity) -> Result<(), Error> {
        self.store.update(id, entity.clone())?;
        self.update_search_index(id, &entity)
    }

    fn delete(&self, id: &str) -> Result<(), Error> {
        self.store.delete(id)?;
        tracing::debug!(
            index = %self.config.index_name,
            index_type = %self.config.index_type,
            id,
            "removing project from search index"
        );
        self.index
            .delete(&self.config.index_name, &self.config.index_type, id)?;
        Ok(())
    }
}
