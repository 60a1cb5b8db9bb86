use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::{Entity, EntityStore};
use crate::error::{Error, StoreError, StoreErrorKind};

const DEFAULT_PAGE_SIZE: usize = 10;

/// In-memory [`EntityStore`] keeping entities ordered by id.
///
/// Uses interior mutability so a single instance can be shared behind an
/// `Arc` by concurrent requests. Ids assigned by [`create`](EntityStore::create)
/// are random UUIDs.
///
/// # Examples
///
/// ```
/// use content_aggregator::{Entity, EntityStore, MemoryEntityStore};
/// use serde_json::json;
///
/// let store = MemoryEntityStore::new();
/// let mut entity = Entity::new();
/// entity.insert("name".to_string(), json!("Hibernate"));
///
/// store.create_with_id("hibernate", entity).unwrap();
/// assert_eq!(store.len(), 1);
/// assert!(store.get("hibernate").unwrap().is_some());
/// ```
#[derive(Debug)]
pub struct MemoryEntityStore {
    records: RwLock<BTreeMap<String, Entity>>,
    default_page_size: usize,
}

impl MemoryEntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates an empty store returning `default_page_size` entities when
    /// `get_all` is called without a size.
    pub fn with_page_size(default_page_size: usize) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            default_page_size,
        }
    }

    /// Returns the number of stored entities.
    ///
    /// Still counts after a writer panicked; the poisoning is logged.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(|poisoned| {
                tracing::warn!("entity store lock poisoned, counting recovered records");
                poisoned.into_inner()
            })
            .len()
    }

    /// Returns `true` if no entity is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Entity>>, Error> {
        self.records
            .read()
            .map_err(|_| StoreError::new(StoreErrorKind::Backend, "store lock poisoned").into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Entity>>, Error> {
        self.records
            .write()
            .map_err(|_| StoreError::new(StoreErrorKind::Backend, "store lock poisoned").into())
    }
}

impl Default for MemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for MemoryEntityStore {
    fn get_all(
        &self,
        from: Option<usize>,
        size: Option<usize>,
        fields_to_remove: &[String],
    ) -> Result<Vec<Entity>, Error> {
        let records = self.read()?;
        Ok(records
            .values()
            .skip(from.unwrap_or(0))
            .take(size.unwrap_or(self.default_page_size))
            .map(|entity| {
                let mut entity = entity.clone();
                for field in fields_to_remove {
                    entity.remove(field);
                }
                entity
            })
            .collect())
    }

    fn get(&self, id: &str) -> Result<Option<Entity>, Error> {
        Ok(self.read()?.get(id).cloned())
    }

    fn create(&self, entity: Entity) -> Result<String, Error> {
        let id = Uuid::new_v4().to_string();
        self.write()?.insert(id.clone(), entity);
        Ok(id)
    }

    fn create_with_id(&self, id: &str, entity: Entity) -> Result<(), Error> {
        self.write()?.insert(id.to_string(), entity);
        Ok(())
    }

    fn update(&self, id: &str, entity: Entity) -> Result<(), Error> {
        let mut records = self.write()?;
        match records.get_mut(id) {
            Some(existing) => {
                *existing = entity;
                Ok(())
            }
            None => Err(StoreError::not_found(id).into()),
        }
    }

    fn delete(&self, id: &str) -> Result<(), Error> {
        self.write()?.remove(id);
        Ok(())
    }
}
