//! Primary entity persistence.

mod memory;

pub use memory::MemoryEntityStore;

use crate::error::Error;

/// A structured record: field name to JSON value.
pub type Entity = serde_json::Map<String, serde_json::Value>;

/// Key-value persistence of entities, addressed by string id.
///
/// Implementations are shared across requests and must be safe for
/// concurrent use; callers apply no locking of their own.
pub trait EntityStore: Send + Sync {
    /// Lists entities ordered by id, skipping `from` and returning at most
    /// `size` of them, with every field named in `fields_to_remove` stripped.
    ///
    /// `None` lets the store pick its own offset/page size.
    fn get_all(
        &self,
        from: Option<usize>,
        size: Option<usize>,
        fields_to_remove: &[String],
    ) -> Result<Vec<Entity>, Error>;

    /// Returns the entity stored under `id`, if any.
    fn get(&self, id: &str) -> Result<Option<Entity>, Error>;

    /// Stores a new entity under an id assigned by the store, returning that id.
    fn create(&self, entity: Entity) -> Result<String, Error>;

    /// Stores an entity under a caller-chosen id, replacing any previous one.
    fn create_with_id(&self, id: &str, entity: Entity) -> Result<(), Error>;

    /// Replaces an existing entity.
    ///
    /// # Errors
    ///
    /// Fails with a [`StoreErrorKind::NotFound`](crate::StoreErrorKind::NotFound)
    /// store error when no entity is stored under `id`.
    fn update(&self, id: &str, entity: Entity) -> Result<(), Error>;

    /// Removes the entity stored under `id`.
    fn delete(&self, id: &str) -> Result<(), Error>;
}
