//! Secondary, read-optimized mirror of entity data.

mod memory;

pub use memory::MemorySearchIndex;

use crate::error::IndexError;
use crate::store::Entity;

/// Document index addressed by index name, document type and id.
pub trait SearchIndex: Send + Sync {
    /// Inserts or replaces the document stored under `id`.
    fn upsert(
        &self,
        index_name: &str,
        index_type: &str,
        id: &str,
        document: &Entity,
    ) -> Result<(), IndexError>;

    /// Removes the document stored under `id`.
    fn delete(&self, index_name: &str, index_type: &str, id: &str) -> Result<(), IndexError>;
}
