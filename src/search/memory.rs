use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

use super::SearchIndex;
use crate::error::IndexError;
use crate::store::Entity;

type DocKey = (String, String, String);

/// In-memory [`SearchIndex`].
///
/// # Examples
///
/// ```
/// use content_aggregator::{Entity, MemorySearchIndex, SearchIndex};
///
/// let index = MemorySearchIndex::new();
/// index.upsert("projects", "project", "p1", &Entity::new()).unwrap();
/// assert!(index.document("projects", "project", "p1").is_some());
///
/// index.delete("projects", "project", "p1").unwrap();
/// assert!(index.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemorySearchIndex {
    documents: RwLock<HashMap<DocKey, Entity>>,
}

impl MemorySearchIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the indexed document, if any.
    pub fn document(&self, index_name: &str, index_type: &str, id: &str) -> Option<Entity> {
        self.recovered()
            .get(&key(index_name, index_type, id))
            .cloned()
    }

    /// Returns the number of indexed documents across all indices.
    pub fn len(&self) -> usize {
        self.recovered().len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Inspection keeps working after a writer panicked; writes still fail.
    fn recovered(&self) -> RwLockReadGuard<'_, HashMap<DocKey, Entity>> {
        self.documents.read().unwrap_or_else(|poisoned| {
            tracing::warn!("search index lock poisoned, reading recovered documents");
            poisoned.into_inner()
        })
    }
}

impl SearchIndex for MemorySearchIndex {
    fn upsert(
        &self,
        index_name: &str,
        index_type: &str,
        id: &str,
        document: &Entity,
    ) -> Result<(), IndexError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| IndexError::new(index_name, index_type, id, "index lock poisoned"))?;
        documents.insert(key(index_name, index_type, id), document.clone());
        Ok(())
    }

    fn delete(&self, index_name: &str, index_type: &str, id: &str) -> Result<(), IndexError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| IndexError::new(index_name, index_type, id, "index lock poisoned"))?;
        documents.remove(&key(index_name, index_type, id));
        Ok(())
    }
}

fn key(index_name: &str, index_type: &str, id: &str) -> DocKey {
    (index_name.to_string(), index_type.to_string(), id.to_string())
}
