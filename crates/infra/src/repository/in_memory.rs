use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use vaxbook_core::{DomainError, DomainResult, Entity};

use super::{BuildFromCount, Filter, Repository};

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryRepository<E: Entity> {
    inner: RwLock<HashMap<E::Id, E>>,
    what: &'static str,
}

impl<E: Entity> InMemoryRepository<E> {
    /// `what` names the record kind in conflict messages.
    pub fn new(what: &'static str) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            what,
        }
    }
}

#[async_trait]
impl<E> Repository<E> for InMemoryRepository<E>
where
    E: Entity + Clone + Send + Sync + 'static,
    E::Id: Send + Sync,
{
    async fn get(&self, id: &E::Id) -> Option<E> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    async fn list(&self) -> Vec<E> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    async fn save_unless(&self, entity: E, clashes: Filter<'_, E>) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict(format!("{} store is unavailable", self.what)))?;

        let id = entity.id().clone();
        if map.iter().any(|(k, v)| *k != id && clashes(v)) {
            return Err(DomainError::conflict(format!("duplicate {}", self.what)));
        }
        map.insert(id, entity);
        Ok(())
    }

    async fn insert_counted(&self, counted: Filter<'_, E>, build: BuildFromCount<'_, E>) -> DomainResult<E> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict(format!("{} store is unavailable", self.what)))?;

        let existing = map.values().filter(|v| counted(v)).count();
        let entity = build(existing)?;
        if map.contains_key(entity.id()) {
            return Err(DomainError::conflict(format!("duplicate {}", self.what)));
        }
        map.insert(entity.id().clone(), entity.clone());
        Ok(entity)
    }

    async fn remove(&self, id: &E::Id) -> Option<E> {
        let mut map = self.inner.write().ok()?;
        map.remove(id)
    }

    async fn remove_where(&self, filter: Filter<'_, E>) -> usize {
        let Ok(mut map) = self.inner.write() else {
            return 0;
        };
        let before = map.len();
        map.retain(|_, v| !filter(v));
        before - map.len()
    }
}
