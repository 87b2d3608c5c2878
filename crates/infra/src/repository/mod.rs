//! Entity storage abstractions.

pub mod in_memory;

pub use in_memory::InMemoryRepository;

use async_trait::async_trait;

use vaxbook_core::{DomainResult, Entity};

/// Predicate over stored records.
pub type Filter<'a, E> = &'a (dyn Fn(&E) -> bool + Send + Sync);

/// Builds a new record from how many existing records matched.
pub type BuildFromCount<'a, E> = &'a (dyn Fn(usize) -> DomainResult<E> + Send + Sync);

/// Id-keyed store for one entity type.
///
/// Implementations own all shared mutable state; callers only ever hold
/// cloned snapshots of records.
#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: Entity + Clone + Send + Sync + 'static,
    E::Id: Send + Sync,
{
    async fn get(&self, id: &E::Id) -> Option<E>;

    async fn list(&self) -> Vec<E>;

    /// Insert or replace `entity`, unless a *different* record satisfies
    /// `clashes`. The check and the write are atomic.
    async fn save_unless(&self, entity: E, clashes: Filter<'_, E>) -> DomainResult<()>;

    async fn save(&self, entity: E) -> DomainResult<()> {
        self.save_unless(entity, &|_| false).await
    }

    /// Count records matching `counted`, build the new record from that
    /// count, and store it. Counting, building and writing happen under one
    /// lock, so a limit enforced by `build` holds under concurrent inserts.
    async fn insert_counted(&self, counted: Filter<'_, E>, build: BuildFromCount<'_, E>) -> DomainResult<E>;

    async fn remove(&self, id: &E::Id) -> Option<E>;

    /// Remove every record matching `filter`; returns how many went.
    async fn remove_where(&self, filter: Filter<'_, E>) -> usize;
}
