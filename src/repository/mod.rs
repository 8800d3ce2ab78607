//! Repository layer: the persistence collaborator for each resource

pub mod books;
pub mod filter;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, Draft, Resource, User},
};

pub use filter::SearchFilter;
pub use memory::MemoryStore;

/// Storage for one resource type.
///
/// Implementations own all synchronisation; callers hold no locks between
/// calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store<E: Resource>: Send + Sync {
    /// Records matching `filter`, in ascending id (insertion) order
    async fn find_all(&self, filter: &SearchFilter) -> AppResult<Vec<E>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<E>>;

    /// Insert a new record, or overwrite every field of an existing one
    async fn save(&self, draft: Draft<E>) -> AppResult<E>;

    /// Remove a record; `false` when nothing had that id
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// Stores for every resource
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn Store<User>>,
    pub books: Arc<dyn Store<Book>>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool)),
        }
    }

    /// Create a process-local repository; contents are lost at exit
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryStore::<User>::new()),
            books: Arc::new(MemoryStore::<Book>::new()),
        }
    }
}
