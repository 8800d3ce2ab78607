//! Business logic services

pub mod resource;

use crate::{
    models::{Book, User},
    repository::Repository,
};

pub use resource::ResourceService;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: ResourceService<User>,
    pub books: ResourceService<Book>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            users: ResourceService::new(repository.users),
            books: ResourceService::new(repository.books),
        }
    }
}
