//! Generic CRUD service shared by every resource
//!
//! Each operation looks records up through the [`Store`], runs the
//! [`Schema`] for writes, and reports outcomes as [`AppError`] variants that
//! the HTTP layer maps to status codes.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::Resource,
    repository::{SearchFilter, Store},
    validation::{PayloadSchema, Schema},
};

pub struct ResourceService<E: Resource> {
    store: Arc<dyn Store<E>>,
    schema: Arc<dyn Schema<E>>,
}

impl<E: Resource> Clone for ResourceService<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            schema: Arc::clone(&self.schema),
        }
    }
}

impl<E: Resource> ResourceService<E> {
    /// Service validating with the resource's payload schema
    pub fn new(store: Arc<dyn Store<E>>) -> Self {
        Self::with_schema(store, Arc::new(PayloadSchema::<E>::new()))
    }

    pub fn with_schema(store: Arc<dyn Store<E>>, schema: Arc<dyn Schema<E>>) -> Self {
        Self { store, schema }
    }

    /// List records, optionally narrowed by a search term
    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<E>> {
        let filter = SearchFilter::for_resource::<E>(search);
        self.store.find_all(&filter).await
    }

    pub async fn get(&self, id: i32) -> AppResult<E> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::not_found::<E>)
    }

    pub async fn create(&self, payload: &Value) -> AppResult<E> {
        tracing::debug!(resource = E::NAME, %payload, "Received create payload");

        let draft = self.schema.validate(payload, None).map_err(|errors| {
            tracing::debug!(resource = E::NAME, ?errors, "Validation errors");
            AppError::Validation(errors)
        })?;

        let created = self.store.save(draft).await?;
        tracing::info!(resource = E::NAME, id = created.id(), "Created");
        Ok(created)
    }

    /// Replace every field of an existing record
    pub async fn update(&self, id: i32, payload: &Value) -> AppResult<E> {
        let existing = self.get(id).await?;

        tracing::debug!(resource = E::NAME, id, %payload, "Received update payload");

        let draft = self
            .schema
            .validate(payload, Some(&existing))
            .map_err(|errors| {
                tracing::debug!(resource = E::NAME, id, ?errors, "Validation errors");
                AppError::Validation(errors)
            })?;

        self.store.save(draft).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get(id).await?;

        if !self.store.delete(id).await? {
            // Removed by a concurrent request after the lookup
            return Err(AppError::not_found::<E>());
        }

        tracing::info!(resource = E::NAME, id, "Deleted");
        Ok(())
    }
}
