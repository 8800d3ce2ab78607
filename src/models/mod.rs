//! Data models for BookHub
//!
//! Every resource exposed over HTTP implements [`Resource`], which is all the
//! generic CRUD machinery needs to know about an entity: its display name, the
//! fields searched by `?search=`, and how to rebuild it from validated data.

pub mod book;
pub mod user;

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Debug;
use validator::Validate;

use crate::validation::FieldErrors;

pub use book::{Book, BookData, BookPayload};
pub use user::{User, UserData, UserPayload};

/// An entity type served through the CRUD endpoints
pub trait Resource: Debug + Clone + PartialEq + Serialize + Send + Sync + 'static {
    /// Validated field values, without identity
    type Data: Debug + Clone + PartialEq + Send + Sync + 'static;
    /// Inbound request body
    type Payload: Payload<Data = Self::Data>;

    /// Display name used in error messages ("User not found")
    const NAME: &'static str;
    /// Fields matched by the search filter, in order
    const SEARCH_FIELDS: &'static [&'static str];

    fn id(&self) -> i32;

    fn from_data(id: i32, data: Self::Data) -> Self;

    /// Text value of a named field, if the resource has one
    fn field(&self, name: &str) -> Option<&str>;
}

/// A request body that validates into a resource's field values
pub trait Payload: Validate + Send + 'static {
    type Data;

    /// Read the declared keys of a JSON object. Keys holding `null` or a
    /// value of the wrong JSON type are recorded in `errors` and left unset.
    fn read(object: &Map<String, Value>, errors: &mut FieldErrors) -> Self;

    /// Strip surrounding whitespace from every text field
    fn trim(&mut self);

    /// Convert a payload that passed validation into field values
    fn into_data(self) -> Self::Data;
}

/// Validated values ready to be written.
///
/// `id` is `None` for a new record and the existing identity for a full
/// replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft<E: Resource> {
    pub id: Option<i32>,
    pub data: E::Data,
}

impl<E: Resource> Draft<E> {
    pub fn new(data: E::Data) -> Self {
        Self { id: None, data }
    }

    pub fn replacing(id: i32, data: E::Data) -> Self {
        Self { id: Some(id), data }
    }
}

pub(crate) fn trim_field(field: &mut Option<String>) {
    if let Some(value) = field {
        let trimmed = value.trim();
        if trimmed.len() != value.len() {
            *value = trimmed.to_string();
        }
    }
}
