//! Book model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{trim_field, Payload, Resource};
use crate::validation::{bool_field, not_blank, string_field, FieldErrors};

/// Catalog book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Whether the book is on the shelf
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookData {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub available: bool,
}

/// Create or replace book request
#[derive(Debug, Default, Validate, ToSchema)]
pub struct BookPayload {
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub author: Option<String>,
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 20, message = "Ensure this field has no more than 20 characters.")
    )]
    pub isbn: Option<String>,
    /// Defaults to true when omitted
    pub available: Option<bool>,
}

impl Payload for BookPayload {
    type Data = BookData;

    fn read(object: &Map<String, Value>, errors: &mut FieldErrors) -> Self {
        Self {
            title: string_field(object, "title", errors),
            author: string_field(object, "author", errors),
            isbn: string_field(object, "isbn", errors),
            available: bool_field(object, "available", errors),
        }
    }

    fn trim(&mut self) {
        trim_field(&mut self.title);
        trim_field(&mut self.author);
        trim_field(&mut self.isbn);
    }

    fn into_data(self) -> BookData {
        BookData {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            isbn: self.isbn.unwrap_or_default(),
            available: self.available.unwrap_or(true),
        }
    }
}

impl Resource for Book {
    type Data = BookData;
    type Payload = BookPayload;

    const NAME: &'static str = "Book";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "author", "isbn"];

    fn id(&self) -> i32 {
        self.id
    }

    fn from_data(id: i32, data: BookData) -> Self {
        Self {
            id,
            title: data.title,
            author: data.author,
            isbn: data.isbn,
            available: data.available,
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "author" => Some(&self.author),
            "isbn" => Some(&self.isbn),
            _ => None,
        }
    }
}
