//! User model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{trim_field, Payload, Resource};
use crate::validation::{bool_field, email_address, not_blank, string_field, FieldErrors};

/// Library user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Whether the user is library staff
    pub is_librarian: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub name: String,
    pub email: String,
    pub is_librarian: bool,
}

/// Create or replace user request
#[derive(Debug, Default, Validate, ToSchema)]
pub struct UserPayload {
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "This field is required."),
        custom(function = "email_address"),
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    pub email: Option<String>,
    /// Defaults to false when omitted
    pub is_librarian: Option<bool>,
}

impl Payload for UserPayload {
    type Data = UserData;

    fn read(object: &Map<String, Value>, errors: &mut FieldErrors) -> Self {
        Self {
            name: string_field(object, "name", errors),
            email: string_field(object, "email", errors),
            is_librarian: bool_field(object, "is_librarian", errors),
        }
    }

    fn trim(&mut self) {
        trim_field(&mut self.name);
        trim_field(&mut self.email);
    }

    fn into_data(self) -> UserData {
        UserData {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            is_librarian: self.is_librarian.unwrap_or(false),
        }
    }
}

impl Resource for User {
    type Data = UserData;
    type Payload = UserPayload;

    const NAME: &'static str = "User";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email"];

    fn id(&self) -> i32 {
        self.id
    }

    fn from_data(id: i32, data: UserData) -> Self {
        Self {
            id,
            name: data.name,
            email: data.email,
            is_librarian: data.is_librarian,
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            _ => None,
        }
    }
}
