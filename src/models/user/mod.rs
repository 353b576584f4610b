//! User Module
//!
//! This module provides the User model, its write payload, and the list/search
//! parameters understood by the storage collaborator.

use std::str::FromStr;

use derive_more::Display;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::request::RequestFields;
use crate::schema::users;

#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Full field set written by create and update.
#[derive(Insertable, AsChangeset, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    /// Builds the payload from fields that already passed the user rule set.
    pub fn from_fields(fields: &RequestFields) -> Self {
        Self {
            username: fields.text("username").into_owned(),
            password: fields.text("password").into_owned(),
            first_name: fields.text("first_name").into_owned(),
            last_name: fields.text("last_name").into_owned(),
        }
    }

    pub fn into_user(self, id: i32) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UserSortField {
    #[display(fmt = "username")]
    Username,
    #[display(fmt = "first_name")]
    FirstName,
    #[display(fmt = "last_name")]
    LastName,
}

impl UserSortField {
    pub const ALLOWED: &'static [&'static str] = &["username", "first_name", "last_name"];
}

impl FromStr for UserSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "username" => Ok(UserSortField::Username),
            "first_name" => Ok(UserSortField::FirstName),
            "last_name" => Ok(UserSortField::LastName),
            other => Err(format!("Unknown sort field '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SortOrder {
    #[default]
    #[display(fmt = "asc")]
    Asc,
    #[display(fmt = "desc")]
    Desc,
}

impl SortOrder {
    pub const ALLOWED: &'static [&'static str] = &["asc", "desc"];
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSort {
    pub field: UserSortField,
    pub order: SortOrder,
}

impl UserSort {
    /// Reads `sort_by` / `order` from fields that passed the sort rule set.
    ///
    /// No `sort_by` means backend-default ordering; `order` alone is ignored.
    pub fn from_fields(fields: &RequestFields) -> Option<Self> {
        let field = fields.text_opt("sort_by")?.parse().ok()?;
        let order = fields
            .text_opt("order")
            .and_then(|order| order.parse().ok())
            .unwrap_or_default();
        Some(Self { field, order })
    }
}

/// User search predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserQuery {
    /// Substring match on username; empty matches everyone.
    Username(String),
    /// Substring match per non-empty field, AND-combined.
    Details {
        username: String,
        first_name: String,
        last_name: String,
    },
}

impl UserQuery {
    pub fn matches(&self, user: &User) -> bool {
        fn contains(haystack: &str, needle: &str) -> bool {
            needle.is_empty() || haystack.contains(needle)
        }

        match self {
            UserQuery::Username(username) => contains(&user.username, username),
            UserQuery::Details {
                username,
                first_name,
                last_name,
            } => {
                contains(&user.username, username)
                    && contains(&user.first_name, first_name)
                    && contains(&user.last_name, last_name)
            }
        }
    }
}

pub mod operations;
pub mod validators;
