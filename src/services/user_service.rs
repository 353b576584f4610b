//! User Service
//!
//! Resource operations for users. Every operation runs its rule set over the
//! whole request before the storage collaborator is touched.

use crate::{
    error::{FunctionalErrorHandling, ServiceResult},
    models::{
        request::RequestFields,
        user::{validators, NewUser, User, UserQuery, UserSort},
    },
    storage::Storage,
};

/// Validates and inserts a user, returning the assigned identifier.
pub async fn create(fields: &RequestFields, storage: &dyn Storage) -> ServiceResult<i32> {
    validators::validate_user(fields)?;
    storage
        .create_user(NewUser::from_fields(fields))
        .await
        .log_error("user_service::create")
}

/// Full replacement: the same rule set as [`create`], never a partial patch.
pub async fn update(id: i32, fields: &RequestFields, storage: &dyn Storage) -> ServiceResult<u64> {
    validators::validate_user(fields)?;
    storage
        .update_user(id, NewUser::from_fields(fields))
        .await
        .log_error("user_service::update")
}

pub async fn delete(id: i32, storage: &dyn Storage) -> ServiceResult<u64> {
    storage.delete_user(id).await.log_error("user_service::delete")
}

pub async fn list(query: &RequestFields, storage: &dyn Storage) -> ServiceResult<Vec<User>> {
    validators::validate_user_sort(query)?;
    storage
        .list_users(UserSort::from_fields(query))
        .await
        .log_error("user_service::list")
}

/// Substring search on username; a missing username lists everyone.
pub async fn search_by_username(
    query: &RequestFields,
    storage: &dyn Storage,
) -> ServiceResult<Vec<User>> {
    let username = query.text("username").into_owned();
    storage
        .query_users(UserQuery::Username(username))
        .await
        .log_error("user_service::search_by_username")
}

pub async fn search_by_details(
    query: &RequestFields,
    storage: &dyn Storage,
) -> ServiceResult<Vec<User>> {
    validators::validate_user_details(query)?;
    let predicate = UserQuery::Details {
        username: query.text("username").into_owned(),
        first_name: query.text("first_name").into_owned(),
        last_name: query.text("last_name").into_owned(),
    };
    storage
        .query_users(predicate)
        .await
        .log_error("user_service::search_by_details")
}

/// Bulk delete of every user whose summed kills are below the `kills` threshold.
///
/// Origin checks happen in the dispatcher before this runs.
pub async fn delete_below_kills(query: &RequestFields, storage: &dyn Storage) -> ServiceResult<u64> {
    validators::validate_kills_threshold(query)?;
    let threshold = query.integer("kills").unwrap_or_default();
    log::info!("Deleting users with fewer than {} kills", threshold);
    storage
        .delete_users_below_kills(threshold)
        .await
        .log_error("user_service::delete_below_kills")
}
