//! Diesel operations for the users table.

use diesel::{pg::Pg, prelude::*, sql_types::BigInt};

use crate::{
    config::db::Connection,
    error::{ServiceError, ServiceResult},
    models::user::{NewUser, SortOrder, User, UserQuery, UserSort, UserSortField},
    schema::users::{self, dsl::*},
};

const DELETE_BELOW_KILLS_SQL: &str = "\
WITH doomed AS (
    SELECT u.id FROM users u
    LEFT JOIN statistics s ON s.user_id = u.id
    GROUP BY u.id
    HAVING COALESCE(SUM(s.kills), 0) < $1
), purged AS (
    DELETE FROM statistics WHERE user_id IN (SELECT id FROM doomed)
)
DELETE FROM users WHERE id IN (SELECT id FROM doomed)";

fn storage_error(action: &'static str) -> impl FnOnce(diesel::result::Error) -> ServiceError {
    move |err| {
        log::error!("Failed to {}: {}", action, err);
        ServiceError::internal_server_error(err.to_string())
            .with_tag("user")
            .with_detail(action)
    }
}

pub fn create_user(new_user: NewUser, conn: &mut Connection) -> ServiceResult<i32> {
    diesel::insert_into(users)
        .values(&new_user)
        .returning(id)
        .get_result::<i32>(conn)
        .map_err(storage_error("create user"))
}

pub fn update_user(user_id: i32, changes: NewUser, conn: &mut Connection) -> ServiceResult<usize> {
    diesel::update(users.find(user_id))
        .set(&changes)
        .execute(conn)
        .map_err(storage_error("update user"))
}

pub fn delete_user(user_id: i32, conn: &mut Connection) -> ServiceResult<usize> {
    diesel::delete(users.find(user_id))
        .execute(conn)
        .map_err(storage_error("delete user"))
}

fn apply_ordering(
    query: users::BoxedQuery<'static, Pg>,
    sort: UserSort,
) -> users::BoxedQuery<'static, Pg> {
    match (sort.field, sort.order) {
        (UserSortField::Username, SortOrder::Asc) => query.order_by(username.asc()),
        (UserSortField::Username, SortOrder::Desc) => query.order_by(username.desc()),
        (UserSortField::FirstName, SortOrder::Asc) => query.order_by(first_name.asc()),
        (UserSortField::FirstName, SortOrder::Desc) => query.order_by(first_name.desc()),
        (UserSortField::LastName, SortOrder::Asc) => query.order_by(last_name.asc()),
        (UserSortField::LastName, SortOrder::Desc) => query.order_by(last_name.desc()),
    }
}

pub fn find_all_users(sort: Option<UserSort>, conn: &mut Connection) -> ServiceResult<Vec<User>> {
    let query = users.into_boxed();
    let query = match sort {
        Some(sort) => apply_ordering(query, sort),
        None => query,
    };
    query
        .load::<User>(conn)
        .map_err(storage_error("list users"))
}

fn contains_pattern(value: &str) -> String {
    format!("%{}%", value)
}

pub fn search_users(predicate: UserQuery, conn: &mut Connection) -> ServiceResult<Vec<User>> {
    let mut query = users.into_boxed();
    match predicate {
        UserQuery::Username(name) => {
            if !name.is_empty() {
                query = query.filter(username.like(contains_pattern(&name)));
            }
        }
        UserQuery::Details {
            username: name,
            first_name: first,
            last_name: last,
        } => {
            if !name.is_empty() {
                query = query.filter(username.like(contains_pattern(&name)));
            }
            if !first.is_empty() {
                query = query.filter(first_name.like(contains_pattern(&first)));
            }
            if !last.is_empty() {
                query = query.filter(last_name.like(contains_pattern(&last)));
            }
        }
    }
    query
        .load::<User>(conn)
        .map_err(storage_error("search users"))
}

/// Removes every user whose summed statistic kills fall below `threshold`,
/// together with those users' statistics rows.
pub fn delete_users_below_kills(threshold: i64, conn: &mut Connection) -> ServiceResult<usize> {
    diesel::sql_query(DELETE_BELOW_KILLS_SQL)
        .bind::<BigInt, _>(threshold)
        .execute(conn)
        .map_err(storage_error("delete users below kills"))
}
