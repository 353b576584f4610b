//! The storage collaborator behind the resource operations.
//!
//! Routes only ever talk to [`Storage`]; which backend sits behind it is
//! chosen at startup.

use async_trait::async_trait;

use crate::{
    error::{ServiceError, ServiceResult},
    models::{
        statistic::{NewStatistic, Statistic, StatisticQuery},
        user::{NewUser, User, UserQuery, UserSort},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Inserts a user and returns the assigned identifier.
    async fn create_user(&self, user: NewUser) -> ServiceResult<i32>;

    /// Overwrites every field of user `id`; returns the affected row count.
    async fn update_user(&self, id: i32, user: NewUser) -> ServiceResult<u64>;

    async fn delete_user(&self, id: i32) -> ServiceResult<u64>;

    /// Lists users, in storage order when `sort` is `None`.
    async fn list_users(&self, sort: Option<UserSort>) -> ServiceResult<Vec<User>>;

    async fn query_users(&self, query: UserQuery) -> ServiceResult<Vec<User>>;

    /// Removes every user whose summed statistic kills are below `threshold`,
    /// along with their statistics. Users without statistics sum to zero.
    async fn delete_users_below_kills(&self, threshold: i64) -> ServiceResult<u64>;

    async fn create_statistic(&self, statistic: NewStatistic) -> ServiceResult<i32>;

    async fn update_statistic(&self, id: i32, statistic: NewStatistic) -> ServiceResult<u64>;

    async fn delete_statistic(&self, id: i32) -> ServiceResult<u64>;

    async fn list_statistics(&self) -> ServiceResult<Vec<Statistic>>;

    async fn query_statistics(&self, query: StatisticQuery) -> ServiceResult<Vec<Statistic>>;
}

/// Resolves a page request into `(limit, offset)`.
///
/// Missing (unparseable) and negative values are rejected the way a SQL
/// `LIMIT`/`OFFSET` clause would reject them.
pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> ServiceResult<(i64, i64)> {
    match (limit, offset) {
        (Some(limit), Some(offset)) if limit >= 0 && offset >= 0 => Ok((limit, offset)),
        _ => Err(ServiceError::internal_server_error(format!(
            "Incorrect arguments to LIMIT/OFFSET: limit={}, offset={}",
            render_bound(limit),
            render_bound(offset)
        ))
        .with_tag("statistic")),
    }
}

fn render_bound(bound: Option<i64>) -> String {
    bound.map_or_else(|| "NaN".to_string(), |value| value.to_string())
}
