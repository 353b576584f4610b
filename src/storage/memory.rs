//! In-process storage backed by ordered maps behind a tokio `RwLock`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{ServiceError, ServiceResult},
    models::{
        statistic::{NewStatistic, Statistic, StatisticQuery},
        user::{NewUser, SortOrder, User, UserQuery, UserSort, UserSortField},
    },
    storage::{page_bounds, Storage},
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    statistics: BTreeMap<i32, Statistic>,
    last_user_id: i32,
    last_statistic_id: i32,
}

impl Tables {
    fn ensure_unique_username(&self, username: &str, except: Option<i32>) -> ServiceResult<()> {
        let taken = self
            .users
            .values()
            .any(|user| user.username == username && Some(user.id) != except);
        if taken {
            return Err(ServiceError::internal_server_error(format!(
                "Duplicate entry '{}' for key 'users.username'",
                username
            ))
            .with_tag("user"));
        }
        Ok(())
    }

    fn kills_of(&self, user_id: i32) -> i64 {
        self.statistics
            .values()
            .filter(|statistic| statistic.user_id == user_id)
            .map(|statistic| i64::from(statistic.kills))
            .sum()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_key(user: &User, field: UserSortField) -> &str {
    match field {
        UserSortField::Username => user.username.as_str(),
        UserSortField::FirstName => user.first_name.as_str(),
        UserSortField::LastName => user.last_name.as_str(),
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_user(&self, user: NewUser) -> ServiceResult<i32> {
        let mut tables = self.tables.write().await;
        tables.ensure_unique_username(&user.username, None)?;
        tables.last_user_id += 1;
        let id = tables.last_user_id;
        tables.users.insert(id, user.into_user(id));
        Ok(id)
    }

    async fn update_user(&self, id: i32, user: NewUser) -> ServiceResult<u64> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(0);
        }
        tables.ensure_unique_username(&user.username, Some(id))?;
        tables.users.insert(id, user.into_user(id));
        Ok(1)
    }

    async fn delete_user(&self, id: i32) -> ServiceResult<u64> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(0);
        }
        tables.statistics.retain(|_, statistic| statistic.user_id != id);
        Ok(1)
    }

    async fn list_users(&self, sort: Option<UserSort>) -> ServiceResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        if let Some(UserSort { field, order }) = sort {
            users.sort_by(|a, b| {
                let ordering = sort_key(a, field).cmp(sort_key(b, field));
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
        Ok(users)
    }

    async fn query_users(&self, query: UserQuery) -> ServiceResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|user| query.matches(user))
            .cloned()
            .collect())
    }

    async fn delete_users_below_kills(&self, threshold: i64) -> ServiceResult<u64> {
        let mut tables = self.tables.write().await;
        let doomed: Vec<i32> = tables
            .users
            .keys()
            .copied()
            .filter(|id| tables.kills_of(*id) < threshold)
            .collect();

        for id in &doomed {
            tables.users.remove(id);
        }
        tables
            .statistics
            .retain(|_, statistic| !doomed.contains(&statistic.user_id));

        log::debug!("Removed {} user(s) below {} kills", doomed.len(), threshold);
        Ok(doomed.len() as u64)
    }

    async fn create_statistic(&self, statistic: NewStatistic) -> ServiceResult<i32> {
        let mut tables = self.tables.write().await;
        tables.last_statistic_id += 1;
        let id = tables.last_statistic_id;
        tables.statistics.insert(id, statistic.into_statistic(id));
        Ok(id)
    }

    async fn update_statistic(&self, id: i32, statistic: NewStatistic) -> ServiceResult<u64> {
        let mut tables = self.tables.write().await;
        match tables.statistics.get_mut(&id) {
            Some(existing) => {
                *existing = statistic.into_statistic(id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_statistic(&self, id: i32) -> ServiceResult<u64> {
        let mut tables = self.tables.write().await;
        Ok(tables.statistics.remove(&id).map_or(0, |_| 1))
    }

    async fn list_statistics(&self) -> ServiceResult<Vec<Statistic>> {
        let tables = self.tables.read().await;
        Ok(tables.statistics.values().cloned().collect())
    }

    async fn query_statistics(&self, query: StatisticQuery) -> ServiceResult<Vec<Statistic>> {
        let tables = self.tables.read().await;
        let rows = tables.statistics.values();
        match query {
            StatisticQuery::Page { limit, offset } => {
                let (limit, offset) = page_bounds(limit, offset)?;
                Ok(rows
                    .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                    .take(usize::try_from(limit).unwrap_or(usize::MAX))
                    .cloned()
                    .collect())
            }
            _ => Ok(rows.filter(|row| query.matches(row)).cloned().collect()),
        }
    }
}
