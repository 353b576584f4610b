//! Postgres storage: diesel operations composed as [`QueryReader`]s and run
//! on the blocking pool against an r2d2 connection pool.

use async_trait::async_trait;

use crate::{
    config::db::Pool,
    error::ServiceResult,
    models::{
        statistic::{operations as statistic_ops, NewStatistic, Statistic, StatisticQuery},
        user::{operations as user_ops, NewUser, User, UserQuery, UserSort},
    },
    services::functional_patterns::{run_blocking, QueryReader},
    storage::Storage,
};

#[derive(Clone)]
pub struct PgStorage {
    pool: Pool,
}

impl PgStorage {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn run<T: Send + 'static>(&self, reader: QueryReader<T>) -> ServiceResult<T> {
        run_blocking(reader, self.pool.clone()).await
    }
}

fn affected(rows: usize) -> u64 {
    rows as u64
}

#[async_trait]
impl Storage for PgStorage {
    async fn create_user(&self, user: NewUser) -> ServiceResult<i32> {
        self.run(QueryReader::new(move |conn| {
            user_ops::create_user(user.clone(), conn)
        }))
        .await
    }

    async fn update_user(&self, id: i32, user: NewUser) -> ServiceResult<u64> {
        self.run(
            QueryReader::new(move |conn| user_ops::update_user(id, user.clone(), conn))
                .map(affected),
        )
        .await
    }

    async fn delete_user(&self, id: i32) -> ServiceResult<u64> {
        let purge = QueryReader::new(move |conn| statistic_ops::delete_statistics_of_user(id, conn));
        let delete = QueryReader::new(move |conn| user_ops::delete_user(id, conn)).map(affected);
        self.run(purge.followed_by(delete).transaction()).await
    }

    async fn list_users(&self, sort: Option<UserSort>) -> ServiceResult<Vec<User>> {
        self.run(QueryReader::new(move |conn| user_ops::find_all_users(sort, conn)))
            .await
    }

    async fn query_users(&self, query: UserQuery) -> ServiceResult<Vec<User>> {
        self.run(QueryReader::new(move |conn| {
            user_ops::search_users(query.clone(), conn)
        }))
        .await
    }

    async fn delete_users_below_kills(&self, threshold: i64) -> ServiceResult<u64> {
        self.run(
            QueryReader::new(move |conn| user_ops::delete_users_below_kills(threshold, conn))
                .map(affected),
        )
        .await
    }

    async fn create_statistic(&self, statistic: NewStatistic) -> ServiceResult<i32> {
        self.run(QueryReader::new(move |conn| {
            statistic_ops::create_statistic(statistic.clone(), conn)
        }))
        .await
    }

    async fn update_statistic(&self, id: i32, statistic: NewStatistic) -> ServiceResult<u64> {
        self.run(
            QueryReader::new(move |conn| {
                statistic_ops::update_statistic(id, statistic.clone(), conn)
            })
            .map(affected),
        )
        .await
    }

    async fn delete_statistic(&self, id: i32) -> ServiceResult<u64> {
        self.run(
            QueryReader::new(move |conn| statistic_ops::delete_statistic(id, conn)).map(affected),
        )
        .await
    }

    async fn list_statistics(&self) -> ServiceResult<Vec<Statistic>> {
        self.run(QueryReader::new(statistic_ops::find_all_statistics))
            .await
    }

    async fn query_statistics(&self, query: StatisticQuery) -> ServiceResult<Vec<Statistic>> {
        self.run(QueryReader::new(move |conn| {
            statistic_ops::query_statistics(query, conn)
        }))
        .await
    }
}
