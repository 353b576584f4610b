//! Composable database operations for the Postgres store.
//!
//! A [`QueryReader`] describes work against a connection without holding
//! one; [`run_blocking`] borrows a pooled connection on actix's blocking
//! thread pool and runs it there, so diesel never blocks a worker.

use actix_web::web;

use crate::{
    config::db::{Connection, Pool},
    error::{ServiceError, ServiceResult},
};

/// Composable query operations using the Reader monad pattern
///
/// This allows building complex database operations from smaller, composable pieces
/// without explicitly passing the connection around.
pub struct QueryReader<T> {
    run: Box<dyn Fn(&mut Connection) -> ServiceResult<T> + Send + Sync>,
}

impl<T> QueryReader<T> {
    /// Create a new QueryReader from a function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Connection) -> ServiceResult<T> + Send + Sync + 'static,
    {
        Self { run: Box::new(f) }
    }

    /// Execute the query with the provided connection
    pub fn run(&self, conn: &mut Connection) -> ServiceResult<T> {
        (self.run)(conn)
    }

    /// Map the result of this query to a new type
    pub fn map<U, F>(self, f: F) -> QueryReader<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
        T: 'static,
    {
        QueryReader::new(move |conn| self.run(conn).map(&f))
    }

    /// Execute this query, discard its result, then execute `next`
    pub fn followed_by<U>(self, next: QueryReader<U>) -> QueryReader<U>
    where
        T: 'static,
        U: 'static,
    {
        QueryReader::new(move |conn| {
            self.run(conn)?;
            next.run(conn)
        })
    }

    /// Execute this query within a transaction
    pub fn transaction(self) -> QueryReader<T>
    where
        T: 'static,
    {
        use diesel::Connection as _;

        QueryReader::new(move |conn| {
            let mut failure = None;
            let outcome = conn.transaction::<T, diesel::result::Error, _>(|conn| {
                self.run(conn).map_err(|e| {
                    log::error!("Transaction operation failed, rolling back: {}", e);
                    failure = Some(e);
                    diesel::result::Error::RollbackTransaction
                })
            });
            outcome.map_err(|e| {
                failure.unwrap_or_else(|| {
                    ServiceError::internal_server_error(format!("Transaction failed: {}", e))
                })
            })
        })
    }
}

/// Execute a QueryReader with a database pool
pub fn run_query<T>(reader: QueryReader<T>, pool: &Pool) -> ServiceResult<T> {
    pool.get()
        .map_err(|e| {
            ServiceError::internal_server_error(format!("Failed to get database connection: {}", e))
        })
        .and_then(|mut conn| reader.run(&mut conn))
}

/// Runs `reader` on the blocking pool with a connection from `pool`.
pub async fn run_blocking<T>(reader: QueryReader<T>, pool: Pool) -> ServiceResult<T>
where
    T: Send + 'static,
{
    web::block(move || run_query(reader, &pool))
        .await
        .map_err(|e| {
            ServiceError::internal_server_error(format!("Blocking query was cancelled: {}", e))
        })?
}
