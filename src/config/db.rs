use diesel::{pg::PgConnection, r2d2::ConnectionManager};

pub type Connection = PgConnection;

pub type Pool = r2d2::Pool<ConnectionManager<Connection>>;

/// Builds the r2d2 pool for `url`, capped at `max_size` connections.
///
/// Fails if no connection can be established within the pool's timeout.
pub fn init_db_pool(url: &str, max_size: u32) -> Result<Pool, r2d2::Error> {
    log::info!("Configuring database pool (max_size={})...", max_size);
    let manager = ConnectionManager::<Connection>::new(url);
    r2d2::Pool::builder().max_size(max_size).build(manager)
}
