use std::{io, sync::Arc};

use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use killstats::{
    config::{
        self,
        settings::{Settings, StorageBackend},
    },
    storage::{MemoryStorage, PgStorage, Storage},
    utils::logger,
};

fn build_storage(settings: &Settings) -> io::Result<Arc<dyn Storage>> {
    match (settings.storage, settings.database_url.as_deref()) {
        (StorageBackend::Postgres, Some(url)) => {
            let pool = config::db::init_db_pool(url, settings.db_pool_size)
                .map_err(|e| io::Error::other(format!("Failed to create database pool: {}", e)))?;
            Ok(Arc::new(PgStorage::new(pool)))
        }
        (StorageBackend::Postgres, None) => {
            Err(io::Error::other("DATABASE_URL is required for postgres storage"))
        }
        (StorageBackend::Memory, _) => {
            log::warn!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::from_env().map_err(io::Error::other)?;
    if let Err(e) = logger::init_logging(settings.log_format) {
        eprintln!("Logging already initialized: {}", e);
    }

    let storage = web::Data::from(build_storage(&settings)?);
    let app_settings = web::Data::new(settings.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(storage.clone())
            .app_data(app_settings.clone())
            .configure(config::app::config_services)
    })
    .bind(settings.bind_address())?;

    for addr in server.addrs() {
        log::info!("HTTP server running on http://{}", addr);
    }
    server.run().await
}
