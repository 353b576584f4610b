use actix_web::web;
use log::info;

use crate::{
    api::{self, health_controller, self_test_controller, statistic_controller, user_controller},
    middleware::LoopbackOnly,
};

/// A resource whose unmatched methods answer 404 like unmatched paths.
fn resource(path: &str) -> actix_web::Resource {
    web::resource(path).default_service(web::to(api::not_found))
}

pub fn config_services(cfg: &mut web::ServiceConfig) {
    info!("Configuring routes...");
    cfg.service(resource("/createUser").route(web::post().to(user_controller::create)))
        .service(resource("/users").route(web::get().to(user_controller::list)))
        .service(resource("/users/search").route(web::get().to(user_controller::search)))
        .service(
            resource("/users/searchByDetails")
                .route(web::get().to(user_controller::search_by_details)),
        )
        .service(
            resource("/users/{id}")
                .route(web::put().to(user_controller::update))
                .route(web::delete().to(user_controller::delete)),
        )
        .service(
            resource("/deleteUsersBelowKills").route(
                web::delete()
                    .to(user_controller::delete_below_kills)
                    .wrap(LoopbackOnly),
            ),
        )
        .service(resource("/addStatistics").route(web::post().to(statistic_controller::create)))
        .service(resource("/statistics").route(web::get().to(statistic_controller::list)))
        .service(
            resource("/statistics/paginate").route(web::get().to(statistic_controller::paginate)),
        )
        .service(
            resource("/statistics/search")
                .route(web::get().to(statistic_controller::search_by_date_range)),
        )
        .service(
            resource("/statistics/searchByDate")
                .route(web::get().to(statistic_controller::search_by_date)),
        )
        .service(
            resource("/statistics/{id}")
                .route(web::put().to(statistic_controller::update))
                .route(web::delete().to(statistic_controller::delete)),
        )
        .service(resource("/testRunning").route(web::get().to(health_controller::test_running)))
        .service(
            resource("/testEndpoints").route(web::get().to(self_test_controller::test_endpoints)),
        )
        .default_service(web::to(api::not_found));
}
