use actix_web::HttpResponse;

use crate::constants;

/// Liveness probe.
pub async fn test_running() -> HttpResponse {
    HttpResponse::Ok().body(constants::MESSAGE_SERVER_RUNNING)
}
