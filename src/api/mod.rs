use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};

use crate::{error::ServiceError, models::request::RequestFields};

pub mod health_controller;
pub mod self_test_controller;
pub mod statistic_controller;
pub mod user_controller;

/// Query-string fields; a malformed query string carries none.
pub(crate) fn query_fields(req: &HttpRequest) -> RequestFields {
    match web::Query::<HashMap<String, String>>::from_query(req.query_string()) {
        Ok(query) => RequestFields::from_query(&query),
        Err(e) => {
            log::debug!("Ignoring malformed query string: {}", e);
            RequestFields::default()
        }
    }
}

/// Fallback for any method and path without a route.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    Err(ServiceError::not_found(format!(
        "Cannot {} {}",
        req.method(),
        req.path()
    )))
}
