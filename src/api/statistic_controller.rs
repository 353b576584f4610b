use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    api::query_fields,
    constants,
    error::ServiceError,
    models::request::RequestFields,
    services::statistic_service,
    storage::Storage,
};

// POST /addStatistics
pub async fn create(
    body: web::Bytes,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    let fields = RequestFields::from_body(&body);
    statistic_service::create(&fields, storage.get_ref()).await?;
    Ok(HttpResponse::Created().body(constants::MESSAGE_STATISTIC_CREATED))
}

// PUT /statistics/{id}
pub async fn update(
    id: web::Path<i32>,
    body: web::Bytes,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    let fields = RequestFields::from_body(&body);
    statistic_service::update(id.into_inner(), &fields, storage.get_ref()).await?;
    Ok(HttpResponse::Ok().body(constants::MESSAGE_STATISTIC_UPDATED))
}

// DELETE /statistics/{id}
pub async fn delete(
    id: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    statistic_service::delete(id.into_inner(), storage.get_ref()).await?;
    Ok(HttpResponse::Ok().body(constants::MESSAGE_STATISTIC_DELETED))
}

// GET /statistics
pub async fn list(storage: web::Data<dyn Storage>) -> Result<HttpResponse, ServiceError> {
    let statistics = statistic_service::list_all(storage.get_ref()).await?;
    Ok(HttpResponse::Ok().json(statistics))
}

// GET /statistics/paginate?limit=&offset=
pub async fn paginate(
    req: HttpRequest,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    let statistics = statistic_service::paginate(&query_fields(&req), storage.get_ref()).await?;
    Ok(HttpResponse::Ok().json(statistics))
}

// GET /statistics/search?start_date=&end_date=
pub async fn search_by_date_range(
    req: HttpRequest,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    let statistics =
        statistic_service::search_by_date_range(&query_fields(&req), storage.get_ref()).await?;
    Ok(HttpResponse::Ok().json(statistics))
}

// GET /statistics/searchByDate?date=
pub async fn search_by_date(
    req: HttpRequest,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    let statistics =
        statistic_service::search_by_date(&query_fields(&req), storage.get_ref()).await?;
    Ok(HttpResponse::Ok().json(statistics))
}
