use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use serde_json::json;

use crate::{
    api::query_fields,
    constants,
    error::ServiceError,
    models::request::RequestFields,
    services::user_service,
    storage::Storage,
};

// POST /createUser
pub async fn create(
    body: web::Bytes,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    info!("Processing create user request");
    let fields = RequestFields::from_body(&body);
    let id = user_service::create(&fields, storage.get_ref()).await?;
    Ok(HttpResponse::Created().json(json!({ "insertId": id })))
}

// PUT /users/{id}
pub async fn update(
    id: web::Path<i32>,
    body: web::Bytes,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    let fields = RequestFields::from_body(&body);
    user_service::update(id.into_inner(), &fields, storage.get_ref()).await?;
    Ok(HttpResponse::Ok().body(constants::MESSAGE_USER_UPDATED))
}

// DELETE /users/{id}
pub async fn delete(
    id: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    user_service::delete(id.into_inner(), storage.get_ref()).await?;
    Ok(HttpResponse::Ok().body(constants::MESSAGE_USER_DELETED))
}

// GET /users?sort_by=&order=
pub async fn list(
    req: HttpRequest,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    let users = user_service::list(&query_fields(&req), storage.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

// GET /users/search?username=
pub async fn search(
    req: HttpRequest,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    let users = user_service::search_by_username(&query_fields(&req), storage.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

// GET /users/searchByDetails?username=&first_name=&last_name=
pub async fn search_by_details(
    req: HttpRequest,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    let users = user_service::search_by_details(&query_fields(&req), storage.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

// DELETE /deleteUsersBelowKills?kills=  (loopback only, see config::app)
pub async fn delete_below_kills(
    req: HttpRequest,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, ServiceError> {
    let removed = user_service::delete_below_kills(&query_fields(&req), storage.get_ref()).await?;
    info!("Bulk delete removed {} user(s)", removed);
    Ok(HttpResponse::Ok().body(constants::MESSAGE_USERS_DELETED))
}
