use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    config::settings::Settings,
    services::self_test_service::{self, AwcTransport},
};

/// Where the harness sends its calls: the configured base URL, or this
/// server's own port on the IPv4 loopback.
fn base_url(req: &HttpRequest, settings: Option<&Settings>) -> String {
    settings
        .and_then(|settings| settings.self_test_base_url.clone())
        .unwrap_or_else(|| format!("http://127.0.0.1:{}", req.app_config().local_addr().port()))
}

// GET /testEndpoints
pub async fn test_endpoints(
    req: HttpRequest,
    settings: Option<web::Data<Settings>>,
) -> HttpResponse {
    let base_url = base_url(&req, settings.as_ref().map(|settings| settings.get_ref()));
    let transport = AwcTransport::new(base_url);
    let reports = self_test_service::run_default(&transport).await;
    HttpResponse::Ok().json(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    use crate::constants;

    #[actix_web::test]
    async fn test_configured_base_url_is_used() {
        // Nothing listens on the discard port, so every call fails to connect.
        let settings = Settings::from_lookup(|key| {
            (key == constants::ENV_SELF_TEST_BASE_URL).then(|| "http://127.0.0.1:9".to_string())
        })
        .expect("valid settings");
        assert_eq!(
            base_url(&test::TestRequest::default().to_http_request(), Some(&settings)),
            "http://127.0.0.1:9"
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(settings))
                .route("/testEndpoints", web::get().to(test_endpoints)),
        )
        .await;
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/testEndpoints").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let reports: Vec<Value> = test::read_body_json(resp).await;
        assert_eq!(reports.len(), 13);
        assert!(reports.iter().all(|r| r["status"] == "Error"));
    }
}
