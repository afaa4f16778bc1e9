//! HTTP handlers for the Share Relay Service

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RelayError;
use crate::AppState;

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .route("/sign", web::post().to(sign_upload))
            .route("/shorten", web::post().to(shorten_link)),
    );
}

/// Sign request
#[derive(Debug, Deserialize)]
struct SignRequest {
    #[serde(default)]
    folder: String,
}

/// Issue a signed upload grant.
///
/// The grant goes straight back to the client, which performs the upload
/// against the media API itself; file bytes never pass through this service.
async fn sign_upload(
    state: web::Data<AppState>,
    req: web::Json<SignRequest>,
) -> Result<HttpResponse, RelayError> {
    let credentials = state
        .credentials
        .as_ref()
        .ok_or(RelayError::SigningUnconfigured)?;

    let grant = credentials.issue_grant_now(&req.folder);
    info!(folder = %grant.folder, timestamp = grant.timestamp, "issued upload grant");

    Ok(HttpResponse::Ok().json(grant))
}

/// Shorten request
#[derive(Debug, Deserialize)]
struct ShortenRequest {
    #[serde(default)]
    url: String,
}

/// Shorten response
#[derive(Debug, Serialize)]
struct ShortenResponse {
    shorturl: String,
    fullurl: String,
}

/// Proxy a long share link to the shortening upstream.
async fn shorten_link(
    state: web::Data<AppState>,
    req: web::Json<ShortenRequest>,
) -> Result<HttpResponse, RelayError> {
    if req.url.trim().is_empty() {
        return Err(RelayError::MissingUrl);
    }

    debug!(len = req.url.len(), "shortening share link");
    let shorturl = state.shortener.shorten(&req.url).await?;
    info!(shorturl = %shorturl, "shortened share link");

    Ok(HttpResponse::Ok().json(ShortenResponse {
        shorturl,
        fullurl: req.into_inner().url,
    }))
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "share-relay-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use greetlink_signing::SigningCredentials;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::shortener::UrlShortener;

    fn state_with(
        credentials: Option<SigningCredentials>,
        shortener_endpoint: &str,
    ) -> web::Data<AppState> {
        let shortener = UrlShortener::new(shortener_endpoint, Duration::from_secs(2))
            .expect("client builds");
        web::Data::new(AppState {
            credentials,
            shortener,
        })
    }

    fn test_credentials() -> SigningCredentials {
        SigningCredentials::new("key123", "demo", "topsecret")
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(None, "http://127.0.0.1:1/create.php"))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_sign_with_folder() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(
                    Some(test_credentials()),
                    "http://127.0.0.1:1/create.php",
                ))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/sign")
            .set_json(serde_json::json!({"folder": "weddings"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["api_key"], "key123");
        assert_eq!(body["cloud_name"], "demo");
        assert_eq!(body["folder"], "weddings");
        assert!(body["timestamp"].as_i64().unwrap() > 0);
        let signature = body["signature"].as_str().unwrap();
        assert_eq!(signature.len(), 40);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[actix_web::test]
    async fn test_sign_defaults_to_empty_folder() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(
                    Some(test_credentials()),
                    "http://127.0.0.1:1/create.php",
                ))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/sign")
            .set_json(serde_json::json!({}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["folder"], "");
    }

    #[actix_web::test]
    async fn test_sign_unconfigured_is_server_error() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(None, "http://127.0.0.1:1/create.php"))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/sign")
            .set_json(serde_json::json!({"folder": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_sign_invalid_json_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(
                    Some(test_credentials()),
                    "http://127.0.0.1:1/create.php",
                ))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/sign")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_sign_rejects_get() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(
                    Some(test_credentials()),
                    "http://127.0.0.1:1/create.php",
                ))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/sign").to_request())
            .await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn test_shorten_missing_url() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(None, "http://127.0.0.1:1/create.php"))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/shorten")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_shorten_success() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/create.php"))
            .and(query_param("format", "json"))
            .and(query_param("url", "https://greet.example.com/card#data=abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"shorturl": "https://is.gd/xyz"})),
            )
            .mount(&upstream)
            .await;

        let endpoint = format!("{}/create.php", upstream.uri());
        let app = test::init_service(
            App::new()
                .app_data(state_with(None, &endpoint))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/shorten")
            .set_json(serde_json::json!({"url": "https://greet.example.com/card#data=abc"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["shorturl"], "https://is.gd/xyz");
        assert_eq!(body["fullurl"], "https://greet.example.com/card#data=abc");
    }

    #[actix_web::test]
    async fn test_shorten_upstream_error_is_bad_gateway() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/create.php"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&upstream)
            .await;

        let endpoint = format!("{}/create.php", upstream.uri());
        let app = test::init_service(
            App::new()
                .app_data(state_with(None, &endpoint))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/shorten")
            .set_json(serde_json::json!({"url": "https://greet.example.com/card#data=abc"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn test_shorten_upstream_soft_failure_is_bad_gateway() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/create.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"errorcode": 2, "errormessage": "Please specify a URL"}),
            ))
            .mount(&upstream)
            .await;

        let endpoint = format!("{}/create.php", upstream.uri());
        let app = test::init_service(
            App::new()
                .app_data(state_with(None, &endpoint))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/shorten")
            .set_json(serde_json::json!({"url": "https://greet.example.com/card#data=abc"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn test_shorten_unreachable_upstream_is_bad_gateway() {
        // Nothing listens on port 1
        let app = test::init_service(
            App::new()
                .app_data(state_with(None, "http://127.0.0.1:1/create.php"))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/shorten")
            .set_json(serde_json::json!({"url": "https://greet.example.com/card#data=abc"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
