#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use vendor_po::{config::AppConfig, db::Database, AppState};

/// Helper harness for spinning up the application against an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("failed to open in-memory database");
        let state = AppState::new(db, AppConfig::in_memory());
        let router = vendor_po::app(state.clone());

        Self { router, state }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("failed to build request");
        self.send(request).await
    }

    /// POST an `application/x-www-form-urlencoded` body
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = fields
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("failed to build request");
        self.send(request).await
    }

    /// Registers a vendor through the form endpoint and returns its code
    pub async fn create_vendor(&self, name: &str) -> String {
        let response = self
            .post_form(
                "/api/vendor/",
                &[
                    ("name", name),
                    ("contact", "sales@example.com"),
                    ("address", "1 Main St"),
                ],
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        trailing_segment(&location(&response), "/api/vendors/")
    }

    /// Creates a purchase order through the form endpoint and returns its id
    pub async fn create_purchase_order(&self, vendor_code: &str) -> String {
        let mut fields = purchase_order_form();
        fields[0] = ("vendor_code", vendor_code);
        let response = self.post_form("/api/purchase_order/", &fields).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        trailing_segment(&location(&response), "/api/purchase_order/")
    }
}

/// A complete purchase-order submission; `vendor_code` comes first
pub fn purchase_order_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("vendor_code", "AAAAAAAAAAAA"),
        ("items", r#"[{"sku":"X","qty":5}]"#),
        ("order_date", "2024-05-01T09:30"),
        ("delivery_date", "2024-05-10T09:30"),
        ("issue_date", "2024-05-02T09:30"),
        ("quantity", "5"),
        ("status", "open"),
    ]
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect without location")
        .to_str()
        .expect("non-ascii location")
        .to_string()
}

fn trailing_segment(location: &str, prefix: &str) -> String {
    location
        .strip_prefix(prefix)
        .unwrap_or_else(|| panic!("unexpected redirect target {location}"))
        .to_string()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body")
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body is not json")
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("body is not utf-8")
}
