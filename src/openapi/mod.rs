use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vendor PO",
        version = "0.1.0",
        description = r#"
# Vendor and Purchase-Order Records

Form-driven record keeping for vendors and the purchase orders placed with them.

## Writes

Creation, update and delete requests are HTML form posts
(`application/x-www-form-urlencoded`). A successful write answers `303 See Other`
pointing at the record's read endpoint. An incomplete or unparseable submission
answers `200 OK` with the unchanged form and saves nothing. Update forms apply only
the non-blank fields.

## Reads

Read endpoints answer JSON in the standard envelope:

```json
{
  "success": true,
  "data": { },
  "message": null,
  "errors": null,
  "meta": { "request_id": "...", "timestamp": "2024-01-01T00:00:00Z" }
}
```

Unknown vendor codes and purchase-order ids answer `404` with an error body.
"#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "vendors", description = "Vendor records"),
        (name = "purchase-orders", description = "Purchase orders and vendor filtering")
    ),
    paths(
        // Vendors
        crate::handlers::vendors::create_vendor,
        crate::handlers::vendors::get_vendor,
        crate::handlers::vendors::list_vendors,
        crate::handlers::vendors::delete_vendor,
        crate::handlers::vendors::update_vendor,

        // Purchase orders
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::list_purchase_orders_by_vendor,
        crate::handlers::purchase_orders::update_purchase_order,
        crate::handlers::purchase_orders::delete_purchase_order,
    ),
    components(
        schemas(
            crate::ResponseMeta,
            crate::handlers::common::FormFields,
            crate::entities::vendor::Model,
            crate::entities::purchase_order::Model,
            crate::services::purchase_orders::PurchaseOrderView,
            crate::services::purchase_orders::VendorFacet,
            crate::handlers::purchase_orders::PurchaseOrderListing,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Serves the generated document at `/api-docs/openapi.json`
pub fn openapi_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_form_and_read_endpoints() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("Vendor PO"));
        assert!(json.contains("/api/vendors/{vendor_code}"));
        assert!(json.contains("/api/purchase_orders/vendor/{vendor_key}"));
        assert!(json.contains("ErrorResponse"));
    }

    #[test]
    fn form_endpoints_document_urlencoded_bodies() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        for (path, method) in [
            ("/api/vendor/", "post"),
            ("/update/vendor/{vendor_code}/", "post"),
            ("/api/purchase_order/", "post"),
            ("/update/purchase_order/{po_id}", "post"),
        ] {
            let content = &doc["paths"][path][method]["requestBody"]["content"];
            assert!(
                content.get("application/x-www-form-urlencoded").is_some(),
                "{method} {path} has no form body: {content}"
            );
        }
        assert!(doc["components"]["schemas"].get("FormFields").is_some());
    }
}
