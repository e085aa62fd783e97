use super::common::{
    parse_float, parse_json, parse_number, parse_timestamp, redisplay_on_invalid, see_other,
    success_response, FieldError, FormFields,
};
use super::forms;
use crate::{
    entities::purchase_order,
    errors::ServiceError,
    handlers::AppState,
    services::purchase_orders::{
        NewPurchaseOrder, PurchaseOrderPatch, VendorFacet, VendorFilter,
    },
};
use axum::{
    extract::{Form, Path, State},
    response::{Html, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

/// Purchase-order listing together with the vendor filter choices
#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseOrderListing {
    pub purchase_orders: Vec<purchase_order::Model>,
    /// Vendors referenced by any purchase order
    pub vendors: Vec<VendorFacet>,
    /// The applied filter, `All` when unfiltered
    pub selected_vendor: String,
}

fn new_purchase_order_from(form: &FormFields) -> Result<NewPurchaseOrder, FieldError> {
    Ok(NewPurchaseOrder {
        vendor_code: form.required_text("vendor_code")?,
        items: form.required("items", parse_json)?,
        order_date: form.required("order_date", parse_timestamp)?,
        delivery_date: form.required("delivery_date", parse_timestamp)?,
        issue_date: form.required("issue_date", parse_timestamp)?,
        quantity: form.required("quantity", parse_number)?,
        status: form.required_text("status")?,
        quality_rating: form.optional("quality_rating", parse_float)?,
        acknowledgment_date: form.optional("acknowledgment_date", parse_timestamp)?,
    })
}

fn purchase_order_patch_from(form: &FormFields) -> Result<PurchaseOrderPatch, FieldError> {
    Ok(PurchaseOrderPatch {
        vendor_code: form.text("vendor_code"),
        order_date: form.optional("order_date", parse_timestamp)?,
        items: form.optional("items", parse_json)?,
        quantity: form.optional("quantity", parse_number)?,
        status: form.text("status"),
    })
}

/// Purchase-order creation form
pub async fn new_purchase_order_form() -> Html<&'static str> {
    Html(forms::NEW_PURCHASE_ORDER)
}

/// Create a purchase order
#[utoipa::path(
    post,
    path = "/api/purchase_order/",
    request_body(content = FormFields, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Purchase order created, redirect to its record"),
        (status = 200, description = "Invalid submission, form redisplayed", body = String, content_type = "text/html")
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> Result<Response, ServiceError> {
    let result = async {
        let input = new_purchase_order_from(&form)?;
        let po_id = state.services.purchase_orders.create(input).await?;
        Ok::<_, ServiceError>(see_other(&format!("/api/purchase_order/{po_id}")))
    }
    .await;

    redisplay_on_invalid(result, forms::NEW_PURCHASE_ORDER)
}

/// Get a purchase order by id, with its vendor's name
#[utoipa::path(
    get,
    path = "/api/purchase_order/{po_id}",
    params(("po_id" = String, Path, description = "Purchase order id")),
    responses(
        (status = 200, description = "Purchase order fetched, in the response envelope", body = crate::services::purchase_orders::PurchaseOrderView),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<String>,
) -> Result<Response, ServiceError> {
    let view = state.services.purchase_orders.get_view(&po_id).await?;
    Ok(success_response(view))
}

async fn listing(state: &AppState, filter: VendorFilter) -> Result<Response, ServiceError> {
    let purchase_orders = state
        .services
        .purchase_orders
        .list_by_vendor(&filter)
        .await?;
    let vendors = state.services.purchase_orders.vendor_facets().await?;

    Ok(success_response(PurchaseOrderListing {
        purchase_orders,
        vendors,
        selected_vendor: filter.as_str().to_string(),
    }))
}

/// List all purchase orders
#[utoipa::path(
    get,
    path = "/api/purchase_orders/",
    responses(
        (status = 200, description = "Purchase orders listed, in the response envelope", body = PurchaseOrderListing)
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
) -> Result<Response, ServiceError> {
    listing(&state, VendorFilter::All).await
}

/// List purchase orders for one vendor code, or every order for `All`
#[utoipa::path(
    get,
    path = "/api/purchase_orders/vendor/{vendor_key}",
    params(("vendor_key" = String, Path, description = "Vendor code, or `All`")),
    responses(
        (status = 200, description = "Purchase orders listed, in the response envelope", body = PurchaseOrderListing)
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders_by_vendor(
    State(state): State<AppState>,
    Path(vendor_key): Path<String>,
) -> Result<Response, ServiceError> {
    listing(&state, VendorFilter::parse(&vendor_key)).await
}

/// Update form for an existing purchase order
pub async fn update_purchase_order_form(
    State(state): State<AppState>,
    Path(po_id): Path<String>,
) -> Result<Html<&'static str>, ServiceError> {
    state.services.purchase_orders.get(&po_id).await?;
    Ok(Html(forms::UPDATE_PURCHASE_ORDER))
}

/// Patch a purchase order with the non-blank submitted fields
#[utoipa::path(
    post,
    path = "/update/purchase_order/{po_id}",
    params(("po_id" = String, Path, description = "Purchase order id")),
    request_body(content = FormFields, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Purchase order updated, redirect to its record"),
        (status = 200, description = "Invalid submission, form redisplayed", body = String, content_type = "text/html"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<String>,
    Form(form): Form<FormFields>,
) -> Result<Response, ServiceError> {
    let result = async {
        let patch = purchase_order_patch_from(&form)?;
        let po = state.services.purchase_orders.update(&po_id, patch).await?;
        info!(po_id = %po.po_id, "Purchase order patched via form");
        Ok::<_, ServiceError>(see_other(&format!("/api/purchase_order/{}", po.po_id)))
    }
    .await;

    redisplay_on_invalid(result, forms::UPDATE_PURCHASE_ORDER)
}

/// Delete a purchase order
#[utoipa::path(
    post,
    path = "/delete/purchase_order/{po_id}",
    params(("po_id" = String, Path, description = "Purchase order id")),
    responses(
        (status = 303, description = "Purchase order deleted, redirect to the listing"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<String>,
) -> Result<Response, ServiceError> {
    state.services.purchase_orders.delete(&po_id).await?;
    Ok(see_other("/api/purchase_orders/"))
}

/// Purchase-order routes, merged at the application root
pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/purchase/", get(new_purchase_order_form))
        .route("/api/purchase_order/", post(create_purchase_order))
        .route("/api/purchase_order/{po_id}", get(get_purchase_order))
        .route("/api/purchase_orders/", get(list_purchase_orders))
        .route(
            "/api/purchase_orders/vendor/{vendor_key}",
            get(list_purchase_orders_by_vendor),
        )
        .route(
            "/update/purchase_order/{po_id}",
            get(update_purchase_order_form).post(update_purchase_order),
        )
        .route("/delete/purchase_order/{po_id}", post(delete_purchase_order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::common::FieldErrorKind;
    use rstest::rstest;
    use serde_json::json;

    fn complete_form() -> Vec<(&'static str, &'static str)> {
        vec![
            ("vendor_code", "AAAAAAAAAAAA"),
            ("items", r#"[{"sku":"X"}]"#),
            ("order_date", "2024-05-01T09:30"),
            ("delivery_date", "2024-05-10T09:30"),
            ("issue_date", "2024-05-02T09:30"),
            ("quantity", "5"),
            ("status", "open"),
        ]
    }

    #[test]
    fn complete_form_parses() {
        let form: FormFields = complete_form().into_iter().collect();
        let input = new_purchase_order_from(&form).unwrap();

        assert_eq!(input.items, json!([{ "sku": "X" }]));
        assert_eq!(input.quantity, 5);
        assert_eq!(input.quality_rating, None);
        assert_eq!(input.acknowledgment_date, None);
    }

    #[rstest]
    #[case("vendor_code")]
    #[case("items")]
    #[case("order_date")]
    #[case("delivery_date")]
    #[case("issue_date")]
    #[case("quantity")]
    #[case("status")]
    fn each_required_field_is_enforced(#[case] missing: &str) {
        let form: FormFields = complete_form()
            .into_iter()
            .filter(|(name, _)| *name != missing)
            .collect();

        let err = new_purchase_order_from(&form).unwrap_err();
        assert_eq!(err.field, missing);
        assert_eq!(err.kind, FieldErrorKind::Missing);
    }

    #[rstest]
    #[case("items", "not json")]
    #[case("quantity", "5.5")]
    #[case("order_date", "someday")]
    fn unparseable_values_are_invalid(#[case] field: &str, #[case] value: &'static str) {
        let form: FormFields = complete_form()
            .into_iter()
            .map(|(name, v)| if name == field { (name, value) } else { (name, v) })
            .collect();

        let err = new_purchase_order_from(&form).unwrap_err();
        assert_eq!(err.field, field);
        assert_eq!(err.kind, FieldErrorKind::Invalid);
    }

    #[test]
    fn patch_only_carries_submitted_fields() {
        let form: FormFields = [("status", "shipped"), ("items", ""), ("quantity", "9")]
            .into_iter()
            .collect();
        let patch = purchase_order_patch_from(&form).unwrap();

        assert_eq!(patch.status.as_deref(), Some("shipped"));
        assert_eq!(patch.quantity, Some(9));
        assert_eq!(patch.items, None);
        assert_eq!(patch.vendor_code, None);
        assert_eq!(patch.order_date, None);
    }
}
