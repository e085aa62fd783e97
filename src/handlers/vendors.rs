use super::common::{
    parse_float, redisplay_on_invalid, see_other, success_response, FieldError, FormFields,
};
use super::forms;
use crate::{
    errors::ServiceError,
    handlers::AppState,
    services::vendors::{NewVendor, VendorPatch, VendorPerformance},
};
use axum::{
    extract::{Form, Path, State},
    response::{Html, Response},
    routing::{get, post},
    Router,
};
use tracing::info;

fn new_vendor_from(form: &FormFields) -> Result<NewVendor, FieldError> {
    let defaults = VendorPerformance::default();
    Ok(NewVendor {
        name: form.required_text("name")?,
        contact_details: form.required_text("contact")?,
        address: form.required_text("address")?,
        performance: VendorPerformance {
            on_time_delivery_rate: form
                .optional("on_time_delivery_rate", parse_float)?
                .unwrap_or(defaults.on_time_delivery_rate),
            quality_rating_avg: form
                .optional("quality_rating_avg", parse_float)?
                .unwrap_or(defaults.quality_rating_avg),
            average_response_time: form
                .optional("average_response_time", parse_float)?
                .unwrap_or(defaults.average_response_time),
            fulfillment_rate: form
                .optional("fulfillment_rate", parse_float)?
                .unwrap_or(defaults.fulfillment_rate),
        },
    })
}

fn vendor_patch_from(form: &FormFields) -> Result<VendorPatch, FieldError> {
    Ok(VendorPatch {
        name: form.text("name"),
        contact_details: form.text("contact"),
        address: form.text("address"),
        on_time_delivery_rate: form.optional("on_time_delivery_rate", parse_float)?,
        quality_rating_avg: form.optional("quality_rating_avg", parse_float)?,
        average_response_time: form.optional("average_response_time", parse_float)?,
        fulfillment_rate: form.optional("fulfillment_rate", parse_float)?,
    })
}

/// Vendor registration form
pub async fn new_vendor_form() -> Html<&'static str> {
    Html(forms::NEW_VENDOR)
}

/// Register a vendor
#[utoipa::path(
    post,
    path = "/api/vendor/",
    request_body(content = FormFields, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Vendor created, redirect to its record"),
        (status = 200, description = "Invalid submission, form redisplayed", body = String, content_type = "text/html")
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> Result<Response, ServiceError> {
    let result = async {
        let input = new_vendor_from(&form)?;
        let vendor_code = state.services.vendors.create(input).await?;
        Ok::<_, ServiceError>(see_other(&format!("/api/vendors/{vendor_code}")))
    }
    .await;

    redisplay_on_invalid(result, forms::NEW_VENDOR)
}

/// Get a vendor by code
#[utoipa::path(
    get,
    path = "/api/vendors/{vendor_code}",
    params(("vendor_code" = String, Path, description = "Vendor code")),
    responses(
        (status = 200, description = "Vendor fetched, in the response envelope", body = crate::entities::vendor::Model),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_code): Path<String>,
) -> Result<Response, ServiceError> {
    let vendor = state.services.vendors.get(&vendor_code).await?;
    Ok(success_response(vendor))
}

/// List all vendors
#[utoipa::path(
    get,
    path = "/api/vendors/",
    responses(
        (status = 200, description = "Vendors listed, in the response envelope", body = Vec<crate::entities::vendor::Model>)
    ),
    tag = "vendors"
)]
pub async fn list_vendors(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let vendors = state.services.vendors.list_all().await?;
    Ok(success_response(vendors))
}

/// Delete a vendor; its purchase orders stay
#[utoipa::path(
    post,
    path = "/api/vendor/{vendor_code}",
    params(("vendor_code" = String, Path, description = "Vendor code")),
    responses(
        (status = 303, description = "Vendor deleted, redirect to the listing"),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(vendor_code): Path<String>,
) -> Result<Response, ServiceError> {
    state.services.vendors.delete(&vendor_code).await?;
    Ok(see_other("/api/vendors/"))
}

/// Update form for an existing vendor
pub async fn update_vendor_form(
    State(state): State<AppState>,
    Path(vendor_code): Path<String>,
) -> Result<Html<&'static str>, ServiceError> {
    state.services.vendors.get(&vendor_code).await?;
    Ok(Html(forms::UPDATE_VENDOR))
}

/// Patch a vendor with the non-blank submitted fields
#[utoipa::path(
    post,
    path = "/update/vendor/{vendor_code}/",
    params(("vendor_code" = String, Path, description = "Vendor code")),
    request_body(content = FormFields, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Vendor updated, redirect to its record"),
        (status = 200, description = "Invalid submission, form redisplayed", body = String, content_type = "text/html"),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_code): Path<String>,
    Form(form): Form<FormFields>,
) -> Result<Response, ServiceError> {
    let result = async {
        let patch = vendor_patch_from(&form)?;
        let vendor = state.services.vendors.update(&vendor_code, patch).await?;
        info!(vendor_code = %vendor.vendor_code, "Vendor patched via form");
        Ok::<_, ServiceError>(see_other(&format!(
            "/api/vendors/{}",
            vendor.vendor_code
        )))
    }
    .await;

    redisplay_on_invalid(result, forms::UPDATE_VENDOR)
}

/// Vendor routes, merged at the application root
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(new_vendor_form))
        .route("/api/vendor/", post(create_vendor))
        .route("/api/vendor/{vendor_code}", post(delete_vendor))
        .route("/api/vendors/", get(list_vendors))
        .route("/api/vendors/{vendor_code}", get(get_vendor))
        .route(
            "/update/vendor/{vendor_code}/",
            get(update_vendor_form).post(update_vendor),
        )
}
