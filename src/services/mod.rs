// Record stores
pub mod purchase_orders;
pub mod vendors;

use validator::ValidationError;

/// Rejects values that are empty once surrounding whitespace is removed
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Rejects `Some("")` / `Some("  ")` in patches; `None` means "leave as is"
pub(crate) fn check_patch_text(
    field: &'static str,
    value: Option<&String>,
) -> Result<(), crate::errors::ServiceError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(crate::errors::ServiceError::ValidationError(
            format!("{field} must not be blank"),
        )),
        _ => Ok(()),
    }
}
