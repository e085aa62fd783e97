//! Form extraction and the redirect-or-redisplay response helpers shared by handlers.

use crate::errors::ServiceError;
use crate::ApiResponse;
use axum::{
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use utoipa::ToSchema;

/// Accepted layouts for naive (zone-less) timestamps; interpreted as UTC
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    Missing,
    Invalid,
}

/// A form field that is absent or cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FieldErrorKind::Missing => write!(f, "{} is required", self.field),
            FieldErrorKind::Invalid => write!(f, "{} is not valid", self.field),
        }
    }
}

impl From<FieldError> for ServiceError {
    fn from(err: FieldError) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

/// Submitted `application/x-www-form-urlencoded` fields
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    fn present(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Submitted value as sent, `None` when absent or blank
    pub fn text(&self, field: &str) -> Option<String> {
        self.present(field).map(str::to_string)
    }

    pub fn required_text(&self, field: &'static str) -> Result<String, FieldError> {
        self.text(field).ok_or(FieldError {
            field,
            kind: FieldErrorKind::Missing,
        })
    }

    /// Parsed value when present; blank counts as absent
    pub fn optional<T>(
        &self,
        field: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>, FieldError> {
        match self.present(field) {
            None => Ok(None),
            Some(raw) => parse(raw.trim()).map(Some).ok_or(FieldError {
                field,
                kind: FieldErrorKind::Invalid,
            }),
        }
    }

    pub fn required<T>(
        &self,
        field: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, FieldError> {
        self.optional(field, parse)?.ok_or(FieldError {
            field,
            kind: FieldErrorKind::Missing,
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FormFields(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

pub fn parse_number<T: FromStr>(raw: &str) -> Option<T> {
    raw.parse().ok()
}

/// Finite floats only; `NaN` and the infinities are rejected
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_json(raw: &str) -> Option<serde_json::Value> {
    serde_json::from_str(raw).ok()
}

/// RFC 3339, HTML `datetime-local`, `YYYY-MM-DD HH:MM[:SS]` or a bare date
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    Json(ApiResponse::success(data)).into_response()
}

/// 303 to the canonical GET endpoint
pub fn see_other(location: &str) -> Response {
    Redirect::to(location).into_response()
}

/// Re-presents the unchanged form with a 200 status
pub fn redisplay_form(form: &'static str, reason: &str) -> Response {
    debug!(reason, "form submission rejected");
    Html(form).into_response()
}

/// Turns validation failures into a redisplayed form; other errors pass through
pub fn redisplay_on_invalid(
    result: Result<Response, ServiceError>,
    form: &'static str,
) -> Result<Response, ServiceError> {
    match result {
        Err(ServiceError::ValidationError(reason)) => Ok(redisplay_form(form, &reason)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2024-05-01T10:00:00Z", Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())]
    #[case("2024-05-01T12:00:00+02:00", Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())]
    #[case("2024-05-01T10:00", Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())]
    #[case("2024-05-01T10:00:30", Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 30).unwrap())]
    #[case("2024-05-01 10:00:30", Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 30).unwrap())]
    #[case("2024-05-01", Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())]
    fn parse_timestamp_accepts_common_layouts(#[case] raw: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_timestamp(raw), Some(expected));
    }

    #[rstest]
    #[case("yesterday")]
    #[case("2024-13-01")]
    #[case("01/05/2024")]
    fn parse_timestamp_rejects_garbage(#[case] raw: &str) {
        assert_eq!(parse_timestamp(raw), None);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let form: FormFields = [("name", "  "), ("status", " open \n")].into_iter().collect();

        assert_eq!(form.text("name"), None);
        assert_eq!(form.text("status").as_deref(), Some(" open \n"));
        assert_eq!(
            form.required_text("name"),
            Err(FieldError {
                field: "name",
                kind: FieldErrorKind::Missing
            })
        );
    }

    #[test]
    fn unparseable_values_are_invalid_and_blank_optionals_are_none() {
        let form: FormFields = [("quantity", "five"), ("quality_rating", "")]
            .into_iter()
            .collect();

        assert_eq!(
            form.required("quantity", parse_number::<i32>),
            Err(FieldError {
                field: "quantity",
                kind: FieldErrorKind::Invalid
            })
        );
        assert_eq!(form.optional("quality_rating", parse_number::<f64>), Ok(None));
    }

    #[test]
    fn parsed_values_ignore_surrounding_whitespace() {
        let form: FormFields = [("quantity", " 7 "), ("quality_rating", "4.5\n")]
            .into_iter()
            .collect();

        assert_eq!(form.required("quantity", parse_number::<i32>), Ok(7));
        assert_eq!(form.optional("quality_rating", parse_float), Ok(Some(4.5)));
    }

    #[rstest]
    #[case("0.95", Some(0.95))]
    #[case("-3", Some(-3.0))]
    #[case("1e3", Some(1000.0))]
    #[case("NaN", None)]
    #[case("nan", None)]
    #[case("inf", None)]
    #[case("-inf", None)]
    #[case("Infinity", None)]
    #[case("1e999", None)]
    fn parse_float_accepts_only_finite_values(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_float(raw), expected);
    }

    #[test]
    fn non_finite_ratings_are_invalid() {
        let form: FormFields = [("quality_rating", "NaN")].into_iter().collect();
        assert_eq!(
            form.optional("quality_rating", parse_float),
            Err(FieldError {
                field: "quality_rating",
                kind: FieldErrorKind::Invalid
            })
        );
    }

    #[test]
    fn validation_errors_redisplay_the_form_with_200() {
        let response = redisplay_on_invalid(
            Err(ServiceError::ValidationError("name is required".into())),
            "<form></form>",
        )
        .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let passed = redisplay_on_invalid(
            Err(ServiceError::NotFound("vendor x".into())),
            "<form></form>",
        );
        assert!(matches!(passed, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn field_errors_become_validation_errors() {
        let err: ServiceError = FieldError {
            field: "items",
            kind: FieldErrorKind::Missing,
        }
        .into();
        assert!(matches!(err, ServiceError::ValidationError(msg) if msg == "items is required"));
    }
}
