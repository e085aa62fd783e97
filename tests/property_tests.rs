//! Property-based tests for form parsing and vendor filtering.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use vendor_po::handlers::common::{parse_number, parse_timestamp, FieldErrorKind, FormFields};
use vendor_po::services::purchase_orders::{VendorFilter, ALL_VENDORS};

fn timestamp_strategy() -> impl Strategy<Value = i64> {
    // 1970-01-01 .. 2100-01-01, whole seconds
    0i64..4_102_444_800
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn rfc3339_timestamps_parse_to_the_same_instant(secs in timestamp_strategy()) {
        let instant = Utc.timestamp_opt(secs, 0).unwrap();
        prop_assert_eq!(parse_timestamp(&instant.to_rfc3339()), Some(instant));
    }

    #[test]
    fn datetime_local_inputs_are_read_as_utc(secs in timestamp_strategy()) {
        let instant = Utc.timestamp_opt(secs - secs % 60, 0).unwrap();
        let raw = instant.format("%Y-%m-%dT%H:%M").to_string();
        prop_assert_eq!(parse_timestamp(&raw), Some(instant));
    }

    #[test]
    fn whitespace_only_values_count_as_missing(blank in "[ \t]{0,8}") {
        let form: FormFields = [("status", blank.as_str())].into_iter().collect();
        let err = form.required_text("status").unwrap_err();
        prop_assert_eq!(err.kind, FieldErrorKind::Missing);
    }

    #[test]
    fn quantities_accept_any_i32(n in any::<i32>()) {
        let form: FormFields = [("quantity", n.to_string())].into_iter().collect();
        prop_assert_eq!(form.required("quantity", parse_number::<i32>), Ok(n));
    }

    #[test]
    fn vendor_filter_only_treats_exact_sentinel_as_all(key in "[A-Za-z0-9]{1,12}") {
        let filter = VendorFilter::parse(&key);
        prop_assert_eq!(filter.as_str(), key.as_str());
        prop_assert_eq!(filter == VendorFilter::All, key == ALL_VENDORS);
    }
}
