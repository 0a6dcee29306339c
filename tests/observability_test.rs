use axum::http::{HeaderMap, HeaderValue};
use ledger_intake::infrastructure::observability::{
    MAX_REQUEST_ID_LEN, REQUEST_ID_HEADER, RequestId, TracingConfig, sanitize_for_log,
};

fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn given_well_formed_header_when_reading_request_id_then_keeps_caller_value() {
    let id = RequestId::from_headers(&headers_with("  batch-42  "));
    assert_eq!(id.as_str(), "batch-42");
}

#[test]
fn given_missing_header_when_reading_request_id_then_generates_uuid() {
    let id = RequestId::from_headers(&HeaderMap::new());
    assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
}

#[test]
fn given_oversized_or_spaced_header_when_reading_request_id_then_replaces_it() {
    let long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
    let replaced = RequestId::from_headers(&headers_with(&long));
    assert_ne!(replaced.as_str(), long);

    let spaced = RequestId::from_headers(&headers_with("two words"));
    assert!(uuid::Uuid::parse_str(spaced.as_str()).is_ok());
}

#[test]
fn given_default_tracing_config_when_building_filter_then_enables_crate_debug() {
    let config = TracingConfig::default();
    assert_eq!(
        config.default_directives(),
        "info,ledger_intake=debug,tower_http=debug"
    );
    assert!(!config.json_format);
}

#[test]
fn given_uppercase_level_when_building_filter_then_lowercases_it() {
    let config = TracingConfig {
        level: "WARN".to_string(),
        ..TracingConfig::default()
    };
    assert!(config.default_directives().starts_with("warn,"));
}

#[test]
fn given_api_key_in_text_when_sanitizing_then_redacts_value() {
    assert_eq!(
        sanitize_for_log("url?api_key=secret123&x=1"),
        "url?api_key=[REDACTED]&x=1"
    );
}
