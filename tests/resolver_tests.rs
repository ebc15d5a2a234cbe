//! Resolver tests against a mock postcode service
//!
//! These tests verify:
//! - Found / not-found / malformed responses are classified correctly
//! - Blank queries never reach the network
//! - Transport failures consult the connectivity probe
//! - The response cache answers repeat lookups without a request

use httpmock::prelude::*;
use ngr_finder::connectivity::{NetworkState, StaticProbe};
use ngr_finder::resolver::{CachedLookup, LookupError, PostcodeLookup, PostcodesIoResolver};
use ngr_finder::lookup;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn resolver(base: &str, network: NetworkState) -> PostcodesIoResolver {
    PostcodesIoResolver::new(base, Duration::from_secs(2), Arc::new(StaticProbe(network)))
        .expect("resolver should build")
}

fn found_body() -> serde_json::Value {
    json!({
        "status": 200,
        "result": {
            "postcode": "SW1A 1AA",
            "eastings": 529090,
            "northings": 179645,
            "latitude": 51.501009,
            "longitude": -0.141588,
            "country": "England",
            "region": "London",
            "admin_district": "Westminster",
            "quality": 1
        }
    })
}

// =============================================================================
// Response classification
// =============================================================================

#[test]
fn test_found_postcode_returns_result() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/postcodes/SW1A1AA");
        then.status(200).json_body(found_body());
    });

    let result = resolver(&server.base_url(), NetworkState::Online)
        .resolve("SW1A 1AA")
        .expect("lookup should succeed");

    mock.assert();
    assert_eq!(result.eastings, Some(529_090.0));
    assert_eq!(result.northings, Some(179_645.0));
    assert_eq!(result.admin_district.as_deref(), Some("Westminster"));
}

#[test]
fn test_lowercase_input_is_normalized_in_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/postcodes/SW1A1AA");
        then.status(200).json_body(found_body());
    });

    let result = resolver(&server.base_url(), NetworkState::Online).resolve("  sw1a  1aa ");
    assert!(result.is_ok(), "Expected success, got: {result:?}");
    mock.assert();
}

#[test]
fn test_404_is_not_found_with_service_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/postcodes/ZZ11ZZ");
        then.status(404)
            .json_body(json!({ "status": 404, "error": "Postcode not found" }));
    });

    let err = resolver(&server.base_url(), NetworkState::Online)
        .resolve("ZZ1 1ZZ")
        .expect_err("lookup should fail");

    mock.assert();
    assert_eq!(
        err,
        LookupError::NotFound {
            postcode: "ZZ11ZZ".to_string(),
            message: "Postcode not found".to_string(),
        }
    );
}

#[test]
fn test_invalid_postcode_status_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/postcodes/NOTAPOSTCODE");
        then.status(404)
            .json_body(json!({ "status": 404, "error": "Invalid postcode" }));
    });

    let err = resolver(&server.base_url(), NetworkState::Online)
        .resolve("not a postcode")
        .expect_err("lookup should fail");
    assert!(matches!(err, LookupError::NotFound { .. }), "got {err:?}");
}

#[test]
fn test_malformed_body_is_connection_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/postcodes/SW1A1AA");
        then.status(502).body("<html>Bad Gateway</html>");
    });

    let err = resolver(&server.base_url(), NetworkState::Online)
        .resolve("SW1A 1AA")
        .expect_err("lookup should fail");
    assert!(matches!(err, LookupError::ConnectionFailed(_)), "got {err:?}");
}

#[test]
fn test_success_status_without_result_is_connection_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/postcodes/SW1A1AA");
        then.status(200).json_body(json!({ "status": 200, "result": null }));
    });

    let err = resolver(&server.base_url(), NetworkState::Online)
        .resolve("SW1A1AA")
        .expect_err("lookup should fail");
    assert!(matches!(err, LookupError::ConnectionFailed(_)), "got {err:?}");
}

// =============================================================================
// Blank input
// =============================================================================

#[test]
fn test_blank_queries_make_no_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(found_body());
    });

    let r = resolver(&server.base_url(), NetworkState::Online);
    assert_eq!(r.resolve(""), Err(LookupError::EmptyQuery));
    assert_eq!(r.resolve("   "), Err(LookupError::EmptyQuery));
    assert_eq!(r.resolve("\t\n"), Err(LookupError::EmptyQuery));
    assert_eq!(mock.calls(), 0);
}

// =============================================================================
// Transport failures
// =============================================================================

#[test]
fn test_unreachable_service_while_online_is_connection_failure() {
    // Port 1 is never listening
    let err = resolver("http://127.0.0.1:1", NetworkState::Online)
        .resolve("SW1A 1AA")
        .expect_err("lookup should fail");
    assert!(matches!(err, LookupError::ConnectionFailed(_)), "got {err:?}");
}

#[test]
fn test_unreachable_service_while_offline_is_offline() {
    let err = resolver("http://127.0.0.1:1", NetworkState::Offline)
        .resolve("SW1A 1AA")
        .expect_err("lookup should fail");
    assert_eq!(err, LookupError::Offline);
    assert!(err.user_message().contains("Previously cached results"));
}

#[test]
fn test_probe_not_consulted_for_service_answers() {
    // An offline probe must not turn a real 404 into Offline
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/postcodes/ZZ11ZZ");
        then.status(404)
            .json_body(json!({ "status": 404, "error": "Postcode not found" }));
    });

    let err = resolver(&server.base_url(), NetworkState::Offline)
        .resolve("ZZ11ZZ")
        .expect_err("lookup should fail");
    assert!(matches!(err, LookupError::NotFound { .. }), "got {err:?}");
}

// =============================================================================
// Response cache
// =============================================================================

#[test]
fn test_cache_hit_skips_network() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/postcodes/SW1A1AA");
        then.status(200).json_body(found_body());
    });

    let cached = CachedLookup::new(
        resolver(&server.base_url(), NetworkState::Online),
        100,
        Duration::from_secs(60),
    );

    let first = cached.resolve("SW1A 1AA").expect("first lookup");
    // Different spelling, same normalized key
    let second = cached.resolve("sw1a1aa").expect("second lookup");

    assert_eq!(first, second);
    assert_eq!(mock.calls(), 1);
    assert_eq!(cached.cached_entries(), 1);
}

#[test]
fn test_failures_are_not_cached() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/postcodes/ZZ11ZZ");
        then.status(404)
            .json_body(json!({ "status": 404, "error": "Postcode not found" }));
    });

    let cached = CachedLookup::new(
        resolver(&server.base_url(), NetworkState::Online),
        100,
        Duration::from_secs(60),
    );

    assert!(cached.resolve("ZZ1 1ZZ").is_err());
    assert!(cached.resolve("ZZ1 1ZZ").is_err());
    assert_eq!(mock.calls(), 2);
    assert_eq!(cached.cached_entries(), 0);
}

#[test]
fn test_cached_result_survives_going_offline() {
    let server = MockServer::start();
    let mut mock = server.mock(|when, then| {
        when.method(GET).path("/postcodes/SW1A1AA");
        then.status(200).json_body(found_body());
    });

    let cached = CachedLookup::new(
        resolver(&server.base_url(), NetworkState::Online),
        100,
        Duration::from_secs(60),
    );
    assert!(cached.resolve("SW1A 1AA").is_ok());

    // Service disappears; the cached record is still served
    mock.delete();
    assert!(cached.resolve("SW1A 1AA").is_ok());
}

// =============================================================================
// Full pipeline over HTTP
// =============================================================================

#[test]
fn test_lookup_pipeline_over_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/postcodes/SW1A1AA");
        then.status(200).json_body(found_body());
    });

    let r = resolver(&server.base_url(), NetworkState::Online);
    let record = lookup(&r, "SW1A 1AA", 10).expect("pipeline should succeed");

    assert_eq!(record.ngr_formatted, "TQ 29090 79645");
    assert_eq!(record.geo_lat, Some(51.501_009));
    assert_eq!(record.geo_lon, Some(-0.141_588));
    assert_eq!(record.latitude, Some(51.501_009));

    let json = serde_json::to_value(&record).expect("record serializes");
    assert_eq!(json["ngrFormatted"], "TQ 29090 79645");
    assert_eq!(json["adminDistrict"], "Westminster");
}
