use cloud_dav_rs::{DavError, ErrorKind, NormalizedError, classify_exchange, codes};
use hyper::StatusCode;

const SABRE_NOT_FOUND: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:error xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns">
  <s:exception>Sabre\DAV\Exception\NotFound</s:exception>
  <s:message>File with name missing.txt could not be located</s:message>
</d:error>"#;

#[test]
fn transport_failure_wins_over_status() {
    let err = classify_exchange(
        Some(DavError::timed_out()),
        Some(StatusCode::INTERNAL_SERVER_ERROR),
        b"boom",
    )
    .expect_err("transport failure");

    assert_eq!(err.code(), codes::TIMED_OUT);
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn success_status_is_ok() {
    for status in [StatusCode::OK, StatusCode::CREATED, StatusCode::MULTI_STATUS] {
        classify_exchange(None, Some(status), b"").expect("2xx is success");
    }
}

#[test]
fn sabre_message_becomes_the_description() {
    let err = classify_exchange(None, Some(StatusCode::NOT_FOUND), SABRE_NOT_FOUND.as_bytes())
        .expect_err("404");

    assert_eq!(err.code(), 404);
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.to_string(), "File with name missing.txt could not be located");
}

#[test]
fn sabre_message_entities_are_resolved() {
    let body = r#"<d:error xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns"><s:message>File &quot;Q&amp;A.txt&quot; is locked &#8211; retry</s:message></d:error>"#;
    let err = classify_exchange(None, Some(StatusCode::LOCKED), body.as_bytes()).expect_err("423");

    assert_eq!(err.to_string(), "File \"Q&A.txt\" is locked \u{2013} retry");
}

#[test]
fn sabre_exception_is_the_fallback() {
    let body = r#"<d:error xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns"><s:exception>Sabre\DAV\Exception\Forbidden</s:exception></d:error>"#;
    let err = DavError::protocol(StatusCode::FORBIDDEN, body.as_bytes());

    assert_eq!(err.to_string(), r"Sabre\DAV\Exception\Forbidden");
}

#[test]
fn ocs_meta_message_becomes_the_description() {
    let body = br#"{"ocs":{"meta":{"status":"failure","statuscode":403,"message":"Editing not allowed"},"data":[]}}"#;
    let err = classify_exchange(None, Some(StatusCode::FORBIDDEN), body).expect_err("403");

    assert_eq!(err.code(), 403);
    assert_eq!(err.to_string(), "Editing not allowed");
}

#[test]
fn unrecognised_body_falls_back_to_the_status_phrase() {
    let err = DavError::protocol(StatusCode::NOT_FOUND, b"<html>nope</html>");
    assert_eq!(err.to_string(), "not found");

    let err = DavError::protocol(StatusCode::SERVICE_UNAVAILABLE, b"");
    assert_eq!(err.to_string(), "service unavailable");
    assert_eq!(err.code(), 503);
}

#[test]
fn missing_exchange_cannot_be_parsed() {
    let err = classify_exchange(None, None, b"").expect_err("no response");
    assert_eq!(err.code(), codes::CANNOT_PARSE_RESPONSE);
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn normalized_view_of_outcomes() {
    let ok: Result<(), DavError> = Ok(());
    let success = NormalizedError::from_result(&ok);
    assert_eq!(success, NormalizedError { code: 0, description: String::new() });
    assert!(success.is_success());

    let failed: Result<(), DavError> = Err(DavError::MissingBody);
    let normalized = NormalizedError::from_result(&failed);
    assert_eq!(normalized.code, codes::BAD_SERVER_RESPONSE);
    assert_eq!(normalized.description, "Invalid response, error decode XML");
    assert!(!normalized.is_success());
}

#[test]
fn structural_errors_have_fixed_codes() {
    assert_eq!(DavError::bad_url("x").code(), codes::BAD_URL);
    assert_eq!(DavError::bad_url("x").kind(), ErrorKind::Structural);
    assert_eq!(DavError::InvalidDate.code(), codes::BAD_SERVER_RESPONSE);
    assert_eq!(DavError::Encoding("bad".into()).code(), codes::CANNOT_ENCODE_REQUEST);
    assert_eq!(DavError::undecodable("gzip").code(), codes::CANNOT_DECODE_CONTENT);
}
