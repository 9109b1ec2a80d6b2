use std::path::PathBuf;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use cloud_dav_rs::files::requests;
use cloud_dav_rs::files::{LiteralSearch, href_to_path};
use cloud_dav_rs::{Depth, RequestBody, RequestOptions};

use crate::support::context;

#[test]
fn depth_one_always_targets_a_collection() {
    let ctx = context();
    let opts = RequestOptions::default();

    for path in ["Photos", "Photos/", "/Photos"] {
        let req = requests::read_file_or_folder(&ctx, &opts, path, Depth::One, None)
            .expect("request builds");
        assert_eq!(req.method.as_str(), "PROPFIND");
        assert_eq!(req.uri.path(), "/remote.php/dav/files/alice/Photos/");
        assert_eq!(req.header_str("depth"), Some("1"));
        assert_eq!(req.header_str("content-type"), Some("application/xml"));
    }
}

#[test]
fn depth_zero_never_ends_with_a_separator() {
    let ctx = context();
    let opts = RequestOptions::default();

    for path in ["Photos", "Photos/", "Photos//"] {
        let req = requests::read_file_or_folder(&ctx, &opts, path, Depth::Zero, None)
            .expect("request builds");
        assert_eq!(req.uri.path(), "/remote.php/dav/files/alice/Photos");
        assert_eq!(req.header_str("depth"), Some("0"));
    }
}

#[test]
fn request_path_round_trips_through_the_echoed_href() {
    let ctx = context();
    let opts = RequestOptions::default();
    let req = requests::read_file_or_folder(&ctx, &opts, "My Docs/Q#1", Depth::One, None)
        .expect("request builds");

    assert_eq!(req.uri.path(), "/remote.php/dav/files/alice/My%20Docs/Q%231/");
    let echoed = href_to_path(req.uri.path());
    assert_eq!(
        echoed.trim_end_matches('/'),
        ctx.files_path("My Docs/Q#1").trim_end_matches('/')
    );
}

#[test]
fn propfind_uses_the_default_or_the_supplied_body() {
    let ctx = context();
    let opts = RequestOptions::default();

    let default = requests::read_file_or_folder(&ctx, &opts, "", Depth::One, None)
        .expect("request builds");
    assert!(default.body_str().expect("xml body").contains("<d:getetag/>"));
    assert_eq!(default.uri.path(), "/remote.php/dav/files/alice/");

    let custom = "<d:propfind xmlns:d=\"DAV:\"><d:allprop/></d:propfind>";
    let req = requests::read_file_or_folder(&ctx, &opts, "", Depth::Zero, Some(custom))
        .expect("request builds");
    assert_eq!(req.body_str(), Some(custom));
}

#[test]
fn standard_headers_carry_auth_and_agent() {
    let ctx = context();
    let req = requests::delete(&ctx, &RequestOptions::default(), "old.txt").expect("request builds");

    assert_eq!(req.method.as_str(), "DELETE");
    assert_eq!(req.header_str("authorization"), Some("Basic YWxpY2U6c2VjcmV0"));
    assert_eq!(req.header_str("ocs-apirequest"), Some("true"));
    let agent = req.header_str("user-agent").expect("user agent set");
    assert!(agent.starts_with("cloud-dav-rs/"));
    assert_eq!(req.body, RequestBody::Empty);
}

#[test]
fn custom_headers_win_on_collision() {
    let mut ctx = context();
    ctx.user_agent = Some("Desktop/3.0".to_string());
    ctx.headers.push(("X-Trace".to_string(), "context".to_string()));

    let opts = RequestOptions::default()
        .with_user_agent("Mobile/1.0")
        .with_header("X-Trace", "call")
        .with_header("Authorization", "Bearer token");
    let req = requests::create_folder(&ctx, &opts, "New").expect("request builds");

    assert_eq!(req.method.as_str(), "MKCOL");
    assert_eq!(req.header_str("user-agent"), Some("Mobile/1.0"));
    assert_eq!(req.header_str("x-trace"), Some("call"));
    assert_eq!(req.header_str("authorization"), Some("Bearer token"));

    let req = requests::create_folder(&ctx, &RequestOptions::default(), "New").expect("request builds");
    assert_eq!(req.header_str("user-agent"), Some("Desktop/3.0"));
    assert_eq!(req.header_str("x-trace"), Some("context"));
}

#[test]
fn move_without_overwrite_sends_f_and_an_encoded_destination() {
    let ctx = context();
    let req = requests::move_item(
        &ctx,
        &RequestOptions::default(),
        "draft.txt",
        "Archive/final version #1.txt",
        false,
    )
    .expect("request builds");

    assert_eq!(req.method.as_str(), "MOVE");
    assert_eq!(req.uri.path(), "/remote.php/dav/files/alice/draft.txt");
    assert_eq!(req.header_str("overwrite"), Some("F"));
    assert_eq!(
        req.header_str("destination"),
        Some("https://cloud.example.com/remote.php/dav/files/alice/Archive/final%20version%20%231.txt")
    );
}

#[test]
fn copy_with_overwrite_sends_t() {
    let ctx = context();
    let req = requests::copy_item(&ctx, &RequestOptions::default(), "a.txt", "b.txt", true)
        .expect("request builds");

    assert_eq!(req.method.as_str(), "COPY");
    assert_eq!(req.header_str("overwrite"), Some("T"));
}

#[test]
fn search_targets_the_dav_root_with_its_own_timeout() {
    let ctx = context();
    let search = LiteralSearch {
        literal: "report".to_string(),
        depth: Depth::Infinity,
    };

    let req = requests::search_literal(&ctx, &RequestOptions::default(), &search)
        .expect("request builds");
    assert_eq!(req.method.as_str(), "SEARCH");
    assert_eq!(req.uri.to_string(), "https://cloud.example.com/remote.php/dav");
    assert_eq!(req.header_str("content-type"), Some("text/xml"));
    assert_eq!(req.timeout, Some(Duration::from_secs(60)));
    let body = req.body_str().expect("xml body");
    assert!(body.contains("<d:href>/files/alice</d:href>"));
    assert!(body.contains("%report%"));

    let opts = RequestOptions::default().with_timeout(Duration::from_secs(5));
    let req = requests::search_literal(&ctx, &opts, &search).expect("request builds");
    assert_eq!(req.timeout, Some(Duration::from_secs(5)));
}

#[test]
fn search_scope_includes_the_sub_folder() {
    let ctx = context();
    assert_eq!(requests::search_scope(&ctx, ""), "/files/alice");
    assert_eq!(requests::search_scope(&ctx, "/Camera Roll/"), "/files/alice/Camera%20Roll");
}

#[test]
fn other_requests_have_no_timeout_by_default() {
    let ctx = context();
    let req = requests::delete(&ctx, &RequestOptions::default(), "x").expect("request builds");
    assert_eq!(req.timeout, None);
}

#[test]
fn favorite_and_trash_endpoints() {
    let ctx = context();
    let opts = RequestOptions::default();

    let req = requests::set_favorite(&ctx, &opts, "docs/plan.md", true).expect("request builds");
    assert_eq!(req.method.as_str(), "PROPPATCH");
    assert_eq!(req.uri.path(), "/remote.php/dav/files/alice/docs/plan.md");

    let req = requests::list_favorites(&ctx, &opts).expect("request builds");
    assert_eq!(req.method.as_str(), "REPORT");
    assert_eq!(req.uri.path(), "/remote.php/dav/files/alice");

    let req = requests::list_trash(&ctx, &opts).expect("request builds");
    assert_eq!(req.method.as_str(), "PROPFIND");
    assert_eq!(req.uri.path(), "/remote.php/dav/trashbin/alice/trash/");
    assert_eq!(req.header_str("depth"), Some("1"));
}

#[test]
fn upload_streams_the_local_file_and_sends_unix_dates() {
    let ctx = context();
    let created = Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).single();
    let modified = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).single();

    let req = requests::upload(
        &ctx,
        &RequestOptions::default(),
        "/docs/report.pdf",
        PathBuf::from("/tmp/report.pdf").as_path(),
        created,
        modified,
    )
    .expect("request builds");

    assert_eq!(req.method.as_str(), "PUT");
    assert_eq!(req.uri.path(), "/remote.php/dav/files/alice/docs/report.pdf");
    assert_eq!(req.header_str("x-oc-ctime"), Some("1591012800"));
    assert_eq!(req.header_str("x-oc-mtime"), Some("1609459200"));
    assert_eq!(req.body, RequestBody::File(PathBuf::from("/tmp/report.pdf")));

    let req = requests::upload(
        &ctx,
        &RequestOptions::default(),
        "a.bin",
        PathBuf::from("a.bin").as_path(),
        None,
        None,
    )
    .expect("request builds");
    assert_eq!(req.header_str("x-oc-mtime"), None);
}
