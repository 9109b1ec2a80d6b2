use bytes::Bytes;
use chrono::{TimeZone, Utc};
use cloud_dav_rs::files::{ReadResult, decode_files, href_to_path, normalize_etag, parse_http_date};

use crate::support::PHOTOS_LISTING;

fn photos(show_hidden: bool) -> ReadResult {
    ReadResult {
        files: decode_files(PHOTOS_LISTING.as_bytes(), show_hidden),
        data: Bytes::from_static(PHOTOS_LISTING.as_bytes()),
        request_path: "/remote.php/dav/files/alice/Photos/".to_string(),
    }
}

#[test]
fn hidden_children_are_dropped_unless_requested() {
    let visible = photos(false);
    let names: Vec<&str> = visible.children().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["Beach Day.jpg", "mountains.png"]);

    let all = photos(true);
    let names: Vec<&str> = all.children().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["Beach Day.jpg", "mountains.png", ".thumbs"]);
}

#[test]
fn showing_hidden_files_only_ever_adds_entries() {
    let without = decode_files(PHOTOS_LISTING.as_bytes(), false);
    let with = decode_files(PHOTOS_LISTING.as_bytes(), true);

    assert!(with.len() >= without.len());
    for entry in &without {
        assert!(with.contains(entry), "{} missing", entry.path);
    }
}

#[test]
fn container_is_the_first_entry_and_matches_the_request_path() {
    let listing = photos(false);
    let container = listing.container().expect("folder itself is listed");

    assert_eq!(container.path, "/remote.php/dav/files/alice/Photos");
    assert_eq!(container.file_name, "Photos");
    assert!(container.directory);
    assert_eq!(container.size, 3_145_728);
    assert_eq!(container.permissions, "RGDNVCK");
    assert_eq!(listing.files[0], *container);
}

#[test]
fn file_properties_are_decoded() {
    let files = decode_files(PHOTOS_LISTING.as_bytes(), false);
    let beach = files
        .iter()
        .find(|f| f.file_name == "Beach Day.jpg")
        .expect("beach picture listed");

    assert_eq!(beach.href, "/remote.php/dav/files/alice/Photos/Beach%20Day.jpg");
    assert_eq!(beach.path, "/remote.php/dav/files/alice/Photos/Beach Day.jpg");
    assert_eq!(beach.parent_path, "/remote.php/dav/files/alice/Photos/");
    assert_eq!(beach.oc_id, "00000011ocabc");
    assert_eq!(beach.file_id, "11");
    assert!(!beach.directory);
    assert_eq!(beach.size, 2_097_152);
    assert_eq!(beach.content_type, "image/jpeg");
    assert_eq!(beach.etag, "abc123");
    assert!(beach.favorite);
    assert!(beach.has_preview);
    assert_eq!(beach.tags, vec!["summer".to_string(), "family".to_string()]);
    assert_eq!(
        beach.last_modified,
        Utc.with_ymd_and_hms(2021, 1, 5, 8, 30, 0).single()
    );
    assert_eq!(
        beach.creation_date,
        Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).single()
    );

    let geo = beach.geo.expect("gps metadata");
    assert!((geo.latitude - 45.07).abs() < f64::EPSILON);
    assert!((geo.longitude - 7.68).abs() < f64::EPSILON);
    assert_eq!(geo.altitude, None);
}

#[test]
fn absent_properties_fall_back_to_empty_values() {
    let files = decode_files(PHOTOS_LISTING.as_bytes(), false);
    let png = files
        .iter()
        .find(|f| f.file_name == "mountains.png")
        .expect("png listed");

    assert_eq!(png.oc_id, "");
    assert_eq!(png.permissions, "");
    assert!(!png.favorite);
    assert!(!png.has_preview);
    assert!(png.tags.is_empty());
    assert_eq!(png.last_modified, None);
    assert_eq!(png.geo, None);
    assert_eq!(png.owner_display_name, "");
}

#[test]
fn undecodable_body_yields_an_empty_listing() {
    assert!(decode_files(b"<d:multistatus><d:response></oops>", true).is_empty());
    assert!(decode_files(b"", true).is_empty());
}

#[test]
fn etag_quotes_are_stripped() {
    assert_eq!(normalize_etag("\"abc123\""), "abc123");
    assert_eq!(normalize_etag("abc123"), "abc123");
    assert_eq!(normalize_etag(""), "");
}

#[test]
fn hrefs_are_decoded_into_paths() {
    assert_eq!(
        href_to_path("/remote.php/dav/files/alice/My%20Docs/r%C3%A9sum%C3%A9.pdf"),
        "/remote.php/dav/files/alice/My Docs/résumé.pdf"
    );
    assert_eq!(
        href_to_path("https://cloud.example.com/remote.php/dav/files/alice/a%23b"),
        "/remote.php/dav/files/alice/a#b"
    );
}

#[test]
fn http_dates_are_parsed() {
    let expected = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).single();
    assert_eq!(parse_http_date("Fri, 01 Jan 2021 00:00:00 GMT"), expected);
    // The weekday is not cross-checked.
    assert_eq!(parse_http_date("Tue, 01 Jan 2021 00:00:00 GMT"), expected);
    assert_eq!(parse_http_date("Fri, 01 Jan 2021 02:00:00 +0200"), expected);
    assert_eq!(parse_http_date("yesterday"), None);
    assert_eq!(parse_http_date(""), None);
}
