use chrono::{TimeZone, Utc};
use cloud_dav_rs::files::query::{
    favorites_report_body, propfind_files_body, propfind_trash_body, search_literal_body,
    search_media_body, set_favorite_body,
};
use cloud_dav_rs::{DateProperty, Depth, SearchDate};
use cloud_dav_rs::files::{LiteralSearch, MediaSearch};

fn media(limit: u32, element_date: DateProperty) -> MediaSearch {
    MediaSearch {
        path: String::new(),
        less_than: SearchDate::Timestamp(
            Utc.with_ymd_and_hms(2021, 12, 31, 0, 0, 0)
                .single()
                .expect("valid date"),
        ),
        greater_than: SearchDate::Epoch(1_600_000_000),
        element_date,
        limit,
    }
}

#[test]
fn propfind_body_requests_the_file_properties() {
    let body = propfind_files_body().expect("body");
    for prop in ["<d:getetag/>", "<oc:fileid/>", "<oc:favorite/>", "<nc:has-preview/>"] {
        assert!(body.contains(prop), "{prop} missing");
    }
    assert!(body.contains("<d:propfind "));
}

#[test]
fn trash_body_requests_trashbin_properties() {
    let body = propfind_trash_body().expect("body");
    assert!(body.contains("<nc:trashbin-filename/>"));
    assert!(body.contains("<nc:trashbin-deletion-time/>"));
}

#[test]
fn favorite_flag_is_zero_or_one() {
    let on = set_favorite_body(true).expect("body");
    let off = set_favorite_body(false).expect("body");
    assert!(on.contains("<d:set><d:prop><oc:favorite>1</oc:favorite></d:prop></d:set>"));
    assert!(off.contains("<oc:favorite>0</oc:favorite>"));
}

#[test]
fn favorites_report_filters_on_favorite() {
    let body = favorites_report_body().expect("body");
    assert!(body.contains("<oc:filter-files "));
    assert!(body.contains("<oc:filter-rules><oc:favorite>1</oc:favorite></oc:filter-rules>"));
}

#[test]
fn literal_search_wraps_and_escapes_the_needle() {
    let search = LiteralSearch {
        literal: "Q&A <draft>".to_string(),
        depth: Depth::Infinity,
    };
    let body = search_literal_body("/files/alice", &search).expect("body");

    assert!(body.contains("<d:href>/files/alice</d:href>"));
    assert!(body.contains("<d:depth>infinity</d:depth>"));
    assert!(body.contains("<d:literal>%Q&amp;A &lt;draft&gt;%</d:literal>"));
    assert!(body.contains("<d:displayname/>"));
}

#[test]
fn media_search_orders_newest_first_on_the_chosen_date() {
    let body = search_media_body("/files/alice", &media(0, DateProperty::UploadTime)).expect("body");

    assert!(body.contains(
        "<d:orderby><d:order><d:prop><nc:upload_time/></d:prop><d:descending/></d:order></d:orderby>"
    ));
    assert!(body.contains("<d:literal>image/%</d:literal>"));
    assert!(body.contains("<d:literal>video/%</d:literal>"));
    assert!(body.contains("<d:literal>2021-12-31T00:00:00Z</d:literal>"));
    assert!(body.contains("<d:literal>1600000000</d:literal>"));
    assert!(body.contains("<d:depth>infinity</d:depth>"));
}

#[test]
fn media_search_limit_is_only_sent_when_positive() {
    let unlimited =
        search_media_body("/files/alice", &media(0, DateProperty::LastModified)).expect("body");
    assert!(!unlimited.contains("<d:nresults>"));
    assert!(unlimited.contains("<d:getlastmodified/>"));

    let limited =
        search_media_body("/files/alice", &media(50, DateProperty::CreationTime)).expect("body");
    assert!(limited.contains("<d:limit><d:nresults>50</d:nresults></d:limit>"));
    assert!(limited.contains("<nc:creation_time/>"));
}
