use chrono::{TimeZone, Utc};
use cloud_dav_rs::files::decode_trash;

const TRASH_LISTING: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">
  <d:response>
    <d:href>/remote.php/dav/trashbin/alice/trash/</d:href>
    <d:propstat>
      <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/trashbin/alice/trash/report.pdf.d1700000000</d:href>
    <d:propstat>
      <d:prop>
        <d:getcontenttype>application/pdf</d:getcontenttype>
        <d:getcontentlength>512</d:getcontentlength>
        <d:resourcetype/>
        <oc:fileid>321</oc:fileid>
        <nc:trashbin-filename>report.pdf</nc:trashbin-filename>
        <nc:trashbin-original-location>docs/report.pdf</nc:trashbin-original-location>
        <nc:trashbin-deletion-time>1700000000</nc:trashbin-deletion-time>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/trashbin/alice/trash/.env.d1700000001</d:href>
    <d:propstat>
      <d:prop>
        <d:resourcetype/>
        <nc:trashbin-filename>.env</nc:trashbin-filename>
        <nc:trashbin-original-location>.env</nc:trashbin-original-location>
        <nc:trashbin-deletion-time>1700000001</nc:trashbin-deletion-time>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>
"#;

#[test]
fn trash_container_is_skipped() {
    let items = decode_trash(TRASH_LISTING.as_bytes(), true);
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| !i.path.ends_with("/trash")));
}

#[test]
fn trash_items_are_decoded() {
    let items = decode_trash(TRASH_LISTING.as_bytes(), false);
    assert_eq!(items.len(), 1);

    let item = &items[0];
    assert_eq!(item.file_name, "report.pdf.d1700000000");
    assert_eq!(item.trashbin_file_name, "report.pdf");
    assert_eq!(item.trashbin_original_location, "docs/report.pdf");
    assert_eq!(
        item.trashbin_deletion_time,
        Utc.timestamp_opt(1_700_000_000, 0).single()
    );
    assert_eq!(item.file_id, "321");
    assert_eq!(item.size, 512);
    assert_eq!(item.content_type, "application/pdf");
    assert!(!item.directory);
}
