// S3 XML documents returned by the raw REST transport.
//
// Element names are PascalCase on the wire; listings are namespace-qualified
// with the s3.amazonaws.com doc namespace, which quick-xml matches by local
// name.

use crate::types::{BucketSummary, ObjectSummary};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `GET {endpoint}/` response body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListAllMyBucketsResult {
    pub buckets: Buckets,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Buckets {
    pub bucket: Vec<BucketEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BucketEntry {
    pub name: String,
    pub creation_date: String,
}

/// `GET {endpoint}/{bucket}` response body. Single page only; a truncated
/// listing is returned as-is without following continuation markers.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListBucketResult {
    pub name: String,
    pub is_truncated: bool,
    pub contents: Vec<ObjectEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
    pub last_modified: String,
    pub e_tag: String,
}

impl From<BucketEntry> for BucketSummary {
    fn from(entry: BucketEntry) -> Self {
        BucketSummary {
            creation_date: parse_timestamp(&entry.creation_date),
            name: entry.name,
        }
    }
}

impl From<ObjectEntry> for ObjectSummary {
    fn from(entry: ObjectEntry) -> Self {
        ObjectSummary {
            size: entry.size,
            last_modified: parse_timestamp(&entry.last_modified),
            etag: if entry.e_tag.is_empty() {
                None
            } else {
                Some(entry.e_tag.trim_matches('"').to_string())
            },
            key: entry.key,
        }
    }
}

/// Parses an RFC 3339 listing timestamp; `None` on anything malformed.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Parses an HTTP date header (`Last-Modified`), accepting the RFC 2822
/// format headers actually carry and RFC 3339 as a fallback.
pub(crate) fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
        .or_else(|| parse_timestamp(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUCKETS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListAllMyBucketsResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Owner><ID>owner-id</ID><DisplayName>owner</DisplayName></Owner>
  <Buckets>
    <Bucket><Name>alpha</Name><CreationDate>2024-03-01T10:00:00.000Z</CreationDate></Bucket>
    <Bucket><Name>beta</Name><CreationDate>2024-05-12T08:30:00.000Z</CreationDate></Bucket>
  </Buckets>
</ListAllMyBucketsResult>"#;

    const OBJECTS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>alpha</Name>
  <MaxKeys>1000</MaxKeys>
  <IsTruncated>false</IsTruncated>
  <Contents>
    <Key>notes/a.txt</Key>
    <LastModified>2024-06-01T00:00:00.000Z</LastModified>
    <ETag>&quot;abc123&quot;</ETag>
    <Size>5</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
  <Contents>
    <Key>image.png</Key>
    <LastModified>2024-06-02T00:00:00.000Z</LastModified>
    <ETag>&quot;def456&quot;</ETag>
    <Size>2048</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
</ListBucketResult>"#;

    #[test]
    fn test_parse_bucket_listing() {
        let result: ListAllMyBucketsResult = quick_xml::de::from_str(BUCKETS_XML).unwrap();
        assert_eq!(result.buckets.bucket.len(), 2);
        assert_eq!(result.buckets.bucket[0].name, "alpha");

        let summary = BucketSummary::from(
            result.buckets.bucket.into_iter().next().unwrap(),
        );
        assert_eq!(summary.name, "alpha");
        assert!(summary.creation_date.is_some());
    }

    #[test]
    fn test_parse_object_listing() {
        let result: ListBucketResult = quick_xml::de::from_str(OBJECTS_XML).unwrap();
        assert_eq!(result.name, "alpha");
        assert!(!result.is_truncated);
        assert_eq!(result.contents.len(), 2);

        let summary = ObjectSummary::from(result.contents.into_iter().next().unwrap());
        assert_eq!(summary.key, "notes/a.txt");
        assert_eq!(summary.size, 5);
        assert_eq!(summary.etag.as_deref(), Some("abc123"));
        assert!(summary.last_modified.is_some());
    }

    #[test]
    fn test_parse_empty_bucket() {
        let xml = r#"<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>empty</Name>
  <IsTruncated>false</IsTruncated>
</ListBucketResult>"#;
        let result: ListBucketResult = quick_xml::de::from_str(xml).unwrap();
        assert!(result.contents.is_empty());
    }

    #[test]
    fn test_timestamp_parsing() {
        assert!(parse_timestamp("2024-06-01T00:00:00.000Z").is_some());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_http_date("Sat, 01 Jun 2024 00:00:00 GMT").is_some());
        assert!(parse_http_date("2024-06-01T00:00:00Z").is_some());
    }
}
