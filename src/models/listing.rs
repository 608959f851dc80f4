//! Listing rows for the bucket contents view.

use serde::Serialize;

/// One object row in a bucket listing.
#[derive(Serialize, Clone, Debug)]
pub struct ObjectEntry {
    /// Object key (path-like identifier within the bucket).
    pub key: String,

    /// Size in bytes as reported by the backend.
    pub size_bytes: i64,

    /// Last-modified timestamp, already formatted for display.
    pub last_modified: Option<String>,
}

/// One page of bucket contents, fetched fresh on every request.
#[derive(Serialize, Clone, Debug)]
pub struct BucketListing {
    /// The bucket that was listed.
    pub bucket: String,

    /// Object entries in key order. Empty is valid.
    pub entries: Vec<ObjectEntry>,
}
