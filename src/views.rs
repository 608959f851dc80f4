//! HTML views for the console.
//!
//! Markup is assembled by hand into strings; there is no template engine.
//! Every interpolated value passes through `html_escape`.

use crate::models::listing::BucketListing;

/// Shared page shell: one `<style>` block, a heading, and the body markup.
fn page(title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>",
            "<html lang=\"en\"><head><meta charset=\"utf-8\">",
            "<title>{title} | S3 Console</title>",
            "<style>",
            "body{{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}}",
            "form{{margin:0.75rem 0}}",
            "input{{margin-right:0.25rem}}",
            "table{{border-collapse:collapse;width:100%}}",
            "td,th{{border:1px solid #ccc;padding:0.3rem 0.6rem;text-align:left}}",
            "section{{margin-bottom:1.5rem}}",
            ".hint{{color:#666}}",
            "</style>",
            "</head><body>{body}</body></html>"
        ),
        title = html_escape(title),
        body = body,
    )
}

/// `GET /`: one form per console operation.
pub fn index_page() -> String {
    let body = concat!(
        "<h1>S3 Console</h1>",
        "<section><h2>Buckets</h2>",
        "<form action=\"/create_bucket\" method=\"post\">",
        "<input type=\"text\" name=\"bucket_name\" placeholder=\"bucket name\" required>",
        "<button type=\"submit\">Create bucket</button></form>",
        "<form action=\"/delete_bucket\" method=\"post\">",
        "<input type=\"text\" name=\"bucket_name\" placeholder=\"bucket name\" required>",
        "<button type=\"submit\">Delete bucket</button></form>",
        "<form action=\"/list_s3\" method=\"get\">",
        "<input type=\"text\" name=\"bucket_name\" placeholder=\"bucket name\" required>",
        "<button type=\"submit\">List contents</button></form>",
        "</section>",
        "<section><h2>Folders</h2>",
        "<form action=\"/create_folder\" method=\"post\">",
        "<input type=\"text\" name=\"bucket_name\" placeholder=\"bucket name\" required>",
        "<input type=\"text\" name=\"folder_name\" placeholder=\"folder name\" required>",
        "<button type=\"submit\">Create folder</button></form>",
        "<form action=\"/delete_folder\" method=\"post\">",
        "<input type=\"text\" name=\"bucket_name\" placeholder=\"bucket name\" required>",
        "<input type=\"text\" name=\"folder_name\" placeholder=\"folder name\" required>",
        "<button type=\"submit\">Delete folder</button></form>",
        "</section>",
        "<section><h2>Objects</h2>",
        "<form action=\"/upload_file\" method=\"post\" enctype=\"multipart/form-data\">",
        "<input type=\"text\" name=\"bucket_name\" placeholder=\"bucket name\" required>",
        "<input type=\"file\" name=\"file\" required>",
        "<button type=\"submit\">Upload file</button></form>",
        "<form action=\"/delete_object\" method=\"post\">",
        "<input type=\"text\" name=\"bucket_name\" placeholder=\"bucket name\" required>",
        "<input type=\"text\" name=\"object_key\" placeholder=\"object key\" required>",
        "<button type=\"submit\">Delete object</button></form>",
        "<form action=\"/move_file\" method=\"post\">",
        "<input type=\"text\" name=\"source_bucket\" placeholder=\"source bucket\" required>",
        "<input type=\"text\" name=\"destination_bucket\" placeholder=\"destination bucket\" required>",
        "<input type=\"text\" name=\"file_name\" placeholder=\"file name\" required>",
        "<button type=\"submit\">Move file</button></form>",
        "</section>",
    );
    page("Home", body)
}

/// `GET /list_s3`: bucket contents table. An empty bucket renders the
/// empty-state line instead of a table.
pub fn listing_page(listing: &BucketListing) -> String {
    let mut body = format!("<h1>Bucket {}</h1>", html_escape(&listing.bucket));

    if listing.entries.is_empty() {
        body.push_str("<p>This bucket is empty.</p>");
    } else {
        body.push_str("<table><tr><th>Key</th><th>Size (bytes)</th><th>Last modified</th></tr>");
        for entry in &listing.entries {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&entry.key),
                entry.size_bytes,
                html_escape(entry.last_modified.as_deref().unwrap_or("-")),
            ));
        }
        body.push_str("</table>");
    }

    body.push_str("<p><a href=\"/\">Back to console</a></p>");
    page(&listing.bucket, &body)
}

/// Error page: status line, backend message, optional hint.
pub fn error_page(status: u16, message: &str, hint: Option<&str>) -> String {
    let mut body = format!(
        "<h1>Error {}</h1><p>{}</p>",
        status,
        html_escape(message)
    );
    if let Some(hint) = hint {
        body.push_str(&format!("<p class=\"hint\">{}</p>", html_escape(hint)));
    }
    body.push_str("<p><a href=\"/\">Back to console</a></p>");
    page("Error", &body)
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::listing::ObjectEntry;

    #[test]
    fn listing_page_escapes_keys() {
        let listing = BucketListing {
            bucket: "media".into(),
            entries: vec![ObjectEntry {
                key: "<script>.txt".into(),
                size_bytes: 3,
                last_modified: None,
            }],
        };
        let html = listing_page(&listing);
        assert!(html.contains("&lt;script&gt;.txt"));
        assert!(!html.contains("<script>.txt"));
    }

    #[test]
    fn empty_listing_renders_empty_state() {
        let listing = BucketListing {
            bucket: "empty".into(),
            entries: Vec::new(),
        };
        let html = listing_page(&listing);
        assert!(html.contains("This bucket is empty."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn error_page_includes_hint_when_present() {
        let html = error_page(502, "storage backend error: boom", Some("check the bucket"));
        assert!(html.contains("Error 502"));
        assert!(html.contains("check the bucket"));
    }
}
