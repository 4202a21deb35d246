//! Google Drive share-link rewriting.
//!
//! Share links come in a few shapes (`/file/d/<id>/view`,
//! `/open?id=<id>`, `uc?id=<id>`); all of them are rewritten to the
//! direct `uc?export=download` form. Only Google-hosted URLs qualify,
//! so an arbitrary URL that happens to carry an `id=` parameter is
//! left alone.

use url::Url;

/// Extract the file ID from a Google Drive share link, or `None` when
/// the URL is not a Drive link.
pub fn drive_file_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    match url.host_str()? {
        "drive.google.com" | "docs.google.com" => {}
        _ => return None,
    }

    // `/file/d/<id>/...` (and `/document/d/<id>/...` on docs hosts).
    if let Some(mut segments) = url.path_segments() {
        while let Some(segment) = segments.next() {
            if segment == "d" {
                if let Some(id) = segments.next() {
                    if is_file_id(id) {
                        return Some(id.to_string());
                    }
                }
            }
        }
    }

    // `?id=<id>` query form, covering `/open?id=` and `/uc?id=`.
    url.query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|id| is_file_id(id))
}

/// Direct download URL for a Drive file ID.
pub fn drive_direct_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={file_id}")
}

fn is_file_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
