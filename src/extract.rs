//! Embedded-object extraction from HTML email bodies
//!
//! First stage of the normalizer: inline images are lifted out of the
//! markup and replaced with thumbnail placeholders, so the translator
//! only ever sees referenced filenames. Content-ID references produce a
//! placeholder but no object; the caller resolves those against the
//! message's real attachments.

use crate::types::{ContentKind, EmailBody, EmbeddedObject};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

pub(crate) static IMG_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").unwrap());

static SRC_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap()
});

static DATA_URI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^data:image/([^;]+);base64,(.+)$").unwrap());

/// `src` attribute value of an `<img>` tag, quoted or bare
pub(crate) fn src_attribute(tag: &str) -> Option<&str> {
    SRC_ATTR_REGEX.captures(tag).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
    })
}

/// Extract embedded images from an email body
///
/// Returns the cleaned content and the extracted objects in document
/// order. Plain text bodies pass through unchanged with no objects.
/// Malformed image payloads are skipped with a warning; this function
/// never fails.
#[must_use]
pub fn extract_embedded_objects(body: &EmailBody) -> (String, Vec<EmbeddedObject>) {
    match body.content_type {
        ContentKind::Html => extract_from_html(&body.content),
        ContentKind::Text => (body.content.clone(), Vec::new()),
    }
}

fn extract_from_html(html: &str) -> (String, Vec<EmbeddedObject>) {
    // Snapshot every <img> upfront so indices stay stable no matter
    // which elements end up replaced.
    let images: Vec<_> = IMG_TAG_REGEX.find_iter(html).collect();
    if images.is_empty() {
        return (html.to_string(), Vec::new());
    }

    let mut objects = Vec::new();
    let mut cleaned = String::with_capacity(html.len());
    let mut last_end = 0;

    for (position, tag) in images.iter().enumerate() {
        cleaned.push_str(&html[last_end..tag.start()]);
        last_end = tag.end();

        match replace_image(tag.as_str(), position + 1, &mut objects) {
            Some(placeholder) => cleaned.push_str(&placeholder),
            None => cleaned.push_str(tag.as_str()),
        }
    }
    cleaned.push_str(&html[last_end..]);

    (cleaned, objects)
}

/// Placeholder for one `<img>` tag, pushing an extracted object as a side
/// effect for base64 payloads. `None` leaves the tag as encountered.
fn replace_image(
    tag: &str,
    index: usize,
    objects: &mut Vec<EmbeddedObject>,
) -> Option<String> {
    let src = src_attribute(tag)?;

    if let Some(caps) = DATA_URI_REGEX.captures(src) {
        let subtype = &caps[1];
        match BASE64.decode(&caps[2]) {
            Ok(content) => {
                let filename = format!("embedded_image_{index}.{subtype}");
                debug!("extracted embedded base64 image: {filename}");
                objects.push(EmbeddedObject {
                    filename: filename.clone(),
                    content,
                    content_type: format!("image/{subtype}"),
                });
                Some(format!("!{filename}|thumbnail!"))
            }
            Err(e) => {
                warn!("skipping embedded image {index} with bad base64 payload: {e}");
                None
            }
        }
    } else if let Some(cid) = src.strip_prefix("cid:") {
        // CID format is often "image002.png@01DB1234.5678ABCD"; the part
        // before the @ names the matching attachment.
        let filename = cid.split('@').next().unwrap_or(cid);
        debug!("found CID referenced image: {cid}");
        Some(format!("!{filename}|thumbnail!"))
    } else {
        None
    }
}
