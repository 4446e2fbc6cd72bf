//! Image data URL predicates
//!
//! An accepted data URL looks like `data:image/<subtype>;base64,<payload>`.

use base64::{engine::general_purpose::STANDARD, Engine as _};

const IMAGE_DATA_URL_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

/// Whether `value` starts with `data:image/<subtype>;base64,`
///
/// Scheme, media type and the base64 marker are matched case-insensitively.
#[must_use]
pub fn is_image_data_url(value: &str) -> bool {
    let Some(rest) = strip_prefix_ignore_ascii_case(value, IMAGE_DATA_URL_PREFIX) else {
        return false;
    };
    let Some(subtype_len) = rest.find(';') else {
        return false;
    };
    is_media_subtype(&rest[..subtype_len])
        && strip_prefix_ignore_ascii_case(&rest[subtype_len..], BASE64_MARKER).is_some()
}

/// Everything after the first comma
#[must_use]
pub fn base64_payload(value: &str) -> Option<&str> {
    value.split_once(',').map(|(_, payload)| payload)
}

/// Non-empty, padded standard base64
#[must_use]
pub fn is_base64_payload(payload: &str) -> bool {
    !payload.is_empty() && STANDARD.decode(payload).is_ok()
}

fn is_media_subtype(subtype: &str) -> bool {
    !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
}

fn strip_prefix_ignore_ascii_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}
