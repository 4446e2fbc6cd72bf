//! Filename normalization for storage paths

/// Extensions recognized as images, compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "avif"];

/// Used when the client sends no filename
const FALLBACK_FILENAME: &str = "upload";
/// Appended when the name has no recognized image extension
const DEFAULT_EXTENSION: &str = ".jpg";

/// Whether the name ends in `.<ext>` for one of [`IMAGE_EXTENSIONS`]
#[must_use]
pub fn has_image_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Lower-cases the name and replaces every character outside `[a-z0-9._-]` with `-`
///
/// Idempotent: the output only contains characters it keeps as-is.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Sanitized filename that always ends in a recognized image extension
#[must_use]
pub fn normalize_filename(name: Option<&str>) -> String {
    let raw = name.filter(|n| !n.is_empty()).unwrap_or(FALLBACK_FILENAME);
    let mut filename = sanitize_filename(raw);
    if !has_image_extension(&filename) {
        filename.push_str(DEFAULT_EXTENSION);
    }
    filename
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_disallowed_characters() {
        assert_eq!(sanitize_filename("My Photo!.PNG"), "my-photo-.png");
        assert_eq!(sanitize_filename("../etc/passwd"), "..-etc-passwd");
        assert_eq!(sanitize_filename("snake_case-name.1.webp"), "snake_case-name.1.webp");
        assert_eq!(sanitize_filename("café.jpg"), "caf-.jpg");
        assert_eq!(sanitize_filename(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in [
            "My Photo!.PNG",
            "Ünïcödé 🎉.gif",
            "  spaces  ",
            "a/b\\c:d*e?f\"g<h>i|j",
            "already-clean_name.jpeg",
            "İstanbul.png",
        ] {
            let once = sanitize_filename(name);
            assert_eq!(sanitize_filename(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn test_sanitized_output_alphabet() {
        let out = sanitize_filename("ÅBC def/ghi\t#%&.AVIF");
        assert!(out
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')));
    }

    #[test]
    fn test_has_image_extension() {
        for name in ["a.png", "a.JPG", "a.jpeg", "a.gif", "a.webp", "a.avif", ".png"] {
            assert!(has_image_extension(name), "{name}");
        }
        for name in ["a", "a.bmp", "a.png.txt", "png", "a.jpgx", "a."] {
            assert!(!has_image_extension(name), "{name}");
        }
    }

    #[test]
    fn test_normalize_appends_jpg_when_extension_missing() {
        assert_eq!(normalize_filename(Some("holiday")), "holiday.jpg");
        assert_eq!(normalize_filename(Some("scan.tiff")), "scan.tiff.jpg");
        assert_eq!(normalize_filename(Some("My Photo!.PNG")), "my-photo-.png");
    }

    #[test]
    fn test_normalize_falls_back_to_upload() {
        assert_eq!(normalize_filename(None), "upload.jpg");
        assert_eq!(normalize_filename(Some("")), "upload.jpg");
    }

    #[test]
    fn test_normalized_names_always_have_image_extension() {
        for name in [None, Some(""), Some("x"), Some("x.PNG"), Some("weird name.bmp"), Some("🎉")] {
            let normalized = normalize_filename(name);
            assert!(has_image_extension(&normalized), "{normalized}");
            assert_eq!(normalize_filename(Some(normalized.as_str())), normalized);
        }
    }
}
