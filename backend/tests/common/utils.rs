use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::json;

/// A tiny but valid PNG data URL (`QUJD` is base64 for `ABC`)
pub const PNG_DATA_URL: &str = "data:image/png;base64,QUJD";

/// Build an upload request body
pub fn create_upload_request(
    data_url: Option<&str>,
    filename: Option<&str>,
    caption: Option<&str>,
) -> serde_json::Value {
    let mut payload = json!({});
    if let Some(data_url) = data_url {
        payload["dataURL"] = json!(data_url);
    }
    if let Some(filename) = filename {
        payload["filename"] = json!(filename);
    }
    if let Some(caption) = caption {
        payload["caption"] = json!(caption);
    }
    payload
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).unwrap()
}

/// Raw response body bytes
pub async fn read_body(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Checks `images/<YYYY-MM-DDTHH-MM-SS-mmmZ>-<filename>` and returns the timestamp
pub fn assert_storage_path(path: &str, filename: &str) -> String {
    let timestamp = path
        .strip_prefix("images/")
        .and_then(|rest| rest.strip_suffix(&format!("-{filename}")))
        .unwrap_or_else(|| panic!("unexpected storage path: {path}"));

    assert_eq!(timestamp.len(), 24, "unexpected timestamp in {path}");
    assert!(timestamp.ends_with('Z'));
    assert_eq!(&timestamp[10..11], "T");
    assert!(!timestamp.contains(':') && !timestamp.contains('.'));
    assert!(timestamp[..23]
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c == 'T'));

    timestamp.to_string()
}
