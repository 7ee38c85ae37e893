//! Final job results.

use serde::{Deserialize, Serialize};

/// The final artifact reference for a completed job.
///
/// Fetched once on terminal success and held only for the active UI session;
/// never persisted. `video_url` is always absolute — the client normalizes
/// relative locations against the service origin before constructing this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_skipped() {
        let rec = ResultRecord {
            video_url: "https://svc/files/a.mp4".to_string(),
            subtitle_payload: None,
            thumbnail_url: None,
            duration: None,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("subtitle_payload").is_none());
        assert!(json.get("duration").is_none());
        assert_eq!(json["video_url"], "https://svc/files/a.mp4");
    }
}
