use super::*;

#[test]
fn test_progress_status_terminal() {
    assert!(ProgressStatus::Completed.is_terminal());
    assert!(ProgressStatus::Failed.is_terminal());
    assert!(ProgressStatus::Error.is_terminal());
    assert!(!ProgressStatus::Rendering.is_terminal());
    assert!(!ProgressStatus::Starting.is_terminal());
}

#[test]
fn test_progress_status_parse_known() {
    assert_eq!(ProgressStatus::parse("queued"), ProgressStatus::Queued);
    assert_eq!(ProgressStatus::parse("scripting"), ProgressStatus::Scripting);
    assert_eq!(ProgressStatus::parse("completed"), ProgressStatus::Completed);
    assert_eq!(ProgressStatus::parse("failed"), ProgressStatus::Failed);
}

#[test]
fn test_progress_status_parse_unknown_is_processing() {
    assert_eq!(
        ProgressStatus::parse("generating_storyboard"),
        ProgressStatus::Processing
    );
    assert_eq!(ProgressStatus::parse(""), ProgressStatus::Processing);
    assert!(!ProgressStatus::parse("whatever").is_terminal());
}

#[test]
fn test_job_status_from_progress() {
    assert_eq!(JobStatus::from(ProgressStatus::Queued), JobStatus::Queued);
    assert_eq!(
        JobStatus::from(ProgressStatus::Rendering),
        JobStatus::Processing
    );
    assert_eq!(
        JobStatus::from(ProgressStatus::Completed),
        JobStatus::Completed
    );
    assert_eq!(JobStatus::from(ProgressStatus::Error), JobStatus::Failed);
}

#[test]
fn test_job_handle_new() {
    let handle = JobHandle::new("abc123");
    assert_eq!(handle.job_id, "abc123");
    assert_eq!(handle.status, JobStatus::Queued);
    assert!(!handle.status.is_terminal());
}

#[test]
fn test_starting_event_has_no_job_id() {
    let ev = ProgressEvent::starting();
    assert!(ev.job_id.is_none());
    assert_eq!(ev.status, ProgressStatus::Starting);
    let json = serde_json::to_value(&ev).unwrap();
    assert!(json.get("job_id").is_none());
}

#[test]
fn test_submitted_event() {
    let ev = ProgressEvent::submitted("abc123", 150);
    assert_eq!(ev.job_id.as_deref(), Some("abc123"));
    assert!(ev.message.contains("150"));
    assert!(!ev.is_terminal());
}

#[test]
fn test_local_error_is_terminal() {
    let ev = ProgressEvent::local_error("abc123", "observation timed out");
    assert!(ev.is_terminal());
    assert_eq!(ev.status, ProgressStatus::Error);
}

#[test]
fn test_style_parse_or_default() {
    assert_eq!(
        GenerationStyle::parse_or_default(Some("child-friendly")),
        GenerationStyle::ChildFriendly
    );
    assert_eq!(
        GenerationStyle::parse_or_default(Some("nonsense")),
        GenerationStyle::Simple
    );
    assert_eq!(GenerationStyle::parse_or_default(None), GenerationStyle::Simple);
}

#[test]
fn test_options_normalized_drops_blanks() {
    let opts = GenerationOptions {
        voice_id: Some("  ".to_string()),
        avatar_id: Some("anna".to_string()),
    }
    .normalized();
    assert!(opts.voice_id.is_none());
    assert_eq!(opts.avatar_id.as_deref(), Some("anna"));
}

#[test]
fn test_event_serde_roundtrip() {
    let ev = ProgressEvent {
        job_id: Some("j1".to_string()),
        step: "rendering".to_string(),
        status: ProgressStatus::Rendering,
        message: "Rendering...".to_string(),
        percent: Some(42),
    };
    let json = serde_json::to_string(&ev).unwrap();
    let back: ProgressEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(ev, back);
}
