use super::*;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scenecast_protocols::ProgressStatus;
use scenecast_relay::RelayConfig;
use scenecast_store::MemoryKvStore;

fn test_relay_config() -> RelayConfig {
    RelayConfig {
        connect_timeout: std::time::Duration::from_secs(1),
        poll_interval: std::time::Duration::from_millis(20),
        staleness_window: std::time::Duration::from_millis(150),
        ..RelayConfig::default()
    }
}

fn service_for(server_uri: &str) -> (CoreService, EventBus, StateStore) {
    let bus = EventBus::default();
    let store = StateStore::new(Arc::new(MemoryKvStore::new()));
    let client = VideoClient::new(Url::parse(server_uri).unwrap());
    let relay = Arc::new(ProgressRelay::new(
        client.clone(),
        bus.clone(),
        store.clone(),
        test_relay_config(),
    ));
    let tracker = SelectionTracker::new(store.clone(), bus.clone());
    (
        CoreService::new(bus.clone(), store.clone(), client, relay, tracker, None),
        bus,
        store,
    )
}

#[tokio::test]
async fn test_generate_video_emits_starting_then_submitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "j1",
            "estimated_time_seconds": 90
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/job/j1/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "j1",
            "status": "completed",
            "progress_percent": 100
        })))
        .mount(&server)
        .await;

    let (service, bus, store) = service_for(&server.uri());
    let mut rx = bus.subscribe();

    let submission = service
        .generate_video("<p>the krebs cycle</p>", Some("academic"), GenerationOptions::default())
        .await
        .unwrap();
    assert_eq!(submission.job_id, "j1");

    let first = match rx.recv().await.unwrap() {
        BusEvent::VideoProgress(ev) => ev,
        other => panic!("unexpected event: {other:?}"),
    };
    assert_eq!(first.status, ProgressStatus::Starting);
    assert!(first.job_id.is_none());

    let second = match rx.recv().await.unwrap() {
        BusEvent::VideoProgress(ev) => ev,
        other => panic!("unexpected event: {other:?}"),
    };
    assert_eq!(second.status, ProgressStatus::Submitted);
    assert_eq!(second.job_id.as_deref(), Some("j1"));

    let handle = store.last_job().await.unwrap().unwrap();
    assert_eq!(handle.job_id, "j1");
}

#[tokio::test]
async fn test_generate_video_empty_text_fails_without_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (service, bus, store) = service_for(&server.uri());
    let mut rx = bus.subscribe();
    let err = service
        .generate_video("<br/>", None, GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "EMPTY_TEXT");
    assert!(store.last_job().await.unwrap().is_none());

    // Rejected input must not leave listeners a starting event with no
    // terminal event ever following.
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_job_result_stale_id_rejected() {
    let server = MockServer::start().await;
    let (service, _bus, store) = service_for(&server.uri());
    store.set_last_job(&JobHandle::new("current")).await.unwrap();

    let err = service.job_result("previous").await.unwrap_err();
    assert_eq!(err.kind(), "STALE_JOB");
}

#[tokio::test]
async fn test_job_result_without_tracked_job_is_stale() {
    let server = MockServer::start().await;
    let (service, _bus, _store) = service_for(&server.uri());
    let err = service.job_result("anything").await.unwrap_err();
    assert_eq!(err.kind(), "STALE_JOB");
}

#[tokio::test]
async fn test_handle_request_round_trips_errors_as_frames() {
    let server = MockServer::start().await;
    let (service, _bus, _store) = service_for(&server.uri());

    let response = service
        .handle_request(UiRequest::GetJobResult { job_id: "nope".into() })
        .await;
    match response {
        UiResponse::Error { kind, .. } => assert_eq!(kind, "STALE_JOB"),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_last_selection_empty_store() {
    let server = MockServer::start().await;
    let (service, _bus, _store) = service_for(&server.uri());

    let response = service.handle_request(UiRequest::GetLastSelection).await;
    match response {
        UiResponse::Selection { selection } => assert!(selection.is_none()),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_selection_frames_feed_tracker_and_store() {
    let server = MockServer::start().await;
    let (service, bus, store) = service_for(&server.uri());
    let mut rx = bus.subscribe();

    let response = service
        .handle_request(UiRequest::SelectionChanged {
            text: "<b>quasars</b>".into(),
            origin_url: "https://a.example/article".into(),
        })
        .await;
    assert_eq!(response, UiResponse::Ack);

    // A change only updates the cache.
    assert!(store.last_selection().await.unwrap().is_none());
    let cached = service.active_selection().await.unwrap().unwrap();
    assert_eq!(cached.text, "quasars");

    let response = service
        .handle_request(UiRequest::SelectionCommitted {
            text: "quasars emit radio waves".into(),
            origin_url: "https://a.example/article".into(),
        })
        .await;
    assert_eq!(response, UiResponse::Ack);

    match rx.recv().await.unwrap() {
        BusEvent::SelectionUpdated(record) => {
            assert_eq!(record.text, "quasars emit radio waves")
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // The commit's store write is fire-and-forget; wait for it to land.
    let mut persisted = None;
    for _ in 0..50 {
        persisted = store.last_selection().await.unwrap();
        if persisted.is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(persisted.unwrap().text, "quasars emit radio waves");

    let response = service.handle_request(UiRequest::GetLastSelection).await;
    match response {
        UiResponse::Selection { selection } => {
            assert_eq!(selection.unwrap().text, "quasars emit radio waves")
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_active_selection_prefers_tracker_cache() {
    let server = MockServer::start().await;
    let (service, _bus, _store) = service_for(&server.uri());
    service.tracker().note(
        "plate tectonics",
        scenecast_protocols::SelectionSource::ContentScript,
        "https://a.example",
    );

    let selection = service.active_selection().await.unwrap().unwrap();
    assert_eq!(selection.text, "plate tectonics");
}
