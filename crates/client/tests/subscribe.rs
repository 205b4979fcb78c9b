//! End-to-end subscribe flow tests against a scripted transport.

mod common;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use strato_client::{
    Client, ClientConfig, ClientError, Credential, Deadline, HttpMethod, Payload, RunOptions,
    SubscribeOptions, TransportError,
};

use common::{FakeUploader, Scripted, ScriptedTransport};

fn test_client(transport: Arc<ScriptedTransport>) -> Client {
    let config = ClientConfig::new(Credential::KeyPair("a:b".to_string()));
    Client::with_transport(config, transport)
}

#[tokio::test(start_paused = true)]
async fn subscribe_returns_result_after_completion() {
    let transport = ScriptedTransport::new(vec![
        Scripted::Json(json!({"request_id": "req-1"})),
        Scripted::Json(json!({"status": "IN_PROGRESS"})),
        Scripted::Json(json!({"status": "COMPLETED"})),
        Scripted::Json(json!({"image_url": "https://cdn.strato.run/out/1.png"})),
    ]);
    let client = test_client(Arc::clone(&transport));

    let updates = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&updates);
    let options = SubscribeOptions {
        poll_interval: Duration::from_millis(100),
        on_update: Some(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })),
        ..Default::default()
    };

    let input = Payload::from(json!({"prompt": "cat"}));
    let result = client
        .subscribe("acme/text-to-image", Some(input), options)
        .await
        .unwrap();

    assert_eq!(
        result.to_json(),
        json!({"image_url": "https://cdn.strato.run/out/1.png"})
    );
    assert_eq!(updates.load(Ordering::SeqCst), 2);

    let requests = transport.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].url, "https://queue.strato.run/acme/text-to-image");
    assert_eq!(requests[0].body, Some(json!({"prompt": "cat"})));
    assert_eq!(
        requests[1].url,
        "https://queue.strato.run/acme/text-to-image/requests/req-1/status"
    );
    assert_eq!(
        requests[3].url,
        "https://queue.strato.run/acme/text-to-image/requests/req-1"
    );
    // Every call carries the resolved credential.
    assert!(requests.iter().all(|r| r.auth == "Key a:b"));
}

#[tokio::test(start_paused = true)]
async fn binary_input_is_uploaded_before_submission() {
    let transport = ScriptedTransport::new(vec![
        Scripted::Json(json!({"request_id": "req-1"})),
        Scripted::Json(json!({"status": "COMPLETED"})),
        Scripted::Json(json!({"ok": true})),
    ]);
    let uploader = FakeUploader::new();
    let client = test_client(Arc::clone(&transport))
        .with_uploader(Arc::clone(&uploader) as Arc<dyn strato_client::StorageUploader>);

    let mut map = BTreeMap::new();
    map.insert("prompt".to_string(), Payload::String("cat".to_string()));
    map.insert("image".to_string(), Payload::Bytes(b"xyz".to_vec()));

    client
        .subscribe(
            "acme/img2img",
            Some(Payload::Object(map)),
            SubscribeOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(uploader.upload_count(), 1);
    assert_eq!(
        transport.requests()[0].body,
        Some(json!({
            "prompt": "cat",
            "image": "https://storage.strato.run/files/0"
        }))
    );
}

#[tokio::test(start_paused = true)]
async fn get_method_jobs_skip_upload_and_use_query_params() {
    let transport = ScriptedTransport::new(vec![
        Scripted::Json(json!({"request_id": "req-1"})),
        Scripted::Json(json!({"status": "COMPLETED"})),
        Scripted::Json(json!({"ok": true})),
    ]);
    let uploader = FakeUploader::new();
    let client = test_client(Arc::clone(&transport))
        .with_uploader(Arc::clone(&uploader) as Arc<dyn strato_client::StorageUploader>);

    // Binary leaf included on purpose: GET-method jobs must bypass the
    // uploader even when the input carries bytes.
    let mut map = BTreeMap::new();
    map.insert("prompt".to_string(), Payload::String("cat".to_string()));
    map.insert("image".to_string(), Payload::Bytes(b"xyz".to_vec()));
    let options = SubscribeOptions {
        run: RunOptions::with_method(HttpMethod::Get),
        ..Default::default()
    };
    client
        .subscribe("acme/tti", Some(Payload::Object(map)), options)
        .await
        .unwrap();

    assert_eq!(uploader.upload_count(), 0);
    let submit = &transport.requests()[0];
    assert_eq!(submit.method, HttpMethod::Get);
    assert_eq!(submit.body, None);
    // The bytes leaf never reaches the query pairs either.
    assert_eq!(
        submit.query,
        vec![("prompt".to_string(), "cat".to_string())]
    );
}

#[tokio::test]
async fn submission_failure_aborts_without_polling() {
    let transport = ScriptedTransport::new(vec![Scripted::Status(401, "unauthorized")]);
    let client = test_client(Arc::clone(&transport));

    let result = client
        .subscribe("acme/tti", None, SubscribeOptions::default())
        .await;

    assert_matches!(
        result,
        Err(ClientError::Transport(TransportError::Status { status: 401, .. }))
    );
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_elapsing_surfaces_queue_timeout_without_result_fetch() {
    let transport = ScriptedTransport::new(vec![
        Scripted::Json(json!({"request_id": "req-1"})),
        Scripted::Json(json!({"status": "IN_PROGRESS"})),
    ]);
    let client = test_client(Arc::clone(&transport));

    let options = SubscribeOptions {
        poll_interval: Duration::from_millis(1_000),
        timeout: Deadline::Milliseconds(1_500),
        ..Default::default()
    };
    let result = client.subscribe("acme/tti", None, options).await;

    assert_matches!(result, Err(ClientError::QueueTimeout));
    // One submission, two status polls, no result fetch.
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_sleep_stops_polling_and_result_fetch() {
    let transport = ScriptedTransport::new(vec![
        Scripted::Json(json!({"request_id": "req-1"})),
        Scripted::Json(json!({"status": "IN_PROGRESS"})),
    ]);
    let client = Arc::new(test_client(Arc::clone(&transport)));

    let updates = Arc::new(AtomicUsize::new(0));
    let handle = tokio::spawn({
        let client = Arc::clone(&client);
        let counter = Arc::clone(&updates);
        async move {
            let options = SubscribeOptions {
                poll_interval: Duration::from_secs(5),
                timeout: Deadline::Never,
                on_update: Some(Box::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                })),
                ..Default::default()
            };
            client.subscribe("acme/tti", None, options).await
        }
    });

    // Let the task run through submission and the first status poll, up
    // to its inter-poll sleep.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(transport.request_count(), 2);
    assert_eq!(updates.load(Ordering::SeqCst), 1);

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    // Well past several poll intervals: no further status requests, no
    // callback invocations, no result fetch.
    tokio::time::advance(Duration::from_secs(60)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(transport.request_count(), 2);
    assert_eq!(updates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn run_uses_sync_endpoint_and_returns_payload_directly() {
    let transport = ScriptedTransport::new(vec![Scripted::Json(json!({"ok": true}))]);
    let client = test_client(Arc::clone(&transport));

    let input = Payload::from(json!({"prompt": "cat"}));
    let result = client
        .run("acme/tti", Some(input), &RunOptions::default())
        .await
        .unwrap();

    assert_eq!(result.to_json(), json!({"ok": true}));
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://run.strato.run/acme/tti");
    assert_eq!(requests[0].method, HttpMethod::Post);
}

#[tokio::test]
async fn token_rotation_applies_to_new_queue_snapshots_only() {
    let transport = ScriptedTransport::new(vec![Scripted::Json(json!({"request_id": "req-1"}))]);
    let client = test_client(Arc::clone(&transport));

    let before = client.queue();
    client.set_access_token("tok-9");
    let after = client.queue();

    before
        .submit("acme/tti", None, &RunOptions::default())
        .await
        .unwrap();
    after
        .submit("acme/tti", None, &RunOptions::default())
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].auth, "Key a:b");
    assert_eq!(requests[1].auth, "Bearer tok-9");
}
