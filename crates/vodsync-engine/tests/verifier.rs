//! Upload verifier integration tests.
//!
//! Time is paused; the runtime auto-advances through the verifier's
//! sleeps, so timing assertions are exact and fast.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use vodsync_engine::{ChannelProgress, UploadVerifier, VerifierConfig};
use vodsync_models::{AssetId, ProcessingState, VerifyOutcome};

use common::{asset_in_state, ready_asset, FakeSource, GetResponse};

fn quick_config(timeout_secs: u64) -> VerifierConfig {
    VerifierConfig {
        timeout: Duration::from_secs(timeout_secs),
        ..VerifierConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn completes_on_first_playable_poll() {
    let source = Arc::new(FakeSource::new());
    source.script(
        "v1",
        vec![
            GetResponse::Asset(asset_in_state("v1", ProcessingState::PendingUpload)),
            GetResponse::Asset(asset_in_state("v1", ProcessingState::Queued)),
            GetResponse::Asset(ready_asset("v1", "Demo", 60.0)),
        ],
    );

    let verifier = UploadVerifier::with_config(Arc::clone(&source), quick_config(300));
    let outcome = verifier.verify(&AssetId::from("v1")).await.unwrap();

    match outcome {
        VerifyOutcome::Completed { asset } => {
            assert!(asset.is_playable());
            assert_eq!(asset.display_name.as_deref(), Some("Demo"));
        }
        other => panic!("expected Completed, got {:?}", other),
    }
    // Terminal on the third poll, not before and not after.
    assert_eq!(*source.get_calls.lock().unwrap(), 3);
}

#[tokio::test(start_paused = true)]
async fn ready_without_stream_flag_keeps_polling() {
    let source = Arc::new(FakeSource::new());
    let mut almost = asset_in_state("v1", ProcessingState::Ready);
    almost.ready_to_stream = false;
    source.script(
        "v1",
        vec![
            GetResponse::Asset(almost),
            GetResponse::Asset(ready_asset("v1", "Demo", 60.0)),
        ],
    );

    let verifier = UploadVerifier::with_config(Arc::clone(&source), quick_config(300));
    let outcome = verifier.verify(&AssetId::from("v1")).await.unwrap();

    assert!(outcome.is_completed());
    assert_eq!(*source.get_calls.lock().unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn reports_failure_with_reason_and_code() {
    let source = Arc::new(FakeSource::new());
    let mut failed = asset_in_state("v1", ProcessingState::Error);
    failed.error_reason = Some("source file truncated".to_string());
    failed.error_code = Some("E1020".to_string());
    source.script("v1", vec![GetResponse::Asset(failed)]);

    let verifier = UploadVerifier::with_config(source, quick_config(300));
    let outcome = verifier.verify(&AssetId::from("v1")).await.unwrap();

    match outcome {
        VerifyOutcome::Failed {
            error_reason,
            error_code,
        } => {
            assert_eq!(error_reason.as_deref(), Some("source file truncated"));
            assert_eq!(error_code.as_deref(), Some("E1020"));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn times_out_at_budget_with_last_known_state() {
    let source = Arc::new(FakeSource::new());
    source.script(
        "v1",
        vec![GetResponse::Asset(asset_in_state(
            "v1",
            ProcessingState::InProgress,
        ))],
    );

    let verifier = UploadVerifier::with_config(Arc::clone(&source), quick_config(2));
    let start = Instant::now();
    let outcome = verifier.verify(&AssetId::from("v1")).await.unwrap();

    assert!(start.elapsed() >= Duration::from_secs(2));
    match outcome {
        VerifyOutcome::TimedOut { last_known } => {
            let asset = last_known.expect("final read should succeed");
            assert_eq!(asset.state, ProcessingState::InProgress);
        }
        other => panic!("expected TimedOut, got {:?}", other),
    }
    // Bounded polling: a 2s budget with >= 1s waits allows only a few
    // polls plus the final best-effort read.
    assert!(*source.get_calls.lock().unwrap() <= 5);
}

#[tokio::test(start_paused = true)]
async fn timeout_without_final_read_carries_no_state() {
    let source = Arc::new(FakeSource::new());
    source.script(
        "v1",
        vec![
            GetResponse::Asset(asset_in_state("v1", ProcessingState::InProgress)),
            GetResponse::Transport,
        ],
    );

    let verifier = UploadVerifier::with_config(source, quick_config(2));
    let outcome = verifier.verify(&AssetId::from("v1")).await.unwrap();

    match outcome {
        VerifyOutcome::TimedOut { last_known } => assert!(last_known.is_none()),
        other => panic!("expected TimedOut, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn waits_through_replication_lag() {
    let source = Arc::new(FakeSource::new());
    source.script(
        "v1",
        vec![
            GetResponse::NotVisible,
            GetResponse::NotVisible,
            GetResponse::Asset(ready_asset("v1", "Demo", 30.0)),
        ],
    );

    let verifier = UploadVerifier::with_config(Arc::clone(&source), quick_config(300));
    let start = Instant::now();
    let outcome = verifier.verify(&AssetId::from("v1")).await.unwrap();

    assert!(outcome.is_completed());
    // Two 3s not-visible waits before the successful read.
    assert!(start.elapsed() >= Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn retries_transient_lookup_failures() {
    let source = Arc::new(FakeSource::new());
    source.script(
        "v1",
        vec![
            GetResponse::Transport,
            GetResponse::Transport,
            GetResponse::Asset(ready_asset("v1", "Demo", 30.0)),
        ],
    );

    let verifier = UploadVerifier::with_config(source, quick_config(300));
    let outcome = verifier.verify(&AssetId::from("v1")).await.unwrap();
    assert!(outcome.is_completed());
}

#[tokio::test(start_paused = true)]
async fn genuine_not_found_fails_immediately() {
    let source = Arc::new(FakeSource::new());
    source.script("v1", vec![GetResponse::NotFound]);

    let verifier = UploadVerifier::with_config(Arc::clone(&source), quick_config(300));
    let outcome = verifier.verify(&AssetId::from("v1")).await.unwrap();

    match outcome {
        VerifyOutcome::Failed { error_reason, .. } => {
            assert!(error_reason.unwrap().contains("not found"));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert_eq!(*source.get_calls.lock().unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_id_is_rejected() {
    let source = Arc::new(FakeSource::new());
    let verifier = UploadVerifier::with_config(source, quick_config(300));
    let result = verifier.verify(&AssetId::from("")).await;
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn publishes_progress_every_nth_poll() {
    let source = Arc::new(FakeSource::new());
    let mut responses = Vec::new();
    let mut in_progress = asset_in_state("v1", ProcessingState::InProgress);
    in_progress.percent_complete = Some(40);
    for _ in 0..6 {
        responses.push(GetResponse::Asset(in_progress.clone()));
    }
    responses.push(GetResponse::Asset(ready_asset("v1", "Demo", 30.0)));
    source.script("v1", responses);

    let config = VerifierConfig {
        snapshot_every: 2,
        ..quick_config(300)
    };
    let verifier = UploadVerifier::with_config(source, config);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let sink = ChannelProgress::new(tx);
    let outcome = verifier
        .verify_with_progress(&AssetId::from("v1"), &sink)
        .await
        .unwrap();
    assert!(outcome.is_completed());

    let mut snapshots = Vec::new();
    while let Ok(snapshot) = rx.try_recv() {
        snapshots.push(snapshot);
    }
    // Six non-terminal polls at every-2nd cadence.
    assert_eq!(snapshots.len(), 3);
    assert_eq!(snapshots[0].attempt, 2);
    assert_eq!(snapshots[0].percent_complete, Some(40));
    assert_eq!(snapshots[0].state, ProcessingState::InProgress);
}
