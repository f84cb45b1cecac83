//! Integration tests for e-mail hand-off through the job queue.

mod helpers;

use bytes::Bytes;

use warden_core::config::AppConfig;
use warden_core::error::ErrorKind;
use warden_worker::Settlement;
use warden_worker::jobs::{SEND_EMAIL, SEND_EMAIL_PRIORITY};

#[tokio::test]
async fn test_sign_up_queues_confirm_email() {
    let app = helpers::TestApp::new();
    app.sign_up("alice@example.com", "secret-pw").await;

    let job = app.app.queue.try_receive().await.expect("job queued");
    assert_eq!(job.job_type, SEND_EMAIL);
    assert_eq!(job.priority, SEND_EMAIL_PRIORITY);

    let payload: serde_json::Value = serde_json::from_slice(&job.body).unwrap();
    assert_eq!(payload["to"], "alice@example.com");
    assert_eq!(payload["subject"], "Please confirm your account");
    let body = payload["body"].as_str().unwrap();
    assert!(body.contains("https://warden.test/users/confirm/"));
    app.app.queue.nack(job.id, true).await.unwrap();

    let delivered = app.deliver().await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].to, "alice@example.com");
    assert!(helpers::token_from(&delivered[0].body).is_some());
}

#[tokio::test]
async fn test_failed_delivery_is_redelivered() {
    let app = helpers::TestApp::new();
    app.mailer.fail_next(2).await;
    app.sign_up("alice@example.com", "secret-pw").await;

    let settled = app.app.worker.drain().await;
    assert_eq!(
        settled,
        vec![Settlement::Requeued, Settlement::Requeued, Settlement::Acked]
    );
    assert_eq!(app.mailer.outbox().await.len(), 1);
    assert_eq!(app.app.queue.stats().await.dead, 0);
}

#[tokio::test]
async fn test_delivery_gives_up_after_max_attempts() {
    let mut config = AppConfig::default();
    config.worker.max_attempts = 2;
    let app = helpers::TestApp::with_config(config);
    app.mailer.fail_next(5).await;
    app.sign_up("alice@example.com", "secret-pw").await;

    let settled = app.app.worker.drain().await;
    assert_eq!(settled, vec![Settlement::Requeued, Settlement::DeadLettered]);
    assert!(app.mailer.outbox().await.is_empty());
    assert_eq!(app.app.queue.dead_letters().await.len(), 1);
}

#[tokio::test]
async fn test_bad_messages_are_dead_lettered() {
    let app = helpers::TestApp::new();
    app.app
        .queue
        .enqueue(SEND_EMAIL_PRIORITY, SEND_EMAIL, Bytes::from_static(b"not json"))
        .await
        .unwrap();
    app.app
        .queue
        .enqueue(0, "resize-image", Bytes::from_static(b"{}"))
        .await
        .unwrap();

    let settled = app.app.worker.drain().await;
    assert_eq!(settled, vec![Settlement::DeadLettered, Settlement::DeadLettered]);
    assert_eq!(app.app.queue.stats().await.dead, 2);
}

#[tokio::test]
async fn test_unlock_round_trip() {
    let app = helpers::TestApp::new();
    let user = app.create_confirmed_user("alice@example.com", "secret-pw").await;

    let err = app
        .app
        .accounts
        .unlock_request(&app.ctx(), app.email("alice@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyInState);

    app.app.accounts.lock(&app.ctx(), user.uid).await.unwrap();
    app.app
        .accounts
        .unlock_request(&app.ctx(), app.email("alice@example.com"))
        .await
        .unwrap();

    let outbox = app.deliver().await;
    let mail = outbox.last().unwrap();
    assert_eq!(mail.subject, "Unlock your account");

    let token = helpers::token_from(&mail.body).unwrap();
    let unlocked = app.app.accounts.unlock(&app.ctx(), &token).await.unwrap();
    assert!(!unlocked.is_locked());
    app.sign_in("alice@example.com", "secret-pw").await.unwrap();
}
