//! Integration tests for the account and session flows.

mod helpers;

use chrono::Duration;

use warden_auth::ClaimSet;
use warden_core::error::ErrorKind;
use warden_entity::rbac::ROLE_ADMIN;
use warden_service::RequestContext;
use warden_service::account::{ResetPasswordForm, SignUpForm};

#[tokio::test]
async fn test_sign_up_confirm_sign_in() {
    let app = helpers::TestApp::new();
    let user = app.sign_up("alice@example.com", "secret-pw").await;

    let err = app.sign_in("alice@example.com", "secret-pw").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert_eq!(err.message, "Please confirm your e-mail address first.");

    let token = app.last_token().await;
    let confirmed = app.app.accounts.confirm(&app.ctx(), &token).await.unwrap();
    assert!(confirmed.is_confirmed());

    let session = app.sign_in("alice@example.com", "secret-pw").await.unwrap();
    let current = app.current_user(&session.token).await.unwrap();
    assert_eq!(current.user.id, user.id);
    match current.claims.set {
        ClaimSet::Session { uid, admin, .. } => {
            assert_eq!(uid, user.uid);
            assert!(!admin);
        }
        other => panic!("expected session claims, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email() {
    let app = helpers::TestApp::new();
    app.create_confirmed_user("alice@example.com", "secret-pw").await;

    let err = app.sign_in("alice@example.com", "wrong-pw").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);

    let err = app.sign_in("bob@example.com", "secret-pw").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn test_admin_flag_is_a_snapshot() {
    let app = helpers::TestApp::new();
    let user = app.create_confirmed_user("root@example.com", "secret-pw").await;

    let authorizer = &app.app.authorizer;
    let admin = authorizer.get_or_create_role(ROLE_ADMIN, "-", 0).await.unwrap();
    authorizer.allow(admin.id, user.id, 1, 0, 0).await.unwrap();

    let session = app.sign_in("root@example.com", "secret-pw").await.unwrap();
    let current = app.current_user(&session.token).await.unwrap();
    assert!(current.is_admin);
    assert!(matches!(current.claims.set, ClaimSet::Session { admin: true, .. }));

    authorizer.deny(admin.id, user.id).await.unwrap();
    let current = app.current_user(&session.token).await.unwrap();
    assert!(!current.is_admin);
    assert!(matches!(current.claims.set, ClaimSet::Session { admin: true, .. }));

    let header = format!("Bearer {}", session.token);
    let err = app.app.guard.require_admin(Some(&header)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_session_expires_after_a_week() {
    let app = helpers::TestApp::new();
    app.create_confirmed_user("alice@example.com", "secret-pw").await;
    let session = app.sign_in("alice@example.com", "secret-pw").await.unwrap();

    app.clock.advance(Duration::hours(167));
    assert!(app.current_user(&session.token).await.is_ok());

    app.clock.advance(Duration::hours(1));
    let err = app.current_user(&session.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_confirm_token_expires_after_six_hours() {
    let app = helpers::TestApp::new();
    app.sign_up("alice@example.com", "secret-pw").await;
    let token = app.last_token().await;

    app.clock.advance(Duration::hours(6));
    let err = app.app.accounts.confirm(&app.ctx(), &token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenExpired);

    app.app
        .accounts
        .confirm_request(&app.ctx(), app.email("alice@example.com"))
        .await
        .unwrap();
    let fresh = app.last_token().await;
    app.app.accounts.confirm(&app.ctx(), &fresh).await.unwrap();
}

#[tokio::test]
async fn test_reset_password_with_emailed_token() {
    let app = helpers::TestApp::new();
    app.create_confirmed_user("alice@example.com", "secret-pw").await;

    app.app
        .accounts
        .forgot_password(&app.ctx(), app.email("alice@example.com"))
        .await
        .unwrap();
    let token = app.last_token().await;

    let err = app.app.accounts.confirm(&app.ctx(), &token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ActionMismatch);

    app.app
        .accounts
        .reset_password(
            &app.ctx(),
            ResetPasswordForm {
                token,
                password: "new-secret".into(),
                password_confirmation: "new-secret".into(),
            },
        )
        .await
        .unwrap();

    assert!(app.sign_in("alice@example.com", "secret-pw").await.is_err());
    app.sign_in("alice@example.com", "new-secret").await.unwrap();
}

#[tokio::test]
async fn test_errors_are_localized() {
    let app = helpers::TestApp::new();
    app.create_confirmed_user("alice@example.com", "secret-pw").await;

    let ctx = RequestContext::new("zh-Hans", "127.0.0.1", "https://warden.test");
    let err = app
        .app
        .accounts
        .sign_up(
            &ctx,
            SignUpForm {
                name: "alice".into(),
                email: "alice@example.com".into(),
                password: "secret-pw".into(),
                password_confirmation: "secret-pw".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message, "该邮箱已被注册。");
}

#[tokio::test]
async fn test_activity_log_records_ip() {
    let app = helpers::TestApp::new();
    app.create_confirmed_user("alice@example.com", "secret-pw").await;
    let session = app.sign_in("alice@example.com", "secret-pw").await.unwrap();
    let current = app.current_user(&session.token).await.unwrap();

    let logs = app.app.accounts.logs(&current).await.unwrap();
    assert_eq!(logs[0].message, "Signed in.");
    assert!(logs.iter().all(|l| l.ip == "127.0.0.1"));
    assert_eq!(logs.len(), 3);
}
