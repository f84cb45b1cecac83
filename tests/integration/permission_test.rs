//! Integration tests for scoped roles and time-bounded grants.

mod helpers;

use chrono::Duration;

use warden_core::error::ErrorKind;
use warden_core::types::scope::{GLOBAL_RESOURCE_ID, GLOBAL_RESOURCE_TYPE};
use warden_entity::rbac::ROLE_ADMIN;

#[tokio::test]
async fn test_yearly_grant_lapses_after_thirteen_months() {
    let app = helpers::TestApp::new();
    let user = app.create_confirmed_user("editor@example.com", "secret-pw").await;
    let authorizer = &app.app.authorizer;

    let editor = authorizer.get_or_create_role("editor", "forum", 7).await.unwrap();
    authorizer.allow(editor.id, user.id, 1, 0, 0).await.unwrap();

    assert!(authorizer.can(user.id, "editor", "forum", 7).await.unwrap());
    assert!(!authorizer.can(user.id, "editor", "forum", 8).await.unwrap());
    assert!(!authorizer.can(user.id, "editor", "wiki", 7).await.unwrap());

    app.clock.advance_months(11);
    assert!(authorizer.can(user.id, "editor", "forum", 7).await.unwrap());

    app.clock.advance_months(2);
    assert!(!authorizer.can(user.id, "editor", "forum", 7).await.unwrap());
    let err = authorizer
        .require(user.id, "editor", "forum", 7)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_is_matches_global_scope() {
    let app = helpers::TestApp::new();
    let user = app.create_confirmed_user("root@example.com", "secret-pw").await;
    let authorizer = &app.app.authorizer;

    assert!(!authorizer.is(user.id, &[ROLE_ADMIN]).await.unwrap());

    let admin = authorizer
        .get_or_create_role(ROLE_ADMIN, GLOBAL_RESOURCE_TYPE, GLOBAL_RESOURCE_ID)
        .await
        .unwrap();
    authorizer.allow(admin.id, user.id, 0, 0, 30).await.unwrap();

    assert_eq!(
        authorizer.is(user.id, &[ROLE_ADMIN]).await.unwrap(),
        authorizer
            .can(user.id, ROLE_ADMIN, GLOBAL_RESOURCE_TYPE, GLOBAL_RESOURCE_ID)
            .await
            .unwrap()
    );
    assert!(authorizer.is(user.id, &["root", ROLE_ADMIN]).await.unwrap());
}

#[tokio::test]
async fn test_regrant_overwrites_window() {
    let app = helpers::TestApp::new();
    let user = app.create_confirmed_user("mod@example.com", "secret-pw").await;
    let authorizer = &app.app.authorizer;
    let role = authorizer.get_or_create_role("moderator", "forum", 1).await.unwrap();

    let long = authorizer.allow(role.id, user.id, 10, 0, 0).await.unwrap();
    let short = authorizer.allow(role.id, user.id, 0, 0, 1).await.unwrap();
    assert_eq!(long.id, short.id);
    assert!(short.end_at < long.end_at);

    app.clock.advance(Duration::days(2));
    assert!(!authorizer.can(user.id, "moderator", "forum", 1).await.unwrap());
}

#[tokio::test]
async fn test_deny_revokes_and_is_idempotent() {
    let app = helpers::TestApp::new();
    let user = app.create_confirmed_user("mod@example.com", "secret-pw").await;
    let authorizer = &app.app.authorizer;
    let role = authorizer.get_or_create_role("moderator", "forum", 1).await.unwrap();

    authorizer.deny(role.id, user.id).await.unwrap();
    authorizer.allow(role.id, user.id, 1, 0, 0).await.unwrap();
    authorizer.deny(role.id, user.id).await.unwrap();
    authorizer.deny(role.id, user.id).await.unwrap();

    assert!(!authorizer.can(user.id, "moderator", "forum", 1).await.unwrap());
}

#[tokio::test]
async fn test_authority_and_resource_queries() {
    let app = helpers::TestApp::new();
    let alice = app.create_confirmed_user("alice@example.com", "secret-pw").await;
    let bob = app.create_confirmed_user("bob@example.com", "secret-pw").await;
    let authorizer = &app.app.authorizer;

    for (name, forum) in [("editor", 7), ("reader", 7), ("editor", 9)] {
        let role = authorizer.get_or_create_role(name, "forum", forum).await.unwrap();
        authorizer.allow(role.id, alice.id, 1, 0, 0).await.unwrap();
    }
    let editor7 = authorizer.get_or_create_role("editor", "forum", 7).await.unwrap();
    authorizer.allow(editor7.id, bob.id, 0, 1, 0).await.unwrap();

    let mut roles = authorizer.authority(alice.id, "forum", 7).await;
    roles.sort();
    assert_eq!(roles, vec!["editor".to_string(), "reader".to_string()]);

    let forums = authorizer
        .resources_for_user(alice.id, "editor", "forum")
        .await
        .unwrap();
    assert_eq!(forums.into_iter().collect::<Vec<_>>(), vec![7, 9]);

    let editors = authorizer
        .users_for_resource("editor", "forum", 7)
        .await
        .unwrap();
    assert!(editors.contains(&alice.id) && editors.contains(&bob.id));

    app.clock.advance_months(2);
    let editors = authorizer
        .users_for_resource("editor", "forum", 7)
        .await
        .unwrap();
    assert_eq!(editors.into_iter().collect::<Vec<_>>(), vec![alice.id]);
}
