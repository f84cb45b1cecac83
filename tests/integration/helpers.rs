//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use warden::App;
use warden_auth::CurrentUser;
use warden_auth::secrets::generate_config;
use warden_core::config::AppConfig;
use warden_core::traits::ManualClock;
use warden_database::{MemoryStore, Stores};
use warden_entity::user::User;
use warden_service::account::{EmailForm, SignInForm, SignUpForm};
use warden_service::{Locales, RequestContext, SignInResult};
use warden_worker::jobs::{EmailMessage, MemoryMailer};

/// Test application context
pub struct TestApp {
    /// The wired application under test
    pub app: App,
    /// Clock driving token and grant expiry
    pub clock: ManualClock,
    /// Mail transport capturing delivered e-mail
    pub mailer: Arc<MemoryMailer>,
    /// Backing store, for direct inspection
    pub store: MemoryStore,
}

impl TestApp {
    /// Create a new test application on in-memory stores
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application from `config`, replacing its secrets with
    /// freshly generated keys
    pub fn with_config(mut config: AppConfig) -> Self {
        config.secrets = generate_config();
        config.worker.retry_delay_ms = 0;

        let locales = Locales::load(&config.locale).expect("Failed to load locales");
        let clock = ManualClock::starting_now();
        let mailer = Arc::new(MemoryMailer::new());
        let store = MemoryStore::new();

        let app = App::assemble(
            config,
            Stores::memory(store.clone()),
            Arc::new(clock.clone()),
            mailer.clone(),
            Arc::new(locales),
        )
        .expect("Failed to assemble app");

        Self {
            app,
            clock,
            mailer,
            store,
        }
    }

    /// Request context in the default language
    pub fn ctx(&self) -> RequestContext {
        RequestContext::new("en-US", "127.0.0.1", "https://warden.test")
    }

    /// Run the worker until the queue is empty and return every e-mail
    /// delivered so far
    pub async fn deliver(&self) -> Vec<EmailMessage> {
        self.app.worker.drain().await;
        self.mailer.outbox().await
    }

    /// Token carried by the most recently delivered e-mail
    pub async fn last_token(&self) -> String {
        let outbox = self.deliver().await;
        let mail = outbox.last().expect("No e-mail delivered");
        token_from(&mail.body).expect("E-mail carries no token")
    }

    /// Sign up a user without confirming the address
    pub async fn sign_up(&self, email: &str, password: &str) -> User {
        self.app
            .accounts
            .sign_up(
                &self.ctx(),
                SignUpForm {
                    name: email.split('@').next().unwrap_or(email).to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    password_confirmation: password.to_string(),
                },
            )
            .await
            .expect("Sign-up failed")
    }

    /// Sign up and confirm a user through the e-mailed token
    pub async fn create_confirmed_user(&self, email: &str, password: &str) -> User {
        self.sign_up(email, password).await;
        let token = self.last_token().await;
        self.app
            .accounts
            .confirm(&self.ctx(), &token)
            .await
            .expect("Confirm failed")
    }

    /// Sign in and return the session
    pub async fn sign_in(&self, email: &str, password: &str) -> warden_core::AppResult<SignInResult> {
        self.app
            .accounts
            .sign_in(
                &self.ctx(),
                SignInForm {
                    email: email.to_string(),
                    password: password.to_string(),
                    remember_me: false,
                },
            )
            .await
    }

    /// Resolve the signed-in user behind a session token
    pub async fn current_user(&self, token: &str) -> warden_core::AppResult<CurrentUser> {
        let header = format!("Bearer {token}");
        self.app.guard.current_user(Some(&header)).await
    }

    /// Form naming an e-mail address
    pub fn email(&self, email: &str) -> EmailForm {
        EmailForm {
            email: email.to_string(),
        }
    }
}

/// Extract the token from a link such as `https://host/users/confirm/<token>`
pub fn token_from(body: &str) -> Option<String> {
    body.lines()
        .find(|line| line.contains("/users/"))
        .and_then(|line| line.trim().rsplit('/').next())
        .map(str::to_string)
}
