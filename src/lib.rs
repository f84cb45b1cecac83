//! Warden application wiring.
//!
//! [`App`] is the composition root: it turns an [`AppConfig`] into the
//! services an HTTP layer or operator tool calls into, plus the background
//! worker that delivers queued e-mail.

use std::sync::Arc;

use tracing::info;

use warden_auth::{
    ActionTokens, Authorizer, JwtDecoder, JwtEncoder, PasswordDigest, PasswordPolicy, SecretStore,
    SessionGuard, SessionIssuer, SymmetricCipher,
};
use warden_core::config::AppConfig;
use warden_core::result::AppResult;
use warden_core::traits::{Clock, SystemClock, Translator};
use warden_database::Stores;
use warden_service::{AccountService, ActionEmails, Locales, SettingService};
use warden_worker::jobs::{LogMailer, Mailer, SendEmailHandler};
use warden_worker::{JobExecutor, MemoryQueue, WorkerRunner};

/// Fully wired application.
#[derive(Debug, Clone)]
pub struct App {
    pub config: AppConfig,
    pub stores: Stores,
    pub accounts: AccountService,
    pub settings: SettingService,
    pub authorizer: Authorizer,
    pub guard: SessionGuard,
    pub queue: Arc<MemoryQueue>,
    pub worker: Arc<WorkerRunner>,
}

impl App {
    /// Builds the application with the system clock, the logging mail
    /// transport, locale files from `locale.directory` and the stores
    /// selected by `database.url`.
    pub async fn build(config: AppConfig) -> AppResult<Self> {
        let stores = Stores::open(&config.database).await?;
        let locales = Locales::load(&config.locale)?;
        Self::assemble(
            config,
            stores,
            Arc::new(SystemClock),
            Arc::new(LogMailer),
            Arc::new(locales),
        )
    }

    /// Wires the application from explicit collaborators.
    ///
    /// Fails with a configuration error when the key material in
    /// `config.secrets` is missing or malformed.
    pub fn assemble(
        config: AppConfig,
        stores: Stores,
        clock: Arc<dyn Clock>,
        mailer: Arc<dyn Mailer>,
        locales: Arc<dyn Translator>,
    ) -> AppResult<Self> {
        let secrets = Arc::new(SecretStore::from_config(&config.secrets)?);

        let encoder = JwtEncoder::new(&secrets, clock.clone());
        let decoder = JwtDecoder::new(&secrets, clock.clone());
        let authorizer = Authorizer::new(stores.policies.clone(), clock.clone());

        let queue = Arc::new(MemoryQueue::new());
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(SendEmailHandler::new(mailer)));
        let worker = Arc::new(WorkerRunner::new(
            queue.clone(),
            Arc::new(executor),
            config.worker.clone(),
        ));

        let tokens = ActionTokens::new(
            encoder.clone(),
            decoder.clone(),
            stores.users.clone(),
            &config.auth,
        );
        let accounts = AccountService::new(
            stores.users.clone(),
            PasswordDigest::new(secrets.clone()),
            PasswordPolicy::new(&config.auth),
            SessionIssuer::new(encoder, authorizer.clone(), &config.auth),
            ActionEmails::new(tokens, queue.clone(), locales.clone()),
            locales,
            clock,
        );
        let settings = SettingService::new(stores.settings.clone(), SymmetricCipher::new(&secrets)?);
        let guard = SessionGuard::new(decoder, stores.users.clone(), authorizer.clone());

        info!(
            memory = stores.pool.is_none(),
            worker = %config.worker.name,
            "Application assembled"
        );

        Ok(Self {
            config,
            stores,
            accounts,
            settings,
            authorizer,
            guard,
            queue,
            worker,
        })
    }
}
