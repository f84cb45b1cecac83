//! Built-in job implementations.

pub mod send_email;

pub use send_email::{
    EmailMessage, LogMailer, Mailer, MemoryMailer, SEND_EMAIL, SEND_EMAIL_PRIORITY,
    SendEmailHandler,
};
