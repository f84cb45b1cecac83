//! # warden-entity
//!
//! Domain entity models for Warden. Every struct in this crate represents a
//! database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`.

pub mod rbac;
pub mod setting;
pub mod user;
