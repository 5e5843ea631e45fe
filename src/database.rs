//! # Postgres
//!
//! Source of truth for articles and users.
//!
//! ## Schema
//!
//! Managed outside this service. The queries here assume:
//!
//! - `articles`: id (**bigserial**), title (**text**), content (**text**),
//!   summary (**text**, nullable), created_at (**timestamptz**), author_id
//!   (**text**, FK to users.id), image_url (**text**, nullable), published
//!   (**bool**)
//! - `users`: id (**text**), name (**text**, nullable), email (**text**,
//!   nullable), token (**text**, unique)
//!
//! Foreign key validity and id uniqueness are Postgres's job, not ours.

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

pub async fn init_postgres(database_url: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await
        .unwrap()
}
