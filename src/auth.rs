//! Bearer-token authorization.
//!
//! Authentication itself happens elsewhere; users arrive in the `users`
//! table with a token already issued. This module only resolves
//! `Authorization: Bearer <token>` to a row and checks article ownership.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use sqlx::{FromRow, PgPool};

use crate::{error::AppError, state::State};

#[derive(Debug, Clone, FromRow)]
pub struct CurrentUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl FromRequestParts<Arc<State>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<State>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = bearer_token(header).ok_or(AppError::Unauthorized)?;

        let user = sqlx::query_as::<_, CurrentUser>(
            "SELECT id, name, email FROM users WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&state.db)
        .await?;

        user.ok_or(AppError::Unauthorized)
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}

/// Only the author may edit or delete an article.
pub async fn authorize_user_to_edit_article(
    db: &PgPool,
    user_id: &str,
    article_id: i64,
) -> Result<(), AppError> {
    let author_id: Option<(String,)> =
        sqlx::query_as("SELECT author_id FROM articles WHERE id = $1")
            .bind(article_id)
            .fetch_optional(db)
            .await?;

    match author_id {
        None => Err(AppError::NotFound),
        Some((author_id,)) if author_id == user_id => Ok(()),
        Some(_) => Err(AppError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("Bearer   spaced  "), Some("spaced"));
    }

    #[test]
    fn rejects_non_bearer_headers() {
        assert_eq!(bearer_token("Basic abc123"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token(""), None);
    }
}
