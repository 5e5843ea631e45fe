//! Article records and their Postgres queries.
//!
//! The listing is the only cached read. It goes through Redis first
//! (`articles:all`, 60 second expiry) and falls back to a joined select,
//! repopulating the cache on the way out. Single-article reads always hit
//! Postgres.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::{
    cache::{ARTICLES_CACHE_KEY, ARTICLES_CACHE_TTL_SECS, cache_get, cache_set},
    error::AppError,
    state::State,
};

/// One row of the public article listing, author name joined in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArticleListing {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ArticleWithAuthor {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleInput {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticleInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
}

pub async fn get_articles(state: &State) -> Result<Vec<ArticleListing>, AppError> {
    if let Some(cached) =
        cache_get::<Vec<ArticleListing>>(state.redis_connection.clone(), ARTICLES_CACHE_KEY).await
    {
        info!("Get articles cache hit");
        return Ok(cached);
    }
    info!("Get articles cache miss");

    let listing = sqlx::query_as::<_, ArticleListing>(
        "SELECT a.id, a.title, a.content, a.summary, a.created_at, u.name AS author
         FROM articles a
         LEFT JOIN users u ON u.id = a.author_id
         WHERE a.published
         ORDER BY a.created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;

    cache_set(
        state.redis_connection.clone(),
        ARTICLES_CACHE_KEY,
        &listing,
        ARTICLES_CACHE_TTL_SECS,
    )
    .await;

    Ok(listing)
}

pub async fn get_article_by_id(
    state: &State,
    id: i64,
) -> Result<Option<ArticleWithAuthor>, AppError> {
    let article = sqlx::query_as::<_, ArticleWithAuthor>(
        "SELECT a.id, a.title, a.content, a.created_at, a.image_url, u.name AS author
         FROM articles a
         LEFT JOIN users u ON u.id = a.author_id
         WHERE a.id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    Ok(article)
}

pub async fn insert_article(
    db: &PgPool,
    author_id: &str,
    input: &CreateArticleInput,
    summary: Option<&str>,
) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO articles (title, content, summary, image_url, created_at, author_id, published)
         VALUES ($1, $2, $3, $4, NOW(), $5, TRUE)
         RETURNING id",
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(summary)
    .bind(&input.image_url)
    .bind(author_id)
    .fetch_one(db)
    .await?;

    Ok(id)
}

/// Partial update. Absent fields keep their current values.
pub async fn update_article(
    db: &PgPool,
    id: i64,
    input: &UpdateArticleInput,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE articles
         SET title = COALESCE($1, title),
             content = COALESCE($2, content),
             summary = COALESCE($3, summary),
             image_url = COALESCE($4, image_url)
         WHERE id = $5",
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.summary)
    .bind(&input.image_url)
    .bind(id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn delete_article(db: &PgPool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn listing_round_trips_through_cache_json() {
        let listing = vec![ArticleListing {
            id: 7,
            title: "Hello".into(),
            content: "World".into(),
            summary: None,
            created_at: "2026-01-02T03:04:05Z".parse().unwrap(),
            author: Some("Ada".into()),
        }];

        let raw = serde_json::to_string(&listing).unwrap();
        let decoded: Vec<ArticleListing> = serde_json::from_str(&raw).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id, 7);
        assert_eq!(decoded[0].author.as_deref(), Some("Ada"));
        assert_eq!(decoded[0].created_at, listing[0].created_at);
    }

    #[test]
    fn update_input_fields_default_to_absent() {
        let input: UpdateArticleInput = serde_json::from_str(r#"{"title": "New"}"#).unwrap();

        assert_eq!(input.title.as_deref(), Some("New"));
        assert_eq!(input.content, None);
        assert_eq!(input.summary, None);
        assert_eq!(input.image_url, None);
    }
}
