use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use crate::{
    articles::{
        CreateArticleInput, UpdateArticleInput, delete_article, get_article_by_id, get_articles,
        insert_article, update_article,
    },
    auth::{CurrentUser, authorize_user_to_edit_article},
    error::AppError,
    pageviews::increment_pageview,
    state::State as AppState,
    summarize::summarize_article,
};

pub async fn list_articles_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let listing = get_articles(&state).await?;

    Ok(Json(listing))
}

pub async fn get_article_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let article = get_article_by_id(&state, id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(article))
}

pub async fn create_article_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(payload): Json<CreateArticleInput>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::MissingInput("title"));
    }
    if payload.content.trim().is_empty() {
        return Err(AppError::MissingInput("content"));
    }

    let summary = match &payload.summary {
        Some(summary) => Some(summary.clone()),
        None => {
            summarize_article(&state.config, &state.http, &payload.title, &payload.content).await
        }
    };

    let id = insert_article(&state.db, &user.id, &payload, summary.as_deref()).await?;
    info!("User {} created article {id}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": id })),
    ))
}

pub async fn update_article_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateArticleInput>,
) -> Result<impl IntoResponse, AppError> {
    authorize_user_to_edit_article(&state.db, &user.id, id).await?;

    update_article(&state.db, id, &payload).await?;
    info!("User {} updated article {id}", user.id);

    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn delete_article_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize_user_to_edit_article(&state.db, &user.id, id).await?;

    delete_article(&state.db, id).await?;
    info!("User {} deleted article {id}", user.id);

    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn increment_views_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let views = increment_pageview(state, id).await?;

    Ok(Json(json!({ "views": views })))
}
