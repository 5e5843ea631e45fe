//! # Wikimasters
//!
//! Backend for a small wiki/blog platform.
//!
//!
//!
//! # General Infrastructure
//! - Frontend talks to this server over JSON
//! - Articles and users live in Postgres
//! - Redis holds the article listing cache and per-article pageview counters
//! - Celebration emails go out over SMTP when a pageview counter hits a milestone
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | GET | `/articles` | none |
//! | POST | `/articles` | bearer token |
//! | GET | `/articles/{id}` | none |
//! | PATCH | `/articles/{id}` | bearer token, author only |
//! | DELETE | `/articles/{id}` | bearer token, author only |
//! | POST | `/articles/{id}/views` | none |
//!
//!
//!
//! # Notes
//!
//! ## Redis + Postgres
//! Postgres is the source of truth for articles and users. Redis is only a
//! read-side cache plus atomic pageview counters, so losing it costs us a
//! minute of listing staleness and the view counts, nothing more. The listing
//! cache is never invalidated on writes; the 60 second TTL bounds staleness.
//!
//! ## Pageview milestones
//! A counter crossing a milestone value fires exactly one email because the
//! check is equality on the post-INCR value, and INCR hands every caller a
//! distinct value.

use std::time::Duration;

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use tokio::{
    net::TcpListener,
    signal::{
        ctrl_c,
        unix::{SignalKind, signal},
    },
};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod articles;
pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod email;
pub mod error;
pub mod pageviews;
pub mod routes;
pub mod state;
pub mod summarize;

use routes::{
    create_article_handler, delete_article_handler, get_article_handler, increment_views_handler,
    list_articles_handler, update_article_handler,
};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route(
            "/articles",
            get(list_articles_handler).post(create_article_handler),
        )
        .route(
            "/articles/{id}",
            get(get_article_handler)
                .patch(update_article_handler)
                .delete(delete_article_handler),
        )
        .route("/articles/{id}/views", post(increment_views_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
