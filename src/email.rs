//! Celebration emails.
//!
//! Fired from the pageview path when a counter hits a milestone. Strictly
//! best-effort: a missing author address skips the send, and transport
//! errors are logged without retry.

use std::sync::Arc;

use lettre::{AsyncTransport, Message, message::Mailbox};
use sqlx::FromRow;
use tracing::{info, warn};

use crate::state::State;

#[derive(FromRow)]
struct CelebrationRecipient {
    email: Option<String>,
    name: Option<String>,
    title: String,
}

pub async fn send_celebration_email(state: Arc<State>, article_id: i64, pageviews: i64) {
    let recipient = sqlx::query_as::<_, CelebrationRecipient>(
        "SELECT u.email, u.name, a.title
         FROM articles a
         LEFT JOIN users u ON u.id = a.author_id
         WHERE a.id = $1",
    )
    .bind(article_id)
    .fetch_optional(&state.db)
    .await;

    let recipient = match recipient {
        Ok(Some(recipient)) => recipient,
        Ok(None) => {
            warn!("Skipping celebration for article {article_id}, article is gone");
            return;
        }
        Err(e) => {
            warn!("Skipping celebration for article {article_id}, lookup failed: {e}");
            return;
        }
    };

    let Some(ref email) = recipient.email else {
        info!(
            "Skipping celebration for {pageviews} views on article {article_id}, author has no email"
        );
        return;
    };

    let message = match build_message(&state, &email, &recipient, article_id, pageviews) {
        Ok(message) => message,
        Err(e) => {
            warn!("Failed to build celebration email for article {article_id}: {e}");
            return;
        }
    };

    match state.mailer.send(message).await {
        Ok(_) => info!(
            "Sent {email} a celebration for {pageviews} views on article {article_id}"
        ),
        Err(e) => warn!(
            "Error sending {email} a celebration for {pageviews} views on article {article_id}: {e}"
        ),
    }
}

fn build_message(
    state: &State,
    email: &str,
    recipient: &CelebrationRecipient,
    article_id: i64,
    pageviews: i64,
) -> Result<Message, Box<dyn std::error::Error + Send + Sync>> {
    let from: Mailbox = state.config.email_from.parse()?;
    let to: Mailbox = email.parse()?;

    Ok(Message::builder()
        .from(from)
        .to(to)
        .subject(celebration_subject(pageviews))
        .body(celebration_body(
            recipient.name.as_deref(),
            &recipient.title,
            &article_url(&state.config.base_url, article_id),
            pageviews,
        ))?)
}

fn celebration_subject(pageviews: i64) -> String {
    format!("✨ Your article got {pageviews} views! ✨")
}

fn celebration_body(name: Option<&str>, title: &str, url: &str, pageviews: i64) -> String {
    format!(
        "Congrats, {}!\n\n\
         Your article \"{title}\" just reached {pageviews} views.\n\n\
         Read it again: {url}\n\n\
         You're an amazing author!\n",
        name.unwrap_or("Friend"),
    )
}

fn article_url(base_url: &str, article_id: i64) -> String {
    format!("{}/wiki/{article_id}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn body_falls_back_to_friend() {
        let body = celebration_body(None, "Rust", "http://localhost:3000/wiki/1", 10);

        assert!(body.starts_with("Congrats, Friend!"));
        assert!(body.contains("\"Rust\" just reached 10 views"));
    }

    #[test]
    fn article_url_handles_trailing_slash() {
        assert_eq!(
            article_url("http://localhost:3000/", 5),
            "http://localhost:3000/wiki/5"
        );
        assert_eq!(
            article_url("https://wiki.example.com", 5),
            "https://wiki.example.com/wiki/5"
        );
    }
}
