//! Pageview counters and milestone detection.
//!
//! Each view is one Redis INCR on `pageviews:article:{id}`. When the
//! post-increment value lands exactly on a milestone, a celebration email is
//! spawned off the request path. INCR hands every caller a distinct value,
//! so each milestone fires at most once per article.

use std::sync::Arc;

use crate::{cache::increment_counter, email::send_celebration_email, error::AppError, state::State};

pub const MILESTONES: [i64; 5] = [10, 50, 100, 1000, 10000];

pub fn pageview_key(article_id: i64) -> String {
    format!("pageviews:article:{article_id}")
}

pub fn is_milestone(views: i64) -> bool {
    MILESTONES.contains(&views)
}

pub async fn increment_pageview(state: Arc<State>, article_id: i64) -> Result<i64, AppError> {
    let views = increment_counter(state.redis_connection.clone(), &pageview_key(article_id)).await?;

    if is_milestone(views) {
        // Not awaited so the triggering request isn't delayed by SMTP.
        tokio::spawn(send_celebration_email(state, article_id, views));
    }

    Ok(views)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn key_is_scoped_per_article() {
        assert_eq!(pageview_key(42), "pageviews:article:42");
        assert_ne!(pageview_key(1), pageview_key(2));
    }

    #[test]
    fn only_exact_milestone_values_trigger() {
        for milestone in MILESTONES {
            assert!(is_milestone(milestone));
            assert!(!is_milestone(milestone - 1));
            assert!(!is_milestone(milestone + 1));
        }
    }

    #[test]
    fn counting_through_a_milestone_triggers_once() {
        let triggers = (1..=200).filter(|&views| is_milestone(views)).count();

        // 10, 50, and 100 are the only milestones in range.
        assert_eq!(triggers, 3);
    }
}
