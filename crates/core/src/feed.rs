//! Feed news status values and moderation rules.
//!
//! A news is created either directly `published` or `waiting_approval`
//! when its module asks for feed admin review. Feed admins then move it to
//! `published` or `rejected`, and may revise that decision later.

use chrono::{DateTime, Utc};

use crate::error::CoreError;

/// News awaiting a feed admin decision.
pub const NEWS_WAITING_APPROVAL: &str = "waiting_approval";

/// News hidden by a feed admin.
pub const NEWS_REJECTED: &str = "rejected";

/// News visible in the public feed.
pub const NEWS_PUBLISHED: &str = "published";

/// All valid news statuses.
pub const VALID_NEWS_STATUSES: &[&str] = &[NEWS_WAITING_APPROVAL, NEWS_REJECTED, NEWS_PUBLISHED];

/// Event published when a news needs a feed admin decision.
pub const EVENT_NEWS_PENDING_APPROVAL: &str = "feed.news.pending_approval";

/// Maximum title length.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Validate that a status string is one of the accepted values.
pub fn validate_news_status(status: &str) -> Result<(), CoreError> {
    if VALID_NEWS_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid news status '{status}'. Must be one of: {}",
            VALID_NEWS_STATUSES.join(", ")
        )))
    }
}

/// Status a freshly created news starts in.
pub fn initial_status(require_feed_admin_approval: bool) -> &'static str {
    if require_feed_admin_approval {
        NEWS_WAITING_APPROVAL
    } else {
        NEWS_PUBLISHED
    }
}

/// Check a moderation decision. A news can never go back to waiting.
pub fn validate_moderation(target: &str) -> Result<(), CoreError> {
    validate_news_status(target)?;
    if target == NEWS_WAITING_APPROVAL {
        return Err(CoreError::Validation(
            "A news cannot be moved back to waiting_approval".into(),
        ));
    }
    Ok(())
}

/// Validate a news title and its display window.
pub fn validate_news(
    title: &str,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> Result<(), CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("News title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "News title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    if let Some(end) = end {
        if end < start {
            return Err(CoreError::Validation(
                "News end must not be before its start".into(),
            ));
        }
    }
    Ok(())
}

/// Whether a published news is still displayed at `now`.
pub fn is_displayed(end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    end.map_or(true, |end| end >= now)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;

    use super::*;

    #[test]
    fn initial_status_depends_on_approval_flag() {
        assert_eq!(initial_status(true), NEWS_WAITING_APPROVAL);
        assert_eq!(initial_status(false), NEWS_PUBLISHED);
    }

    #[test]
    fn moderation_targets() {
        assert!(validate_moderation(NEWS_PUBLISHED).is_ok());
        assert!(validate_moderation(NEWS_REJECTED).is_ok());
        assert_matches!(
            validate_moderation(NEWS_WAITING_APPROVAL),
            Err(CoreError::Validation(_))
        );
        assert_matches!(validate_moderation("archived"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn news_window_must_be_ordered() {
        let start = Utc::now();
        assert!(validate_news("Gala", start, None).is_ok());
        assert!(validate_news("Gala", start, Some(start + Duration::hours(2))).is_ok());
        assert_matches!(
            validate_news("Gala", start, Some(start - Duration::hours(2))),
            Err(CoreError::Validation(_))
        );
        assert_matches!(validate_news("   ", start, None), Err(CoreError::Validation(_)));
    }

    #[test]
    fn display_window() {
        let now = Utc::now();
        assert!(is_displayed(None, now));
        assert!(is_displayed(Some(now + Duration::days(1)), now));
        assert!(!is_displayed(Some(now - Duration::days(1)), now));
    }
}
