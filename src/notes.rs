//! Note content processing: tag stripping, search matching, escaping and
//! display helpers shared by the page container and the templates.

use crate::models::Note;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

// ============================================================================
// Plain-text Derivation
// ============================================================================

/// Remove every markup tag from rich content. Entities are left as-is.
pub fn strip_tags(content: &str) -> String {
    TAG_RE.replace_all(content, "").into_owned()
}

// ============================================================================
// Search
// ============================================================================

/// Case-insensitive substring match on title or plain-text. An empty query
/// matches everything.
pub fn matches_search(note: &Note, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query_lower = query.to_lowercase();
    note.title.to_lowercase().contains(&query_lower)
        || note.content_plain.to_lowercase().contains(&query_lower)
}

pub fn search_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    notes.iter().filter(|n| matches_search(n, query)).collect()
}

// ============================================================================
// Text Escaping
// ============================================================================

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Sanitize stored rich content before it is placed into a page.
pub fn sanitize_html(content: &str) -> String {
    ammonia::clean(content)
}

// ============================================================================
// Display Helpers
// ============================================================================

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Human distance between `then` and `now`, e.g. "5 minutes ago".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    let (future, secs) = if secs < 0 { (true, -secs) } else { (false, secs) };
    let minutes = (secs as f64 / 60.0).round() as i64;

    let phrase = if secs < 30 {
        "less than a minute".to_string()
    } else if minutes <= 1 {
        "1 minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < 1440 {
        format!("about {} hours", (minutes as f64 / 60.0).round() as i64)
    } else if minutes < 2520 {
        "1 day".to_string()
    } else if minutes < 43200 {
        format!("{} days", (minutes as f64 / 1440.0).round() as i64)
    } else if minutes < 86400 {
        "about 1 month".to_string()
    } else if minutes < 525600 {
        format!("{} months", (minutes as f64 / 43200.0).round() as i64)
    } else {
        let years = minutes / 525600;
        if years <= 1 {
            "about 1 year".to_string()
        } else {
            format!("about {} years", years)
        }
    };

    if future {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn note(title: &str, content: &str) -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            content_plain: strip_tags(content),
            created_at: now,
            updated_at: now,
            is_archived: false,
            is_favorite: false,
            tags: Vec::new(),
            collections: Vec::new(),
        }
    }

    #[test]
    fn test_strip_tags_simple() {
        assert_eq!(strip_tags("<p>Buy milk</p>"), "Buy milk");
    }

    #[test]
    fn test_strip_tags_nested_and_attributes() {
        let html = r#"<div class="x"><ul><li><strong>one</strong></li><li>two<br/></li></ul></div>"#;
        assert_eq!(strip_tags(html), "onetwo");
    }

    #[test]
    fn test_strip_tags_leaves_plain_text_and_entities() {
        assert_eq!(strip_tags("no markup here"), "no markup here");
        assert_eq!(strip_tags("<p>a &amp; b</p>"), "a &amp; b");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn test_search_is_case_insensitive_on_plain_text() {
        let n = note("Groceries", "<p>Buy milk</p>");
        assert!(matches_search(&n, "milk"));
        assert!(matches_search(&n, "MILK"));
        assert!(!matches_search(&n, "bread"));
    }

    #[test]
    fn test_search_matches_title() {
        let n = note("Groceries", "<p>Buy milk</p>");
        assert!(matches_search(&n, "grocer"));
    }

    #[test]
    fn test_search_does_not_match_markup() {
        let n = note("Doc", "<p>text</p>");
        assert!(!matches_search(&n, "<p>"));
    }

    #[test]
    fn test_empty_query_returns_all() {
        let notes = vec![note("a", "x"), note("b", "y")];
        assert_eq!(search_notes(&notes, "").len(), 2);
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_sanitize_html_drops_script() {
        let cleaned = sanitize_html("<p>ok</p><script>alert(1)</script>");
        assert!(cleaned.contains("<p>ok</p>"));
        assert!(!cleaned.contains("script"));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_relative_time_bands() {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::seconds(10), now), "less than a minute ago");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::minutes(60), now), "about 1 hour ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "about 3 hours ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_time(now + Duration::minutes(5), now), "in 5 minutes");
    }
}
