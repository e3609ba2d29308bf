//! Display fields derived from post content and dates.

use chrono::{NaiveDate, NaiveDateTime};

const ELLIPSIS: &str = "...";

/// First `max_lines` non-blank lines of `content`, cut to `max_chars`
/// characters. The ellipsis is appended whether or not anything was cut.
pub fn preview(content: &str, max_chars: usize, max_lines: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    let joined = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n");

    let mut out: String = joined.chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Estimated minutes to read `content`, never less than one.
pub fn reading_time(content: &str, words_per_minute: usize) -> usize {
    let words = content.split_whitespace().count();
    words.div_ceil(words_per_minute.max(1)).max(1)
}

pub fn reading_time_label(content: &str, words_per_minute: usize) -> String {
    format!("{} min read", reading_time(content, words_per_minute))
}

/// `Mar 01, 2024`. Unparseable dates are shown as they came in.
pub fn display_date(published_at: Option<NaiveDateTime>, raw: &str) -> String {
    match published_at {
        Some(date) => date.format("%b %d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// Coarse experience length between `start` and `today`: days under a month,
/// then months, then years and months. Months are counted as 30 days.
pub fn experience_since(start: NaiveDate, today: NaiveDate) -> String {
    let days = (today - start).num_days().unsigned_abs();

    if days < 30 {
        return format!("{days} Days");
    }

    let months = days / 30;
    let remaining_days = days % 30;
    if months < 12 {
        return if remaining_days > 0 {
            format!("{months}M+")
        } else {
            format!("{months}M")
        };
    }

    let years = months / 12;
    let remaining_months = months % 12;
    if remaining_months > 0 {
        format!("{years}Y {remaining_months}M")
    } else {
        format!("{years}Y")
    }
}
