use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// One entry of the remote `posts.json` index. `content` is filled in later
/// by hydration and is never part of the index itself.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub title: String,
    pub date: String,
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub deleted: bool,
    #[serde(skip)]
    pub content: Option<String>,
}

impl Post {
    pub fn is_visible(&self) -> bool {
        !self.deleted
    }

    /// Parsed publication date, `None` when the index carries something we
    /// cannot read.
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        parse_post_date(&self.date)
    }

    pub fn body(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Hand-edited indexes sometimes carry `"deleted": null`; read it as not deleted.
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

pub fn parse_post_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct HomeFrontMatter {
    pub title: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ResumeFrontMatter {
    pub name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub career_start: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_defaults_to_false() {
        let posts: Vec<Post> = serde_json::from_str(
            r#"[{"title":"A","date":"2024-01-01","filename":"a.md"},
                {"title":"B","date":"2024-02-01","filename":"b.md","deleted":true}]"#,
        )
        .unwrap();
        assert!(posts[0].is_visible());
        assert!(!posts[1].is_visible());
        assert_eq!(posts[0].content, None);
    }

    #[test]
    fn null_deleted_flag_means_visible() {
        let posts: Vec<Post> = serde_json::from_str(
            r#"[{"title":"A","date":"2024-01-01","filename":"a.md"},
                {"title":"B","date":"2024-02-01","filename":"b.md","deleted":null}]"#,
        )
        .unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(Post::is_visible));
    }

    #[test]
    fn parses_plain_dates_and_timestamps() {
        let plain = parse_post_date("2024-03-01").unwrap();
        assert_eq!(plain.to_string(), "2024-03-01 00:00:00");

        let rfc = parse_post_date("2024-03-01T10:30:00Z").unwrap();
        assert_eq!(rfc.to_string(), "2024-03-01 10:30:00");

        let local = parse_post_date("2024-03-01T10:30:00").unwrap();
        assert_eq!(local, rfc);

        assert_eq!(parse_post_date("last tuesday"), None);
    }
}
