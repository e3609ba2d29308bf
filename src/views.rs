use chrono::NaiveDate;
use htmlescape::{encode_attribute, encode_minimal};

use crate::config::ListingConfig;
use crate::content_loader::SiteTemplates;
use crate::markdown::render_markdown_to_html;
use crate::models::{Post, ResumeFrontMatter};
use crate::posts::PostListController;
use crate::text::{display_date, experience_since, preview, reading_time_label};

pub const DEFAULT_POST_TITLE: &str = "Blog Post";

const HOT_RELOAD_SCRIPT: &str = r#"
<script>
    const socket = new WebSocket("ws://" + window.location.host + "/ws");
    socket.onmessage = (event) => {
        if (event.data === "reload") {
            window.location.reload();
        }
    };
</script>
"#;

pub fn render_with_layout(
    templates: &SiteTemplates,
    title: &str,
    content: &str,
    is_development: bool,
) -> String {
    let title = encode_minimal(title);
    let mut page = fill_placeholders(
        &templates.layout_html,
        &[
            ("{{ title }}", title.as_str()),
            ("{{ banner }}", templates.banner_html.as_str()),
            ("{{ content }}", content),
        ],
    );

    if is_development {
        page = page.replace("</body>", &format!("{}</body>", HOT_RELOAD_SCRIPT));
    }

    page
}

/// Substitutes every placeholder in one left-to-right scan, so text coming
/// from one value is never read as another placeholder.
fn fill_placeholders(layout: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(layout.len());
    let mut rest = layout;
    while let Some((at, key, value)) = values
        .iter()
        .filter_map(|&(key, value)| rest.find(key).map(|at| (at, key, value)))
        .min_by_key(|&(at, _, _)| at)
    {
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }
    out.push_str(rest);
    out
}

fn post_href(post: &Post) -> String {
    format!("/blog/{}", encode_attribute(&post.filename))
}

fn post_card(post: &Post, listing: &ListingConfig) -> String {
    let snippet = preview(post.body(), listing.preview_chars, listing.preview_lines);
    format!(
        concat!(
            "<article class=\"post-card\">",
            "<header><h3>{title}</h3><time>{date}</time></header>",
            "<div class=\"preview\">{preview}</div>",
            "<footer><a href=\"{href}\">Read Full Post</a>",
            "<span class=\"reading-time\">{minutes}</span></footer>",
            "</article>"
        ),
        title = encode_minimal(&post.title),
        date = encode_minimal(&display_date(post.published_at(), &post.date)),
        preview = render_markdown_to_html(&snippet),
        href = post_href(post),
        minutes = reading_time_label(post.body(), listing.words_per_minute),
    )
}

/// Previous/next links with a "Page x of y" label. URLs are 1-based.
fn pagination(controller: &PostListController) -> String {
    let current = controller.page_index().saturating_add(1);
    let previous = if controller.has_previous() {
        format!("<a class=\"previous\" href=\"/?page={}\">Previous</a>", current - 1)
    } else {
        "<span class=\"previous disabled\">Previous</span>".to_string()
    };
    let next = if controller.has_next() {
        format!(
            "<a class=\"next\" href=\"/?page={}\">Next</a>",
            current.saturating_add(1)
        )
    } else {
        "<span class=\"next disabled\">Next</span>".to_string()
    };
    format!(
        "<nav class=\"pagination\">{previous}<span class=\"position\">Page {current} of {}</span>{next}</nav>",
        controller.page_count().max(1)
    )
}

pub fn post_list(
    templates: &SiteTemplates,
    controller: &PostListController,
    listing: &ListingConfig,
) -> String {
    let cards = controller.current_page();
    let list = if cards.is_empty() {
        "<p class=\"no-posts\">No posts yet.</p>".to_string()
    } else {
        cards.iter().map(|post| post_card(post, listing)).collect()
    };

    format!(
        "<section class=\"hero\">{}</section><section class=\"posts\"><h2>Latest Blog Posts</h2>{}</section>{}",
        templates.home_html,
        list,
        pagination(controller)
    )
}

pub fn post_detail(post: &Post, listing: &ListingConfig) -> String {
    format!(
        concat!(
            "<article class=\"post\">",
            "<header><a href=\"/\">Back to Home</a>",
            "<p class=\"meta\"><time>{date}</time> &bull; <span class=\"reading-time\">{minutes}</span></p>",
            "<h1>{title}</h1></header>",
            "<div class=\"content\">{body}</div>",
            "</article>"
        ),
        date = encode_minimal(&display_date(post.published_at(), &post.date)),
        minutes = reading_time_label(post.body(), listing.words_per_minute),
        title = encode_minimal(&post.title),
        body = render_markdown_to_html(post.body()),
    )
}

pub fn not_found(templates: &SiteTemplates, filename: &str) -> String {
    templates
        .not_found_html
        .replace("{{ filename }}", &encode_minimal(filename))
}

pub fn resume(templates: &SiteTemplates, today: NaiveDate) -> String {
    let person = &templates.resume;
    let experience = person
        .career_start
        .map(|start| {
            format!(
                "<p class=\"experience\">Experience: {}</p>",
                experience_since(start, today)
            )
        })
        .unwrap_or_default();

    format!(
        concat!(
            "<article class=\"resume\">",
            "<header><h1>{name}</h1><p class=\"designation\">{designation}</p>{experience}",
            "<a class=\"vcard\" href=\"/resume.vcf\">Save contact</a></header>",
            "{body}",
            "</article>"
        ),
        name = encode_minimal(&person.name),
        designation = encode_minimal(&person.designation),
        experience = experience,
        body = templates.resume_html,
    )
}

/// vCard 3.0 for the résumé owner. The last word of the name is the family
/// name.
pub fn vcard(person: &ResumeFrontMatter) -> String {
    let (given, family) = match person.name.trim().rsplit_once(' ') {
        Some((given, family)) => (given, family),
        None => (person.name.trim(), ""),
    };

    let mut card = String::from("BEGIN:VCARD\r\nVERSION:3.0\r\n");
    card.push_str(&format!("N:{family};{given}\r\n"));
    card.push_str(&format!("FN:{}\r\n", person.name.trim()));
    let fields = [
        ("ORG", &person.organization),
        ("TITLE", &person.designation),
        ("EMAIL;TYPE=INTERNET", &person.email),
        ("TEL;TYPE=voice,work,pref,CELL", &person.phone),
    ];
    for (key, value) in fields {
        if !value.is_empty() {
            card.push_str(&format!("{key}:{value}\r\n"));
        }
    }
    if !person.address.is_empty() {
        card.push_str(&format!("ADR:;;{}\r\n", person.address));
    }
    card.push_str("END:VCARD\r\n");
    card
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> SiteTemplates {
        SiteTemplates {
            layout_html: "<html><head><title>{{ title }}</title></head><body>{{ banner }}<main>{{ content }}</main></body></html>".to_string(),
            banner_html: "<nav>banner</nav>".to_string(),
            ..SiteTemplates::default()
        }
    }

    #[test]
    fn layout_escapes_title_and_leaves_content_placeholders_alone() {
        let page = render_with_layout(&templates(), "Rust & <You>", "<p>{{ title }}</p>", false);
        assert!(page.contains("<title>Rust &amp; &lt;You&gt;</title>"));
        assert!(page.contains("<main><p>{{ title }}</p></main>"));
        assert!(!page.contains("WebSocket"));
    }

    #[test]
    fn placeholder_text_in_title_is_not_expanded() {
        let page = render_with_layout(&templates(), "{{ content }}", "<p>body</p>", false);
        assert!(page.contains("<title>{{ content }}</title>"));
        assert_eq!(page.matches("<p>body</p>").count(), 1);
        assert!(page.contains("<main><p>body</p></main>"));
    }

    #[test]
    fn development_layout_injects_reload_script() {
        let page = render_with_layout(&templates(), "t", "", true);
        assert!(page.contains("new WebSocket"));
        assert!(page.ends_with("</script>\n</body></html>"));
    }

    #[test]
    fn detail_shows_reading_time_and_rendered_body() {
        let post = Post {
            title: "Hello".to_string(),
            date: "2024-03-01".to_string(),
            filename: "hello.md".to_string(),
            deleted: false,
            content: Some("# Heading\n\nBody text".to_string()),
        };
        let html = post_detail(&post, &ListingConfig::default());
        assert!(html.contains("<time>Mar 01, 2024</time>"));
        assert!(html.contains("1 min read"));
        assert!(html.contains("<h1>Heading</h1>"));
    }

    #[test]
    fn vcard_splits_name_and_skips_empty_fields() {
        let person = ResumeFrontMatter {
            name: "Ada Lovelace".to_string(),
            designation: "Analyst".to_string(),
            email: "ada@example.com".to_string(),
            ..ResumeFrontMatter::default()
        };
        let card = vcard(&person);
        assert!(card.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(card.contains("N:Lovelace;Ada\r\n"));
        assert!(card.contains("TITLE:Analyst\r\n"));
        assert!(card.contains("EMAIL;TYPE=INTERNET:ada@example.com\r\n"));
        assert!(!card.contains("ORG:"));
        assert!(!card.contains("ADR:"));
        assert!(card.ends_with("END:VCARD\r\n"));
    }

    #[test]
    fn resume_reports_experience() {
        let mut site = templates();
        site.resume.name = "Ada Lovelace".to_string();
        site.resume.career_start = NaiveDate::from_ymd_opt(2024, 1, 1);
        let today = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        assert!(resume(&site, today).contains("Experience: 10 Days"));
    }
}
