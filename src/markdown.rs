use pulldown_cmark::{html, Event, Options, Parser};

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_GFM);
    options
}

/// Renders post Markdown. Raw HTML in the source is escaped rather than
/// passed through, since bodies come from a remote host.
pub fn render_markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, markdown_options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html_out = String::new();
    html::push_html(&mut html_out, parser);
    html_out
}

#[cfg(test)]
mod tests {
    use super::render_markdown_to_html;

    #[test]
    fn renders_gfm_tables_and_strikethrough() {
        let output = render_markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~");
        assert!(output.contains("<table>"));
        assert!(output.contains("<del>old</del>"));
    }

    #[test]
    fn fenced_code_keeps_language_class() {
        let output = render_markdown_to_html("```rust\nfn main() {}\n```");
        assert!(output.contains(r#"<code class="language-rust">"#));
    }

    #[test]
    fn raw_html_is_escaped() {
        let output = render_markdown_to_html("<script>alert(1)</script>\n\nhi <b>there</b>");
        assert!(!output.contains("<script>"));
        assert!(output.contains("&lt;script&gt;"));
        assert!(!output.contains("<b>"));
    }
}
