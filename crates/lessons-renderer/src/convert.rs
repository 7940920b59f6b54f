use crate::ConversionOptions;
use crate::passes::{self, HeadingAnchor};
use pulldown_cmark::{Event, Parser, TagEnd, html};

/// One converted document, ready to be dropped into the page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlFragment {
    pub html: String,
    /// Headings that received an id during conversion, in document order.
    pub anchors: Vec<HeadingAnchor>,
}

/// Run a document through the engine and the post-processing passes.
///
/// The order is fixed: engine, heading ids, shell code classes, then lesson
/// link rewriting when the options ask for it. The result is trimmed.
pub fn convert(markdown: &str, options: ConversionOptions) -> HtmlFragment {
    let parser = Parser::new_ext(markdown, crate::default_md_options());
    let mut base = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut base, parser);

    let (with_ids, anchors) = passes::add_heading_ids(&base);
    let mut html = passes::mark_shell_blocks(&with_ids);
    if options.rewrite_links() {
        html = passes::rewrite_lesson_links(&html);
    }

    tracing::debug!(
        bytes = html.len(),
        anchors = anchors.len(),
        rewrite_links = options.rewrite_links(),
        "converted document"
    );

    HtmlFragment {
        html: html.trim().to_string(),
        anchors,
    }
}

/// The text a reader sees once the document is rendered: markup dropped,
/// one line per block, table cells separated by tabs.
pub fn plain_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());
    for event in Parser::new_ext(markdown, crate::default_md_options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(TagEnd::TableCell) => text.push('\t'),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableHead
                | TagEnd::TableRow,
            ) => {
                if !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            _ => {}
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> String {
        convert(input, ConversionOptions::empty()).html
    }

    #[test]
    fn heading_gets_anchor() {
        insta::assert_snapshot!(render("# Welcome"), @r#"<h1 id="welcome">Welcome</h1>"#);
    }

    #[test]
    fn shell_fence_gets_bash_class() {
        let output = render("```\n> ls -la\n```");
        assert_eq!(
            output,
            "<pre><code class=\"language-bash\">&gt; ls -la\n</code></pre>"
        );
    }

    #[test]
    fn labelled_fence_keeps_its_language() {
        let output = render("```python\n>>> print(1)\n```");
        assert!(output.starts_with("<pre><code class=\"language-python\">"));
        assert!(!output.contains("language-bash"));
    }

    #[test]
    fn plain_fence_is_unchanged() {
        let output = render("```\necho hello\n```");
        assert!(output.starts_with("<pre><code>echo hello"));
    }

    #[test]
    fn heading_with_inline_code_has_no_id() {
        let output = render("## Searching with `grep`");
        insta::assert_snapshot!(output, @"<h2>Searching with <code>grep</code></h2>");
    }

    #[test]
    fn links_only_rewritten_when_asked() {
        let input = "[Reading files](03-reading-and-searching-files.md)";
        assert_eq!(
            render(input),
            r#"<p><a href="03-reading-and-searching-files.md">Reading files</a></p>"#
        );
        let landing = convert(input, ConversionOptions::REWRITE_LESSON_LINKS).html;
        assert_eq!(landing, r##"<p><a href="#lesson-03">Reading files</a></p>"##);
    }

    #[test]
    fn anchors_are_reported_in_order() {
        let fragment = convert(
            "# Pipes\n\n## What is a pipe?\n\n### `tee`\n\n## Summary",
            ConversionOptions::empty(),
        );
        let ids: Vec<_> = fragment.anchors.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["pipes", "what-is-a-pipe", "summary"]);
        assert_eq!(fragment.anchors[1].level, 2);
    }

    #[test]
    fn tables_are_enabled() {
        let output = render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(output.starts_with("<table>"));
    }

    #[test]
    fn soft_breaks_stay_soft() {
        assert_eq!(render("one\ntwo"), "<p>one\ntwo</p>");
    }

    #[test]
    fn bare_urls_are_not_autolinked() {
        assert_eq!(
            render("See https://www.gnu.org/software/bash/ for more."),
            "<p>See https://www.gnu.org/software/bash/ for more.</p>"
        );
        assert_eq!(
            render("<https://www.gnu.org/>"),
            r#"<p><a href="https://www.gnu.org/">https://www.gnu.org/</a></p>"#
        );
    }

    #[test]
    fn plain_text_drops_markup() {
        let text = plain_text(
            "# Tips & Tricks\n\nUse `ls` and **bold** <b>now</b>.\n\n- one\n- two\n\n```\n> pwd\n```\n",
        );
        assert_eq!(text, "Tips & Tricks\nUse ls and bold now.\none\ntwo\n> pwd");
    }

    #[test]
    fn empty_document_is_empty_fragment() {
        assert_eq!(render(""), "");
        assert_eq!(render("   \n\n"), "");
    }
}
