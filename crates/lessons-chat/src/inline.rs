//! Inline renderer for assistant replies.
//!
//! Supports exactly: `**bold**`, `` `code` ``, blank-line paragraph breaks,
//! single-newline line breaks and `[text](#fragment)` links. Nothing nests. The
//! input is HTML-escaped before any of it is interpreted, and a link is only
//! produced for targets starting with `#`, so the output can carry neither
//! markup from the model nor navigation away from the page. Unmatched
//! delimiters stay as literal text.

use pulldown_cmark_escape::{FmtWriter, escape_html_body_text};

/// Characters that may start one of the recognised forms.
const SPECIAL: [char; 4] = ['*', '`', '\n', '['];

/// Render one assistant reply into safe HTML wrapped in a single paragraph.
///
/// Empty input renders to an empty string.
pub fn render_chat_markdown(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut escaped = String::with_capacity(input.len() + input.len() / 8);
    // writing into a String cannot fail
    let _ = escape_html_body_text(FmtWriter(&mut escaped), input);
    let text = collapse_blank_lines(&escaped);

    let mut out = String::with_capacity(text.len() + 16);
    out.push_str("<p>");

    let mut rest = text.as_str();
    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix("**") {
            if let Some(end) = inner.find("**") {
                out.push_str("<strong>");
                out.push_str(&inner[..end]);
                out.push_str("</strong>");
                rest = &inner[end + 2..];
                continue;
            }
        }
        if let Some(inner) = rest.strip_prefix('`') {
            if let Some(end) = inner.find('`') {
                out.push_str("<code>");
                out.push_str(&inner[..end]);
                out.push_str("</code>");
                rest = &inner[end + 1..];
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix("\n\n") {
            out.push_str("</p><p>");
            rest = after;
            continue;
        }
        if let Some(after) = rest.strip_prefix('\n') {
            out.push_str("<br>");
            rest = after;
            continue;
        }
        if let Some(link) = FragmentLink::parse(rest) {
            out.push_str("<a href=\"");
            out.push_str(link.target);
            out.push_str("\">");
            out.push_str(link.text);
            out.push_str("</a>");
            rest = &rest[link.consumed..];
            continue;
        }

        // copy the current character and everything up to the next candidate
        let first = rest.chars().next().map_or(1, char::len_utf8);
        let run = rest[first..]
            .find(SPECIAL)
            .map_or(rest.len(), |n| n + first);
        out.push_str(&rest[..run]);
        rest = &rest[run..];
    }

    out.push_str("</p>");
    out
}

/// Runs of two or more newlines become exactly one blank line.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            continue;
        }
        push_newlines(&mut out, newlines);
        newlines = 0;
        out.push(c);
    }
    push_newlines(&mut out, newlines);
    out
}

fn push_newlines(out: &mut String, count: usize) {
    match count {
        0 => {}
        1 => out.push('\n'),
        _ => out.push_str("\n\n"),
    }
}

/// `[text](#target)` at the start of the input.
struct FragmentLink<'a> {
    text: &'a str,
    target: &'a str,
    consumed: usize,
}

impl<'a> FragmentLink<'a> {
    fn parse(s: &'a str) -> Option<Self> {
        let body = s.strip_prefix('[')?;
        let close_bracket = body.find(']')?;
        let after = &body[close_bracket + 1..];
        let fragment = after.strip_prefix("(#")?;
        let close_paren = fragment.find(')')?;
        // `(` plus `#` plus the fragment itself
        let target = &after[1..2 + close_paren];
        if target.chars().any(breaks_attribute) {
            return None;
        }
        Some(Self {
            text: &body[..close_bracket],
            target,
            consumed: 1 + close_bracket + 1 + 2 + close_paren + 1,
        })
    }
}

/// Characters that would let a target escape its quoted `href` value.
fn breaks_attribute(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | '`')
}
