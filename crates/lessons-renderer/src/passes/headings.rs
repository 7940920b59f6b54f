/// Longest id a heading can receive, in characters.
pub const MAX_SLUG_LEN: usize = 50;

/// A heading that received an anchor id.
///
/// Ids are not unique: two headings with the same text get the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingAnchor {
    pub level: u8,
    pub text: String,
    pub id: String,
}

impl HeadingAnchor {
    /// The heading as a reader sees it, with the engine's escapes undone.
    pub fn plain_text(&self) -> String {
        decode_entities(&self.text)
    }
}

/// Undo the entity escapes the engine writes into text: `&amp;`, `&lt;`,
/// `&gt;` and `&quot;`. Anything else starting with `&` is left alone.
pub fn decode_entities(html: &str) -> String {
    const ENTITIES: [(&str, char); 4] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
    ];
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Lowercase, drop everything outside `[a-z0-9\s-]`, turn whitespace runs
/// into a single `-`, and cut to [`MAX_SLUG_LEN`].
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
            in_whitespace = false;
        }
    }
    // only ASCII survives the filter above, so byte length is char length
    slug.truncate(MAX_SLUG_LEN);
    slug
}

/// Give an `id` to every `<hN>text</hN>` whose content is a single run of
/// plain text.
///
/// Headings that already carry attributes (an `id` included) or that contain
/// any nested markup are copied through untouched.
pub fn add_heading_ids(html: &str) -> (String, Vec<HeadingAnchor>) {
    let mut out = String::with_capacity(html.len() + 64);
    let mut anchors = Vec::new();
    let mut rest = html;

    while let Some(start) = rest.find("<h") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match plain_heading(candidate) {
            Some((level, text, consumed)) => {
                let id = slugify(text);
                out.push_str(&format!("<h{level} id=\"{id}\">{text}</h{level}>"));
                anchors.push(HeadingAnchor {
                    level,
                    text: text.to_string(),
                    id,
                });
                rest = &candidate[consumed..];
            }
            None => {
                out.push_str("<h");
                rest = &candidate[2..];
            }
        }
    }
    out.push_str(rest);

    (out, anchors)
}

/// Match `<hN>TEXT</hN>` at the start of `s`, where TEXT is non-empty and has
/// no `<`. Returns the level, the text, and the byte length of the match.
fn plain_heading(s: &str) -> Option<(u8, &str, usize)> {
    let bytes = s.as_bytes();
    let level = match bytes.get(2) {
        Some(b @ b'1'..=b'6') => b - b'0',
        _ => return None,
    };
    if bytes.get(3) != Some(&b'>') {
        return None;
    }
    let body = &s[4..];
    let text_len = body.find('<')?;
    if text_len == 0 {
        return None;
    }
    let close = format!("</h{level}>");
    if !body[text_len..].starts_with(&close) {
        return None;
    }
    Some((level, &body[..text_len], 4 + text_len + close.len()))
}
