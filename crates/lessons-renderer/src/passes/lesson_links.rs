const HREF_OPEN: &str = "href=\"";

/// Rewrite `href="NN-slug.md"` into `href="#lesson-NN"`.
///
/// `NN` is exactly two ASCII digits, the slug is any non-empty run without a
/// quote, and the value must end in `.md`. Anything else (external URLs,
/// anchors, `.md#section`, three-digit prefixes) is left as it is.
pub fn rewrite_lesson_links(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find(HREF_OPEN) {
        let value_start = start + HREF_OPEN.len();
        out.push_str(&rest[..value_start]);
        let value_and_rest = &rest[value_start..];
        match value_and_rest.find('"') {
            Some(value_len) => {
                let value = &value_and_rest[..value_len];
                match lesson_number(value) {
                    Some(number) => {
                        out.push_str("#lesson-");
                        out.push_str(number);
                    }
                    None => out.push_str(value),
                }
                out.push('"');
                rest = &value_and_rest[value_len + 1..];
            }
            None => {
                rest = value_and_rest;
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

fn lesson_number(value: &str) -> Option<&str> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() > "NN-.md".len()
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'-'
        && value.ends_with(".md");
    shaped.then(|| &value[..2])
}
