const PLAIN_BLOCK_OPEN: &str = "<pre><code>";
const SHELL_BLOCK_OPEN: &str = "<pre><code class=\"language-bash\">";

/// Tag unlabeled code blocks whose first non-whitespace character is the `>`
/// shell prompt with `language-bash`.
///
/// Only the bare `<pre><code>` opening is considered, so blocks that already
/// carry a class are never touched. The prompt is accepted both as a literal
/// `>` and in the `&gt;` form the engine escapes it to.
pub fn mark_shell_blocks(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find(PLAIN_BLOCK_OPEN) {
        out.push_str(&rest[..start]);
        let body = &rest[start + PLAIN_BLOCK_OPEN.len()..];
        if starts_with_prompt(body) {
            out.push_str(SHELL_BLOCK_OPEN);
        } else {
            out.push_str(PLAIN_BLOCK_OPEN);
        }
        rest = body;
    }
    out.push_str(rest);
    out
}

fn starts_with_prompt(body: &str) -> bool {
    let trimmed = body.trim_start();
    trimmed.starts_with('>') || trimmed.starts_with("&gt;")
}
