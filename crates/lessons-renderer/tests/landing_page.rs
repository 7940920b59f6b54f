use lessons_renderer::{ConversionOptions, convert};

const LANDING: &str = r#"# Bashing through Bash

A hands-on course for people who have never opened a terminal.

## Lessons

1. [Welcome to the Terminal](01-welcome-to-the-terminal.md)
2. [Reading and Searching Files](03-reading-and-searching-files.md)
3. [The manual](https://www.gnu.org/software/bash/manual/)

## How to use this course

```
> cd ~/lessons
```
"#;

#[test]
fn landing_page_gets_hash_links_anchors_and_shell_blocks() {
    let fragment = convert(LANDING, ConversionOptions::REWRITE_LESSON_LINKS);
    let html = &fragment.html;

    assert!(html.starts_with(r#"<h1 id="bashing-through-bash">Bashing through Bash</h1>"#));
    assert!(html.contains(r##"<a href="#lesson-01">Welcome to the Terminal</a>"##));
    assert!(html.contains(r##"<a href="#lesson-03">Reading and Searching Files</a>"##));
    assert!(html.contains(r#"<a href="https://www.gnu.org/software/bash/manual/">The manual</a>"#));
    assert!(html.contains(r#"<h2 id="how-to-use-this-course">How to use this course</h2>"#));
    assert!(html.contains(r#"<pre><code class="language-bash">&gt; cd ~/lessons"#));
    assert!(html.ends_with("</code></pre>"));

    let ids: Vec<_> = fragment.anchors.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(
        ids,
        ["bashing-through-bash", "lessons", "how-to-use-this-course"]
    );
}

#[test]
fn lesson_pages_keep_file_links() {
    let fragment = convert(LANDING, ConversionOptions::empty());
    assert!(fragment.html.contains(r#"href="01-welcome-to-the-terminal.md""#));
}
