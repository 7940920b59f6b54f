//! Lessons renderer
//!
//! Turns the lesson Markdown sources into the HTML fragments of the single-page
//! lesson site. Each document goes through the CommonMark engine once and then
//! through a fixed series of narrow post-processing passes over the generated
//! HTML (heading anchors, shell-prompt code classes, lesson link rewriting).
//!

use bitflags::bitflags;
use std::path::PathBuf;

pub mod convert;
pub mod passes;
pub mod site;

pub use convert::{HtmlFragment, convert, plain_text};
pub use passes::HeadingAnchor;
pub use site::{LessonDocument, SiteBuilder};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct ConversionOptions: u32 {
        /// Rewrite `NN-slug.md` links into `#lesson-NN` hash links.
        /// Only the landing document sets this.
        const REWRITE_LESSON_LINKS = 1 << 0;
    }
}

impl ConversionOptions {
    pub fn rewrite_links(&self) -> bool {
        self.contains(Self::REWRITE_LESSON_LINKS)
    }
}

pub fn default_md_options() -> pulldown_cmark::Options {
    pulldown_cmark::Options::ENABLE_TABLES
        | pulldown_cmark::Options::ENABLE_STRIKETHROUGH
        | pulldown_cmark::Options::ENABLE_TASKLISTS
        | pulldown_cmark::Options::ENABLE_GFM
}

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum RenderError {
    #[error("Lesson file not found: {sequence:02}-*.md in {}", root.display())]
    #[diagnostic(
        code(lessons::site::missing_lesson),
        help("every sequence from 00 to 12 needs a matching NN-<slug>.md file")
    )]
    MissingLesson { sequence: u8, root: PathBuf },

    #[error("failed to read {}", path.display())]
    #[diagnostic(code(lessons::site::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    #[diagnostic(code(lessons::site::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
