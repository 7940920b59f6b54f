//! What the assistant is told about the page the learner is looking at.

use std::fmt;

/// Longest page text sent with a request, in characters.
pub const MAX_PAGE_TEXT: usize = 12_000;

const TRUNCATED_MARKER: &str = "\n\n[Content truncated.]";

pub const LESSON_INDEX: [(&str, &str); 12] = [
    ("lesson-01", "Welcome to the Terminal"),
    ("lesson-02", "Files and Directories"),
    ("lesson-03", "Reading and Searching Files"),
    ("lesson-04", "Pipes and Redirection"),
    ("lesson-05", "Permissions and Ownership"),
    ("lesson-06", "Your First Bash Script"),
    ("lesson-07", "Conditionals and Logic"),
    ("lesson-08", "Loops and Iteration"),
    ("lesson-09", "Functions and Script Organisation"),
    ("lesson-10", "Text Processing Power Tools"),
    ("lesson-11", "Process Management and Job Control"),
    ("lesson-12", "Real-World Scripting"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageId {
    #[default]
    Landing,
    Lesson(u8),
}

impl PageId {
    /// Resolve a location fragment (with or without the leading `#`).
    ///
    /// Only `lesson-` followed by exactly two digits names a lesson; anything
    /// else, the empty fragment included, is the landing page.
    pub fn from_hash(hash: &str) -> Self {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        match hash.strip_prefix("lesson-") {
            Some(digits) if digits.len() == 2 && digits.bytes().all(|b| b.is_ascii_digit()) => {
                digits.parse().map(PageId::Lesson).unwrap_or_default()
            }
            _ => PageId::Landing,
        }
    }

    pub fn is_landing(&self) -> bool {
        matches!(self, PageId::Landing)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageId::Landing => write!(f, "landing"),
            PageId::Lesson(n) => write!(f, "lesson-{n:02}"),
        }
    }
}

/// A link target on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub page: PageId,
    /// Level 2 and 3 headings that carry an id.
    pub headings: Vec<Heading>,
    /// The visible text of the page.
    pub text: String,
}

impl PageContext {
    pub fn new(page: PageId, headings: Vec<Heading>, text: impl Into<String>) -> Self {
        Self {
            page,
            headings,
            text: text.into(),
        }
    }

    /// Page text trimmed and cut to [`MAX_PAGE_TEXT`] characters.
    pub fn page_text(&self) -> String {
        let text = self.text.trim();
        match text.char_indices().nth(MAX_PAGE_TEXT) {
            Some((cut, _)) => format!("{}{TRUNCATED_MARKER}", &text[..cut]),
            None => text.to_string(),
        }
    }

    pub fn system_prompt(&self) -> String {
        let heading_list = self
            .headings
            .iter()
            .map(|h| format!("{} -> {}", h.id, h.text))
            .collect::<Vec<_>>()
            .join("\n");
        let lesson_list = LESSON_INDEX
            .iter()
            .map(|(id, title)| format!("{id} -> {title}"))
            .collect::<Vec<_>>()
            .join("; ");

        format!(
            "You are a helpful assistant for the \"Bashing through Bash\" course. \
             Answer using ONLY the provided course content. \
             When you refer to another lesson, use a markdown link: [Lesson N: Title](#lesson-NN). \
             When you refer to a section on the current page, use [Section title](#heading-id). \
             Use only hash links (e.g. #lesson-03 or #navigating-the-filesystem).\n\n\
             Current page: {page}.\n\
             Headings on this page (for links):\n{heading_list}\n\n\
             Lesson index: {lesson_list}\n\n\
             ---\nContent of current page:\n\n{content}",
            page = self.page,
            content = self.page_text(),
        )
    }
}
