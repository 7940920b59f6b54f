//! Site builder
//!
//! Reads the page template and the thirteen lesson sources from a directory,
//! converts each source into a fragment and substitutes the fragments into the
//! template. Every source is read and converted before anything is written, and
//! the output is swapped into place with a rename, so a failed build never
//! leaves a partial page behind.


use crate::{ConversionOptions, HtmlFragment, RenderError, convert};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const DEFAULT_TEMPLATE: &str = "index.template.html";
pub const DEFAULT_OUTPUT: &str = "index.html";

/// Sequence number of the landing document.
pub const LANDING: u8 = 0;
/// Sequence number of the last lesson. Lessons run from 01 up to this.
pub const LAST_LESSON: u8 = 12;

/// Appended to every lesson fragment, never to the landing page.
pub const LESSON_FOOTER: &str = r#"
<div class="lesson-complete-wrap">
  <button type="button" class="lesson-complete-btn" onclick="window.bashLessons.markComplete()">Mark lesson complete</button>
</div>
"#;

pub static LESSON_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<sequence>\d{2})-.*\.md$").unwrap());

/// A lesson source as read from disk.
#[derive(Debug, Clone)]
pub struct LessonDocument {
    pub sequence: u8,
    pub path: PathBuf,
    pub markdown: String,
}

impl LessonDocument {
    pub fn is_landing(&self) -> bool {
        self.sequence == LANDING
    }

    /// Template placeholder this document's fragment replaces.
    pub fn placeholder(&self) -> String {
        if self.is_landing() {
            "{{LANDING_HTML}}".to_string()
        } else {
            format!("{{{{LESSON_{:02}_HTML}}}}", self.sequence)
        }
    }

    pub fn options(&self) -> ConversionOptions {
        if self.is_landing() {
            ConversionOptions::REWRITE_LESSON_LINKS
        } else {
            ConversionOptions::empty()
        }
    }

    /// Convert the document, adding the completion footer to lessons.
    pub fn render(&self) -> HtmlFragment {
        let _span = tracing::debug_span!("render_lesson", sequence = self.sequence).entered();
        let mut fragment = convert(&self.markdown, self.options());
        if !self.is_landing() {
            fragment.html.push_str(LESSON_FOOTER);
        }
        fragment
    }
}

/// Find the source for `sequence`: the first `NN-*.md` name in sorted order.
pub fn lesson_path(root: &Path, sequence: u8, names: &[String]) -> Result<PathBuf, RenderError> {
    let wanted = format!("{sequence:02}");
    names
        .iter()
        .find(|name| {
            LESSON_FILE_RE
                .captures(name)
                .and_then(|caps| caps.name("sequence"))
                .is_some_and(|m| m.as_str() == wanted)
        })
        .map(|name| root.join(name))
        .ok_or_else(|| RenderError::MissingLesson {
            sequence,
            root: root.to_path_buf(),
        })
}

fn read_to_string(path: &Path) -> Result<String, RenderError> {
    fs::read_to_string(path).map_err(|source| RenderError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace every literal occurrence of each placeholder, in the given order.
pub fn substitute(template: &str, replacements: &[(String, String)]) -> String {
    let mut output = template.to_string();
    for (placeholder, value) in replacements {
        output = output.replace(placeholder.as_str(), value);
    }
    output
}

pub struct SiteBuilder {
    pub root: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
}

impl SiteBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            template: root.join(DEFAULT_TEMPLATE),
            output: root.join(DEFAULT_OUTPUT),
            root,
        }
    }

    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Read the landing document and every lesson, failing on the first one
    /// that is missing.
    pub fn load_documents(&self) -> Result<Vec<LessonDocument>, RenderError> {
        let entries = fs::read_dir(&self.root).map_err(|source| RenderError::Read {
            path: self.root.clone(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RenderError::Read {
                path: self.root.clone(),
                source,
            })?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();

        (LANDING..=LAST_LESSON)
            .map(|sequence| {
                let path = lesson_path(&self.root, sequence, &names)?;
                let markdown = read_to_string(&path)?;
                Ok(LessonDocument {
                    sequence,
                    path,
                    markdown,
                })
            })
            .collect()
    }

    /// Build the full page in memory.
    pub fn render(&self) -> Result<String, RenderError> {
        let template = read_to_string(&self.template)?;
        let documents = self.load_documents()?;

        let replacements: Vec<(String, String)> = documents
            .iter()
            .map(|doc| {
                tracing::debug!(path = %doc.path.display(), "converting");
                (doc.placeholder(), doc.render().html)
            })
            .collect();

        Ok(substitute(&template, &replacements))
    }

    /// Build the page and move it into place at the output path.
    pub fn run(&self) -> Result<PathBuf, RenderError> {
        let page = self.render()?;
        write_atomically(&self.output, &page)?;
        tracing::info!(output = %self.output.display(), bytes = page.len(), "site written");
        Ok(self.output.clone())
    }
}

fn write_atomically(dest: &Path, contents: &str) -> Result<(), RenderError> {
    let file_name = dest
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let staging = dest.with_file_name(format!(".{file_name}.tmp"));

    let write_err = |source| RenderError::Write {
        path: dest.to_path_buf(),
        source,
    };
    fs::write(&staging, contents).map_err(write_err)?;
    if let Err(source) = fs::rename(&staging, dest) {
        let _ = fs::remove_file(&staging);
        return Err(write_err(source));
    }
    Ok(())
}
