//! Post-processing passes over engine-generated HTML.
//!
//! These are deliberately narrow text scans, not an HTML transform. Each pass
//! recognises exactly one shape of markup and copies everything else through
//! byte for byte, so content written against these shapes keeps rendering the
//! same way.

pub mod code_blocks;
pub mod headings;
pub mod lesson_links;

pub use code_blocks::mark_shell_blocks;
pub use headings::{HeadingAnchor, add_heading_ids, decode_entities, slugify};
pub use lesson_links::rewrite_lesson_links;
