//! Recursive, human-readable rendering of loaded values.
//!
//! An [`Inspector`] walks a [`Value`] depth first and produces one line per
//! visited value, indented two spaces per nesting level. Two layouts are
//! available, see [`Layout`].
//!
//! Rendering never fails: every [`Value`] variant has a rendering, and
//! variables the loader could not represent are simply absent.
//!
//! # Example
//!
//! ```no_run
//! use matscope_rs::{load, InspectOptions, Inspector};
//!
//! let file = load("session.mat")?;
//! let inspector = Inspector::new(InspectOptions::summary());
//! for line in inspector.render_file(&file) {
//!     println!("{}", line);
//! }
//! # Ok::<(), matscope_rs::Error>(())
//! ```

mod format;
mod options;
mod summary;
mod tree;

pub use format::{flat_values, format_element, shape_tuple, Preview};
pub use options::{InspectOptions, Layout};

use crate::mat::{is_reserved, ParsedFile};
use crate::value::{Mapping, Value};

/// Renders values as indented text lines.
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    options: InspectOptions,
}

impl Inspector {
    /// Create an inspector with the given options.
    pub fn new(options: InspectOptions) -> Self {
        Inspector { options }
    }

    /// The options in use.
    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    /// Render one value named `name` at nesting level `depth`.
    ///
    /// At depth 0 a reserved metadata name renders nothing when
    /// `skip_reserved` is set.
    pub fn render(&self, value: &Value, name: &str, depth: usize) -> Vec<String> {
        let mut out = Vec::new();
        if depth == 0 && self.skips(name) {
            return out;
        }
        self.visit(&mut out, value, name, depth);
        out
    }

    /// Render every top-level entry of a file at depth 0, in file order.
    pub fn render_file(&self, file: &ParsedFile) -> Vec<String> {
        self.render_entries(file.variables(), 0)
    }

    /// Render the entries of a mapping at `depth`, treating them as top-level
    /// entries for reserved-name filtering.
    pub fn render_entries(&self, entries: &Mapping, depth: usize) -> Vec<String> {
        let mut out = Vec::new();
        for (name, value) in entries.iter() {
            if self.skips(name) {
                continue;
            }
            self.visit(&mut out, value, name, depth);
        }
        out
    }

    /// Print [`render`](Self::render) output to stdout.
    pub fn print(&self, value: &Value, name: &str, depth: usize) {
        for line in self.render(value, name, depth) {
            println!("{}", line);
        }
    }

    /// Print [`render_file`](Self::render_file) output to stdout.
    pub fn print_file(&self, file: &ParsedFile) {
        for line in self.render_file(file) {
            println!("{}", line);
        }
    }

    fn skips(&self, name: &str) -> bool {
        self.options.skip_reserved && is_reserved(name)
    }

    fn visit(&self, out: &mut Vec<String>, value: &Value, name: &str, depth: usize) {
        match self.options.layout {
            Layout::Tree => tree::visit(out, &self.options, value, name, depth),
            Layout::Summary => summary::visit(out, &self.options, value, name, depth),
        }
    }
}

/// Print `value` as a tree with default options.
pub fn inspect(value: &Value, name: &str, depth: usize) {
    Inspector::default().print(value, name, depth);
}

/// Indentation for a nesting level.
fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
