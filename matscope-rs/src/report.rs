//! One-call load-and-print entry points for interactive use.
//!
//! These never fail: any error from loading is turned into a single
//! `Error: ...` line. Use [`load`](crate::load) and
//! [`Inspector`](crate::Inspector) directly when the error matters.

use std::path::Path;

use crate::inspect::{InspectOptions, Inspector, Layout};
use crate::mat::load;

/// Produce the full report for `path` as lines.
///
/// The layout decides the body: summary layout lists top-level variables at
/// depth 0, tree layout nests them under a root line named after the file.
pub fn render_report(path: impl AsRef<Path>, options: &InspectOptions) -> Vec<String> {
    let path = path.as_ref();
    let mut lines = vec![format!("--- Parsing: {} ---", path.display())];

    let file = match load(path) {
        Ok(file) => file,
        Err(e) => {
            log::debug!("report for '{}' failed: {:?}", path.display(), e);
            lines.push(format!("Error: {}", e));
            return lines;
        }
    };

    let inspector = Inspector::new(options.clone());
    lines.push(String::new());
    match options.layout {
        Layout::Summary => {
            lines.push("[File Summary]".to_string());
            lines.extend(inspector.render_file(&file));
        }
        Layout::Tree => {
            lines.push("[File Tree]".to_string());
            let root = file
                .path()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Root".to_string());
            lines.push(format!("+ {} (struct)", root));
            lines.extend(inspector.render_entries(file.variables(), 1));
        }
    }
    lines.push(String::new());
    lines.push("--- Done ---".to_string());
    lines
}

/// Load `path` and print a summary of every variable, hiding file metadata.
///
/// Errors are printed, not returned.
pub fn print_summary(path: impl AsRef<Path>) {
    print_report(path, &InspectOptions::summary());
}

/// Load `path` and print every entry as a tree with value previews.
///
/// Errors are printed, not returned.
pub fn print_tree(path: impl AsRef<Path>) {
    print_report(path, &InspectOptions::tree());
}

fn print_report(path: impl AsRef<Path>, options: &InspectOptions) {
    for line in render_report(path, options) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reports_error() {
        let lines = render_report("/nonexistent/file.mat", &InspectOptions::summary());

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "--- Parsing: /nonexistent/file.mat ---");
        assert!(lines[1].starts_with("Error: File not found"));
    }

    #[test]
    fn test_print_summary_does_not_panic_on_errors() {
        print_summary("/nonexistent/file.mat");
        print_tree("/nonexistent/file.mat");
    }
}
