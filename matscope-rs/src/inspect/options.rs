//! Inspector configuration.

/// How values are laid out when printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Tree with `*`/`+` markers and a numeric preview block under arrays.
    #[default]
    Tree,
    /// One `- name | Type | Shape | summary` line per value, with small
    /// arrays listed and larger ones reduced to mean and max.
    Summary,
}

/// Configuration for an [`Inspector`](super::Inspector).
///
/// # Example
///
/// ```
/// use matscope_rs::{InspectOptions, Layout};
///
/// let options = InspectOptions::summary().summary_threshold(8);
/// assert_eq!(options.layout, Layout::Summary);
/// assert!(options.skip_reserved);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectOptions {
    /// Output layout.
    pub layout: Layout,

    /// Skip the reserved metadata keys at the top level.
    pub skip_reserved: bool,

    /// Maximum preview rows (elements, for 1-D arrays).
    pub preview_rows: usize,

    /// Maximum preview columns.
    pub preview_cols: usize,

    /// Decimal places in preview cells.
    pub precision: usize,

    /// Arrays with fewer elements than this list their values in summary
    /// layout; larger ones report mean and max.
    pub summary_threshold: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        InspectOptions {
            layout: Layout::Tree,
            skip_reserved: false,
            preview_rows: 10,
            preview_cols: 10,
            precision: 4,
            summary_threshold: 5,
        }
    }
}

impl InspectOptions {
    /// Create options with default values (tree layout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree layout showing every entry, reserved keys included.
    pub fn tree() -> Self {
        Self::default()
    }

    /// Summary layout with reserved keys hidden.
    pub fn summary() -> Self {
        Self::default().layout(Layout::Summary).skip_reserved(true)
    }

    /// Set the layout.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set whether reserved metadata keys are skipped.
    pub fn skip_reserved(mut self, skip: bool) -> Self {
        self.skip_reserved = skip;
        self
    }

    /// Set the preview block size.
    pub fn preview(mut self, rows: usize, cols: usize) -> Self {
        self.preview_rows = rows;
        self.preview_cols = cols;
        self
    }

    /// Set the preview precision.
    pub fn precision(mut self, digits: usize) -> Self {
        self.precision = digits;
        self
    }

    /// Set the element count below which values are listed.
    pub fn summary_threshold(mut self, n: usize) -> Self {
        self.summary_threshold = n;
        self
    }
}
