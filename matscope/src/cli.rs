//! Command-line argument definitions using clap derive macros.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use matscope_rs::{InspectOptions, Layout};

/// Print the variables inside MATLAB .mat files.
///
/// matscope reads Level 5 (v5/v6/v7) and, when built with the `hdf5`
/// feature, v7.3 files, then prints every variable with its type, shape and
/// either a value preview or summary statistics.
#[derive(Parser, Debug)]
#[command(name = "matscope")]
#[command(author, version, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Args {
    /// Input .mat file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// How to lay out the listing
    #[arg(short, long, value_enum, default_value = "tree")]
    pub layout: LayoutArg,

    /// Log loader decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Listing layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// Every entry with data previews, metadata included
    Tree,
    /// One line per variable with statistics, metadata hidden
    Summary,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Tree => Layout::Tree,
            LayoutArg::Summary => Layout::Summary,
        }
    }
}

impl Args {
    /// Inspector options for the chosen layout.
    pub fn inspect_options(&self) -> InspectOptions {
        match self.layout {
            LayoutArg::Tree => InspectOptions::tree(),
            LayoutArg::Summary => InspectOptions::summary(),
        }
    }

    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

/// Example usage shown in --help.
const EXAMPLES: &str = r#"
EXAMPLES:
    # Show every entry with a preview of its values
    matscope recording.mat

    # One line per variable with mean and max
    matscope --layout summary recording.mat

    # See how the loader picked a format
    matscope -v recording.mat
"#;
