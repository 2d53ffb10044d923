//! # matscope-rs
//!
//! Load MATLAB `.mat` files and print what is inside them.
//!
//! Both container formats MATLAB writes are handled behind one call:
//! Level 5 files (v5, v6, v7) through the `matfile` crate, and HDF5-based
//! v7.3 files through the `hdf5` crate when the `hdf5` feature is enabled.
//! The result is a tree of [`Value`]s that an [`Inspector`] renders as
//! indented text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use matscope_rs::{load, InspectOptions, Inspector, Result};
//!
//! fn main() -> Result<()> {
//!     let file = load("recording.mat")?;
//!
//!     for name in file.variable_names() {
//!         println!("found {}", name);
//!     }
//!
//!     Inspector::new(InspectOptions::tree()).print_file(&file);
//!     Ok(())
//! }
//! ```
//!
//! For a quick look during debugging, [`print_summary`] loads and prints in
//! one step and reports failures as a message instead of an error:
//!
//! ```no_run
//! matscope_rs::print_summary("recording.mat");
//! ```
//!
//! ## Dimension Order
//!
//! Arrays always use MATLAB's dimension order. HDF5 stores MATLAB arrays
//! with their dimensions reversed; the v7.3 loader reverses them back.
//!
//! ## Feature Flags
//!
//! - `hdf5`: Enable loading v7.3 files (needs the HDF5 C library). Without
//!   it, v7.3 files fail with [`Error::MissingCapability`].

#![deny(missing_docs)]

mod array;
mod error;
pub mod inspect;
pub mod mat;
mod report;
mod value;

pub use array::{Dtype, NumericArray};
pub use error::{Error, ErrorKind, ParseCause, Result};
pub use inspect::{inspect, InspectOptions, Inspector, Layout};
pub use mat::{is_reserved, load, MatVersion, ParsedFile, RESERVED_KEYS};
pub use report::{print_summary, print_tree, render_report};
pub use value::{Mapping, Scalar, StructArray, StructField, Value};

// Re-exported so callers can work with array data without a version clash.
pub use ndarray;
