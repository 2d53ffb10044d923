//! MAT file loading.
//!
//! Two on-disk formats are supported behind a single [`load`] call:
//!
//! - Level 5 MAT files (MATLAB v5, v6, v7, including compressed variables).
//!   Numeric arrays are read with the `matfile` crate; char, struct and cell
//!   arrays are decoded from the element stream directly
//! - HDF5-based v7.3 files, read with the `hdf5` crate when the `hdf5`
//!   feature is enabled
//!
//! Whatever the source, arrays come back with MATLAB's dimension order: a
//! variable created as `zeros(3, 4)` has shape `[3, 4]`.
//!
//! # Not Supported
//!
//! - Level 4 MAT files
//! - Sparse and object (classdef) variables in Level 5 files, skipped with a
//!   warning
//! - Object references in v7.3 files (cell arrays, struct arrays with more
//!   than one element): struct arrays keep their shape but not their fields

mod file;
mod header;
mod legacy;
mod level5;

#[cfg(feature = "hdf5")]
mod v73;

pub use file::{is_reserved, load, ParsedFile, HDF5_CAPABILITY};
pub use header::{Endian, HeaderError, MatHeader, MatVersion};
pub use legacy::{GLOBALS_KEY, HEADER_KEY, RESERVED_KEYS, VERSION_KEY};
