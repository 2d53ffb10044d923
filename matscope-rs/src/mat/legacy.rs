//! Level 5 backend built on the `matfile` crate.
//!
//! `matfile` parses MATLAB v5/v6/v7 files (including zlib-compressed
//! variables) and converts their numeric arrays. It does not surface char,
//! struct or cell arrays, nor the logical flag; those come from walking the
//! element stream in [`level5`](super::level5), which also fixes the variable
//! order. Sparse and object arrays are skipped with a warning.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use matfile::{Array as MatArray, MatFile as RawMatFile, NumericData};

use super::header::{MatHeader, MatVersion, HEADER_LEN};
use super::level5::{self, ArrayClass};
use crate::array::{Dtype, NumericArray};
use crate::error::ParseCause;
use crate::value::{Mapping, Value};

/// Descriptive header text, stored under `__header__`.
pub const HEADER_KEY: &str = "__header__";
/// Format version, stored under `__version__`.
pub const VERSION_KEY: &str = "__version__";
/// Names of global variables, stored under `__globals__`.
pub const GLOBALS_KEY: &str = "__globals__";

/// Keys the Level 5 loader adds to describe the file itself.
pub const RESERVED_KEYS: [&str; 3] = [HEADER_KEY, VERSION_KEY, GLOBALS_KEY];

/// Why the Level 5 backend did not produce a result.
#[derive(Debug)]
pub enum LegacyError {
    /// The file is a v7.3 file; another backend must handle it.
    Unsupported,
    /// The file could not be parsed.
    Failed(ParseCause),
}

impl From<ParseCause> for LegacyError {
    fn from(cause: ParseCause) -> Self {
        LegacyError::Failed(cause)
    }
}

impl From<std::io::Error> for LegacyError {
    fn from(e: std::io::Error) -> Self {
        LegacyError::Failed(ParseCause::Io(e))
    }
}

/// Load every variable from a Level 5 file.
///
/// The returned mapping starts with the three reserved metadata entries,
/// followed by the variables in file order.
pub fn load(path: &Path) -> Result<Mapping, LegacyError> {
    let bytes = fs::read(path)?;

    let header = MatHeader::parse(&bytes).map_err(|e| ParseCause::malformed(e.to_string()))?;
    if header.mat_version() == MatVersion::V73 {
        return Err(LegacyError::Unsupported);
    }

    let mat_file = RawMatFile::parse(bytes.as_slice())
        .map_err(|e| ParseCause::Legacy(e.to_string()))?;
    let numeric: HashMap<&str, &MatArray> = mat_file
        .arrays()
        .iter()
        .map(|array| (array.name(), array))
        .collect();

    let mut variables = Mapping::new();
    variables.insert(HEADER_KEY, Value::text(header.text.clone()));
    variables.insert(VERSION_KEY, Value::text(header.version_string()));
    variables.insert(
        GLOBALS_KEY,
        Value::Array(NumericArray::empty(Dtype::Double, &[0])),
    );

    let body = bytes.get(HEADER_LEN..).unwrap_or_default();
    for variable in level5::variables(body, header.endian)? {
        let value = match (variable.value, variable.class) {
            (Some(value), _) => value,
            (None, ArrayClass::Numeric(_)) => match numeric.get(variable.name.as_str()) {
                Some(array) => Value::Array(convert_array(array, variable.is_logical)?),
                None => {
                    log::warn!("skipping '{}': numeric data not found", variable.name);
                    continue;
                }
            },
            (None, class) => {
                log::warn!(
                    "skipping '{}': {} arrays are not supported",
                    variable.name,
                    class.name()
                );
                continue;
            }
        };
        log::debug!("loaded Level 5 variable '{}' ({})", variable.name, variable.class.name());
        variables.insert(variable.name, value);
    }

    Ok(variables)
}

/// Convert one `matfile` array, keeping MATLAB's column-major layout.
fn convert_array(array: &MatArray, is_logical: bool) -> Result<NumericArray, ParseCause> {
    let shape: Vec<usize> = array.size().iter().map(|&x| x as usize).collect();
    let (dtype, real, imag) = extract_numeric_data(array.data());
    let dtype = if is_logical { Dtype::Logical } else { dtype };
    let mismatch = || {
        ParseCause::malformed(format!(
            "variable '{}' has {} elements for shape {:?}",
            array.name(),
            array_len(array.data()),
            shape
        ))
    };

    let mut out = NumericArray::from_column_major(dtype, &shape, real).ok_or_else(mismatch)?;
    if let Some(imag) = imag {
        let imag = NumericArray::from_column_major(dtype, &shape, imag).ok_or_else(mismatch)?;
        out = out.with_imag(imag.real().clone()).ok_or_else(mismatch)?;
    }
    Ok(out)
}

fn to_f64<T: Copy + Into<f64>>(data: &[T]) -> Vec<f64> {
    data.iter().map(|&x| x.into()).collect()
}

// 64-bit integers do not convert losslessly into f64.
fn wide_to_f64<T: Copy>(data: &[T], f: impl Fn(T) -> f64) -> Vec<f64> {
    data.iter().map(|&x| f(x)).collect()
}

fn extract_numeric_data(data: &NumericData) -> (Dtype, Vec<f64>, Option<Vec<f64>>) {
    match data {
        NumericData::Double { real, imag } => {
            (Dtype::Double, real.clone(), imag.clone())
        }
        NumericData::Single { real, imag } => {
            (Dtype::Single, to_f64(real), imag.as_deref().map(to_f64))
        }
        NumericData::Int8 { real, imag } => {
            (Dtype::Int8, to_f64(real), imag.as_deref().map(to_f64))
        }
        NumericData::Int16 { real, imag } => {
            (Dtype::Int16, to_f64(real), imag.as_deref().map(to_f64))
        }
        NumericData::Int32 { real, imag } => {
            (Dtype::Int32, to_f64(real), imag.as_deref().map(to_f64))
        }
        NumericData::Int64 { real, imag } => (
            Dtype::Int64,
            wide_to_f64(real, |x| x as f64),
            imag.as_deref().map(|i| wide_to_f64(i, |x| x as f64)),
        ),
        NumericData::UInt8 { real, imag } => {
            (Dtype::UInt8, to_f64(real), imag.as_deref().map(to_f64))
        }
        NumericData::UInt16 { real, imag } => {
            (Dtype::UInt16, to_f64(real), imag.as_deref().map(to_f64))
        }
        NumericData::UInt32 { real, imag } => {
            (Dtype::UInt32, to_f64(real), imag.as_deref().map(to_f64))
        }
        NumericData::UInt64 { real, imag } => (
            Dtype::UInt64,
            wide_to_f64(real, |x| x as f64),
            imag.as_deref().map(|i| wide_to_f64(i, |x| x as f64)),
        ),
    }
}

fn array_len(data: &NumericData) -> usize {
    match data {
        NumericData::Double { real, .. } => real.len(),
        NumericData::Single { real, .. } => real.len(),
        NumericData::Int8 { real, .. } => real.len(),
        NumericData::Int16 { real, .. } => real.len(),
        NumericData::Int32 { real, .. } => real.len(),
        NumericData::Int64 { real, .. } => real.len(),
        NumericData::UInt8 { real, .. } => real.len(),
        NumericData::UInt16 { real, .. } => real.len(),
        NumericData::UInt32 { real, .. } => real.len(),
        NumericData::UInt64 { real, .. } => real.len(),
    }
}
