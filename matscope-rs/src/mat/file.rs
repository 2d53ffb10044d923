//! Format dispatch and the loaded file.
//!
//! [`load`] tries the Level 5 backend first. When that backend reports the
//! file as unsupported (it is a v7.3 file), loading falls back to the HDF5
//! backend, which is only available with the `hdf5` feature.

use std::path::{Path, PathBuf};

use super::header::MatVersion;
use super::legacy::{self, LegacyError, RESERVED_KEYS};
use crate::error::{Error, Result};
use crate::value::{Mapping, Value};

/// Name of the capability needed for v7.3 files.
pub const HDF5_CAPABILITY: &str = "hdf5";

/// A loaded MAT file: its variables, in file order.
///
/// # Example
///
/// ```no_run
/// use matscope_rs::load;
///
/// let file = load("session.mat")?;
/// for (name, value) in file.iter() {
///     println!("{}: {:?}", name, value);
/// }
/// # Ok::<(), matscope_rs::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ParsedFile {
    variables: Mapping,
    version: MatVersion,
    path: PathBuf,
}

impl ParsedFile {
    /// Assemble a file from already loaded parts.
    pub fn new(path: impl Into<PathBuf>, version: MatVersion, variables: Mapping) -> Self {
        ParsedFile {
            variables,
            version,
            path: path.into(),
        }
    }

    /// Get a variable by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// All names, including reserved metadata keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.keys()
    }

    /// Names of data variables, excluding reserved metadata keys.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|name| !is_reserved(name))
    }

    /// Iterate over all entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter()
    }

    /// The variables as a mapping.
    pub fn variables(&self) -> &Mapping {
        &self.variables
    }

    /// Number of entries, including reserved metadata keys.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the file has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Container generation the file was read as.
    pub fn version(&self) -> MatVersion {
        self.version
    }

    /// Path the file was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the file, returning the root mapping.
    pub fn into_value(self) -> Value {
        Value::Struct(self.variables)
    }
}

impl IntoIterator for ParsedFile {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.into_iter()
    }
}

/// Whether `name` is one of the metadata keys Level 5 loads add.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_KEYS.contains(&name)
}

/// Load a MAT file, detecting its format.
///
/// # Errors
///
/// - [`Error::NotFound`] if `path` does not exist
/// - [`Error::MissingCapability`] if the file is v7.3 and the `hdf5` feature
///   is disabled
/// - [`Error::ParseFailure`] for anything else that goes wrong
pub fn load(path: impl AsRef<Path>) -> Result<ParsedFile> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::not_found(path));
    }

    match legacy::load(path) {
        Ok(variables) => Ok(ParsedFile::new(path, MatVersion::Level5, variables)),
        Err(LegacyError::Unsupported) => {
            log::info!(
                "'{}' is a v7.3 (HDF5) MAT file, switching backend",
                path.display()
            );
            load_v73(path)
        }
        Err(LegacyError::Failed(cause)) => Err(Error::parse_failure(path, cause)),
    }
}

#[cfg(feature = "hdf5")]
fn load_v73(path: &Path) -> Result<ParsedFile> {
    let variables =
        super::v73::load(path).map_err(|cause| Error::parse_failure(path, cause))?;
    Ok(ParsedFile::new(path, MatVersion::V73, variables))
}

#[cfg(not(feature = "hdf5"))]
fn load_v73(path: &Path) -> Result<ParsedFile> {
    Err(Error::missing_capability(path, HDF5_CAPABILITY))
}
