//! v7.3 backend built on the `hdf5` crate.
//!
//! MATLAB v7.3 files are HDF5 files: variables are datasets or groups,
//! annotated with a `MATLAB_class` attribute. HDF5 stores datasets in
//! row-major order with MATLAB's dimensions reversed, so every array read
//! here has its axes reversed to restore MATLAB's logical order.

use std::path::Path;

use hdf5::types::{FixedAscii, FloatSize, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Dataset, Group, H5Type, Location};
use ndarray::{ArrayD, IxDyn};

use crate::array::{Dtype, NumericArray};
use crate::error::ParseCause;
use crate::value::{Mapping, StructArray, Value};

const CLASS_ATTR: &str = "MATLAB_class";
const EMPTY_ATTR: &str = "MATLAB_empty";

/// Root groups MATLAB uses for bookkeeping: referenced objects and
/// classdef/function-handle state.
const HIDDEN_GROUPS: [&str; 2] = ["#refs#", "#subsystem#"];

type Result<T> = std::result::Result<T, ParseCause>;

/// Complex element as MATLAB writes it: a compound of `real` and `imag`.
#[derive(H5Type, Clone, Copy, Debug)]
#[repr(C)]
struct ComplexPair {
    real: f64,
    imag: f64,
}

/// Load every variable from a v7.3 file.
///
/// The file is opened read-only and closed when this function returns,
/// whether or not conversion succeeded.
pub fn load(path: &Path) -> Result<Mapping> {
    let file = hdf5::File::open(path)?;
    let variables = convert_group(&file)?;
    log::debug!(
        "loaded {} v7.3 variables from '{}'",
        variables.len(),
        path.display()
    );
    Ok(variables)
}

/// Recursively convert a group's members.
fn convert_group(group: &Group) -> Result<Mapping> {
    let mut mapping = Mapping::new();

    for name in group.member_names()? {
        if HIDDEN_GROUPS.contains(&name.as_str()) {
            log::debug!("skipping '{}/{}': MATLAB bookkeeping group", group.name(), name);
            continue;
        }

        if let Ok(sub_group) = group.group(&name) {
            let value = match matlab_class(&sub_group).as_deref() {
                Some("struct") => Value::StructArray(convert_struct(&sub_group)?),
                _ => Value::Struct(convert_group(&sub_group)?),
            };
            mapping.insert(name, value);
        } else if let Ok(dataset) = group.dataset(&name) {
            match convert_dataset(&dataset)? {
                Some(value) => {
                    mapping.insert(name, value);
                }
                None => {
                    log::warn!("skipping '{}': unsupported dataset type", dataset.name());
                }
            }
        } else {
            log::warn!("skipping '{}/{}': not a group or dataset", group.name(), name);
        }
    }

    Ok(mapping)
}

/// Convert a struct-class group.
///
/// A scalar struct stores each field as a plain member. A struct array
/// stores each field as a dataset of object references into `#refs#`,
/// shaped like the array. References are not followed, so a struct array
/// keeps its shape but loses its fields.
fn convert_struct(group: &Group) -> Result<StructArray> {
    for name in group.member_names()? {
        let Ok(field) = group.dataset(&name) else {
            continue;
        };
        if is_reference(&field) {
            let shape = matlab_shape(&field.shape());
            log::warn!(
                "'{}' is a {:?} struct array of object references; fields not loaded",
                group.name(),
                shape
            );
            return Ok(StructArray::new(shape));
        }
    }

    Ok(StructArray::scalar(convert_group(group)?))
}

/// Convert a dataset, or `None` if its type has no [`Value`] counterpart.
fn convert_dataset(dataset: &Dataset) -> Result<Option<Value>> {
    let class = matlab_class(dataset);

    if is_empty_marker(dataset) {
        // The dataset holds the MATLAB dimensions instead of data.
        let dims: Vec<u64> = dataset.read_raw()?;
        let shape: Vec<usize> = dims.iter().map(|&d| d as usize).collect();
        return Ok(match class.as_deref() {
            Some("char") => Some(Value::text("")),
            Some("struct") => Some(Value::StructArray(StructArray::new(shape))),
            other => {
                let dtype = other.and_then(Dtype::from_matlab_class).unwrap_or(Dtype::Double);
                Some(Value::Array(NumericArray::empty(dtype, &shape)))
            }
        });
    }

    if class.as_deref() == Some("char") {
        let units: Vec<u16> = dataset.read_raw()?;
        return Ok(Some(Value::text(String::from_utf16_lossy(&units))));
    }

    let Ok(descriptor) = dataset.dtype()?.to_descriptor() else {
        return Ok(None);
    };

    let shape = dataset.shape();
    let value = match descriptor {
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) if shape.is_empty() => {
            Value::int(dataset.read_scalar::<i64>()?)
        }
        TypeDescriptor::Float(_) if shape.is_empty() => {
            Value::float(dataset.read_scalar::<f64>()?)
        }
        TypeDescriptor::VarLenUnicode if shape.is_empty() => {
            Value::text(dataset.read_scalar::<VarLenUnicode>()?.as_str())
        }
        TypeDescriptor::VarLenAscii if shape.is_empty() => {
            Value::text(dataset.read_scalar::<VarLenAscii>()?.as_str())
        }
        TypeDescriptor::Integer(_)
        | TypeDescriptor::Unsigned(_)
        | TypeDescriptor::Float(_)
        | TypeDescriptor::Boolean => {
            let dtype = class
                .as_deref()
                .and_then(Dtype::from_matlab_class)
                .unwrap_or_else(|| dtype_of(&descriptor));
            let data: Vec<f64> = dataset.read_raw()?;
            Value::Array(NumericArray::new(dtype, transposed(&shape, data)?))
        }
        TypeDescriptor::Compound(ref compound) if is_complex(compound) => {
            let dtype = class
                .as_deref()
                .and_then(Dtype::from_matlab_class)
                .unwrap_or(Dtype::Double);
            let pairs: Vec<ComplexPair> = dataset.read_raw()?;
            let real = pairs.iter().map(|p| p.real).collect();
            let imag = pairs.iter().map(|p| p.imag).collect();
            let array = NumericArray::new(dtype, transposed(&shape, real)?)
                .with_imag(transposed(&shape, imag)?)
                .ok_or_else(|| ParseCause::malformed("complex parts differ in shape"))?;
            Value::Array(array)
        }
        _ => return Ok(None),
    };

    Ok(Some(value))
}

/// Shape the row-major data read from disk and reverse its axes.
fn transposed(disk_shape: &[usize], data: Vec<f64>) -> Result<ArrayD<f64>> {
    let array = ArrayD::from_shape_vec(IxDyn(disk_shape), data)
        .map_err(|e| ParseCause::malformed(format!("shape error: {}", e)))?;
    Ok(array.reversed_axes())
}

/// MATLAB dimensions of an HDF5 dataset shape.
fn matlab_shape(disk_shape: &[usize]) -> Vec<usize> {
    disk_shape.iter().rev().copied().collect()
}

/// `hdf5` has no type descriptor for object references, so a dataset whose
/// type cannot be described is taken to hold them.
fn is_reference(dataset: &Dataset) -> bool {
    dataset
        .dtype()
        .and_then(|dtype| dtype.to_descriptor())
        .is_err()
}

fn dtype_of(descriptor: &TypeDescriptor) -> Dtype {
    use hdf5::types::IntSize;

    match descriptor {
        TypeDescriptor::Integer(IntSize::U1) => Dtype::Int8,
        TypeDescriptor::Integer(IntSize::U2) => Dtype::Int16,
        TypeDescriptor::Integer(IntSize::U4) => Dtype::Int32,
        TypeDescriptor::Integer(IntSize::U8) => Dtype::Int64,
        TypeDescriptor::Unsigned(IntSize::U1) => Dtype::UInt8,
        TypeDescriptor::Unsigned(IntSize::U2) => Dtype::UInt16,
        TypeDescriptor::Unsigned(IntSize::U4) => Dtype::UInt32,
        TypeDescriptor::Unsigned(IntSize::U8) => Dtype::UInt64,
        TypeDescriptor::Float(FloatSize::U4) => Dtype::Single,
        TypeDescriptor::Boolean => Dtype::Logical,
        _ => Dtype::Double,
    }
}

fn is_complex(compound: &hdf5::types::CompoundType) -> bool {
    let names: Vec<&str> = compound.fields.iter().map(|f| f.name.as_str()).collect();
    names == ["real", "imag"]
}

/// The `MATLAB_class` attribute, if present and readable.
fn matlab_class(location: &Location) -> Option<String> {
    let attr = location.attr(CLASS_ATTR).ok()?;
    let class = attr.read_scalar::<FixedAscii<32>>().ok()?;
    Some(class.as_str().to_string())
}

fn is_empty_marker(location: &Location) -> bool {
    location
        .attr(EMPTY_ATTR)
        .and_then(|attr| attr.read_scalar::<u8>())
        .map_or(false, |flag| flag != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dataset_axes_are_reversed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.h5");

        {
            let file = hdf5::File::create(&path).unwrap();
            let data: Vec<f64> = (0..6).map(f64::from).collect();
            file.new_dataset::<f64>()
                .shape((2, 3))
                .create("A")
                .unwrap()
                .write_raw(&data)
                .unwrap();
        }

        let vars = load(&path).unwrap();
        let array = vars.get("A").and_then(Value::as_array).unwrap();

        assert_eq!(array.shape(), &[3, 2]);
        // Disk element [0, 1] is logical element [1, 0].
        assert_eq!(array.get(&[1, 0]), Some((1.0, 0.0)));
        assert_eq!(array.get(&[0, 1]), Some((3.0, 0.0)));
    }

    #[test]
    fn test_groups_and_scalars() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested.h5");

        {
            let file = hdf5::File::create(&path).unwrap();
            let group = file.create_group("meta").unwrap();
            group
                .new_dataset::<i64>()
                .shape(())
                .create("count")
                .unwrap()
                .write_scalar(&7i64)
                .unwrap();
            let label: VarLenUnicode = "trial".parse().unwrap();
            group
                .new_dataset::<VarLenUnicode>()
                .shape(())
                .create("label")
                .unwrap()
                .write_scalar(&label)
                .unwrap();
        }

        let vars = load(&path).unwrap();
        let meta = vars.get("meta").and_then(Value::as_struct).unwrap();

        assert_eq!(meta.get("count"), Some(&Value::int(7)));
        assert_eq!(meta.get("label"), Some(&Value::text("trial")));
    }

    #[test]
    fn test_struct_class_group() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("struct.h5");

        {
            let file = hdf5::File::create(&path).unwrap();
            let group = file.create_group("s").unwrap();
            let class: FixedAscii<32> = FixedAscii::from_ascii(b"struct").unwrap();
            group
                .new_attr::<FixedAscii<32>>()
                .shape(())
                .create(CLASS_ATTR)
                .unwrap()
                .write_scalar(&class)
                .unwrap();
            group
                .new_dataset::<f64>()
                .shape((1, 1))
                .create("fs")
                .unwrap()
                .write_raw(&[8000.0])
                .unwrap();
        }

        let vars = load(&path).unwrap();
        let s = vars.get("s").and_then(Value::as_struct_array).unwrap();
        assert!(s.is_scalar());
        assert_eq!(s.field_names().collect::<Vec<_>>(), vec!["fs"]);
    }

    #[test]
    fn test_reference_field_shape() {
        // A 1x3 struct array stores its reference datasets as (3, 1) on disk.
        assert_eq!(matlab_shape(&[3, 1]), vec![1, 3]);
        assert_eq!(matlab_shape(&[2, 4, 5]), vec![5, 4, 2]);

        let array = StructArray::new(matlab_shape(&[3, 1]));
        assert_eq!(array.shape(), &[1, 3]);
        assert_eq!(array.len(), 3);
        assert!(!array.is_scalar());
        assert_eq!(array.field_names().count(), 0);
    }

    #[test]
    fn test_bookkeeping_groups_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.h5");

        {
            let file = hdf5::File::create(&path).unwrap();
            for hidden in HIDDEN_GROUPS {
                file.create_group(hidden)
                    .unwrap()
                    .new_dataset::<f64>()
                    .shape((1, 1))
                    .create("a")
                    .unwrap()
                    .write_raw(&[1.0])
                    .unwrap();
            }
            file.new_dataset::<f64>()
                .shape((1, 1))
                .create("x")
                .unwrap()
                .write_raw(&[2.0])
                .unwrap();
        }

        let vars = load(&path).unwrap();
        assert_eq!(vars.keys().collect::<Vec<_>>(), vec!["x"]);
    }
}
