//! The in-memory value tree produced by the loader.
//!
//! Every variable in a MAT file becomes a [`Value`]. The variant is decided
//! once, when the file is loaded, so consumers match on it instead of probing
//! runtime types.

use std::fmt;

use crate::array::NumericArray;

/// A single value in a loaded MAT file.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single number or string.
    Scalar(Scalar),
    /// A numeric or logical n-dimensional array.
    Array(NumericArray),
    /// A named collection of values (HDF5 group, file root).
    Struct(Mapping),
    /// A MATLAB struct array: elements addressable by named fields.
    StructArray(StructArray),
}

/// A scalar leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Floating point number.
    Float(f64),
    /// Integer.
    Int(i64),
    /// Text.
    Text(String),
}

impl Scalar {
    /// Type tag used when printing.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Float(_) => "float",
            Scalar::Int(_) => "int",
            Scalar::Text(_) => "str",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Int(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl Value {
    /// Shorthand for a text scalar.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Text(s.into()))
    }

    /// Shorthand for a float scalar.
    pub fn float(x: f64) -> Self {
        Value::Scalar(Scalar::Float(x))
    }

    /// Shorthand for an integer scalar.
    pub fn int(x: i64) -> Self {
        Value::Scalar(Scalar::Int(x))
    }

    /// The array, if this is one.
    pub fn as_array(&self) -> Option<&NumericArray> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// The mapping, if this is a plain struct.
    pub fn as_struct(&self) -> Option<&Mapping> {
        match self {
            Value::Struct(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// The struct array, if this is one.
    pub fn as_struct_array(&self) -> Option<&StructArray> {
        match self {
            Value::StructArray(array) => Some(array),
            _ => None,
        }
    }
}

impl From<NumericArray> for Value {
    fn from(array: NumericArray) -> Self {
        Value::Array(array)
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        Value::Struct(mapping)
    }
}

impl From<StructArray> for Value {
    fn from(array: StructArray) -> Self {
        Value::StructArray(array)
    }
}

/// Insertion-ordered name → value mapping.
///
/// Names are unique; inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Whether a name is present.
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (name, value) in iter {
            mapping.insert(name, value);
        }
        mapping
    }
}

/// One named field of a struct array.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    /// Field name.
    pub name: String,
    /// One value per struct element, in column-major element order.
    pub elements: Vec<Value>,
}

/// A MATLAB struct array.
///
/// A scalar MATLAB struct is a struct array of shape `[1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructArray {
    shape: Vec<usize>,
    fields: Vec<StructField>,
}

impl StructArray {
    /// Create an empty struct array of the given shape with no fields.
    pub fn new(shape: Vec<usize>) -> Self {
        StructArray {
            shape,
            fields: Vec::new(),
        }
    }

    /// Build a 1×1 struct array from a mapping of field values.
    pub fn scalar(fields: Mapping) -> Self {
        let fields = fields
            .into_iter()
            .map(|(name, value)| StructField {
                name,
                elements: vec![value],
            })
            .collect();
        StructArray {
            shape: vec![1, 1],
            fields,
        }
    }

    /// Add a field. Returns `None` if the element count does not match the
    /// shape.
    pub fn with_field(mut self, name: impl Into<String>, elements: Vec<Value>) -> Option<Self> {
        if elements.len() != self.len() {
            return None;
        }
        self.fields.push(StructField {
            name: name.into(),
            elements,
        });
        Some(self)
    }

    /// Dimension sizes.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of struct elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Whether the struct array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is a 1×1 container whose fields hold single values.
    pub fn is_scalar(&self) -> bool {
        self.shape == [1, 1]
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[StructField] {
        &self.fields
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// The fields of element `index` (column-major) as a mapping.
    pub fn element(&self, index: usize) -> Option<Mapping> {
        if index >= self.len() {
            return None;
        }
        Some(
            self.fields
                .iter()
                .map(|f| (f.name.clone(), f.elements[index].clone()))
                .collect(),
        )
    }
}
