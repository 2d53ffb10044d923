//! Numeric array values.
//!
//! [`NumericArray`] holds one MATLAB numeric or logical array. Data is kept
//! as `f64` in an [`ndarray::ArrayD`] whose axes are in MATLAB's logical
//! order, with the original element type remembered as a [`Dtype`].

use std::fmt;

use ndarray::{ArrayD, IxDyn, ShapeBuilder};

/// Element type of a MATLAB array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    /// 64-bit float (`double`).
    Double,
    /// 32-bit float (`single`).
    Single,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// Boolean (`logical`).
    Logical,
}

impl Dtype {
    /// Name used when printing, in numpy's vocabulary.
    pub fn name(self) -> &'static str {
        match self {
            Dtype::Double => "float64",
            Dtype::Single => "float32",
            Dtype::Int8 => "int8",
            Dtype::Int16 => "int16",
            Dtype::Int32 => "int32",
            Dtype::Int64 => "int64",
            Dtype::UInt8 => "uint8",
            Dtype::UInt16 => "uint16",
            Dtype::UInt32 => "uint32",
            Dtype::UInt64 => "uint64",
            Dtype::Logical => "bool",
        }
    }

    /// Whether values of this type are numbers. Logical arrays are not.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Dtype::Logical)
    }

    /// Map a `MATLAB_class` attribute value to a dtype.
    pub fn from_matlab_class(class: &str) -> Option<Self> {
        let dtype = match class {
            "double" => Dtype::Double,
            "single" => Dtype::Single,
            "int8" => Dtype::Int8,
            "int16" => Dtype::Int16,
            "int32" => Dtype::Int32,
            "int64" => Dtype::Int64,
            "uint8" => Dtype::UInt8,
            "uint16" => Dtype::UInt16,
            "uint32" => Dtype::UInt32,
            "uint64" => Dtype::UInt64,
            "logical" => Dtype::Logical,
            _ => return None,
        };
        Some(dtype)
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An n-dimensional numeric array, possibly complex.
///
/// The shape always follows MATLAB's convention: a 3×4 matrix saved from
/// MATLAB has shape `[3, 4]` here regardless of which file format it was
/// read from.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    dtype: Dtype,
    real: ArrayD<f64>,
    imag: Option<ArrayD<f64>>,
}

impl NumericArray {
    /// Wrap an already shaped array.
    pub fn new(dtype: Dtype, real: ArrayD<f64>) -> Self {
        NumericArray {
            dtype,
            real,
            imag: None,
        }
    }

    /// Build from column-major data, the layout MATLAB writes.
    ///
    /// Returns `None` if `data.len()` does not match the shape.
    pub fn from_column_major(dtype: Dtype, shape: &[usize], data: Vec<f64>) -> Option<Self> {
        let real = ArrayD::from_shape_vec(IxDyn(shape).f(), data).ok()?;
        Some(Self::new(dtype, real))
    }

    /// An array with no elements.
    pub fn empty(dtype: Dtype, shape: &[usize]) -> Self {
        Self::new(dtype, ArrayD::zeros(IxDyn(shape)))
    }

    /// Attach an imaginary part. Returns `None` on a shape mismatch.
    pub fn with_imag(mut self, imag: ArrayD<f64>) -> Option<Self> {
        if imag.shape() != self.real.shape() {
            return None;
        }
        self.imag = Some(imag);
        Some(self)
    }

    /// Element type.
    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    /// Dimension sizes.
    pub fn shape(&self) -> &[usize] {
        self.real.shape()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.real.ndim()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.real.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    /// Whether the array has an imaginary part.
    pub fn is_complex(&self) -> bool {
        self.imag.is_some()
    }

    /// Whether the elements are numbers (see [`Dtype::is_numeric`]).
    pub fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    /// Type tag used when printing, e.g. `float64` or `complex128`.
    pub fn type_name(&self) -> &'static str {
        match (self.is_complex(), self.dtype) {
            (true, Dtype::Single) => "complex64",
            (true, _) => "complex128",
            (false, dtype) => dtype.name(),
        }
    }

    /// Real part.
    pub fn real(&self) -> &ArrayD<f64> {
        &self.real
    }

    /// Imaginary part, if complex.
    pub fn imag(&self) -> Option<&ArrayD<f64>> {
        self.imag.as_ref()
    }

    /// Element at a logical index as `(re, im)`; `im` is zero for real data.
    pub fn get(&self, index: &[usize]) -> Option<(f64, f64)> {
        let re = *self.real.get(IxDyn(index))?;
        let im = match &self.imag {
            Some(imag) => *imag.get(IxDyn(index))?,
            None => 0.0,
        };
        Some((re, im))
    }

    /// Mean of the real part, or `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        self.real.mean()
    }

    /// Maximum of the real part. NaN propagates; `None` when empty.
    pub fn max(&self) -> Option<f64> {
        let mut iter = self.real.iter().copied();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, x| {
            if acc.is_nan() || x.is_nan() {
                f64::NAN
            } else {
                acc.max(x)
            }
        }))
    }
}
