//! Summary layout.
//!
//! ```text
//! - M | Type: float64 | Shape: (3, 3) | Mean: 0.33, Max: 1.00
//! - v | Type: float64 | Shape: (1, 3) | Values: [1, 2, 3]
//! - cfg | Type: struct array | Shape: (1, 1)
//!   [Nested Struct Detected]
//!   - fs | Type: float | Shape: Scalar
//! ```

use super::format::{flat_values, shape_tuple};
use super::{indent, InspectOptions};
use crate::array::NumericArray;
use crate::value::{StructArray, Value};

const SCALAR_SHAPE: &str = "Scalar";

pub(super) fn visit(
    out: &mut Vec<String>,
    options: &InspectOptions,
    value: &Value,
    name: &str,
    depth: usize,
) {
    match value {
        Value::Scalar(scalar) => {
            out.push(line(depth, name, scalar.type_name(), SCALAR_SHAPE, None));
        }
        Value::Array(array) => {
            let summary = summarize(array, options.summary_threshold);
            out.push(line(
                depth,
                name,
                array.type_name(),
                &shape_tuple(array.shape()),
                summary.as_deref(),
            ));
        }
        Value::Struct(mapping) => {
            out.push(line(depth, name, "struct", SCALAR_SHAPE, None));
            for (key, child) in mapping.iter() {
                visit(out, options, child, key, depth + 1);
            }
        }
        Value::StructArray(array) => {
            out.push(line(
                depth,
                name,
                "struct array",
                &shape_tuple(array.shape()),
                None,
            ));
            out.push(format!("{}  [Nested Struct Detected]", indent(depth)));
            visit_fields(out, options, array, depth + 1);
        }
    }
}

fn visit_fields(out: &mut Vec<String>, options: &InspectOptions, array: &StructArray, depth: usize) {
    for field in array.fields() {
        if array.is_scalar() {
            // A 1x1 container: show the field's only value directly.
            if let Some(value) = field.elements.first() {
                visit(out, options, value, &field.name, depth);
            }
            continue;
        }

        out.push(line(
            depth,
            &field.name,
            "struct field",
            &shape_tuple(array.shape()),
            None,
        ));
        for (index, value) in field.elements.iter().enumerate() {
            let element_name = format!("{}[{}]", field.name, index);
            visit(out, options, value, &element_name, depth + 1);
        }
    }
}

/// Literal values for small arrays, mean and max for larger numeric ones.
fn summarize(array: &NumericArray, threshold: usize) -> Option<String> {
    if array.len() < threshold {
        return Some(format!("Values: {}", flat_values(array)));
    }
    if !array.is_numeric() {
        return None;
    }
    let mean = array.mean()?;
    let max = array.max()?;
    Some(format!("Mean: {:.2}, Max: {:.2}", mean, max))
}

fn line(depth: usize, name: &str, type_name: &str, shape: &str, summary: Option<&str>) -> String {
    let mut text = format!(
        "{}- {} | Type: {} | Shape: {}",
        indent(depth),
        name,
        type_name,
        shape
    );
    if let Some(summary) = summary {
        text.push_str(" | ");
        text.push_str(summary);
    }
    text
}
