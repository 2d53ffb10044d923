//! Tree layout.
//!
//! ```text
//! * fs (float): 44100
//! * M (float64) | Shape: (3, 3)
//!    [Data Preview 3x3]:
//!    [[1.0000, 0.0000, 0.0000],
//!     [0.0000, 1.0000, 0.0000],
//!     [0.0000, 0.0000, 1.0000]]
//! + meta (struct)
//!   * label (str): trial
//! ```

use super::format::{shape_tuple, Preview};
use super::{indent, InspectOptions};
use crate::array::NumericArray;
use crate::value::{StructArray, Value};

pub(super) fn visit(
    out: &mut Vec<String>,
    options: &InspectOptions,
    value: &Value,
    name: &str,
    depth: usize,
) {
    let pad = indent(depth);

    match value {
        Value::Scalar(scalar) => {
            out.push(format!("{}* {} ({}): {}", pad, name, scalar.type_name(), scalar));
        }
        Value::Array(array) => {
            out.push(format!(
                "{}* {} ({}) | Shape: {}",
                pad,
                name,
                array.type_name(),
                shape_tuple(array.shape())
            ));
            if array.is_numeric() {
                push_preview(out, options, array, &pad);
            }
        }
        Value::Struct(mapping) => {
            out.push(format!("{}+ {} (struct)", pad, name));
            for (key, child) in mapping.iter() {
                visit(out, options, child, key, depth + 1);
            }
        }
        Value::StructArray(array) if array.is_scalar() => {
            out.push(format!("{}+ {} (struct)", pad, name));
            push_element(out, options, array, 0, depth + 1);
        }
        Value::StructArray(array) => {
            out.push(format!(
                "{}+ {} (struct array) | Shape: {}",
                pad,
                name,
                shape_tuple(array.shape())
            ));
            for index in 0..array.len() {
                out.push(format!("{}+ {}[{}] (struct)", indent(depth + 1), name, index));
                push_element(out, options, array, index, depth + 2);
            }
        }
    }
}

fn push_element(
    out: &mut Vec<String>,
    options: &InspectOptions,
    array: &StructArray,
    index: usize,
    depth: usize,
) {
    for field in array.fields() {
        if let Some(value) = field.elements.get(index) {
            visit(out, options, value, &field.name, depth);
        }
    }
}

fn push_preview(out: &mut Vec<String>, options: &InspectOptions, array: &NumericArray, pad: &str) {
    let preview = match Preview::new(
        array,
        options.preview_rows,
        options.preview_cols,
        options.precision,
    ) {
        Some(preview) => preview,
        None => return,
    };

    let block_pad = format!("{}   ", pad);
    out.push(format!(
        "{}[Data Preview {}x{}]:",
        block_pad, preview.rows, preview.cols
    ));
    out.extend(
        preview
            .to_lines()
            .into_iter()
            .map(|line| format!("{}{}", block_pad, line)),
    );
}
