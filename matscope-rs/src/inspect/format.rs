//! Text formatting for shapes, previews and summaries.

use crate::array::NumericArray;

/// Format a shape as a Python-style tuple: `()`, `(3,)`, `(3, 4)`.
pub fn shape_tuple(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [n] => format!("({},)", n),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

/// Top-left block of an array, as formatted strings.
///
/// `rows` and `cols` are upper bounds. One-dimensional arrays yield a single
/// row (`is_vector` set). Arrays with more than two dimensions contribute
/// their first page.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// Rows actually shown.
    pub rows: usize,
    /// Columns actually shown.
    pub cols: usize,
    /// Whether the source is one-dimensional.
    pub is_vector: bool,
    /// Formatted cells, row by row.
    pub cells: Vec<Vec<String>>,
}

impl Preview {
    /// Build a preview with the given precision, or `None` for an empty
    /// array.
    pub fn new(array: &NumericArray, max_rows: usize, max_cols: usize, precision: usize) -> Option<Self> {
        if array.is_empty() {
            return None;
        }

        let shape = array.shape();
        let fmt = |index: &[usize]| {
            array
                .get(index)
                .map(|(re, im)| format_element(re, im, array.is_complex(), precision))
                .unwrap_or_default()
        };

        match shape.len() {
            0 => Some(Preview {
                rows: 1,
                cols: 1,
                is_vector: true,
                cells: vec![vec![fmt(&[])]],
            }),
            1 => {
                let n = shape[0].min(max_rows);
                let row: Vec<String> = (0..n).map(|i| fmt(&[i])).collect();
                Some(Preview {
                    rows: n,
                    cols: 1,
                    is_vector: true,
                    cells: vec![row],
                })
            }
            ndim => {
                let rows = shape[0].min(max_rows);
                let cols = shape[1].min(max_cols);
                let mut index = vec![0; ndim];
                let cells: Vec<Vec<String>> = (0..rows)
                    .map(|r| {
                        (0..cols)
                            .map(|c| {
                                index[0] = r;
                                index[1] = c;
                                fmt(&index)
                            })
                            .collect()
                    })
                    .collect();
                Some(Preview {
                    rows,
                    cols,
                    is_vector: false,
                    cells,
                })
            }
        }
    }

    /// Render as an array literal, one line per row.
    ///
    /// Cells are right-aligned to a common width and separated by `, `.
    pub fn to_lines(&self) -> Vec<String> {
        let width = self
            .cells
            .iter()
            .flatten()
            .map(|cell| cell.len())
            .max()
            .unwrap_or(0);

        let row_text = |row: &Vec<String>| {
            row.iter()
                .map(|cell| format!("{:>width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join(", ")
        };

        if self.is_vector {
            let row = self.cells.first().map(row_text).unwrap_or_default();
            return vec![format!("[{}]", row)];
        }
        if self.cells.is_empty() {
            return vec!["[]".to_string()];
        }

        let last = self.cells.len() - 1;
        self.cells
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let open = if i == 0 { "[[" } else { " [" };
                let close = if i == last { "]]" } else { "]," };
                format!("{}{}{}", open, row_text(row), close)
            })
            .collect()
    }
}

/// Format one element with fixed precision; complex values as `a+bi`.
pub fn format_element(re: f64, im: f64, complex: bool, precision: usize) -> String {
    if !complex {
        return format!("{:.*}", precision, re);
    }
    let sign = if im.is_sign_negative() { '-' } else { '+' };
    format!("{:.*}{}{:.*}i", precision, re, sign, precision, im.abs())
}

/// Flattened element list in logical row-major order: `[1, 2.5, 3]`.
pub fn flat_values(array: &NumericArray) -> String {
    let values: Vec<String> = match array.imag() {
        Some(imag) => array
            .real()
            .iter()
            .zip(imag.iter())
            .map(|(re, im)| {
                let sign = if im.is_sign_negative() { '-' } else { '+' };
                format!("{}{}{}i", re, sign, im.abs())
            })
            .collect(),
        None => array.real().iter().map(|x| x.to_string()).collect(),
    };
    format!("[{}]", values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Dtype;

    fn matrix(rows: usize, cols: usize) -> NumericArray {
        // Column-major 0, 1, 2, ... so element [r, c] = r + c * rows.
        let data = (0..rows * cols).map(|x| x as f64).collect();
        NumericArray::from_column_major(Dtype::Double, &[rows, cols], data).unwrap()
    }

    #[test]
    fn test_shape_tuple() {
        assert_eq!(shape_tuple(&[]), "()");
        assert_eq!(shape_tuple(&[5]), "(5,)");
        assert_eq!(shape_tuple(&[3, 3]), "(3, 3)");
        assert_eq!(shape_tuple(&[2, 3, 4]), "(2, 3, 4)");
    }

    #[test]
    fn test_preview_small_matrix() {
        let preview = Preview::new(&matrix(2, 2), 10, 10, 4).unwrap();
        assert_eq!((preview.rows, preview.cols), (2, 2));
        assert_eq!(
            preview.to_lines(),
            vec!["[[0.0000, 2.0000],", " [1.0000, 3.0000]]"]
        );
    }

    #[test]
    fn test_preview_truncates_to_limits() {
        let preview = Preview::new(&matrix(20, 15), 10, 10, 4).unwrap();
        assert_eq!((preview.rows, preview.cols), (10, 10));
        assert_eq!(preview.to_lines().len(), 10);
        // Last shown cell is element [9, 9] = 9 + 9 * 20.
        assert_eq!(preview.cells[9][9], "189.0000");
    }

    #[test]
    fn test_preview_vector() {
        let data = (0..25).map(|x| x as f64 / 2.0).collect();
        let arr = NumericArray::from_column_major(Dtype::Double, &[25], data).unwrap();
        let preview = Preview::new(&arr, 10, 10, 4).unwrap();

        assert!(preview.is_vector);
        assert_eq!((preview.rows, preview.cols), (10, 1));
        let lines = preview.to_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[0.0000, 0.5000,"));
        assert!(lines[0].ends_with("4.5000]"));
    }

    #[test]
    fn test_preview_right_aligns() {
        let arr =
            NumericArray::from_column_major(Dtype::Double, &[1, 2], vec![-12.5, 3.0]).unwrap();
        let lines = Preview::new(&arr, 10, 10, 4).unwrap().to_lines();
        assert_eq!(lines, vec!["[[-12.5000,   3.0000]]"]);
    }

    #[test]
    fn test_preview_empty() {
        let arr = NumericArray::empty(Dtype::Double, &[0, 4]);
        assert!(Preview::new(&arr, 10, 10, 4).is_none());
    }

    #[test]
    fn test_preview_first_page_of_3d() {
        let data = (0..8).map(|x| x as f64).collect();
        let arr = NumericArray::from_column_major(Dtype::Double, &[2, 2, 2], data).unwrap();
        let preview = Preview::new(&arr, 10, 10, 1).unwrap();
        assert_eq!(preview.cells, vec![vec!["0.0", "2.0"], vec!["1.0", "3.0"]]);
    }

    #[test]
    fn test_format_element_complex() {
        assert_eq!(format_element(1.0, -2.0, true, 2), "1.00-2.00i");
        assert_eq!(format_element(1.0, 2.0, true, 1), "1.0+2.0i");
        assert_eq!(format_element(1.0, 0.0, false, 4), "1.0000");
    }

    #[test]
    fn test_flat_values_row_major() {
        let arr = matrix(2, 2);
        assert_eq!(flat_values(&arr), "[0, 2, 1, 3]");

        let arr = NumericArray::from_column_major(Dtype::Double, &[2], vec![0.5, 1.0]).unwrap();
        assert_eq!(flat_values(&arr), "[0.5, 1]");
    }
}
