//! Test helpers: a minimal Level 5 MAT file writer.
//!
//! Produces little-endian files with numeric, logical, char, struct and cell
//! variables, optionally zlib-compressed, enough to exercise the loader
//! without checked-in fixtures.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;

const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;
const MI_UTF16: u32 = 17;

const MX_CELL_CLASS: u32 = 1;
const MX_STRUCT_CLASS: u32 = 2;
const MX_CHAR_CLASS: u32 = 4;
const MX_DOUBLE_CLASS: u32 = 6;
const MX_UINT8_CLASS: u32 = 9;
const MX_INT32_CLASS: u32 = 12;
const COMPLEX_FLAG: u32 = 0x0800;
const LOGICAL_FLAG: u32 = 0x0200;

pub const HEADER_TEXT: &str = "MATLAB 5.0 MAT-file, Platform: GLNXA64, Created by: matscope tests";

/// Builder for an in-memory Level 5 file.
#[derive(Default)]
pub struct MatWriter {
    version: u16,
    body: Vec<u8>,
}

impl MatWriter {
    pub fn new() -> Self {
        MatWriter {
            version: 0x0100,
            body: Vec::new(),
        }
    }

    /// A header announcing v7.3, with no HDF5 content behind it.
    pub fn v73_header_only() -> Self {
        MatWriter {
            version: 0x0200,
            body: Vec::new(),
        }
    }

    /// Add a real double array. `data` is column-major.
    pub fn double(mut self, name: &str, shape: &[usize], data: &[f64]) -> Self {
        self.body.extend(double_matrix(name, shape, data));
        self
    }

    /// Add a real double array wrapped in a zlib stream.
    pub fn compressed_double(mut self, name: &str, shape: &[usize], data: &[f64]) -> Self {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&double_matrix(name, shape, data))
            .expect("failed to compress test variable");
        let stream = encoder.finish().expect("failed to compress test variable");

        self.body.extend_from_slice(&MI_COMPRESSED.to_le_bytes());
        self.body.extend_from_slice(&(stream.len() as u32).to_le_bytes());
        self.body.extend_from_slice(&stream);
        self
    }

    /// Add a 1×N char array.
    pub fn text(mut self, name: &str, text: &str) -> Self {
        self.body.extend(text_matrix(name, text));
        self
    }

    /// Add a logical array. `data` is column-major.
    pub fn logical(mut self, name: &str, shape: &[usize], data: &[bool]) -> Self {
        let bytes: Vec<u8> = data.iter().map(|&b| u8::from(b)).collect();
        let real = element(MI_UINT8, &bytes);
        self.body.extend(matrix(MX_UINT8_CLASS | LOGICAL_FLAG, name, shape, &[real]));
        self
    }

    /// Add a struct array. `values` holds one nested matrix per element and
    /// field, element by element (see [`double_field`], [`text_field`]).
    pub fn structure(mut self, name: &str, shape: &[usize], fields: &[&str], values: &[Vec<u8>]) -> Self {
        const NAME_LEN: usize = 32;
        let mut names = vec![0u8; NAME_LEN * fields.len()];
        for (i, field) in fields.iter().enumerate() {
            names[i * NAME_LEN..i * NAME_LEN + field.len()].copy_from_slice(field.as_bytes());
        }

        let mut parts = vec![
            small_element(MI_INT32, &(NAME_LEN as u32).to_le_bytes()),
            element(MI_INT8, &names),
        ];
        parts.extend(values.iter().cloned());
        self.body.extend(matrix(MX_STRUCT_CLASS, name, shape, &parts));
        self
    }

    /// Add a cell array with one nested matrix per element.
    pub fn cell(mut self, name: &str, shape: &[usize], values: &[Vec<u8>]) -> Self {
        self.body.extend(matrix(MX_CELL_CLASS, name, shape, values));
        self
    }

    /// Add a complex double array. Both parts are column-major.
    pub fn complex(mut self, name: &str, shape: &[usize], re: &[f64], im: &[f64]) -> Self {
        let real = element(MI_DOUBLE, &f64_bytes(re));
        let imag = element(MI_DOUBLE, &f64_bytes(im));
        self.body.extend(matrix(
            MX_DOUBLE_CLASS | COMPLEX_FLAG,
            name,
            shape,
            &[real, imag],
        ));
        self
    }

    /// Add an int32 array. `data` is column-major.
    pub fn int32(mut self, name: &str, shape: &[usize], data: &[i32]) -> Self {
        let bytes: Vec<u8> = data.iter().flat_map(|x| x.to_le_bytes()).collect();
        let real = element(MI_INT32, &bytes);
        self.body.extend(matrix(MX_INT32_CLASS, name, shape, &[real]));
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![b' '; 116];
        bytes[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT.as_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(b"IM");
        bytes.extend_from_slice(&self.body);
        bytes
    }

    /// Write into `dir` and return the file path.
    pub fn write(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        fs::write(&path, self.to_bytes()).expect("failed to write test MAT file");
        path
    }
}

/// A nameless double matrix, for struct fields and cell elements.
pub fn double_field(shape: &[usize], data: &[f64]) -> Vec<u8> {
    double_matrix("", shape, data)
}

/// A nameless 1×N char matrix, for struct fields and cell elements.
pub fn text_field(text: &str) -> Vec<u8> {
    text_matrix("", text)
}

fn double_matrix(name: &str, shape: &[usize], data: &[f64]) -> Vec<u8> {
    let real = element(MI_DOUBLE, &f64_bytes(data));
    matrix(MX_DOUBLE_CLASS, name, shape, &[real])
}

fn text_matrix(name: &str, text: &str) -> Vec<u8> {
    let units: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
    let chars = element(MI_UTF16, &units);
    matrix(MX_CHAR_CLASS, name, &[1, text.encode_utf16().count()], &[chars])
}

fn f64_bytes(data: &[f64]) -> Vec<u8> {
    data.iter().flat_map(|x| x.to_le_bytes()).collect()
}

/// A small data element: type and size share the first word.
fn small_element(data_type: u32, data: &[u8]) -> Vec<u8> {
    let mut out = ((data.len() as u32) << 16 | data_type).to_le_bytes().to_vec();
    out.extend_from_slice(data);
    out.resize(8, 0);
    out
}

/// A tagged data element, padded to 8 bytes.
fn element(data_type: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + data.len() + 7);
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    while out.len() % 8 != 0 {
        out.push(0);
    }
    out
}

fn matrix(flags: u32, name: &str, shape: &[usize], parts: &[Vec<u8>]) -> Vec<u8> {
    let mut flag_bytes = flags.to_le_bytes().to_vec();
    flag_bytes.extend_from_slice(&0u32.to_le_bytes());

    let dims: Vec<u8> = shape
        .iter()
        .flat_map(|&d| (d as i32).to_le_bytes())
        .collect();

    let mut payload = element(MI_UINT32, &flag_bytes);
    payload.extend(element(MI_INT32, &dims));
    payload.extend(element(MI_INT8, name.as_bytes()));
    for part in parts {
        payload.extend_from_slice(part);
    }

    element(MI_MATRIX, &payload)
}

/// Column-major data for an n×n identity matrix.
pub fn identity(n: usize) -> Vec<f64> {
    let mut data = vec![0.0; n * n];
    for i in 0..n {
        data[i + i * n] = 1.0;
    }
    data
}
