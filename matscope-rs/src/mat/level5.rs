//! Level 5 element decoding for what `matfile` leaves out.
//!
//! `matfile` only hands back top-level numeric arrays. The walker here reads
//! the same element stream to recover the variable order, the logical flag,
//! and the char, struct and cell arrays, decoding numeric arrays nested
//! inside those itself.
//!
//! A data element is an 8-byte tag (type, size) followed by `size` bytes
//! padded to a multiple of 8, or a small element packing type, size and up to
//! 4 data bytes into 8 bytes. Top-level variables may be wrapped in a zlib
//! stream (`miCOMPRESSED`), which is not padded.

use std::io::Read;

use flate2::read::ZlibDecoder;

use super::header::Endian;
use crate::array::{Dtype, NumericArray};
use crate::error::ParseCause;
use crate::value::{Mapping, StructArray, Value};

type Result<T> = std::result::Result<T, ParseCause>;

const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_INT16: u32 = 3;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_SINGLE: u32 = 7;
const MI_DOUBLE: u32 = 9;
const MI_INT64: u32 = 12;
const MI_UINT64: u32 = 13;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;
const MI_UTF8: u32 = 16;
const MI_UTF16: u32 = 17;
const MI_UTF32: u32 = 18;

const FLAG_COMPLEX: u32 = 0x0800;
const FLAG_LOGICAL: u32 = 0x0200;

/// MATLAB array class, from the low byte of the array flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ArrayClass {
    Cell,
    Struct,
    Object,
    Char,
    Sparse,
    Numeric(Dtype),
    Unknown(u8),
}

impl ArrayClass {
    fn from_code(code: u8) -> Self {
        match code {
            1 => ArrayClass::Cell,
            2 => ArrayClass::Struct,
            3 => ArrayClass::Object,
            4 => ArrayClass::Char,
            5 => ArrayClass::Sparse,
            6 => ArrayClass::Numeric(Dtype::Double),
            7 => ArrayClass::Numeric(Dtype::Single),
            8 => ArrayClass::Numeric(Dtype::Int8),
            9 => ArrayClass::Numeric(Dtype::UInt8),
            10 => ArrayClass::Numeric(Dtype::Int16),
            11 => ArrayClass::Numeric(Dtype::UInt16),
            12 => ArrayClass::Numeric(Dtype::Int32),
            13 => ArrayClass::Numeric(Dtype::UInt32),
            14 => ArrayClass::Numeric(Dtype::Int64),
            15 => ArrayClass::Numeric(Dtype::UInt64),
            other => ArrayClass::Unknown(other),
        }
    }

    pub(super) fn name(self) -> &'static str {
        match self {
            ArrayClass::Cell => "cell",
            ArrayClass::Struct => "struct",
            ArrayClass::Object => "object",
            ArrayClass::Char => "char",
            ArrayClass::Sparse => "sparse",
            ArrayClass::Numeric(dtype) => dtype.name(),
            ArrayClass::Unknown(_) => "unknown",
        }
    }
}

/// A top-level variable as found in the element stream.
#[derive(Debug)]
pub(super) struct Variable {
    pub name: String,
    pub class: ArrayClass,
    pub is_logical: bool,
    /// `None` for top-level numeric arrays, which `matfile` converts, and
    /// for classes with no [`Value`] counterpart.
    pub value: Option<Value>,
}

/// Walk the variables that follow the 128-byte header, in file order.
pub(super) fn variables(body: &[u8], endian: Endian) -> Result<Vec<Variable>> {
    let mut elements = Elements::new(body, endian);
    let mut out = Vec::new();

    while let Some(element) = elements.next_element()? {
        match element.data_type {
            MI_MATRIX => out.push(top_level(element.data, endian)?),
            MI_COMPRESSED => {
                let inflated = inflate(element.data)?;
                let mut inner = Elements::new(&inflated, endian);
                while let Some(element) = inner.next_element()? {
                    if element.data_type == MI_MATRIX {
                        out.push(top_level(element.data, endian)?);
                    }
                }
            }
            other => log::debug!("skipping top-level element of type {}", other),
        }
    }

    Ok(out)
}

fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

#[derive(Debug, Clone, Copy)]
struct Element<'a> {
    data_type: u32,
    data: &'a [u8],
}

/// Cursor over a run of data elements.
struct Elements<'a> {
    bytes: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> Elements<'a> {
    fn new(bytes: &'a [u8], endian: Endian) -> Self {
        Elements {
            bytes,
            pos: 0,
            endian,
        }
    }

    fn next_element(&mut self) -> Result<Option<Element<'a>>> {
        let rest = &self.bytes[self.pos..];
        if rest.is_empty() {
            return Ok(None);
        }

        let first = u32_at(rest, 0, self.endian).ok_or_else(|| truncated("element tag"))?;
        if first >> 16 != 0 {
            let size = (first >> 16) as usize;
            let data = rest
                .get(4..4 + size)
                .filter(|_| size <= 4 && rest.len() >= 8)
                .ok_or_else(|| truncated("small element"))?;
            self.pos += 8;
            return Ok(Some(Element {
                data_type: first & 0xffff,
                data,
            }));
        }

        let size = u32_at(rest, 4, self.endian).ok_or_else(|| truncated("element tag"))? as usize;
        let data = rest
            .get(8..8 + size)
            .ok_or_else(|| truncated("element data"))?;
        let mut advance = 8 + size;
        if first != MI_COMPRESSED {
            advance = (advance + 7) & !7;
        }
        self.pos = (self.pos + advance).min(self.bytes.len());

        Ok(Some(Element {
            data_type: first,
            data,
        }))
    }

    fn expect(&mut self, what: &str) -> Result<Element<'a>> {
        self.next_element()?.ok_or_else(|| truncated(what))
    }
}

fn truncated(what: &str) -> ParseCause {
    ParseCause::malformed(format!("truncated {}", what))
}

fn u32_at(bytes: &[u8], at: usize, endian: Endian) -> Option<u32> {
    let b = bytes.get(at..at + 4)?;
    let word = [b[0], b[1], b[2], b[3]];
    Some(match endian {
        Endian::Little => u32::from_le_bytes(word),
        Endian::Big => u32::from_be_bytes(word),
    })
}

/// Decode fixed-width words of a primitive type into an iterator.
macro_rules! words {
    ($data:expr, $endian:expr, $t:ty, $n:literal) => {
        $data.chunks_exact($n).map(move |chunk| {
            let mut word = [0u8; $n];
            word.copy_from_slice(chunk);
            match $endian {
                Endian::Little => <$t>::from_le_bytes(word),
                Endian::Big => <$t>::from_be_bytes(word),
            }
        })
    };
}

struct MatrixHeader {
    class: ArrayClass,
    flags: u32,
    shape: Vec<usize>,
    name: String,
}

impl MatrixHeader {
    fn read(elements: &mut Elements<'_>) -> Result<Self> {
        let endian = elements.endian;
        let flags = elements.expect("array flags")?;
        let flags = u32_at(flags.data, 0, endian).ok_or_else(|| truncated("array flags"))?;
        let dims = elements.expect("dimensions")?;
        let shape = words!(dims.data, endian, i32, 4)
            .map(|d| d.max(0) as usize)
            .collect();
        let name = elements.expect("array name")?;

        Ok(MatrixHeader {
            class: ArrayClass::from_code((flags & 0xff) as u8),
            flags,
            shape,
            name: String::from_utf8_lossy(name.data).into_owned(),
        })
    }

    fn count(&self) -> usize {
        self.shape.iter().product()
    }

    fn has(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

fn top_level(data: &[u8], endian: Endian) -> Result<Variable> {
    let mut elements = Elements::new(data, endian);
    let header = MatrixHeader::read(&mut elements)?;

    let value = match header.class {
        ArrayClass::Numeric(_) => None,
        _ => body(&header, &mut elements)?,
    };

    Ok(Variable {
        is_logical: header.has(FLAG_LOGICAL),
        class: header.class,
        name: header.name,
        value,
    })
}

/// Decode a nested `miMATRIX`: a struct field value or a cell element.
fn nested(element: Element<'_>, endian: Endian) -> Result<Option<Value>> {
    if element.data_type != MI_MATRIX {
        return Err(ParseCause::malformed(format!(
            "expected a nested array, found element type {}",
            element.data_type
        )));
    }
    // Empty cells and unset fields are written as zero-length matrices.
    if element.data.is_empty() {
        return Ok(Some(Value::Array(NumericArray::empty(Dtype::Double, &[0, 0]))));
    }

    let mut elements = Elements::new(element.data, endian);
    let header = MatrixHeader::read(&mut elements)?;
    let value = body(&header, &mut elements)?;
    if value.is_none() {
        log::warn!("skipping nested {} array", header.class.name());
    }
    Ok(value)
}

/// Decode what follows the matrix header, or `None` for classes with no
/// [`Value`] counterpart.
fn body(header: &MatrixHeader, elements: &mut Elements<'_>) -> Result<Option<Value>> {
    let value = match header.class {
        ArrayClass::Numeric(dtype) => Value::Array(numeric(header, dtype, elements)?),
        ArrayClass::Char => Value::text(chars(header, elements)?),
        ArrayClass::Struct => Value::StructArray(structure(header, elements)?),
        ArrayClass::Cell => Value::Struct(cell(header, elements)?),
        ArrayClass::Sparse | ArrayClass::Object | ArrayClass::Unknown(_) => return Ok(None),
    };
    Ok(Some(value))
}

fn numeric(header: &MatrixHeader, dtype: Dtype, elements: &mut Elements<'_>) -> Result<NumericArray> {
    let endian = elements.endian;
    let dtype = if header.has(FLAG_LOGICAL) {
        Dtype::Logical
    } else {
        dtype
    };
    let mismatch = || {
        ParseCause::malformed(format!(
            "nested array has the wrong element count for shape {:?}",
            header.shape
        ))
    };

    let real = values(elements.expect("real part")?, endian)?;
    let mut array = NumericArray::from_column_major(dtype, &header.shape, real).ok_or_else(mismatch)?;
    if header.has(FLAG_COMPLEX) {
        let imag = values(elements.expect("imaginary part")?, endian)?;
        let imag = NumericArray::from_column_major(dtype, &header.shape, imag).ok_or_else(mismatch)?;
        array = array.with_imag(imag.real().clone()).ok_or_else(mismatch)?;
    }
    Ok(array)
}

/// Numeric payload widened to `f64`. MATLAB may store data in a smaller
/// type than the array class.
fn values(element: Element<'_>, endian: Endian) -> Result<Vec<f64>> {
    let data = element.data;
    let out: Vec<f64> = match element.data_type {
        MI_INT8 => data.iter().map(|&b| f64::from(b as i8)).collect(),
        MI_UINT8 => data.iter().map(|&b| f64::from(b)).collect(),
        MI_INT16 => words!(data, endian, i16, 2).map(f64::from).collect(),
        MI_UINT16 => words!(data, endian, u16, 2).map(f64::from).collect(),
        MI_INT32 => words!(data, endian, i32, 4).map(f64::from).collect(),
        MI_UINT32 => words!(data, endian, u32, 4).map(f64::from).collect(),
        MI_SINGLE => words!(data, endian, f32, 4).map(f64::from).collect(),
        MI_DOUBLE => words!(data, endian, f64, 8).collect(),
        MI_INT64 => words!(data, endian, i64, 8).map(|x| x as f64).collect(),
        MI_UINT64 => words!(data, endian, u64, 8).map(|x| x as f64).collect(),
        other => {
            return Err(ParseCause::malformed(format!(
                "element type {} is not numeric",
                other
            )))
        }
    };
    Ok(out)
}

fn chars(header: &MatrixHeader, elements: &mut Elements<'_>) -> Result<String> {
    let endian = elements.endian;
    let element = match elements.next_element()? {
        Some(element) => element,
        None => return Ok(String::new()),
    };

    let units: Vec<char> = match element.data_type {
        MI_UTF8 | MI_UINT8 | MI_INT8 => String::from_utf8_lossy(element.data).chars().collect(),
        MI_UTF16 | MI_UINT16 => {
            char::decode_utf16(words!(element.data, endian, u16, 2))
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        }
        MI_UTF32 | MI_UINT32 | MI_INT32 => words!(element.data, endian, u32, 4)
            .map(|c| char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
        other => {
            return Err(ParseCause::malformed(format!(
                "element type {} cannot hold characters",
                other
            )))
        }
    };

    Ok(char_rows(&header.shape, &units))
}

/// Lay out column-major characters row by row, rows joined by newlines.
fn char_rows(shape: &[usize], units: &[char]) -> String {
    let rows = shape.first().copied().unwrap_or(0);
    if rows <= 1 {
        return units.iter().collect();
    }
    let cols = units.len() / rows;
    (0..rows)
        .map(|r| (0..cols).map(|c| units[r + c * rows]).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn structure(header: &MatrixHeader, elements: &mut Elements<'_>) -> Result<StructArray> {
    let endian = elements.endian;
    let name_len = elements.expect("field name length")?;
    let name_len = u32_at(name_len.data, 0, endian).ok_or_else(|| truncated("field name length"))? as usize;
    let names = elements.expect("field names")?;
    let names: Vec<String> = if name_len == 0 {
        Vec::new()
    } else {
        names
            .data
            .chunks(name_len)
            .map(|chunk| {
                let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
                String::from_utf8_lossy(&chunk[..end]).into_owned()
            })
            .collect()
    };

    // Values are stored element by element, fields in declaration order.
    let count = header.count();
    let mut columns: Vec<Vec<Option<Value>>> =
        names.iter().map(|_| Vec::with_capacity(count)).collect();
    for _ in 0..count {
        for column in columns.iter_mut() {
            column.push(nested(elements.expect("struct field value")?, endian)?);
        }
    }

    let mut array = StructArray::new(header.shape.clone());
    for (name, column) in names.into_iter().zip(columns) {
        match column.into_iter().collect::<Option<Vec<Value>>>() {
            Some(values) => {
                array = array.with_field(name, values).ok_or_else(|| {
                    ParseCause::malformed("struct field has the wrong element count")
                })?;
            }
            None => log::warn!("skipping struct field '{}'", name),
        }
    }
    Ok(array)
}

/// A cell array becomes a mapping keyed `[0]`, `[1]`, ... in column-major
/// element order.
fn cell(header: &MatrixHeader, elements: &mut Elements<'_>) -> Result<Mapping> {
    let endian = elements.endian;
    let mut mapping = Mapping::new();
    for index in 0..header.count() {
        if let Some(value) = nested(elements.expect("cell element")?, endian)? {
            mapping.insert(format!("[{}]", index), value);
        }
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn element(data_type: u32, data: &[u8]) -> Vec<u8> {
        let mut out = data_type.to_le_bytes().to_vec();
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
        while out.len() % 8 != 0 {
            out.push(0);
        }
        out
    }

    fn char_matrix(name: &str, text: &str) -> Vec<u8> {
        let mut flags = 4u32.to_le_bytes().to_vec();
        flags.extend_from_slice(&[0; 4]);
        let units: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        let mut dims = 1i32.to_le_bytes().to_vec();
        dims.extend_from_slice(&(text.len() as i32).to_le_bytes());

        let mut payload = element(MI_UINT32, &flags);
        payload.extend(element(MI_INT32, &dims));
        payload.extend(element(MI_INT8, name.as_bytes()));
        payload.extend(element(MI_UTF16, &units));
        element(MI_MATRIX, &payload)
    }

    #[test]
    fn test_small_element() {
        // Type miINT32, 4 data bytes, packed into one 8-byte word pair.
        let mut bytes = ((4u32 << 16) | MI_INT32).to_le_bytes().to_vec();
        bytes.extend_from_slice(&32u32.to_le_bytes());

        let mut elements = Elements::new(&bytes, Endian::Little);
        let el = elements.next_element().unwrap().unwrap();
        assert_eq!(el.data_type, MI_INT32);
        assert_eq!(u32_at(el.data, 0, Endian::Little), Some(32));
        assert!(elements.next_element().unwrap().is_none());
    }

    #[test]
    fn test_truncated_element_is_error() {
        let mut bytes = MI_DOUBLE.to_le_bytes().to_vec();
        bytes.extend_from_slice(&64u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 8]);

        let mut elements = Elements::new(&bytes, Endian::Little);
        assert!(elements.next_element().is_err());
    }

    #[test]
    fn test_char_variable() {
        let body = char_matrix("label", "abc");
        let vars = variables(&body, Endian::Little).unwrap();

        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "label");
        assert_eq!(vars[0].class, ArrayClass::Char);
        assert_eq!(vars[0].value, Some(Value::text("abc")));
    }

    #[test]
    fn test_compressed_variable() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&char_matrix("s", "hi")).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut body = MI_COMPRESSED.to_le_bytes().to_vec();
        body.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
        body.extend_from_slice(&compressed);
        // The next element starts right after the stream, without padding.
        body.extend(char_matrix("t", "ok"));

        let vars = variables(&body, Endian::Little).unwrap();
        let names: Vec<_> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["s", "t"]);
        assert_eq!(vars[0].value, Some(Value::text("hi")));
    }

    #[test]
    fn test_char_rows() {
        // ['ab'; 'cd'] stored column-major.
        assert_eq!(char_rows(&[2, 2], &['a', 'c', 'b', 'd']), "ab\ncd");
        assert_eq!(char_rows(&[1, 3], &['x', 'y', 'z']), "xyz");
        assert_eq!(char_rows(&[0, 0], &[]), "");
    }

    #[test]
    fn test_class_codes() {
        assert_eq!(ArrayClass::from_code(2), ArrayClass::Struct);
        assert_eq!(ArrayClass::from_code(9), ArrayClass::Numeric(Dtype::UInt8));
        assert_eq!(ArrayClass::from_code(5).name(), "sparse");
        assert_eq!(ArrayClass::from_code(99), ArrayClass::Unknown(99));
    }
}
