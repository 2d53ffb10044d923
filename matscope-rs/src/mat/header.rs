//! MAT file header sniffing.
//!
//! Both Level 5 and v7.3 files start with the same 128-byte header:
//!
//! | Offset | Size | Content                                   |
//! |--------|------|-------------------------------------------|
//! | 0      | 116  | descriptive text                          |
//! | 116    | 8    | subsystem data offset                     |
//! | 124    | 2    | version (0x0100 Level 5, 0x0200 v7.3)     |
//! | 126    | 2    | endian indicator, `IM` or `MI`            |
//!
//! A v7.3 file is an HDF5 file whose user block holds this header, so the
//! HDF5 signature follows at offset 512.

use std::io::Read;

/// Size of the fixed header.
pub const HEADER_LEN: usize = 128;

const TEXT_LEN: usize = 116;
const HDF5_SIGNATURE: &[u8; 8] = b"\x89HDF\r\n\x1a\n";
const HDF5_USER_BLOCK: usize = 512;

/// Version word of a Level 5 file.
pub const VERSION_LEVEL5: u16 = 0x0100;
/// Version word of an HDF5-based v7.3 file.
pub const VERSION_V73: u16 = 0x0200;

/// Byte order declared by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// `IM` on disk.
    Little,
    /// `MI` on disk.
    Big,
}

/// MAT container generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatVersion {
    /// MATLAB v5/v6/v7 binary format.
    Level5,
    /// MATLAB v7.3, HDF5-based.
    V73,
}

impl MatVersion {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            MatVersion::Level5 => "Level 5",
            MatVersion::V73 => "v7.3 (HDF5)",
        }
    }
}

/// Parsed fixed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatHeader {
    /// Descriptive text with trailing padding removed.
    pub text: String,
    /// Raw version word.
    pub version: u16,
    /// Declared byte order.
    pub endian: Endian,
    /// Whether an HDF5 signature was found.
    pub has_hdf5_signature: bool,
}

impl MatHeader {
    /// Read the header from the start of a file.
    ///
    /// Reads up to the HDF5 signature position so v7.3 files can be
    /// recognized even if their version word was not filled in.
    pub fn read(mut reader: impl Read) -> Result<Self, HeaderError> {
        let mut buf = Vec::with_capacity(HDF5_USER_BLOCK + HDF5_SIGNATURE.len());
        reader
            .by_ref()
            .take((HDF5_USER_BLOCK + HDF5_SIGNATURE.len()) as u64)
            .read_to_end(&mut buf)?;
        Self::parse(&buf)
    }

    /// Parse the header from the first bytes of a file.
    pub fn parse(bytes: &[u8]) -> Result<Self, HeaderError> {
        let at_start = bytes.starts_with(HDF5_SIGNATURE);
        let in_user_block = bytes
            .get(HDF5_USER_BLOCK..HDF5_USER_BLOCK + HDF5_SIGNATURE.len())
            .map_or(false, |sig| sig == HDF5_SIGNATURE);

        if at_start {
            // Plain HDF5 file without a MAT user block.
            return Ok(MatHeader {
                text: String::new(),
                version: VERSION_V73,
                endian: Endian::Little,
                has_hdf5_signature: true,
            });
        }

        if bytes.len() < HEADER_LEN {
            return Err(HeaderError::Truncated { len: bytes.len() });
        }

        let endian = match &bytes[126..128] {
            b"IM" => Endian::Little,
            b"MI" => Endian::Big,
            other => {
                return Err(HeaderError::BadEndianIndicator([other[0], other[1]]));
            }
        };

        let raw_version = [bytes[124], bytes[125]];
        let version = match endian {
            Endian::Little => u16::from_le_bytes(raw_version),
            Endian::Big => u16::from_be_bytes(raw_version),
        };

        let text = String::from_utf8_lossy(&bytes[..TEXT_LEN])
            .trim_end_matches(|c: char| c == ' ' || c == '\0')
            .to_string();

        Ok(MatHeader {
            text,
            version,
            endian,
            has_hdf5_signature: in_user_block,
        })
    }

    /// Which container generation this header announces.
    pub fn mat_version(&self) -> MatVersion {
        if self.has_hdf5_signature || self.version == VERSION_V73 {
            MatVersion::V73
        } else {
            MatVersion::Level5
        }
    }

    /// Version string in the form scipy reports it (`"1.0"` for Level 5).
    pub fn version_string(&self) -> String {
        format!("{}.{}", self.version >> 8, self.version & 0xff)
    }
}

/// Reasons a header cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// Reading the file failed.
    #[error("I/O error while reading header: {0}")]
    Io(#[from] std::io::Error),

    /// The file is shorter than a header.
    #[error("file too short for a MAT header ({len} bytes)")]
    Truncated {
        /// Bytes available.
        len: usize,
    },

    /// Neither `IM` nor `MI` at offset 126.
    #[error("not a MAT file: endian indicator is {0:?}")]
    BadEndianIndicator([u8; 2]),
}
