use flate2::{
    write::{DeflateEncoder, ZlibEncoder},
    Compression,
};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Framing applied to the deflate stream before encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionFormat {
    /// Bare deflate stream, no header or checksum.
    RawDeflate,
    /// Deflate wrapped in a zlib header and Adler-32 trailer.
    Zlib,
}

impl Default for CompressionFormat {
    fn default() -> Self {
        Self::RawDeflate
    }
}

impl CompressionFormat {
    pub fn compress(self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        let sink = Vec::with_capacity(data.len() / 2 + 16);
        match self {
            Self::RawDeflate => {
                let mut encoder = DeflateEncoder::new(sink, Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
            Self::Zlib => {
                let mut encoder = ZlibEncoder::new(sink, Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
        }
    }
}
