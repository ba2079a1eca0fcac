//! Error types for the conversion core.

use thiserror::Error;

/// Errors the conversion core surfaces to its caller.
///
/// Pixel-level edge cases (single-color scanlines, unsplittable quantizer
/// buckets, an exhausted palette ceiling) are not errors; each has a
/// documented fallback in its module. This enum covers caller mistakes:
/// misshapen buffers, unknown algorithm names, and malformed containers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A stage that expects the fixed 320x200 geometry was handed a buffer
    /// of a different size.
    #[error("expected {expected} elements for a 320x200 canvas, got {actual}")]
    InvalidCanvasShape {
        /// Element count the stage requires.
        expected: usize,
        /// Element count it was given.
        actual: usize,
    },

    /// The unpacker was handed something other than a 32,768-byte blob.
    #[error("expected a 32768-byte unpacked image, got {0} bytes")]
    InvalidBlobSize(usize),

    /// A dither or quantize strategy name was not recognized.
    #[error("unknown algorithm {0:?}")]
    UnknownAlgorithm(String),

    /// Bayer threshold matrices exist for sides 2, 4 and 8 only.
    #[error("unsupported Bayer matrix size {0} (expected 2, 4 or 8)")]
    UnsupportedBayerSize(u32),

    /// The packer was handed more palettes than the hardware's 16 slots.
    #[error("palette set holds {0} palettes, the hardware limit is 16")]
    TooManyPalettes(usize),

    /// A scan control byte selects a palette that was never assigned.
    #[error("scanline {row} selects palette {palette}, but only {available} palettes exist")]
    ScbOutOfRange {
        /// Scanline carrying the offending selector.
        row: usize,
        /// The palette index it selects.
        palette: u8,
        /// Number of palettes actually available.
        available: usize,
    },

    /// A pixel index does not fit the 4-bit pixel format.
    #[error("pixel index {value} at ({x}, {y}) does not fit in 4 bits")]
    PixelIndexOutOfRange {
        /// Pixel column.
        x: usize,
        /// Pixel row.
        y: usize,
        /// The offending index.
        value: u8,
    },
}
