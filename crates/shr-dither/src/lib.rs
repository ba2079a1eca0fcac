//! shr-dither: Super Hi-Res conversion for the Apple IIgs
//!
//! This library turns 320x200 truecolor canvases into byte-exact unpacked
//! Super Hi-Res "3200" images: a 4-bit indexed pixel grid, one scan control
//! byte per scanline, and up to 16 palettes in the IIgs 12-bit color space.
//!
//! # Quick Start
//!
//! The [`ShrConverter`] builder is the primary entry point:
//!
//! ```
//! use shr_dither::{Canvas, Rgb, ShrConverter};
//!
//! let canvas = Canvas::filled(Rgb::new(200, 40, 40));
//! let image = ShrConverter::new().convert(&canvas).unwrap();
//!
//! let blob = image.to_bytes();
//! assert_eq!(blob.len(), 32_768);
//! ```
//!
//! # Pipeline
//!
//! Conversion is a straight line of pure stages:
//!
//! 1. optional sRGB-to-linear transfer ([`Canvas::to_linear`])
//! 2. palette assignment: one of three [`QuantizeMethod`] strategies built
//!    on the median cut
//! 3. snapping every palette entry to the IIgs 12-bit grid, so later
//!    stages aim at colors the hardware can show
//! 4. per-scanline dithering ([`DitherAlgorithm`]: error diffusion,
//!    ordered, or plain nearest-color)
//! 5. packing into the 32,768-byte container ([`Shr3200`])
//!
//! Everything is single-threaded and deterministic; there is no shared
//! state and no randomness. Callers wanting concurrency convert images in
//! parallel, not scanlines.

pub mod canvas;
pub mod color;
pub mod convert;
pub mod dither;
pub mod error;
pub mod output;
pub mod palette;
pub mod quantize;


pub use canvas::{Canvas, HEIGHT, WIDTH};
pub use color::Rgb;
pub use convert::ShrConverter;
pub use dither::{BayerMatrix, DitherAlgorithm, Ditherer};
pub use error::ConvertError;
pub use output::{Shr3200, BLOB_SIZE};
pub use palette::{Palette, PaletteSet, MAX_PALETTES, PALETTE_SIZE};
pub use quantize::{median_cut, QuantizeMethod};
