//! Color types and conversions.
//!
//! - [`Rgb`]: the 24-bit value type every stage works in
//! - [`iigs`]: the 12-bit hardware color space (4 bits per channel)
//! - the sRGB transfer functions for optional linear-light processing

pub mod iigs;
mod lut;
mod rgb;

pub use lut::{linear_to_srgb, linear_to_srgb_table, srgb_to_linear, srgb_to_linear_table};
pub use rgb::Rgb;
