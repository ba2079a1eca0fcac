//! HTTP API handlers.

mod convert;

pub use convert::{handle_convert, handle_preview, ConvertQuery};
