//! PNG preview rendering of converted images.

use std::io::Cursor;
use std::path::Path;

use shr_dither::{Shr3200, HEIGHT, WIDTH};

/// Encode a converted image as an 8-bit RGB PNG.
///
/// Scanlines render through their assigned palettes, so the preview shows
/// exactly what the IIgs would display.
pub fn encode_png(image: &Shr3200) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, WIDTH as u32, HEIGHT as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.to_rgb())?;
    }
    Ok(buf.into_inner())
}

/// Write the preview PNG to disk.
pub fn write_png(path: &Path, image: &Shr3200) -> anyhow::Result<()> {
    let bytes = encode_png(image)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "preview written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shr_dither::{Canvas, Rgb, ShrConverter};

    #[test]
    fn test_encodes_a_png() {
        let canvas = Canvas::filled(Rgb::new(255, 255, 255));
        let image = ShrConverter::new().convert(&canvas).unwrap();
        let bytes = encode_png(&image).unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_preview_roundtrips_through_decoder() {
        let canvas = Canvas::filled(Rgb::new(255, 0, 0));
        let image = ShrConverter::new().convert(&canvas).unwrap();
        let bytes = encode_png(&image).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.width() as usize, WIDTH);
        assert_eq!(decoded.height() as usize, HEIGHT);
        assert_eq!(decoded.get_pixel(0, 0), &image::Rgb([255, 0, 0]));
    }

    #[test]
    fn test_write_png_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let canvas = Canvas::filled(Rgb::BLACK);
        let image = ShrConverter::new().convert(&canvas).unwrap();

        write_png(&path, &image).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
