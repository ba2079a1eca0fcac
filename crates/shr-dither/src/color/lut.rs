//! sRGB transfer function on byte values.
//!
//! The optional stage-one transfer moves the canvas between gamma-encoded
//! sRGB and linear light. Both directions are per-byte mappings, so callers
//! that touch whole canvases build a 256-entry table once per pass instead
//! of evaluating the transfer per pixel.

/// Decode one gamma-encoded sRGB byte to linear light.
#[inline]
pub fn srgb_to_linear(v: u8) -> u8 {
    let s = v as f64 / 255.0;
    let linear = if s <= 0.04045 {
        s / 12.92
    } else {
        ((s + 0.055) / 1.055).powf(2.4)
    };
    (linear * 255.0).round() as u8
}

/// Encode one linear-light byte back to gamma-encoded sRGB.
#[inline]
pub fn linear_to_srgb(v: u8) -> u8 {
    let l = v as f64 / 255.0;
    let s = if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    };
    (s.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// The full sRGB-to-linear byte mapping.
pub fn srgb_to_linear_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        *slot = srgb_to_linear(i as u8);
    }
    table
}

/// The full linear-to-sRGB byte mapping.
pub fn linear_to_srgb_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        *slot = linear_to_srgb(i as u8);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        assert_eq!(srgb_to_linear(0), 0);
        assert_eq!(srgb_to_linear(255), 255);
        assert_eq!(linear_to_srgb(0), 0);
        assert_eq!(linear_to_srgb(255), 255);
    }

    #[test]
    fn test_monotonic() {
        let table = srgb_to_linear_table();
        for pair in table.windows(2) {
            assert!(pair[1] >= pair[0], "srgb_to_linear must be monotonic");
        }
        let table = linear_to_srgb_table();
        for pair in table.windows(2) {
            assert!(pair[1] >= pair[0], "linear_to_srgb must be monotonic");
        }
    }

    #[test]
    fn test_mid_gray_darkens_in_linear() {
        // sRGB 128 is about 0.216 linear light, i.e. 55/255.
        let linear = srgb_to_linear(128);
        assert!(
            (50..=60).contains(&linear),
            "sRGB 128 should land near linear 55, got {linear}"
        );
    }

    #[test]
    fn test_tables_match_scalar_functions() {
        let table = srgb_to_linear_table();
        for v in [0u8, 1, 17, 64, 128, 200, 254, 255] {
            assert_eq!(table[v as usize], srgb_to_linear(v));
        }
    }
}
