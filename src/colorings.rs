/// Get the gray level for an escape value, given the maximum escape value.
/// The product is truncated, never rounded.
pub fn gray_level(v: u32, max: u32) -> u8 {
    if max == 0 {
        return 0;
    }
    (255.0 * v as f64 / max as f64) as u8
}

/// The same gray level on all three channels, in BMP (B, G, R) order
pub fn gray_bgr(v: u32, max: u32) -> [u8; 3] {
    let g = gray_level(v, max);
    [g, g, g]
}
