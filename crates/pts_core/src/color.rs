//! 8-bit color channel normalization.

use pts_math::Vec3;

/// Map an 8-bit channel to `0.0..=1.0`.
#[inline]
pub fn normalize(channel: u8) -> f32 {
    f32::from(channel) / 255.0
}

/// Normalize each RGB channel independently.
#[inline]
pub fn normalize_rgb(rgb: [u8; 3]) -> Vec3 {
    Vec3::new(normalize(rgb[0]), normalize(rgb[1]), normalize(rgb[2]))
}
