//! Bark scale. Critical bands of hearing.
#[allow(unused_imports)]
use num::Float;

/// Traunmüller, 1990
#[inline]
pub fn hz_to_bark(hz: f32) -> f32 {
    26.81 * hz / (1960.0 + hz) - 0.53
}

/// closed-form inverse of [`hz_to_bark`]
#[inline]
pub fn bark_to_hz(bark: f32) -> f32 {
    1960.0 * (bark + 0.53) / (26.28 - bark)
}

/// Zwicker & Terhardt, 1980.
///
/// An alternative to [`super::erb_bandwidth`]. The filter bank doesn't use this.
#[inline]
pub fn critical_bandwidth(hz: f32) -> f32 {
    let khz = hz / 1000.0;

    25.0 + 75.0 * (1.0 + 1.4 * khz * khz).powf(0.69)
}
