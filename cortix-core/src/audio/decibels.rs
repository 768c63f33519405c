#[allow(unused_imports)]
use num::Float;

/// the floor the analyser uses when the caller doesn't have an opinion
pub const DEFAULT_MIN_DB: f32 = -100.0;

/// Convert a linear magnitude to decibels.
///
/// log10 isn't defined for zero or negative numbers, so those (and NaN) become `min_db`.
/// Positive amplitudes are converted as-is, even when they are quieter than `min_db`.
#[inline]
pub fn amplitude_to_db(amplitude: f32, min_db: f32) -> f32 {
    if amplitude > 0.0 {
        20.0 * amplitude.log10()
    } else {
        min_db
    }
}

/// like [`amplitude_to_db`], but nothing comes out below `min_db`
#[inline]
pub fn amplitude_to_db_clamped(amplitude: f32, min_db: f32) -> f32 {
    amplitude_to_db(amplitude, min_db).max(min_db)
}

/// reminder, multiplying amplitudes is the same as adding decibels
#[inline]
pub fn db_to_amplitude(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

/// Fill `output` with the decibels of `amplitudes`.
///
/// Only `min(amplitudes.len(), output.len())` values are written.
pub fn amplitudes_to_db_into(amplitudes: &[f32], output: &mut [f32], min_db: f32) {
    for (x, y) in amplitudes.iter().zip(output.iter_mut()) {
        *y = amplitude_to_db(*x, min_db);
    }
}
