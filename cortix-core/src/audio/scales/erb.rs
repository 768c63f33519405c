//! Equivalent rectangular bandwidth. Glasberg & Moore, 1990.
#[allow(unused_imports)]
use num::Float;

/// the width of the auditory filter centered at `hz`
#[inline]
pub fn erb_bandwidth(hz: f32) -> f32 {
    24.7 * (4.37 * hz / 1000.0 + 1.0)
}

/// ERB-rate. the number of ERBs below `hz`
#[inline]
pub fn hz_to_erb(hz: f32) -> f32 {
    21.4 * (4.37 * hz / 1000.0 + 1.0).log10()
}

#[inline]
pub fn erb_to_hz(erb: f32) -> f32 {
    (10.0f32.powf(erb / 21.4) - 1.0) * 1000.0 / 4.37
}
