use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::scales::Scale;

/// one channel of the filter bank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BandInfo {
    pub center_hz: f32,
    /// `high_hz - low_hz`. this is the spacing, not the width of the auditory filter
    pub bandwidth_hz: f32,
    pub low_hz: f32,
    pub high_hz: f32,
}

/// Split `min_hz..max_hz` into `num_bands` bands that are evenly spaced on `scale`.
///
/// Edges are shared, so `bands[i].high_hz == bands[i + 1].low_hz` exactly. The first edge is
/// exactly `min_hz` and the last is exactly `max_hz`. Every center is the unwarped midpoint of its
/// band in the scale's coordinate. For `Linear` that is the arithmetic mean of the edges and for
/// `Log` it is the geometric mean.
///
/// The range is not checked here. [`crate::audio::FilterbankConfig::validate`] does that.
pub fn generate_bands(scale: Scale, num_bands: usize, min_hz: f32, max_hz: f32) -> Vec<BandInfo> {
    let mut bands = Vec::with_capacity(num_bands);

    if num_bands == 0 {
        return bands;
    }

    let warped_min = scale.warp(min_hz);
    let warped_max = scale.warp(max_hz);
    let step = (warped_max - warped_min) / num_bands as f32;

    let edge = |i: usize| -> f32 {
        if i == 0 {
            min_hz
        } else if i == num_bands {
            max_hz
        } else {
            scale.unwarp(warped_min + i as f32 * step)
        }
    };

    let mut low_hz = edge(0);

    for i in 0..num_bands {
        let high_hz = edge(i + 1);

        let warped_center = warped_min + (i as f32 + 0.5) * step;

        bands.push(BandInfo {
            center_hz: scale.unwarp(warped_center),
            bandwidth_hz: high_hz - low_hz,
            low_hz,
            high_hz,
        });

        low_hz = high_hz;
    }

    bands
}

/// Every band has `low_hz < center_hz < high_hz`, neighbours share an edge and the centers go up.
///
/// A range too narrow for f32 to split into this many bands breaks at least one of these.
pub fn bands_are_well_formed(bands: &[BandInfo]) -> bool {
    let inside = bands
        .iter()
        .all(|x| x.low_hz < x.center_hz && x.center_hz < x.high_hz);

    let ordered = bands
        .windows(2)
        .all(|x| x[0].high_hz == x[1].low_hz && x[0].center_hz < x[1].center_hz);

    inside && ordered
}
