//! Frequency scales.
//!
//! Every scale is a pair of functions: `warp` takes Hz into the scale's own coordinate and
//! `unwarp` brings it back. Bands are spaced evenly in the warped coordinate.
mod bark;
mod erb;
mod mel;

pub use bark::{bark_to_hz, critical_bandwidth, hz_to_bark};
pub use erb::{erb_bandwidth, erb_to_hz, hz_to_erb};
pub use mel::{hz_to_mel, mel_to_hz};

#[allow(unused_imports)]
use num::Float;
use serde::{Deserialize, Serialize};

use crate::errors::CortixError;

/// how to space bands between the minimum and maximum frequency
///
/// | Scale  | Use case                     |
/// |--------|------------------------------|
/// | Linear | scientific analysis          |
/// | Log    | music. one step per octave   |
/// | Bark   | masking, loudness            |
/// | Erb    | auditory models              |
/// | Mel    | speech                       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scale {
    Linear,
    Log,
    Bark,
    #[default]
    Erb,
    Mel,
}

impl Scale {
    pub const ALL: [Scale; 5] = [Scale::Linear, Scale::Log, Scale::Bark, Scale::Erb, Scale::Mel];

    /// Hz into this scale's coordinate
    #[inline]
    pub fn warp(self, hz: f32) -> f32 {
        match self {
            Scale::Linear => hz,
            Scale::Log => hz.log2(),
            Scale::Bark => hz_to_bark(hz),
            Scale::Erb => hz_to_erb(hz),
            Scale::Mel => hz_to_mel(hz),
        }
    }

    /// this scale's coordinate back into Hz
    #[inline]
    pub fn unwarp(self, x: f32) -> f32 {
        match self {
            Scale::Linear => x,
            Scale::Log => x.exp2(),
            Scale::Bark => bark_to_hz(x),
            Scale::Erb => erb_to_hz(x),
            Scale::Mel => mel_to_hz(x),
        }
    }
}

/// hosts that can only pass integers use the declaration order
impl TryFrom<u8> for Scale {
    type Error = CortixError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(CortixError::UnknownScale(value))
    }
}
