use serde::{Deserialize, Serialize};

use crate::audio::{FilterbankConfig, Scale};
use crate::errors::CortixResult;

/// which analysis the [`crate::audio::Analyser`] runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalysisMode {
    /// auditory model. lowest latency
    #[default]
    Gammatone,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyserConfig {
    pub mode: AnalysisMode,
    /// band spacing
    pub scale: Scale,
    pub num_bands: usize,
    pub min_hz: f32,
    pub max_hz: f32,
    pub sample_rate: f32,
    /// envelope smoothing time constant. zero or less turns smoothing off
    pub smoothing_ms: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Gammatone,
            scale: Scale::Erb,
            num_bands: 40,
            min_hz: 20.0,
            max_hz: 20_000.0,
            sample_rate: 48_000.0,
            smoothing_ms: 5.0,
        }
    }
}

impl AnalyserConfig {
    /// the shared fields, in the shape the filter bank wants them
    pub fn filterbank_config(&self) -> FilterbankConfig {
        FilterbankConfig {
            num_bands: self.num_bands,
            min_hz: self.min_hz,
            max_hz: self.max_hz,
            sample_rate: self.sample_rate,
            spacing: self.scale,
            smoothing_ms: self.smoothing_ms,
        }
    }

    pub fn validate(&self) -> CortixResult<()> {
        match self.mode {
            AnalysisMode::Gammatone => self.filterbank_config().validate(),
        }
    }
}
