//! Use a bank of filters for audio processing.
//!
//! An alternative to an FFT. Every band gets its own gammatone filter, so there are no bins to
//! aggregate and no window to fill before the first reading. Latency is just the filters' own
//! group delay.
//!
//! Spacing (where the centers go) and shape (how wide each filter is) are separate. The centers
//! come from [`generate_bands`] on the configured [`Scale`]. The width is always the ERB of the
//! band's own center.
use alloc::vec;
use alloc::vec::Vec;

use itertools::izip;
#[allow(unused_imports)]
use num::Float;
use serde::{Deserialize, Serialize};

use super::bands::{BandInfo, bands_are_well_formed, generate_bands};
use super::decibels::{amplitude_to_db, amplitudes_to_db_into};
use super::gammatone::{GammatoneFilter, flush_denormal};
use super::scales::{Scale, erb_bandwidth};
use crate::errors::{CortixError, CortixResult};
use crate::logging::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterbankConfig {
    pub num_bands: usize,
    pub min_hz: f32,
    pub max_hz: f32,
    pub sample_rate: f32,
    /// how the band centers are spread out. ERB is standard for gammatone
    pub spacing: Scale,
    /// envelope smoothing time constant. zero or less turns smoothing off
    pub smoothing_ms: f32,
}

impl Default for FilterbankConfig {
    fn default() -> Self {
        Self {
            num_bands: 40,
            min_hz: 20.0,
            max_hz: 20_000.0,
            sample_rate: 48_000.0,
            spacing: Scale::Erb,
            smoothing_ms: 5.0,
        }
    }
}

impl FilterbankConfig {
    /// Check the config without building any filters.
    ///
    /// This also generates the bands once, because a range that is too narrow for `num_bands`
    /// only shows up as bands that overlap or collapse.
    pub fn validate(&self) -> CortixResult<()> {
        self.bands().map(drop)
    }

    /// the bands this config describes, or the reason it can't be built
    pub fn bands(&self) -> CortixResult<Vec<BandInfo>> {
        if self.num_bands == 0 {
            return Err(CortixError::NoBands);
        }

        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(CortixError::InvalidSampleRate(self.sample_rate));
        }

        let bad_range = !self.min_hz.is_finite()
            || !self.max_hz.is_finite()
            || self.min_hz < 0.0
            || self.min_hz >= self.max_hz
            // log2(0) is -inf
            || (self.spacing == Scale::Log && self.min_hz == 0.0);

        if bad_range {
            return Err(self.invalid_range());
        }

        if self.smoothing_ms.is_nan() || self.smoothing_ms.is_infinite() {
            return Err(CortixError::InvalidSmoothing(self.smoothing_ms));
        }

        let bands = generate_bands(self.spacing, self.num_bands, self.min_hz, self.max_hz);

        if !bands_are_well_formed(&bands) {
            // f32 can't split this range into that many bands
            return Err(self.invalid_range());
        }

        Ok(bands)
    }

    fn invalid_range(&self) -> CortixError {
        CortixError::InvalidFrequencyRange {
            min_hz: self.min_hz,
            max_hz: self.max_hz,
        }
    }

    pub fn nyquist_hz(&self) -> f32 {
        self.sample_rate / 2.0
    }

    /// true if the top bands are above nyquist and will alias
    pub fn exceeds_nyquist(&self) -> bool {
        self.max_hz > self.nyquist_hz()
    }

    /// the per-sample decay of the envelope follower. 0.0 means no smoothing
    pub fn smoothing_coefficient(&self) -> f32 {
        if self.smoothing_ms > 0.0 {
            let tau = self.smoothing_ms / 1000.0;

            (-1.0 / (tau * self.sample_rate)).exp()
        } else {
            0.0
        }
    }
}

/// Chainable setup for a [`GammatoneFilterbank`]. Anything not set keeps its default.
#[derive(Debug, Clone, Default)]
pub struct FilterbankBuilder {
    config: FilterbankConfig,
}

impl FilterbankBuilder {
    pub fn bands(mut self, num_bands: usize) -> Self {
        self.config.num_bands = num_bands;
        self
    }

    pub fn range(mut self, min_hz: f32, max_hz: f32) -> Self {
        self.config.min_hz = min_hz;
        self.config.max_hz = max_hz;
        self
    }

    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    pub fn scale(mut self, spacing: Scale) -> Self {
        self.config.spacing = spacing;
        self
    }

    pub fn smoothing(mut self, smoothing_ms: f32) -> Self {
        self.config.smoothing_ms = smoothing_ms;
        self
    }

    pub fn config(&self) -> &FilterbankConfig {
        &self.config
    }

    pub fn build(self) -> CortixResult<GammatoneFilterbank> {
        GammatoneFilterbank::new(self.config)
    }
}

#[derive(Debug, Clone)]
pub struct GammatoneFilterbank {
    config: FilterbankConfig,
    bands: Vec<BandInfo>,
    filters: Vec<GammatoneFilter>,
    /// the latest raw magnitude of every filter
    magnitudes: Vec<f32>,
    /// magnitudes after the one-pole low-pass
    envelope: Vec<f32>,
    /// alpha for the envelope follower
    smoothing: f32,
}

impl Default for GammatoneFilterbank {
    fn default() -> Self {
        let config = FilterbankConfig::default();

        // the default config is always valid
        let bands = generate_bands(
            config.spacing,
            config.num_bands,
            config.min_hz,
            config.max_hz,
        );

        Self::build(config, bands)
    }
}

impl GammatoneFilterbank {
    pub fn new(config: FilterbankConfig) -> CortixResult<Self> {
        let bands = config.bands()?;

        Ok(Self::build(config, bands))
    }

    pub fn builder() -> FilterbankBuilder {
        FilterbankBuilder::default()
    }

    /// allocate and compute everything. `bands` must come from `config`
    fn build(config: FilterbankConfig, bands: Vec<BandInfo>) -> Self {
        if config.exceeds_nyquist() {
            warn!(
                "max_hz ({}) is above nyquist ({}). the top bands will alias",
                config.max_hz,
                config.nyquist_hz()
            );
        }

        info!(
            "configuring {} bands from {} Hz to {} Hz at {} Hz",
            config.num_bands, config.min_hz, config.max_hz, config.sample_rate
        );

        let filters: Vec<_> = bands
            .iter()
            .map(|band| {
                let bandwidth_hz = erb_bandwidth(band.center_hz);

                trace!(
                    "band {} Hz: {} Hz to {} Hz. filter width {} Hz",
                    band.center_hz, band.low_hz, band.high_hz, bandwidth_hz
                );

                GammatoneFilter::new(band.center_hz, bandwidth_hz, config.sample_rate)
            })
            .collect();

        let smoothing = config.smoothing_coefficient();

        debug!("envelope smoothing coefficient = {}", smoothing);

        Self {
            magnitudes: vec![0.0; bands.len()],
            envelope: vec![0.0; bands.len()],
            bands,
            filters,
            smoothing,
            config,
        }
    }

    /// Throw everything away and rebuild for `config`.
    ///
    /// If `config` is invalid, this returns an error and the filter bank is left as it was.
    pub fn configure(&mut self, config: FilterbankConfig) -> CortixResult<()> {
        *self = Self::new(config)?;

        Ok(())
    }

    /// Clear the filter state and both buffers.
    ///
    /// Bands and coefficients are kept, so this is cheap enough for a transport seek.
    pub fn reset(&mut self) {
        for filter in self.filters.iter_mut() {
            filter.reset();
        }

        self.magnitudes.fill(0.0);
        self.envelope.fill(0.0);
    }

    #[inline]
    pub fn process_sample(&mut self, sample: f32) {
        let alpha = self.smoothing;
        let beta = 1.0 - alpha;

        for (filter, magnitude, envelope) in izip!(
            self.filters.iter_mut(),
            self.magnitudes.iter_mut(),
            self.envelope.iter_mut()
        ) {
            let m = filter.tick(sample);

            *magnitude = m;

            // with alpha == 0.0 this is just m
            *envelope = flush_denormal(alpha * *envelope) + beta * m;
        }
    }

    pub fn process_block(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.process_sample(sample);
        }
    }

    /// like `process_block`, but for samples that need converting on the way in
    pub fn process_samples<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = f32>,
    {
        for sample in samples {
            self.process_sample(sample);
        }
    }

    /// Write the envelope in decibels to `output`.
    ///
    /// Silent bands are exactly `min_db`. Only `min(output.len(), num_bands)` values are written.
    pub fn envelope_db(&self, output: &mut [f32], min_db: f32) {
        amplitudes_to_db_into(&self.envelope, output, min_db);
    }

    pub fn config(&self) -> &FilterbankConfig {
        &self.config
    }

    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    pub fn smoothing_coefficient(&self) -> f32 {
        self.smoothing
    }

    pub fn band_info(&self) -> &[BandInfo] {
        &self.bands
    }

    pub fn filters(&self) -> &[GammatoneFilter] {
        &self.filters
    }

    /// raw magnitudes from the last sample. these ripple with the waveform
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// smoothed magnitudes
    pub fn envelope(&self) -> &[f32] {
        &self.envelope
    }

    pub fn center_hz(&self, band: usize) -> Option<f32> {
        self.bands.get(band).map(|x| x.center_hz)
    }

    pub fn magnitude(&self, band: usize) -> Option<f32> {
        self.magnitudes.get(band).copied()
    }

    pub fn band_envelope(&self, band: usize) -> Option<f32> {
        self.envelope.get(band).copied()
    }

    pub fn band_envelope_db(&self, band: usize, min_db: f32) -> Option<f32> {
        self.band_envelope(band).map(|x| amplitude_to_db(x, min_db))
    }
}
