//! One front door for every kind of analysis.
//!
//! Today there is only the gammatone filter bank. New modes get a variant in
//! [`AnalysisMode`] and [`AnalysisEngine`] and an [`Analysis`] impl. Nothing that calls the
//! [`Analyser`] has to change.
use super::bands::BandInfo;
use super::decibels::{amplitude_to_db, amplitudes_to_db_into};
use super::filter_bank::GammatoneFilterbank;
use super::samples::{downmix_interleaved, downmix_stereo};
use super::scales::Scale;
use crate::config::{AnalyserConfig, AnalysisMode};
use crate::errors::CortixResult;
use crate::logging::info;

/// what every analysis mode has to provide
pub trait Analysis {
    /// clear dynamic state. keep coefficients
    fn reset(&mut self);

    fn process_sample(&mut self, sample: f32);

    fn process_block(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.process_sample(sample);
        }
    }

    /// unsmoothed per-band magnitudes
    fn magnitudes(&self) -> &[f32];

    /// smoothed per-band magnitudes
    fn envelope(&self) -> &[f32];

    fn band_info(&self) -> &[BandInfo];
}

impl Analysis for GammatoneFilterbank {
    fn reset(&mut self) {
        GammatoneFilterbank::reset(self)
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) {
        GammatoneFilterbank::process_sample(self, sample)
    }

    fn process_block(&mut self, samples: &[f32]) {
        GammatoneFilterbank::process_block(self, samples)
    }

    fn magnitudes(&self) -> &[f32] {
        GammatoneFilterbank::magnitudes(self)
    }

    fn envelope(&self) -> &[f32] {
        GammatoneFilterbank::envelope(self)
    }

    fn band_info(&self) -> &[BandInfo] {
        GammatoneFilterbank::band_info(self)
    }
}

/// the configured analysis, one variant per [`AnalysisMode`]
#[derive(Debug, Clone)]
pub enum AnalysisEngine {
    Gammatone(GammatoneFilterbank),
}

impl AnalysisEngine {
    /// build the engine for `config.mode`
    pub fn new(config: &AnalyserConfig) -> CortixResult<Self> {
        match config.mode {
            AnalysisMode::Gammatone => {
                GammatoneFilterbank::new(config.filterbank_config()).map(Self::Gammatone)
            }
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        match self {
            Self::Gammatone(_) => AnalysisMode::Gammatone,
        }
    }

    #[inline]
    fn inner(&self) -> &dyn Analysis {
        match self {
            Self::Gammatone(x) => x,
        }
    }
}

impl Analysis for AnalysisEngine {
    fn reset(&mut self) {
        match self {
            Self::Gammatone(x) => x.reset(),
        }
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) {
        match self {
            Self::Gammatone(x) => x.process_sample(sample),
        }
    }

    fn process_block(&mut self, samples: &[f32]) {
        match self {
            Self::Gammatone(x) => x.process_block(samples),
        }
    }

    fn magnitudes(&self) -> &[f32] {
        self.inner().magnitudes()
    }

    fn envelope(&self) -> &[f32] {
        self.inner().envelope()
    }

    fn band_info(&self) -> &[BandInfo] {
        self.inner().band_info()
    }
}

/// Chainable setup for an [`Analyser`]. Anything not set keeps its default.
#[derive(Debug, Clone, Default)]
pub struct AnalyserBuilder {
    config: AnalyserConfig,
}

impl AnalyserBuilder {
    pub fn mode(mut self, mode: AnalysisMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.config.scale = scale;
        self
    }

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

    pub fn smoothing(mut self, smoothing_ms: f32) -> Self {
        self.config.smoothing_ms = smoothing_ms;
        self
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    pub fn build(self) -> CortixResult<Analyser> {
        Analyser::with_config(self.config)
    }
}

/// perceptual spectrum analyser
#[derive(Debug, Clone)]
pub struct Analyser {
    config: AnalyserConfig,
    engine: AnalysisEngine,
}

impl Default for Analyser {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyser {
    /// 40 ERB spaced bands from 20 Hz to 20 kHz at 48 kHz
    pub fn new() -> Self {
        Self {
            config: AnalyserConfig::default(),
            engine: AnalysisEngine::Gammatone(GammatoneFilterbank::default()),
        }
    }

    pub fn builder() -> AnalyserBuilder {
        AnalyserBuilder::default()
    }

    pub fn with_config(config: AnalyserConfig) -> CortixResult<Self> {
        let engine = AnalysisEngine::new(&config)?;

        Ok(Self { config, engine })
    }

    /// Rebuild the analysis for `config`. Any buffered state is dropped.
    ///
    /// On error nothing changes.
    pub fn configure(&mut self, config: AnalyserConfig) -> CortixResult<()> {
        let engine = AnalysisEngine::new(&config)?;

        info!(
            "analyser: {:?} with {} {:?} bands",
            config.mode, config.num_bands, config.scale
        );

        self.engine = engine;
        self.config = config;

        Ok(())
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    #[inline]
    pub fn process_sample(&mut self, sample: f32) {
        self.engine.process_sample(sample);
    }

    /// mono
    pub fn process_block(&mut self, samples: &[f32]) {
        self.engine.process_block(samples);
    }

    /// average the channels and analyse that. stops at the end of the shorter slice
    pub fn process_block_stereo(&mut self, left: &[f32], right: &[f32]) {
        self.process_samples(downmix_stereo(left, right));
    }

    /// interleaved L/R frames. a trailing half frame is ignored
    pub fn process_block_interleaved(&mut self, samples: &[f32]) {
        self.process_samples(downmix_interleaved(samples));
    }

    fn process_samples(&mut self, samples: impl Iterator<Item = f32>) {
        match &mut self.engine {
            AnalysisEngine::Gammatone(x) => x.process_samples(samples),
        }
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    pub fn mode(&self) -> AnalysisMode {
        self.engine.mode()
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    pub fn num_bands(&self) -> usize {
        self.engine.band_info().len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    /// smoothed per-band magnitudes. valid until the next call that takes `&mut self`
    pub fn envelope(&self) -> &[f32] {
        self.engine.envelope()
    }

    /// unsmoothed per-band magnitudes from the last sample
    pub fn magnitudes(&self) -> &[f32] {
        self.engine.magnitudes()
    }

    /// copy the envelope into `output`. returns how many values were written
    pub fn copy_envelope(&self, output: &mut [f32]) -> usize {
        let envelope = self.envelope();

        let n = output.len().min(envelope.len());

        output[..n].copy_from_slice(&envelope[..n]);

        n
    }

    /// the envelope in decibels. silent bands are exactly `min_db`
    pub fn envelope_db(&self, output: &mut [f32], min_db: f32) {
        amplitudes_to_db_into(self.envelope(), output, min_db);
    }

    pub fn band_envelope(&self, band: usize) -> Option<f32> {
        self.envelope().get(band).copied()
    }

    pub fn band_envelope_db(&self, band: usize, min_db: f32) -> Option<f32> {
        self.band_envelope(band).map(|x| amplitude_to_db(x, min_db))
    }

    pub fn center_hz(&self, band: usize) -> Option<f32> {
        self.band_info().get(band).map(|x| x.center_hz)
    }

    pub fn center_frequencies(&self) -> impl Iterator<Item = f32> + '_ {
        self.band_info().iter().map(|x| x.center_hz)
    }

    pub fn band_info(&self) -> &[BandInfo] {
        self.engine.band_info()
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::PI;

    use super::*;
    use crate::audio::DEFAULT_MIN_DB;
    use crate::errors::CortixError;

    fn sine(hz: f32, sample_rate: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * PI * hz * i as f32 / sample_rate).sin())
            .collect()
    }

    fn peak_hz(analyser: &Analyser) -> f32 {
        let (band, _) = analyser
            .envelope()
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .unwrap();

        analyser.center_hz(band).unwrap()
    }

    #[test_log::test]
    fn test_default() {
        let analyser = Analyser::new();

        assert_eq!(analyser.num_bands(), 40);
        assert_eq!(analyser.sample_rate(), 48_000.0);
        assert_eq!(analyser.mode(), AnalysisMode::Gammatone);
        assert_eq!(analyser.config(), &AnalyserConfig::default());
    }

    #[test_log::test]
    fn test_custom_config() {
        let analyser = Analyser::with_config(AnalyserConfig {
            num_bands: 24,
            sample_rate: 44_100.0,
            scale: Scale::Bark,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(analyser.num_bands(), 24);
        assert_eq!(analyser.sample_rate(), 44_100.0);
        assert_eq!(analyser.envelope().len(), 24);
    }

    #[test_log::test]
    fn test_process_block() {
        let mut analyser = Analyser::new();

        analyser.process_block(&sine(1000.0, 48_000.0, 4800));

        assert_eq!(analyser.envelope().len(), 40);

        let hz = peak_hz(&analyser);
        assert!(hz > 800.0 && hz < 1200.0, "peak at {hz} Hz");
    }

    #[test_log::test]
    fn test_process_sample_matches_block() {
        let signal = sine(440.0, 48_000.0, 480);

        let mut a = Analyser::new();
        let mut b = Analyser::new();

        a.process_block(&signal);
        for &x in signal.iter() {
            b.process_sample(x);
        }

        assert_eq!(a.envelope(), b.envelope());
        assert_eq!(a.magnitudes(), b.magnitudes());
    }

    #[test_log::test]
    fn test_stereo_is_the_mean() {
        let left = sine(440.0, 48_000.0, 480);
        let right: Vec<f32> = sine(3000.0, 48_000.0, 480);

        let mono: Vec<f32> = left
            .iter()
            .zip(right.iter())
            .map(|(l, r)| (l + r) * 0.5)
            .collect();

        let mut stereo = Analyser::new();
        stereo.process_block_stereo(&left, &right);

        let mut reference = Analyser::new();
        reference.process_block(&mono);

        assert_eq!(stereo.envelope(), reference.envelope());

        let interleaved: Vec<f32> = left
            .iter()
            .zip(right.iter())
            .flat_map(|(&l, &r)| [l, r])
            .collect();

        let mut interleaved_analyser = Analyser::new();
        interleaved_analyser.process_block_interleaved(&interleaved);

        assert_eq!(interleaved_analyser.envelope(), reference.envelope());
    }

    #[test_log::test]
    fn test_configure() {
        let mut analyser = Analyser::new();

        analyser.process_block(&sine(1000.0, 48_000.0, 480));

        analyser
            .configure(AnalyserConfig {
                num_bands: 16,
                scale: Scale::Log,
                min_hz: 55.0,
                max_hz: 14_080.0,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(analyser.num_bands(), 16);
        assert_eq!(analyser.config().scale, Scale::Log);
        assert!(analyser.envelope().iter().all(|&x| x == 0.0));

        // the old config survives a bad one
        let err = analyser
            .configure(AnalyserConfig {
                min_hz: 500.0,
                max_hz: 100.0,
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(
            err,
            CortixError::InvalidFrequencyRange {
                min_hz: 500.0,
                max_hz: 100.0
            }
        );
        assert_eq!(analyser.num_bands(), 16);
        assert_eq!(analyser.config().min_hz, 55.0);
    }

    #[test_log::test]
    fn test_with_bad_config() {
        let result = Analyser::with_config(AnalyserConfig {
            num_bands: 0,
            ..Default::default()
        });

        assert!(matches!(result, Err(CortixError::NoBands)));
    }

    #[test_log::test]
    fn test_accessors() {
        let mut analyser = Analyser::new();

        let centers: Vec<f32> = analyser.center_frequencies().collect();
        assert_eq!(centers.len(), 40);
        assert_eq!(analyser.center_hz(0), Some(centers[0]));
        assert_eq!(analyser.center_hz(40), None);

        analyser.process_block(&sine(2000.0, 48_000.0, 2400));

        let mut copy = [0.0; 64];
        assert_eq!(analyser.copy_envelope(&mut copy), 40);
        assert_eq!(&copy[..40], analyser.envelope());

        let mut db = [0.0; 40];
        analyser.envelope_db(&mut db, DEFAULT_MIN_DB);

        for (band, &x) in db.iter().enumerate() {
            assert_eq!(analyser.band_envelope_db(band, DEFAULT_MIN_DB), Some(x));
        }

        assert_eq!(analyser.band_envelope(40), None);
    }

    #[test_log::test]
    fn test_reset() {
        let mut analyser = Analyser::new();

        let bands = analyser.band_info().to_vec();

        analyser.process_block(&sine(1000.0, 48_000.0, 960));
        analyser.reset();
        analyser.process_block(&[0.0; 256]);

        assert!(analyser.envelope().iter().all(|&x| x == 0.0));
        assert_eq!(analyser.band_info(), &bands[..]);
    }

    #[test_log::test]
    fn test_builder() {
        let mut analyser = Analyser::builder()
            .mode(AnalysisMode::Gammatone)
            .scale(Scale::Bark)
            .bands(20)
            .range(40.0, 10_000.0)
            .sample_rate(32_000.0)
            .smoothing(10.0)
            .build()
            .unwrap();

        assert_eq!(
            analyser.config(),
            &AnalyserConfig {
                mode: AnalysisMode::Gammatone,
                scale: Scale::Bark,
                num_bands: 20,
                min_hz: 40.0,
                max_hz: 10_000.0,
                sample_rate: 32_000.0,
                smoothing_ms: 10.0,
            }
        );
        assert_eq!(analyser.num_bands(), 20);

        analyser.process_block(&sine(1000.0, 32_000.0, 3200));

        let hz = peak_hz(&analyser);
        assert!(hz > 700.0 && hz < 1400.0, "peak at {hz} Hz");

        assert_eq!(
            Analyser::builder().range(500.0, 100.0).build().unwrap_err(),
            CortixError::InvalidFrequencyRange {
                min_hz: 500.0,
                max_hz: 100.0,
            }
        );
    }

    #[test_log::test]
    fn test_above_nyquist_is_accepted() {
        let config = AnalyserConfig {
            sample_rate: 22_050.0,
            max_hz: 20_000.0,
            ..Default::default()
        };

        assert!(config.filterbank_config().exceeds_nyquist());

        let analyser = Analyser::with_config(config).unwrap();
        assert_eq!(analyser.band_info().last().unwrap().high_hz, 20_000.0);

        let mut analyser = Analyser::new();
        analyser.configure(config).unwrap();
        assert_eq!(analyser.sample_rate(), 22_050.0);
    }

    #[test_log::test]
    fn test_range_too_narrow_for_bands() {
        let config = AnalyserConfig {
            num_bands: 64,
            min_hz: 1000.0,
            max_hz: 1000.001,
            ..Default::default()
        };

        assert!(matches!(
            Analyser::with_config(config),
            Err(CortixError::InvalidFrequencyRange { .. })
        ));

        let mut analyser = Analyser::new();
        assert!(analyser.configure(config).is_err());
        assert_eq!(analyser.num_bands(), 40);
    }
}
