//! Audio processing
//!
//! Samples -> GammatoneFilter (one per band) -> magnitudes -> envelope -> Decibels
//!             (bands spaced by Linear, Log, Bark, ERB, or Mel)
pub mod analyser;
pub mod bands;
pub mod decibels;
pub mod filter_bank;
pub mod gammatone;
pub mod samples;
pub mod scales;

pub use analyser::{Analyser, AnalyserBuilder, Analysis, AnalysisEngine};
pub use bands::{BandInfo, bands_are_well_formed, generate_bands};
pub use decibels::{
    DEFAULT_MIN_DB, amplitude_to_db, amplitude_to_db_clamped, amplitudes_to_db_into,
    db_to_amplitude,
};
pub use filter_bank::{FilterbankBuilder, FilterbankConfig, GammatoneFilterbank};
pub use gammatone::{GammatoneCoefficients, GammatoneFilter, flush_denormal};
pub use samples::{downmix_interleaved, downmix_stereo};
pub use scales::{
    Scale, bark_to_hz, critical_bandwidth, erb_bandwidth, erb_to_hz, hz_to_bark, hz_to_erb,
    hz_to_mel, mel_to_hz,
};
