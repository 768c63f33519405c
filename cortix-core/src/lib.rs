//! Perceptual spectrum analysis for visualizers.
//!
//! Samples -> GammatoneFilterbank -> magnitudes -> smoothed envelope -> decibels
//!
//! The filterbank runs one 4th-order gammatone resonator per band. Bands are spaced on a
//! perceptual scale (ERB by default) and every filter is as wide as the auditory critical band
//! at its center. All allocation happens when configuring, so processing is safe to call from an
//! audio callback.
//!
//! ```
//! use cortix_core::audio::{Analyser, DEFAULT_MIN_DB};
//! use cortix_core::config::AnalyserConfig;
//!
//! let mut analyser = Analyser::with_config(AnalyserConfig {
//!     num_bands: 24,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! analyser.process_block(&[0.0; 512]);
//!
//! let mut db = vec![0.0; analyser.num_bands()];
//! analyser.envelope_db(&mut db, DEFAULT_MIN_DB);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod audio;
pub mod config;
pub mod errors;
pub mod logging;

pub use config::{AnalyserConfig, AnalysisMode};
pub use errors::{CortixError, CortixResult};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
