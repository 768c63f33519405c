use thiserror::Error;

/// everything that can go wrong is a bad configuration. processing itself never fails
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CortixError {
    #[error("at least one band is required")]
    NoBands,
    #[error("invalid frequency range: {min_hz} Hz to {max_hz} Hz")]
    InvalidFrequencyRange { min_hz: f32, max_hz: f32 },
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),
    #[error("invalid smoothing time: {0} ms")]
    InvalidSmoothing(f32),
    #[error("unknown scale index: {0}")]
    UnknownScale(u8),
}

pub type CortixResult<T> = Result<T, CortixError>;
