//! A single gammatone filter.
//!
//! The gammatone impulse response models the basilar membrane:
//!
//! ```text
//! g(t) = t^(n-1) * exp(-2*pi*b*t) * cos(2*pi*f*t)
//! ```
//!
//! With n = 4 this is approximated by four identical complex one-pole resonators in series
//! (Slaney 1993, Lyon 1997). Each stage is `y[n] = x[n] + r*e^(j*omega) * y[n-1]` and the
//! magnitude of the last stage's output is the band's instantaneous envelope.
use core::f32::consts::PI;

#[allow(unused_imports)]
use num::Float;
use num::Complex;

pub const STAGES: usize = 4;

/// anything smaller than about `ulp(DENORMAL_GUARD) / 2` rounds to zero in [`flush_denormal`].
/// that is far above the subnormal range, so a ringing filter never reaches it
const DENORMAL_GUARD: f32 = 1.0e-24;

/// Round values too small to matter to exactly zero.
///
/// Subnormal floats are very slow on some CPUs and a decaying IIR walks straight into them during
/// silence. Adding and subtracting a guard needs no branch and leaves larger values bit-for-bit
/// unchanged.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    (x + DENORMAL_GUARD) - DENORMAL_GUARD
}

/// everything that is computed once by `configure`. reset leaves these alone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammatoneCoefficients {
    /// `r * e^(j*omega)`
    pub pole: Complex<f32>,
    /// `exp(-2*pi*bandwidth/sample_rate)`. always in (0, 1) for a positive bandwidth
    pub pole_radius: f32,
    /// input scaling so the passband is roughly unity gain
    pub gain: f32,
}

impl GammatoneCoefficients {
    pub fn new(center_hz: f32, bandwidth_hz: f32, sample_rate: f32) -> Self {
        let omega = 2.0 * PI * center_hz / sample_rate;
        let beta = 2.0 * PI * bandwidth_hz / sample_rate;

        let r = (-beta).exp();

        let pole = Complex::new(r * omega.cos(), r * omega.sin());

        let gain = (1.0 - r).powi(STAGES as i32) * 2.0;

        Self {
            pole,
            pole_radius: r,
            gain,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GammatoneFilter {
    center_hz: f32,
    bandwidth_hz: f32,
    coefficients: GammatoneCoefficients,
    state: [Complex<f32>; STAGES],
}

impl GammatoneFilter {
    pub fn new(center_hz: f32, bandwidth_hz: f32, sample_rate: f32) -> Self {
        Self {
            center_hz,
            bandwidth_hz,
            coefficients: GammatoneCoefficients::new(center_hz, bandwidth_hz, sample_rate),
            state: [Complex::new(0.0, 0.0); STAGES],
        }
    }

    /// recompute the coefficients. this also clears the state
    pub fn configure(&mut self, center_hz: f32, bandwidth_hz: f32, sample_rate: f32) {
        *self = Self::new(center_hz, bandwidth_hz, sample_rate);
    }

    #[inline]
    pub fn reset(&mut self) {
        self.state = [Complex::new(0.0, 0.0); STAGES];
    }

    /// push one sample through all the stages. returns the magnitude of the complex output
    #[inline]
    pub fn tick(&mut self, sample: f32) -> f32 {
        let pole = self.coefficients.pole;

        let mut x = Complex::new(sample * self.coefficients.gain, 0.0);

        for stage in self.state.iter_mut() {
            x += pole * *stage;

            x = Complex::new(flush_denormal(x.re), flush_denormal(x.im));

            *stage = x;
        }

        // norm_sqr skips the hypot that `norm` does
        x.norm_sqr().sqrt()
    }

    /// tick every sample of `input` and write the magnitudes to `output`.
    /// stops at the end of the shorter slice
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        for (&x, y) in input.iter().zip(output.iter_mut()) {
            *y = self.tick(x);
        }
    }

    pub fn center_hz(&self) -> f32 {
        self.center_hz
    }

    /// the auditory bandwidth that shaped this filter
    pub fn bandwidth_hz(&self) -> f32 {
        self.bandwidth_hz
    }

    pub fn coefficients(&self) -> &GammatoneCoefficients {
        &self.coefficients
    }
}
