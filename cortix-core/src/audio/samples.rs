//! Turn multi-channel audio into the mono stream the analysis runs on.
//!
//! These are iterators so that the audio callback never needs a scratch buffer.

/// average two channels. stops at the end of the shorter one
#[inline]
pub fn downmix_stereo<'a>(left: &'a [f32], right: &'a [f32]) -> impl Iterator<Item = f32> + 'a {
    left.iter().zip(right.iter()).map(|(l, r)| (l + r) * 0.5)
}

/// average interleaved L/R frames. a trailing half frame is ignored
#[inline]
pub fn downmix_interleaved(samples: &[f32]) -> impl Iterator<Item = f32> + '_ {
    samples
        .chunks_exact(2)
        .map(|frame| (frame[0] + frame[1]) * 0.5)
}
