//! Frequency-domain band equalizer
//!
//! Scales spectrum bins around each band center with a triangular taper.
//! Every edit to a bin in (0, N/2) is repeated on its mirror N-i, so a
//! Hermitian spectrum stays Hermitian and its inverse stays real.

use super::config::{BandRange, EqConfig};
use crate::spectrum::ComplexSpectrum;
use num_complex::Complex64;

/// Bins touched by one band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinRange {
    /// Band center; may lie below 0 or above N/2
    pub center: isize,

    /// Half-width in bins (0 = single-bin band)
    pub half_width: usize,

    /// First affected bin (inclusive, >= 0)
    pub start: usize,

    /// Last affected bin (inclusive, <= N/2)
    pub end: usize,
}

impl BinRange {
    /// Distance of `bin` from the (unclamped) band center
    pub fn distance(&self, bin: usize) -> usize {
        (bin as isize).abs_diff(self.center)
    }
}

/// Convert Hz to the nearest signed bin index
fn freq_to_bin(freq: f64, sample_rate: f64, fft_size: usize) -> isize {
    // `as` saturates: NaN becomes 0, infinities become isize::MIN / MAX
    (freq / sample_rate * fft_size as f64).round() as isize
}

/// Map a band to bin indices of an `fft_size`-point spectrum
///
/// The center is kept where the frequency puts it; only the affected range
/// is clipped to [0, N/2]. A band lying wholly below 0 Hz or above Nyquist
/// touches no bins.
///
/// # Arguments
/// * `freq` - Center frequency in Hz
/// * `width` - Full width in Hz (<= 0 or NaN gives a single-bin band)
/// * `sample_rate` - Sample rate in Hz
/// * `fft_size` - Spectrum size N
///
/// # Returns
/// `None` when no bin in [0, N/2] falls inside the band
pub fn band_bins(
    freq: f64,
    width: f64,
    sample_rate: f64,
    fft_size: usize,
) -> Option<BinRange> {
    if fft_size == 0 {
        return None;
    }
    let nyquist_bin = (fft_size / 2) as isize;

    let center = freq_to_bin(freq, sample_rate, fft_size);
    let half_width = if width > 0.0 {
        freq_to_bin(width / 2.0, sample_rate, fft_size).max(0)
    } else {
        0
    };

    let start = center.saturating_sub(half_width).max(0);
    let end = center.saturating_add(half_width).min(nyquist_bin);
    if start > end {
        return None;
    }

    Some(BinRange {
        center,
        half_width: half_width as usize,
        start: start as usize,
        end: end as usize,
    })
}

/// Triangular taper: 1.0 at the center, 0.0 at `half_width` and beyond
///
/// A zero half-width is the single-bin case: 1.0 at distance 0 only.
pub fn triangular_falloff(distance: usize, half_width: usize) -> f64 {
    if half_width == 0 {
        return if distance == 0 { 1.0 } else { 0.0 };
    }
    (1.0 - distance as f64 / half_width as f64).max(0.0)
}

/// Gain blended toward unity by the falloff
#[inline]
pub fn effective_scale(gain: f64, falloff: f64) -> f64 {
    1.0 + (gain - 1.0) * falloff
}

/// Band equalizer bound to a sample rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandEqualizer {
    sample_rate: f64,
}

impl BandEqualizer {
    /// Create equalizer for spectra of signals sampled at `sample_rate` Hz
    pub fn new(sample_rate: f64) -> Self {
        Self { sample_rate }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Apply every slider's bands to a copy of the spectrum
    ///
    /// Sliders and their bands are applied in configuration order.
    pub fn apply(&self, spectrum: &ComplexSpectrum, config: &EqConfig) -> ComplexSpectrum {
        let mut modified = spectrum.clone();
        self.apply_inplace(&mut modified, config);
        modified
    }

    /// Apply every slider's bands in-place
    pub fn apply_inplace(&self, spectrum: &mut ComplexSpectrum, config: &EqConfig) {
        for slider in &config.sliders {
            for band in &slider.bands {
                self.apply_band(spectrum.bins_mut(), band, slider.scale);
            }
        }
    }

    fn apply_band(&self, bins: &mut [Complex64], band: &BandRange, gain: f64) {
        let n = bins.len();
        let Some(range) = band_bins(band.freq, band.width, self.sample_rate, n) else {
            return;
        };

        for i in range.start..=range.end {
            let falloff = triangular_falloff(range.distance(i), range.half_width);
            let scale = effective_scale(gain, falloff);

            bins[i] *= scale;

            // DC and Nyquist have no mirror
            if i > 0 && i < n / 2 {
                bins[n - i] *= scale;
            }
        }
    }
}

/// Equalize a spectrum of a signal sampled at `sample_rate` Hz
pub fn equalize(
    spectrum: &ComplexSpectrum,
    config: &EqConfig,
    sample_rate: f64,
) -> ComplexSpectrum {
    BandEqualizer::new(sample_rate).apply(spectrum, config)
}
