//! Radix-2 FFT engine
//!
//! Recursive decimation-in-time Cooley-Tukey over power-of-two complex
//! sequences. Forward and inverse share one butterfly core and differ only
//! in the twiddle sign.

use super::padding::{is_power_of_two, pad_to_power_of_two};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Transform direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Twiddle e^(-j2πk/N)
    Forward,
    /// Twiddle e^(+j2πk/N), unscaled
    Inverse,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Inverse => 1.0,
        }
    }
}

/// FFT engine with a reusable scratch buffer
///
/// The scratch buffer stages the even/odd split at every recursion level,
/// so a transform allocates nothing beyond the first call at a given size.
/// Each engine is independent; nothing is shared between instances.
#[derive(Debug, Default)]
pub struct FftEngine {
    scratch: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create engine with scratch pre-allocated for `fft_size` points
    pub fn with_capacity(fft_size: usize) -> Self {
        Self {
            scratch: vec![Complex64::new(0.0, 0.0); fft_size],
        }
    }

    /// Transform in-place
    ///
    /// # Arguments
    /// * `data` - Complex sequence, length must be a power of two
    /// * `direction` - Forward or (unscaled) inverse
    pub fn process(&mut self, data: &mut [Complex64], direction: Direction) {
        debug_assert!(
            is_power_of_two(data.len()),
            "FFT length {} is not a power of two",
            data.len()
        );

        let n = data.len();
        if n <= 1 {
            return;
        }

        if self.scratch.len() < n {
            self.scratch.resize(n, Complex64::new(0.0, 0.0));
        }

        cooley_tukey(data, &mut self.scratch[..n], direction.sign());
    }

    /// Forward transform of a real signal (zero-padded to a power of two)
    pub fn forward(&mut self, signal: &[f64]) -> ComplexSpectrum {
        let padded = pad_to_power_of_two(signal);
        let mut bins: Vec<Complex64> = padded.iter().map(|&s| Complex64::new(s, 0.0)).collect();

        self.process(&mut bins, Direction::Forward);

        ComplexSpectrum { bins }
    }

    /// Inverse transform, returning the real part scaled by 1/N
    ///
    /// The imaginary part is discarded; it is ~0 whenever the spectrum is
    /// Hermitian-symmetric.
    pub fn inverse(&mut self, spectrum: &ComplexSpectrum) -> Vec<f64> {
        let mut bins = spectrum.bins.clone();
        self.process(&mut bins, Direction::Inverse);

        let scale = 1.0 / bins.len().max(1) as f64;
        bins.iter().map(|c| c.re * scale).collect()
    }
}

/// Recursive radix-2 core
///
/// `scratch` has the same length as `data`. Evens are gathered into the
/// first half and odds into the second, then each half recurses on its own
/// half of the scratch space.
fn cooley_tukey(data: &mut [Complex64], scratch: &mut [Complex64], sign: f64) {
    let n = data.len();
    if n <= 1 {
        return;
    }

    let half = n / 2;
    for k in 0..half {
        scratch[k] = data[2 * k];
        scratch[half + k] = data[2 * k + 1];
    }
    data.copy_from_slice(scratch);

    {
        let (even, odd) = data.split_at_mut(half);
        let (even_scratch, odd_scratch) = scratch.split_at_mut(half);
        cooley_tukey(even, even_scratch, sign);
        cooley_tukey(odd, odd_scratch, sign);
    }

    // Butterfly: X[k] = E[k] + w*O[k], X[k + N/2] = E[k] - w*O[k]
    for k in 0..half {
        let angle = sign * 2.0 * PI * k as f64 / n as f64;
        let twiddle = Complex64::new(angle.cos(), angle.sin());
        let t = twiddle * data[half + k];
        let e = data[k];
        data[k] = e + t;
        data[half + k] = e - t;
    }
}

/// Forward FFT of a real signal
///
/// Pads to the next power of two first.
pub fn forward_transform(signal: &[f64]) -> ComplexSpectrum {
    FftEngine::new().forward(signal)
}

/// Inverse FFT, real part only
pub fn inverse_transform(spectrum: &ComplexSpectrum) -> Vec<f64> {
    FftEngine::new().inverse(spectrum)
}

/// Convert linear magnitude to dB, clamped to [min_db, max_db]
pub fn magnitude_to_db(magnitude: f64, min_db: f64, max_db: f64) -> f64 {
    if magnitude < 1e-9 {
        return min_db;
    }
    (20.0 * magnitude.log10()).clamp(min_db, max_db)
}

/// Full complex spectrum of N bins (N a power of two)
///
/// Bins [0, N/2] carry the independent content of a real signal; bins
/// (N/2, N) hold the conjugate mirror, bin(N-i) = conj(bin(i)).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexSpectrum {
    bins: Vec<Complex64>,
}

impl ComplexSpectrum {
    /// Wrap existing bins
    pub fn from_bins(bins: Vec<Complex64>) -> Self {
        debug_assert!(is_power_of_two(bins.len()));
        Self { bins }
    }

    /// FFT size N
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[Complex64] {
        &self.bins
    }

    pub(crate) fn bins_mut(&mut self) -> &mut [Complex64] {
        &mut self.bins
    }

    pub fn bin(&self, index: usize) -> Option<Complex64> {
        self.bins.get(index).copied()
    }

    pub fn into_bins(self) -> Vec<Complex64> {
        self.bins
    }

    /// Number of independent bins (N/2 + 1, or 0 when empty)
    pub fn num_bins(&self) -> usize {
        if self.bins.is_empty() {
            0
        } else {
            self.bins.len() / 2 + 1
        }
    }

    /// Magnitude |X[k]| for k = 0..=N/2
    pub fn magnitudes(&self) -> Vec<f64> {
        self.bins[..self.num_bins()]
            .iter()
            .map(|c| c.norm())
            .collect()
    }

    /// Magnitude in dB for k = 0..=N/2, clamped to [min_db, max_db]
    pub fn magnitudes_db(&self, min_db: f64, max_db: f64) -> Vec<f64> {
        self.magnitudes()
            .iter()
            .map(|&mag| magnitude_to_db(mag, min_db, max_db))
            .collect()
    }

    /// Convert bin index to Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        if self.bins.is_empty() {
            return 0.0;
        }
        bin as f64 * sample_rate / self.bins.len() as f64
    }

    /// Frequency of each independent bin in Hz (0 to Nyquist)
    pub fn frequency_axis_hz(&self, sample_rate: f64) -> Vec<f64> {
        (0..self.num_bins())
            .map(|bin| self.bin_to_hz(bin, sample_rate))
            .collect()
    }

    /// Check conjugate symmetry bin(N-i) == conj(bin(i)) for 0 < i < N/2
    ///
    /// DC and Nyquist must also be real. Tolerance is relative to the bin
    /// magnitude (absolute below 1.0).
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        let n = self.bins.len();
        if n == 0 {
            return true;
        }

        let within = |err: f64, reference: Complex64| err <= tolerance * reference.norm().max(1.0);

        if !within(self.bins[0].im.abs(), self.bins[0]) {
            return false;
        }
        if n >= 2 && !within(self.bins[n / 2].im.abs(), self.bins[n / 2]) {
            return false;
        }

        (1..n / 2).all(|i| within((self.bins[n - i] - self.bins[i].conj()).norm(), self.bins[i]))
    }
}
