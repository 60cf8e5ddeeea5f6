//! Short-time spectrogram builder
//!
//! Chunks a signal, Hann-windows each chunk and keeps the FFT magnitude of
//! the non-negative frequencies. Analysis only: no overlap-add synthesis.

use super::fft::FftEngine;
use super::padding::padded_len;
use super::windowing::apply_hann_inplace;
use ndarray::Array2;
use serde::Deserialize;

/// Spectrogram configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    /// Samples per analysis chunk (padded to a power of two for the FFT)
    pub window_size: usize,

    /// Samples between consecutive chunk starts
    pub hop_size: usize,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            window_size: 2048,
            hop_size: 512,
        }
    }
}

/// Number of frames produced for a signal of `signal_len` samples
///
/// floor((L - W) / H) + 1 when L >= W, else 0. A zero window yields no
/// frames; a zero hop is treated as 1.
pub fn expected_frame_count(signal_len: usize, window_size: usize, hop_size: usize) -> usize {
    if window_size == 0 || signal_len < window_size {
        return 0;
    }
    (signal_len - window_size) / hop_size.max(1) + 1
}

/// Magnitude spectrogram `[frame][bin]`
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    frames: Vec<Vec<f64>>,
    window_size: usize,
    hop_size: usize,
    fft_size: usize,
}

impl Spectrogram {
    fn empty(window_size: usize, hop_size: usize) -> Self {
        Self {
            frames: Vec::new(),
            window_size,
            hop_size,
            fft_size: padded_len(window_size),
        }
    }

    pub fn frames(&self) -> &[Vec<f64>] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&[f64]> {
        self.frames.get(index).map(|f| f.as_slice())
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Bins per frame (fft_size / 2 + 1)
    pub fn num_bins(&self) -> usize {
        if self.fft_size == 0 {
            0
        } else {
            self.fft_size / 2 + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Padded FFT size used per frame
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Start time of a frame in seconds
    pub fn frame_to_time(&self, frame: usize, sample_rate: f64) -> f64 {
        (frame * self.hop_size) as f64 / sample_rate
    }

    /// Center frequency of a bin in Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        if self.fft_size == 0 {
            return 0.0;
        }
        bin as f64 * sample_rate / self.fft_size as f64
    }

    /// Copy into a 2D array of shape (frames, bins)
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.num_frames(), self.num_bins()), |(t, f)| {
            self.frames[t][f]
        })
    }

    /// Convert magnitudes to dB (20·log10), flooring tiny values at `floor_db`
    pub fn to_db(&self, floor_db: f64) -> Spectrogram {
        let floor_mag = 10f64.powf(floor_db / 20.0);
        let frames = self
            .frames
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|&m| 20.0 * m.max(floor_mag).log10())
                    .collect()
            })
            .collect();

        self.with_frames(frames)
    }

    /// Log-magnitude normalized to [0, 1] over `dynamic_range_db` below the peak
    ///
    /// The global peak maps to 1.0; anything `dynamic_range_db` or more
    /// below it maps to 0.0. An all-silent spectrogram maps to zeros.
    pub fn normalized(&self, dynamic_range_db: f64) -> Spectrogram {
        let peak = self
            .frames
            .iter()
            .flat_map(|f| f.iter().copied())
            .fold(0.0f64, f64::max);

        if peak <= 0.0 || dynamic_range_db <= 0.0 {
            return self.with_frames(self.frames.iter().map(|f| vec![0.0; f.len()]).collect());
        }

        let max_log = peak.log10();
        let min_log = max_log - dynamic_range_db / 20.0;

        let frames = self
            .frames
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|&m| {
                        if m <= 0.0 {
                            0.0
                        } else {
                            ((m.log10() - min_log) / (max_log - min_log)).clamp(0.0, 1.0)
                        }
                    })
                    .collect()
            })
            .collect();

        self.with_frames(frames)
    }

    fn with_frames(&self, frames: Vec<Vec<f64>>) -> Spectrogram {
        Spectrogram {
            frames,
            window_size: self.window_size,
            hop_size: self.hop_size,
            fft_size: self.fft_size,
        }
    }
}

/// Build a magnitude spectrogram
///
/// # Arguments
/// * `signal` - Input samples
/// * `config` - Window and hop sizes
///
/// # Returns
/// One frame per chunk [i, i + window_size) for i = 0, hop, 2·hop, ...
/// Empty if the signal is shorter than the window.
pub fn build_spectrogram(signal: &[f64], config: &SpectrogramConfig) -> Spectrogram {
    let window_size = config.window_size;
    let hop_size = config.hop_size.max(1);

    let num_frames = expected_frame_count(signal.len(), window_size, hop_size);
    if num_frames == 0 {
        return Spectrogram::empty(window_size, hop_size);
    }

    let fft_size = padded_len(window_size);
    let mut engine = FftEngine::with_capacity(fft_size);
    let mut chunk = vec![0.0; window_size];
    let mut frames = Vec::with_capacity(num_frames);

    for start in (0..num_frames).map(|i| i * hop_size) {
        chunk.copy_from_slice(&signal[start..start + window_size]);
        apply_hann_inplace(&mut chunk);

        frames.push(engine.forward(&chunk).magnitudes());
    }

    Spectrogram {
        frames,
        window_size,
        hop_size,
        fft_size,
    }
}

/// Build a spectrogram with explicit window and hop sizes
pub fn build_spectrogram_with(signal: &[f64], window_size: usize, hop_size: usize) -> Spectrogram {
    build_spectrogram(
        signal,
        &SpectrogramConfig {
            window_size,
            hop_size,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::windowing::hann_window;
    use realfft::RealFftPlanner;
    use std::f64::consts::PI;

    fn sine(len: usize, freq_hz: f64, sample_rate: f64) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq_hz * n as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_frame_count_small() {
        // Window 4, hop 2, length 6 -> 2 frames
        let spectrogram = build_spectrogram_with(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 4, 2);

        assert_eq!(spectrogram.num_frames(), 2);
        assert_eq!(spectrogram.num_bins(), 3);
        assert!(spectrogram.frames().iter().all(|f| f.len() == 3));
    }

    #[test]
    fn test_frame_count_law() {
        for &(len, window, hop) in &[
            (10_000usize, 2048usize, 512usize),
            (2048, 2048, 512),
            (2047, 2048, 512),
            (5000, 1000, 300),
            (17, 5, 3),
        ] {
            let signal = vec![0.25; len];
            let spectrogram = build_spectrogram_with(&signal, window, hop);
            let expected = if len >= window { (len - window) / hop + 1 } else { 0 };

            assert_eq!(spectrogram.num_frames(), expected, "L={} W={} H={}", len, window, hop);
            assert_eq!(expected_frame_count(len, window, hop), expected);
        }
    }

    #[test]
    fn test_short_signal_is_empty() {
        let spectrogram = build_spectrogram(&[1.0; 100], &SpectrogramConfig::default());
        assert!(spectrogram.is_empty());
        assert_eq!(spectrogram.to_array().dim(), (0, 1025));
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(build_spectrogram_with(&[1.0; 8], 0, 2).is_empty());

        // Zero hop advances by one sample
        let spectrogram = build_spectrogram_with(&[1.0; 8], 4, 0);
        assert_eq!(spectrogram.num_frames(), 5);
        assert_eq!(spectrogram.hop_size(), 1);
    }

    #[test]
    fn test_non_power_of_two_window() {
        // 1000-sample window pads to 1024 -> 513 bins
        let spectrogram = build_spectrogram_with(&sine(4000, 440.0, 8000.0), 1000, 500);
        assert_eq!(spectrogram.fft_size(), 1024);
        assert_eq!(spectrogram.num_bins(), 513);
        assert_eq!(spectrogram.num_frames(), 7);
    }

    #[test]
    fn test_magnitudes_match_realfft() {
        let signal = sine(3000, 1000.0, 16000.0);
        let spectrogram = build_spectrogram_with(&signal, 1024, 256);

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(1024);
        let mut input = hann_window(&signal[512..1536]);
        let mut output = r2c.make_output_vec();
        r2c.process(&mut input, &mut output).unwrap();

        let frame = spectrogram.frame(2).unwrap();
        for (k, (ours, theirs)) in frame.iter().zip(output.iter()).enumerate() {
            assert!((ours - theirs.norm()).abs() < 1e-8, "bin {} mismatch", k);
        }
    }

    #[test]
    fn test_peak_tracks_frequency() {
        let sample_rate = 8000.0;
        let spectrogram = build_spectrogram_with(&sine(8192, 1000.0, sample_rate), 512, 256);

        for frame in spectrogram.frames() {
            let (peak_bin, _) = frame
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
                .unwrap();
            assert!((spectrogram.bin_to_hz(peak_bin, sample_rate) - 1000.0).abs() < 20.0);
        }
        assert!((spectrogram.frame_to_time(2, sample_rate) - 0.064).abs() < 1e-12);
    }

    #[test]
    fn test_to_array_shape() {
        let spectrogram = build_spectrogram_with(&sine(600, 50.0, 1000.0), 64, 32);
        let array = spectrogram.to_array();

        assert_eq!(array.dim(), (spectrogram.num_frames(), 33));
        assert_eq!(array[[1, 3]], spectrogram.frames()[1][3]);
    }

    #[test]
    fn test_normalized_range() {
        let spectrogram = build_spectrogram_with(&sine(4096, 300.0, 8000.0), 256, 128);
        let normalized = spectrogram.normalized(60.0);

        assert_eq!(normalized.num_frames(), spectrogram.num_frames());
        let values: Vec<f64> = normalized.frames().iter().flatten().copied().collect();
        assert!(values.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(values.iter().any(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_normalized_silence() {
        let spectrogram = build_spectrogram_with(&[0.0; 64], 16, 16);
        let normalized = spectrogram.normalized(60.0);
        assert!(normalized.frames().iter().flatten().all(|&v| v == 0.0));
    }

    #[test]
    fn test_to_db_floor() {
        let spectrogram = build_spectrogram_with(&[0.0; 32], 16, 16);
        let db = spectrogram.to_db(-120.0);
        assert!(db.frames().iter().flatten().all(|&v| (v + 120.0).abs() < 1e-9));
    }
}
