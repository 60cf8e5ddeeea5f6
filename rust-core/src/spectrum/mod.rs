//! Spectral analysis: padding, windowing, FFT and spectrograms

pub mod padding;
pub mod windowing;
pub mod fft;
pub mod spectrogram;

pub use padding::pad_to_power_of_two;
pub use windowing::hann_window;
pub use fft::{forward_transform, inverse_transform, ComplexSpectrum, Direction, FftEngine};
pub use spectrogram::{build_spectrogram, Spectrogram, SpectrogramConfig};
