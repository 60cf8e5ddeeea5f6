//! Spectral EQ - frequency-domain equalizer core
//!
//! Loads a signal, computes its zero-padded spectrum and STFT spectrogram,
//! applies slider-driven band gains in the frequency domain and reconstructs
//! the processed signal with an inverse transform.

pub mod audio;
pub mod equalizer;
pub mod error;
pub mod spectrum;

pub use audio::{PipelineConfig, PipelineState, ReconstructionPipeline, Signal, SpectralResults};
pub use equalizer::{equalize, BandEqualizer, BandRange, EqConfig, EqSlider};
pub use error::{Error, Result};
pub use spectrum::{
    build_spectrogram, forward_transform, inverse_transform, pad_to_power_of_two, ComplexSpectrum,
    Spectrogram, SpectrogramConfig,
};
