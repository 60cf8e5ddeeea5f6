//! EQ configuration and frequency-domain band equalization

pub mod config;
pub mod band;

pub use config::{BandRange, EqConfig, EqSlider};
pub use band::{band_bins, equalize, BandEqualizer, BinRange};
