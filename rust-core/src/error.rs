//! Error types for signal construction and EQ configuration
//!
//! The DSP path itself is infallible; errors only surface where external
//! data enters the core (sample buffers, preset JSON, slider edits).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid sample rate: {0} Hz (must be finite and > 0)")]
    InvalidSampleRate(f64),

    #[error("Signal has no channels")]
    NoChannels,

    #[error("Channel {channel} has {found} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        found: usize,
    },

    #[error("EQ configuration JSON error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Slider '{id}' has invalid scale {scale} (must be finite and >= 0)")]
    InvalidScale { id: String, scale: f64 },

    #[error("Slider '{id}' has a non-finite band (freq: {freq}, width: {width})")]
    InvalidBand { id: String, freq: f64, width: f64 },

    #[error("Duplicate slider id: {0}")]
    DuplicateSliderId(String),

    #[error("No slider with id: {0}")]
    UnknownSlider(String),
}

pub type Result<T> = std::result::Result<T, Error>;
