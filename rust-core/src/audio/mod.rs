//! Signal storage and the reconstruction pipeline

pub mod signal;
pub mod processor;

pub use signal::Signal;
pub use processor::{PipelineConfig, PipelineState, ReconstructionPipeline, SpectralResults};
