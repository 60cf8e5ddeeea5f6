//! Reconstruction pipeline - the single owner of derived spectral products
//!
//! The owning component calls `on_signal_replaced` / `on_config_replaced`;
//! each call runs a full synchronous recompute and publishes the new result
//! set in one swap. Readers holding an `Arc<SpectralResults>` keep a
//! consistent snapshot regardless of later recomputes.

use crate::audio::signal::Signal;
use crate::equalizer::{BandEqualizer, EqConfig};
use crate::error::Result;
use crate::spectrum::{build_spectrogram, forward_transform, inverse_transform};
use crate::spectrum::{ComplexSpectrum, Spectrogram, SpectrogramConfig};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

/// Pipeline configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Analysis settings for both original and processed spectrograms
    pub spectrogram: SpectrogramConfig,
}

impl PipelineConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Pipeline state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineState {
    /// Published results reflect the latest inputs
    #[default]
    Idle,

    /// A non-identity EQ configuration is held but not reflected in the
    /// results (no signal yet, or the signal changed since); see `refresh`
    Stale,

    /// Recompute in progress; never observable through `&self`
    Computing,
}

/// One complete, consistent set of published products
#[derive(Debug, Clone)]
pub struct SpectralResults {
    pub original_signal: Arc<Signal>,
    pub original_spectrum: Arc<ComplexSpectrum>,
    pub original_spectrogram: Arc<Spectrogram>,
    pub processed_signal: Arc<Signal>,
    pub processed_spectrum: Arc<ComplexSpectrum>,
    pub processed_spectrogram: Arc<Spectrogram>,
}

impl SpectralResults {
    /// Identity baseline: processed products alias the originals
    fn baseline(
        signal: Arc<Signal>,
        spectrum: Arc<ComplexSpectrum>,
        spectrogram: Arc<Spectrogram>,
    ) -> Self {
        Self {
            processed_signal: Arc::clone(&signal),
            processed_spectrum: Arc::clone(&spectrum),
            processed_spectrogram: Arc::clone(&spectrogram),
            original_signal: signal,
            original_spectrum: spectrum,
            original_spectrogram: spectrogram,
        }
    }

    /// True while the processed products are still the unmodified originals
    pub fn is_baseline(&self) -> bool {
        Arc::ptr_eq(&self.processed_spectrum, &self.original_spectrum)
    }
}

/// Signal -> spectrum -> band EQ -> inverse -> spectrogram
#[derive(Debug, Default)]
pub struct ReconstructionPipeline {
    config: PipelineConfig,
    eq_config: Option<EqConfig>,
    results: Option<Arc<SpectralResults>>,
    state: PipelineState,
}

impl ReconstructionPipeline {
    /// Create new pipeline
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Load a new signal and publish the identity baseline
    ///
    /// Processing is derived from the first channel. A held EQ
    /// configuration is kept but not re-applied; the pipeline goes `Stale`
    /// until `refresh` unless that configuration is the identity.
    pub fn on_signal_replaced(&mut self, signal: Signal) {
        self.state = PipelineState::Computing;
        let started = Instant::now();

        let samples = signal.primary_channel();
        let spectrum = forward_transform(samples);
        let spectrogram = build_spectrogram(samples, &self.config.spectrogram);

        log::info!(
            "Loaded signal: {} samples x {} channels, {} Hz, {:.2}s, FFT size {}",
            signal.len(),
            signal.channel_count(),
            signal.sample_rate(),
            signal.duration(),
            spectrum.len()
        );

        self.results = Some(Arc::new(SpectralResults::baseline(
            Arc::new(signal),
            Arc::new(spectrum),
            Arc::new(spectrogram),
        )));
        self.state = match &self.eq_config {
            Some(eq_config) if !eq_config.is_identity() => {
                log::debug!("Held EQ configuration '{}' not yet applied", eq_config.mode);
                PipelineState::Stale
            }
            _ => PipelineState::Idle,
        };

        log::debug!("Signal analysis took {:?}", started.elapsed());
    }

    /// Replace the EQ configuration and recompute the processed products
    ///
    /// Without a loaded signal the configuration is only stored and the
    /// pipeline goes `Stale`.
    pub fn on_config_replaced(&mut self, config: EqConfig) {
        self.eq_config = Some(config);
        self.recompute();
    }

    /// Re-apply the held configuration to the current signal
    pub fn refresh(&mut self) {
        self.recompute();
    }

    fn recompute(&mut self) {
        let Some(eq_config) = self.eq_config.as_ref() else {
            return;
        };
        let Some(current) = self.results.as_ref() else {
            log::warn!(
                "EQ configuration '{}' received before any signal; deferring",
                eq_config.mode
            );
            self.state = PipelineState::Stale;
            return;
        };

        self.state = PipelineState::Computing;
        let started = Instant::now();

        let original = &current.original_signal;
        let equalizer = BandEqualizer::new(original.sample_rate());
        let processed_spectrum = equalizer.apply(&current.original_spectrum, eq_config);

        // Mono reconstruction replicated across the original channel layout
        let reconstructed = inverse_transform(&processed_spectrum);
        let processed_signal = original.with_replicated_samples(reconstructed);
        let processed_spectrogram =
            build_spectrogram(processed_signal.primary_channel(), &self.config.spectrogram);

        log::debug!(
            "Applied {} bands from '{}' ({} sliders): {} spectrogram frames in {:?}",
            eq_config.band_count(),
            eq_config.mode,
            eq_config.sliders.len(),
            processed_spectrogram.num_frames(),
            started.elapsed()
        );

        let results = SpectralResults {
            original_signal: Arc::clone(&current.original_signal),
            original_spectrum: Arc::clone(&current.original_spectrum),
            original_spectrogram: Arc::clone(&current.original_spectrogram),
            processed_signal: Arc::new(processed_signal),
            processed_spectrum: Arc::new(processed_spectrum),
            processed_spectrogram: Arc::new(processed_spectrogram),
        };

        self.results = Some(Arc::new(results));
        self.state = PipelineState::Idle;
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn pipeline_config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Currently held EQ configuration
    pub fn config(&self) -> Option<&EqConfig> {
        self.eq_config.as_ref()
    }

    /// Latest published snapshot
    pub fn results(&self) -> Option<Arc<SpectralResults>> {
        self.results.clone()
    }

    pub fn original_signal(&self) -> Option<&Signal> {
        self.results.as_deref().map(|r| &*r.original_signal)
    }

    pub fn original_spectrum(&self) -> Option<&ComplexSpectrum> {
        self.results.as_deref().map(|r| &*r.original_spectrum)
    }

    pub fn original_spectrogram(&self) -> Option<&Spectrogram> {
        self.results.as_deref().map(|r| &*r.original_spectrogram)
    }

    pub fn processed_signal(&self) -> Option<&Signal> {
        self.results.as_deref().map(|r| &*r.processed_signal)
    }

    pub fn processed_spectrum(&self) -> Option<&ComplexSpectrum> {
        self.results.as_deref().map(|r| &*r.processed_spectrum)
    }

    pub fn processed_spectrogram(&self) -> Option<&Spectrogram> {
        self.results.as_deref().map(|r| &*r.processed_spectrogram)
    }
}
