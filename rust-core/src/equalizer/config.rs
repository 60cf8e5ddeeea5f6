//! EQ configuration model
//!
//! Mirrors the preset JSON shape:
//! `{ "mode": ..., "sliders": [{ "id", "label", "bands": [{ "freq", "width" }], "scale" }] }`

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// One frequency region controlled by a slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRange {
    /// Center frequency in Hz
    pub freq: f64,

    /// Full width in Hz (<= 0 affects only the center bin)
    pub width: f64,
}

/// A gain control covering one or more frequency regions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqSlider {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default)]
    pub label: String,

    pub bands: Vec<BandRange>,

    /// Linear gain, 1.0 = unity
    #[serde(default = "unity_scale")]
    pub scale: f64,
}

fn unity_scale() -> f64 {
    1.0
}

/// Preset ids may be written as strings or plain numbers
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

impl EqSlider {
    /// Slider over a single band at unity gain
    pub fn single_band(
        id: impl Into<String>,
        label: impl Into<String>,
        freq: f64,
        width: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            bands: vec![BandRange { freq, width }],
            scale: 1.0,
        }
    }

    /// Builder-style gain override
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    fn validate(&self) -> Result<()> {
        validate_scale(&self.id, self.scale)?;

        for band in &self.bands {
            if !band.freq.is_finite() || !band.width.is_finite() {
                return Err(Error::InvalidBand {
                    id: self.id.clone(),
                    freq: band.freq,
                    width: band.width,
                });
            }
        }

        Ok(())
    }
}

fn validate_scale(id: &str, scale: f64) -> Result<()> {
    if !scale.is_finite() || scale < 0.0 {
        return Err(Error::InvalidScale {
            id: id.to_string(),
            scale,
        });
    }
    Ok(())
}

/// Equalizer configuration for one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqConfig {
    pub mode: String,

    #[serde(default)]
    pub sliders: Vec<EqSlider>,
}

impl EqConfig {
    /// Configuration with no sliders (the fallback for a missing preset)
    pub fn empty(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            sliders: Vec::new(),
        }
    }

    /// Parse and validate a preset document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EqConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON in the preset shape
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check scales, band values and id uniqueness
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for slider in &self.sliders {
            if !seen.insert(slider.id.as_str()) {
                return Err(Error::DuplicateSliderId(slider.id.clone()));
            }
            slider.validate()?;
        }

        Ok(())
    }

    pub fn slider(&self, id: &str) -> Option<&EqSlider> {
        self.sliders.iter().find(|s| s.id == id)
    }

    pub fn slider_mut(&mut self, id: &str) -> Option<&mut EqSlider> {
        self.sliders.iter_mut().find(|s| s.id == id)
    }

    /// Set the gain of one slider
    pub fn set_scale(&mut self, id: &str, scale: f64) -> Result<()> {
        validate_scale(id, scale)?;

        let slider = self
            .slider_mut(id)
            .ok_or_else(|| Error::UnknownSlider(id.to_string()))?;
        slider.scale = scale;
        Ok(())
    }

    /// Append a slider (ids must stay unique)
    pub fn add_slider(&mut self, slider: EqSlider) -> Result<()> {
        if self.slider(&slider.id).is_some() {
            return Err(Error::DuplicateSliderId(slider.id));
        }
        slider.validate()?;

        self.sliders.push(slider);
        Ok(())
    }

    /// Remove a slider, returning it if present
    pub fn remove_slider(&mut self, id: &str) -> Option<EqSlider> {
        let index = self.sliders.iter().position(|s| s.id == id)?;
        Some(self.sliders.remove(index))
    }

    /// Total number of bands across all sliders
    pub fn band_count(&self) -> usize {
        self.sliders.iter().map(|s| s.bands.len()).sum()
    }

    /// True when every slider is at unity gain
    pub fn is_identity(&self) -> bool {
        self.sliders.iter().all(|s| s.scale == 1.0)
    }
}
