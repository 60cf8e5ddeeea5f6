//! Immutable multi-channel sample buffer
//!
//! Channels are reference-counted so replicated output channels share one
//! allocation and published results can be handed out without copying.

use crate::error::{Error, Result};
use std::sync::Arc;

/// Audio signal: one or more equal-length channels at a fixed sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Never empty; all channels have the same length
    channels: Vec<Arc<[f64]>>,
    sample_rate: f64,
}

fn check_sample_rate(sample_rate: f64) -> Result<()> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    Ok(())
}

impl Signal {
    /// Single-channel signal
    pub fn mono(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        Self::replicated(samples, sample_rate, 1)
    }

    /// Signal from per-channel sample vectors
    ///
    /// # Errors
    /// `NoChannels` for an empty channel list, `ChannelLengthMismatch` when
    /// channels differ in length, `InvalidSampleRate` for a rate that is not
    /// finite and positive.
    pub fn from_channels(channels: Vec<Vec<f64>>, sample_rate: f64) -> Result<Self> {
        check_sample_rate(sample_rate)?;

        let expected = channels.first().ok_or(Error::NoChannels)?.len();
        if let Some((channel, found)) = channels
            .iter()
            .map(|c| c.len())
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(Error::ChannelLengthMismatch {
                channel,
                expected,
                found,
            });
        }

        Ok(Self {
            channels: channels.into_iter().map(Arc::from).collect(),
            sample_rate,
        })
    }

    /// Signal whose `channel_count` channels all carry the same samples
    pub fn replicated(samples: Vec<f64>, sample_rate: f64, channel_count: usize) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        if channel_count == 0 {
            return Err(Error::NoChannels);
        }

        Ok(Self::share_across(Arc::from(samples), sample_rate, channel_count))
    }

    /// New signal with this signal's sample rate and channel count, every
    /// channel holding `samples`
    pub fn with_replicated_samples(&self, samples: Vec<f64>) -> Self {
        Self::share_across(Arc::from(samples), self.sample_rate, self.channels.len())
    }

    fn share_across(samples: Arc<[f64]>, sample_rate: f64, channel_count: usize) -> Self {
        Self {
            channels: vec![samples; channel_count],
            sample_rate,
        }
    }

    /// First channel; the one spectral processing is derived from
    pub fn primary_channel(&self) -> &[f64] {
        &self.channels[0]
    }

    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(|c| &c[..])
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.channels.iter().map(|c| &c[..])
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.len() as f64 / self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_signal() {
        let signal = Signal::mono(vec![0.0; 44100], 44100.0).unwrap();

        assert_eq!(signal.channel_count(), 1);
        assert_eq!(signal.len(), 44100);
        assert!((signal.duration() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_sample_rate() {
        for rate in [0.0, -48000.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Signal::mono(vec![1.0], rate),
                Err(Error::InvalidSampleRate(_))
            ));
        }
    }

    #[test]
    fn test_from_channels() {
        let signal = Signal::from_channels(vec![vec![1.0, 2.0], vec![3.0, 4.0]], 8000.0).unwrap();

        assert_eq!(signal.channel_count(), 2);
        assert_eq!(signal.primary_channel(), &[1.0, 2.0]);
        assert_eq!(signal.channel(1), Some(&[3.0, 4.0][..]));
        assert_eq!(signal.channel(2), None);
    }

    #[test]
    fn test_from_channels_errors() {
        assert!(matches!(
            Signal::from_channels(Vec::new(), 8000.0),
            Err(Error::NoChannels)
        ));

        let err = Signal::from_channels(vec![vec![0.0; 4], vec![0.0; 4], vec![0.0; 3]], 8000.0)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ChannelLengthMismatch {
                channel: 2,
                expected: 4,
                found: 3
            }
        ));
    }

    #[test]
    fn test_replicated_shares_storage() {
        let stereo = Signal::from_channels(vec![vec![0.0; 3], vec![0.0; 3]], 22050.0).unwrap();
        let derived = stereo.with_replicated_samples(vec![0.5, 0.25, 0.125, 0.0]);

        assert_eq!(derived.channel_count(), 2);
        assert_eq!(derived.sample_rate(), 22050.0);
        assert_eq!(derived.len(), 4);
        assert!(Arc::ptr_eq(&derived.channels[0], &derived.channels[1]));
        assert!(derived.channels().all(|c| c == [0.5, 0.25, 0.125, 0.0]));

        assert!(matches!(Signal::replicated(vec![1.0], 8000.0, 0), Err(Error::NoChannels)));
    }
}
