//! Hann window for spectral analysis
//!
//! Applied to each chunk before the FFT to reduce spectral leakage

use std::f64::consts::PI;

/// Generate Hann window coefficients
///
/// w[n] = 0.5 * (1 - cos(2πn/(N-1)))
///
/// # Arguments
/// * `length` - Number of samples (N)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..N-1
pub fn hann_coefficients(length: usize) -> Vec<f64> {
    // N <= 1 has no (N-1) denominator; a single-sample window passes through
    if length <= 1 {
        return vec![1.0; length];
    }

    let denom = (length - 1) as f64;
    (0..length)
        .map(|n| 0.5 * (1.0 - (2.0 * PI * n as f64 / denom).cos()))
        .collect()
}

/// Apply Hann window to a chunk
///
/// # Arguments
/// * `chunk` - Input samples
///
/// # Returns
/// Windowed copy of the chunk
pub fn hann_window(chunk: &[f64]) -> Vec<f64> {
    let window = hann_coefficients(chunk.len());

    chunk
        .iter()
        .zip(window.iter())
        .map(|(&s, &w)| s * w)
        .collect()
}

/// Apply Hann window in-place
pub fn apply_hann_inplace(chunk: &mut [f64]) {
    let window = hann_coefficients(chunk.len());

    for (s, w) in chunk.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_shape() {
        let window = hann_coefficients(101);

        assert_eq!(window.len(), 101);

        // Zero at both ends, 1.0 at center
        assert!(window[0].abs() < 1e-12);
        assert!(window[100].abs() < 1e-12);
        assert!((window[50] - 1.0).abs() < 1e-12);

        // Symmetric
        for i in 0..50 {
            assert!((window[i] - window[100 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hann_single_sample() {
        assert_eq!(hann_window(&[0.75]), vec![0.75]);
    }

    #[test]
    fn test_hann_empty() {
        assert!(hann_window(&[]).is_empty());
    }

    #[test]
    fn test_hann_two_samples() {
        // Both samples sit on the window edges
        let windowed = hann_window(&[1.0, 1.0]);
        assert!(windowed[0].abs() < 1e-12);
        assert!(windowed[1].abs() < 1e-12);
    }

    #[test]
    fn test_apply_inplace_matches_copy() {
        let signal: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).sin()).collect();
        let copied = hann_window(&signal);

        let mut in_place = signal.clone();
        apply_hann_inplace(&mut in_place);

        assert_eq!(copied, in_place);
    }
}
