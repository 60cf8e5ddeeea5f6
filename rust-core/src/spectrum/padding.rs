//! Zero-padding to radix-2 transform lengths

use std::borrow::Cow;

/// Check whether `len` is a valid radix-2 transform length
///
/// Zero counts as valid: an empty signal transforms to an empty spectrum.
pub fn is_power_of_two(len: usize) -> bool {
    len == 0 || len.is_power_of_two()
}

/// Length after padding (smallest power of two >= `len`, 0 stays 0)
pub fn padded_len(len: usize) -> usize {
    if len == 0 {
        0
    } else {
        len.next_power_of_two()
    }
}

/// Extend a signal with zeros up to the next power-of-two length
///
/// Never truncates. Signals that already have a power-of-two length are
/// returned borrowed, without copying.
///
/// # Arguments
/// * `signal` - Input samples
///
/// # Returns
/// Samples of length `padded_len(signal.len())`
pub fn pad_to_power_of_two(signal: &[f64]) -> Cow<'_, [f64]> {
    if is_power_of_two(signal.len()) {
        return Cow::Borrowed(signal);
    }

    let mut padded = Vec::with_capacity(padded_len(signal.len()));
    padded.extend_from_slice(signal);
    padded.resize(padded_len(signal.len()), 0.0);
    Cow::Owned(padded)
}
