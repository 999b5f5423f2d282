// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window functions used for analysis framing and gain-filter truncation.
//!
//! Both generators evaluate `A0 - A1 * cos(2 * pi * i / N)`. The divisor is
//! `N`, not `N - 1`, so the windows are periodic rather than symmetric. This
//! matters for overlap-add reconstruction and is relied upon downstream.

use std::f64;

use crate::Real;

/// A Hamming window of length `size`.
pub fn hamming(size: usize) -> Vec<Real> {
    const A0: f64 = 0.538360;
    const A1: f64 = 0.461640;

    generalized_cosine(size, A0, A1)
}

/// A Hann window of length `size`.
pub fn hann(size: usize) -> Vec<Real> {
    generalized_cosine(size, 0.5, 0.5)
}

fn generalized_cosine(size: usize, a0: f64, a1: f64) -> Vec<Real> {
    (0..size)
        .map(|i| (a0 - a1 * (2.0 * f64::consts::PI * i as f64 / size as f64).cos()) as Real)
        .collect()
}

/// Multiply `samples` elementwise by `window`.
pub fn apply(window: &[Real], samples: &mut [Real]) {
    for (sample, &w) in samples.iter_mut().zip(window) {
        *sample *= w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_window_endpoints() {
        let hann = hann(320);
        let hamming = hamming(320);

        assert!(hann[0].abs() < 1e-7);
        assert!((hamming[0] - 0.076720).abs() < 1e-6);

        // Periodic windows do not return to zero at the last coefficient.
        assert!(hann[319] > 0.0);
    }

    #[test]
    fn verify_window_peak_at_midpoint() {
        let w = hann(64);
        assert!((w[32] - 1.0).abs() < 1e-7);
    }

    #[test]
    fn verify_apply_is_elementwise() {
        let w = [0.5, 2.0, 0.0];
        let mut x = [2.0, 3.0, 4.0];

        apply(&w, &mut x);
        assert_eq!(x, [1.0, 6.0, 0.0]);
    }
}
