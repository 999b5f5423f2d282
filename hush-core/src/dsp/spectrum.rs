// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Helpers deriving amplitude, power and phase spectra from a complex
//! spectrum stored as parallel real and imaginary slices.

use crate::Real;

/// `out[i] = sqrt(re[i]^2 + im[i]^2)`.
pub fn amplitude(re: &[Real], im: &[Real], out: &mut [Real]) {
    for i in 0..out.len() {
        out[i] = (re[i] * re[i] + im[i] * im[i]).sqrt();
    }
}

/// `out[i] = re[i]^2 + im[i]^2`.
pub fn power(re: &[Real], im: &[Real], out: &mut [Real]) {
    for i in 0..out.len() {
        out[i] = re[i] * re[i] + im[i] * im[i];
    }
}

/// `out[i] = atan2(im[i], re[i])`.
pub fn phase(re: &[Real], im: &[Real], out: &mut [Real]) {
    for i in 0..out.len() {
        out[i] = im[i].atan2(re[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_spectra_of_unit_vectors() {
        let re = [1.0, 0.0, -1.0, 3.0];
        let im = [0.0, 1.0, 0.0, 4.0];

        let mut amp = [0.0; 4];
        let mut pow = [0.0; 4];
        let mut ph = [0.0; 4];

        amplitude(&re, &im, &mut amp);
        power(&re, &im, &mut pow);
        phase(&re, &im, &mut ph);

        assert_eq!(amp, [1.0, 1.0, 1.0, 5.0]);
        assert_eq!(pow, [1.0, 1.0, 1.0, 25.0]);

        assert_eq!(ph[0], 0.0);
        assert!((ph[1] - std::f64::consts::FRAC_PI_2 as Real).abs() < 1e-7);
        assert!((ph[2] - std::f64::consts::PI as Real).abs() < 1e-7);
    }
}
