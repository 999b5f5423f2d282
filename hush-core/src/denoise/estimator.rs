// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `estimator` module tracks the noise spectrum of the incoming signal.
//!
//! The estimator implements MCRA-2: the noisy power spectrum is smoothed over
//! time, a running spectral minimum is tracked with Doblinger's recursion, and
//! the ratio of the two gates a per-bin speech-presence probability. Bins
//! judged speech-free update the noise spectrum quickly, speech bins barely at
//! all. The first frame is taken as pure noise to bootstrap the estimate.

use crate::Real;

const ALPHA_SMOOTH: Real = 0.7;
const BETA: Real = 0.8;
const GAMMA: Real = 0.998;
const ALPHA_SPP: Real = 0.2;
const ALPHA: Real = 0.95;

/// MCRA-2 noise spectrum estimator with Doblinger minimum tracking.
pub struct NoiseEstimator {
    size: usize,
    /// Per-bin a-posteriori SNR thresholds for the speech-presence decision.
    delta_k: Vec<Real>,
    p: Vec<Real>,
    p_prev: Vec<Real>,
    p_min: Vec<Real>,
    p_min_prev: Vec<Real>,
    spp: Vec<Real>,
    noise_power_spec: Vec<Real>,
    noise_amp_spec: Vec<Real>,
    got_first: bool,
}

impl NoiseEstimator {
    pub fn new(sample_rate: u32, size: usize) -> Self {
        NoiseEstimator {
            size,
            delta_k: init_delta_k(sample_rate, size),
            p: vec![0.0; size],
            p_prev: vec![0.0; size],
            p_min: vec![0.0; size],
            p_min_prev: vec![0.0; size],
            spp: vec![0.0; size],
            noise_power_spec: vec![0.0; size],
            noise_amp_spec: vec![0.0; size],
            got_first: false,
        }
    }

    /// The current noise amplitude spectrum.
    pub fn noise_amp_spec(&self) -> &[Real] {
        &self.noise_amp_spec
    }

    /// Update the estimate from the power spectrum of one noisy frame.
    pub fn run(&mut self, power_spec: &[Real]) {
        if !self.got_first {
            self.get_first(power_spec);
        }
        else {
            self.process(power_spec);
        }
    }

    /// Reset to the unprimed state; the next frame re-seeds the estimate.
    pub fn reset(&mut self) {
        for buf in [
            &mut self.p,
            &mut self.p_prev,
            &mut self.p_min,
            &mut self.p_min_prev,
            &mut self.spp,
            &mut self.noise_power_spec,
            &mut self.noise_amp_spec,
        ] {
            buf.fill(0.0);
        }
        self.got_first = false;
    }

    /// The first frame seeds every tracked spectrum directly.
    fn get_first(&mut self, power_spec: &[Real]) {
        self.p.copy_from_slice(power_spec);
        self.p_prev.copy_from_slice(power_spec);

        self.p_min.copy_from_slice(power_spec);
        self.p_min_prev.copy_from_slice(power_spec);

        self.noise_power_spec.copy_from_slice(power_spec);
        self.calculate_noise_amp_spec();

        self.got_first = true;
    }

    fn process(&mut self, power_spec: &[Real]) {
        // Smooth the noisy power spectrum over time.
        for k in 0..self.size {
            self.p[k] = ALPHA_SMOOTH * self.p_prev[k] + (1.0 - ALPHA_SMOOTH) * power_spec[k];
        }

        self.p_prev.copy_from_slice(&self.p);

        // Doblinger continuous minimum tracking. Note that `p_prev` has
        // already been advanced to the current frame at this point; the
        // recursion is defined on that value.
        for k in 0..self.size {
            self.p_min[k] = if self.p_min_prev[k] < self.p[k] {
                GAMMA * self.p_min_prev[k]
                    + ((1.0 - GAMMA) / (1.0 - BETA)) * (self.p[k] - BETA * self.p_prev[k])
            }
            else {
                self.p[k]
            };
        }

        self.p_min_prev.copy_from_slice(&self.p_min);

        for k in 0..self.size {
            // A-posteriori SNR of the smoothed signal against the tracked
            // minimum, hard-gated into a voice-activity decision.
            let sr_k = self.p[k] / self.p_min[k];
            let spp_raw = if sr_k > self.delta_k[k] { 1.0 } else { 0.0 };

            // Smooth the speech-presence probability over time.
            self.spp[k] = ALPHA_SPP * self.spp[k] + (1.0 - ALPHA_SPP) * spp_raw;

            // Time-frequency noise smoothing factor and the final update.
            let ak = ALPHA + (1.0 - ALPHA) * self.spp[k];
            self.noise_power_spec[k] = ak * self.noise_power_spec[k] + (1.0 - ak) * self.p[k];
        }

        self.calculate_noise_amp_spec();
    }

    fn calculate_noise_amp_spec(&mut self) {
        for k in 0..self.size {
            self.noise_amp_spec[k] = self.noise_power_spec[k].sqrt();
        }
    }
}

/// Build the per-bin speech-presence thresholds.
///
/// Voice energy concentrates below 3 kHz, so lower thresholds apply there:
/// 2.0 up to 3 kHz and 5.0 from there to the Nyquist bin. The upper half of
/// the table mirrors the lower half.
fn init_delta_k(sample_rate: u32, size: usize) -> Vec<Real> {
    const DELTA_LF: Real = 2.0;
    const DELTA_MF: Real = 2.0;
    const DELTA_HF: Real = 5.0;

    let freq_res = sample_rate as Real / size as Real;
    let lf = (1000.0 / freq_res) as usize;
    let mf = (3000.0 / freq_res) as usize;

    let mut delta_k = vec![0.0; size];

    for k in 0..lf {
        delta_k[k] = DELTA_LF;
    }
    for k in lf..mf {
        delta_k[k] = DELTA_MF;
    }
    for k in mf..size / 2 {
        delta_k[k] = DELTA_HF;
    }
    delta_k[size / 2] = 5.0;

    for k in 1..size / 2 {
        delta_k[size - k] = delta_k[k];
    }

    delta_k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_first_frame_identity() {
        let mut est = NoiseEstimator::new(16000, 8);
        let p = [4.0, 1.0, 0.25, 9.0, 16.0, 0.0, 1.0, 4.0];

        est.run(&p);

        // The first frame is adopted verbatim as the noise power spectrum.
        assert_eq!(est.noise_power_spec, p);
        assert_eq!(est.noise_amp_spec(), &[2.0, 1.0, 0.5, 3.0, 4.0, 0.0, 1.0, 2.0][..]);
    }

    #[test]
    fn verify_delta_k_bands_and_mirror() {
        // 16 kHz over 640 bins: 25 Hz resolution, knees at bins 40 and 120.
        let delta_k = init_delta_k(16000, 640);

        assert_eq!(delta_k[0], 2.0);
        assert_eq!(delta_k[39], 2.0);
        assert_eq!(delta_k[40], 2.0);
        assert_eq!(delta_k[119], 2.0);
        assert_eq!(delta_k[120], 5.0);
        assert_eq!(delta_k[319], 5.0);
        assert_eq!(delta_k[320], 5.0);

        for k in 1..320 {
            assert_eq!(delta_k[640 - k], delta_k[k]);
        }
    }

    #[test]
    fn verify_stationary_input_converges_to_noise() {
        let mut est = NoiseEstimator::new(16000, 4);
        let p = [1.0, 2.0, 3.0, 4.0];

        for _ in 0..50 {
            est.run(&p);
        }

        // A constant spectrum never rises above its own minimum, so it is
        // classified as noise and adopted wholesale.
        for (a, e) in est.noise_power_spec.iter().zip(p.iter()) {
            assert!((a - e).abs() < 1e-3);
        }
    }

    #[test]
    fn verify_spectral_peak_is_held_out_of_noise() {
        let mut est = NoiseEstimator::new(16000, 4);

        let quiet = [1.0, 1.0, 1.0, 1.0];
        est.run(&quiet);
        for _ in 0..20 {
            est.run(&quiet);
        }

        // A strong burst in one bin must leak into the noise estimate far
        // more slowly than the speech-free bins track their input.
        let loud = [1.0, 100.0, 1.0, 1.0];
        for _ in 0..5 {
            est.run(&loud);
        }

        assert!(est.noise_power_spec[1] < 20.0);
        assert!((est.noise_power_spec[0] - 1.0).abs() < 0.1);
    }
}
