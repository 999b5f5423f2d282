// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `suppressor` module attenuates the noisy amplitude spectrum.
//!
//! Six modes share one contract: given the noisy amplitude spectrum and the
//! estimated noise amplitude spectrum, produce a clean speech amplitude
//! spectrum. Spectral subtraction is stateless per frame; the Wiener family
//! carries the previous frame's clean spectrum for the decision-directed
//! a-priori SNR, and the two-step variants refine the Wiener gain a second
//! time, optionally constraining it by truncating its impulse response.

use crate::config::Mode;
use crate::dsp::dft::Dft;
use crate::dsp::{spectrum, window};
use crate::Real;

/// Smoothing factor of the decision-directed a-priori SNR update.
const DD_BETA: Real = 0.98;
/// Lower bound applied to SNRs and second-step gains.
const GAIN_FLOOR: Real = 0.01;

/// A configured spectral suppressor running one of the six [`Mode`]s.
pub struct Suppressor {
    speech_amp_spec: Vec<Real>,
    kind: Kind,
}

enum Kind {
    SpecSub(SpecSub),
    Wiener(Wiener),
    Tsnr(Tsnr),
}

impl Suppressor {
    pub fn new(mode: Mode, size: usize) -> Self {
        let kind = match mode {
            Mode::SpecSub => Kind::SpecSub(SpecSub::new(size)),
            Mode::Wiener => Kind::Wiener(Wiener::new(size)),
            Mode::Tsnr | Mode::TsnrG | Mode::Rtsnr | Mode::RtsnrG => {
                Kind::Tsnr(Tsnr::new(mode, size))
            }
        };

        Suppressor { speech_amp_spec: vec![0.0; size], kind }
    }

    /// The clean amplitude spectrum produced by the last [`Suppressor::run`].
    pub fn speech_amp_spec(&self) -> &[Real] {
        &self.speech_amp_spec
    }

    /// Suppress one frame.
    pub fn run(&mut self, noisy_amp: &[Real], noise_amp: &[Real]) {
        match &mut self.kind {
            Kind::SpecSub(s) => s.run(noisy_amp, noise_amp, &mut self.speech_amp_spec),
            Kind::Wiener(w) => w.run(noisy_amp, noise_amp, &mut self.speech_amp_spec),
            Kind::Tsnr(t) => t.run(noisy_amp, noise_amp, &mut self.speech_amp_spec),
        }
    }

    /// Clear all inter-frame state.
    pub fn reset(&mut self) {
        self.speech_amp_spec.fill(0.0);

        match &mut self.kind {
            Kind::SpecSub(_) => (),
            Kind::Wiener(w) => w.reset(),
            Kind::Tsnr(t) => {
                t.wiener.reset();
                t.snr_prio_2_step.fill(0.0);
                t.g_2_step.fill(0.0);
            }
        }
    }
}

/// Berouti-Schwartz spectral subtraction.
struct SpecSub {
    size: usize,
    power_exponent: Real,
}

impl SpecSub {
    fn new(size: usize) -> Self {
        SpecSub { size, power_exponent: 2.0 }
    }

    fn run(&self, noisy_amp: &[Real], noise_amp: &[Real], out: &mut [Real]) {
        let snr_post = calculate_snr_post(noisy_amp, noise_amp);
        // The over-subtraction factor drives the subtraction itself, while
        // the spectral floor masks musical noise with residual noise.
        let alpha = calculate_alpha(snr_post);
        let beta = calculate_beta(snr_post);

        for k in 0..self.size {
            let u = noisy_amp[k].powf(self.power_exponent);
            let v = noise_amp[k].powf(self.power_exponent);

            let tmp = if u > (alpha + beta) * v { u - alpha * v } else { beta * v };

            out[k] = tmp.powf(1.0 / self.power_exponent);
        }
    }
}

/// Global a-posteriori SNR over the whole spectrum, in dB.
fn calculate_snr_post(noisy_amp: &[Real], noise_amp: &[Real]) -> Real {
    let mut noisy_power = 0.0;
    let mut noise_power = 0.0;

    for (&s, &n) in noisy_amp.iter().zip(noise_amp) {
        noisy_power += s * s;
        noise_power += n * n;
    }

    10.0 * (noisy_power / noise_power).log10()
}

fn calculate_alpha(snr_post: Real) -> Real {
    const MIN: Real = -5.0;
    const MAX: Real = 20.0;
    const ALPHA0: Real = 4.0;

    if snr_post >= MIN && snr_post <= MAX {
        ALPHA0 - snr_post * 3.0 / MAX
    }
    else if snr_post < MIN {
        5.0
    }
    else {
        1.0
    }
}

fn calculate_beta(snr_post: Real) -> Real {
    if snr_post > 0.0 {
        0.01
    }
    else if snr_post < -5.0 {
        0.04
    }
    else {
        0.02
    }
}

/// Scalart-Filho decision-directed Wiener filter.
struct Wiener {
    size: usize,
    noise_power_spec: Vec<Real>,
    snr_inst: Vec<Real>,
    snr_prio_dd: Vec<Real>,
    g_dd: Vec<Real>,
    speech_amp_spec: Vec<Real>,
    speech_amp_spec_prev: Vec<Real>,
}

impl Wiener {
    fn new(size: usize) -> Self {
        Wiener {
            size,
            noise_power_spec: vec![0.0; size],
            snr_inst: vec![0.0; size],
            snr_prio_dd: vec![0.0; size],
            g_dd: vec![0.0; size],
            speech_amp_spec: vec![0.0; size],
            speech_amp_spec_prev: vec![0.0; size],
        }
    }

    fn reset(&mut self) {
        for buf in [
            &mut self.noise_power_spec,
            &mut self.snr_inst,
            &mut self.snr_prio_dd,
            &mut self.g_dd,
            &mut self.speech_amp_spec,
            &mut self.speech_amp_spec_prev,
        ] {
            buf.fill(0.0);
        }
    }

    /// Compute the decision-directed Wiener gain `g_dd` for this frame.
    fn update_gain(&mut self, noisy_amp: &[Real], noise_amp: &[Real]) {
        for i in 0..self.size {
            self.noise_power_spec[i] = noise_amp[i] * noise_amp[i];
        }

        // Instantaneous SNR is the a-posteriori SNR less one, floored to
        // limit signal distortion.
        for i in 0..self.size {
            let noisy_power = noisy_amp[i] * noisy_amp[i];
            let snr_post = noisy_power / self.noise_power_spec[i];
            self.snr_inst[i] = (snr_post - 1.0).max(GAIN_FLOOR);
        }

        // Ephraim-Malah decision-directed a-priori SNR.
        for i in 0..self.size {
            let prev = self.speech_amp_spec_prev[i];
            self.snr_prio_dd[i] = DD_BETA * ((prev * prev) / self.noise_power_spec[i])
                + (1.0 - DD_BETA) * self.snr_inst[i];
        }

        for i in 0..self.size {
            self.g_dd[i] = self.snr_prio_dd[i] / (self.snr_prio_dd[i] + 1.0);
        }
    }

    fn run(&mut self, noisy_amp: &[Real], noise_amp: &[Real], out: &mut [Real]) {
        self.update_gain(noisy_amp, noise_amp);

        for i in 0..self.size {
            self.speech_amp_spec[i] = self.g_dd[i] * noisy_amp[i];
        }

        self.speech_amp_spec_prev.copy_from_slice(&self.speech_amp_spec);
        out.copy_from_slice(&self.speech_amp_spec);
    }
}

/// Two-step noise reduction over the decision-directed Wiener gain, after
/// Scalart (TSNR) and Shifeng (RTSNR), optionally with gain shaping.
struct Tsnr {
    mode: Mode,
    wiener: Wiener,
    snr_prio_2_step: Vec<Real>,
    g_2_step: Vec<Real>,
    gain: Option<GainShaper>,
}

impl Tsnr {
    fn new(mode: Mode, size: usize) -> Self {
        let gain = match mode {
            Mode::TsnrG | Mode::RtsnrG => Some(GainShaper::new(size)),
            _ => None,
        };

        Tsnr {
            mode,
            wiener: Wiener::new(size),
            snr_prio_2_step: vec![0.0; size],
            g_2_step: vec![0.0; size],
            gain,
        }
    }

    fn run(&mut self, noisy_amp: &[Real], noise_amp: &[Real], out: &mut [Real]) {
        let w = &mut self.wiener;

        w.update_gain(noisy_amp, noise_amp);

        // First-step estimate. The Shifeng variants substitute the gain with
        // (2 - G) * G to soften the attenuation of the intermediate result.
        for i in 0..w.size {
            w.speech_amp_spec[i] = match self.mode {
                Mode::Tsnr | Mode::TsnrG => w.g_dd[i] * noisy_amp[i],
                _ => (2.0 - w.g_dd[i]) * w.g_dd[i] * noisy_amp[i],
            };
        }

        // Second iteration of the a-priori SNR, now computed from the first
        // step's clean estimate. One extra iteration compensates most of the
        // one-frame lag of the decision-directed recursion.
        for i in 0..w.size {
            let s = w.speech_amp_spec[i];
            self.snr_prio_2_step[i] = (s * s) / w.noise_power_spec[i];
        }

        for i in 0..w.size {
            self.g_2_step[i] = self.snr_prio_2_step[i] / (self.snr_prio_2_step[i] + 1.0);
        }

        match &mut self.gain {
            None => {
                for g in self.g_2_step.iter_mut() {
                    *g = g.max(GAIN_FLOOR);
                }
            }
            Some(shaper) => shaper.shape(&mut self.g_2_step),
        }

        for i in 0..w.size {
            w.speech_amp_spec[i] = self.g_2_step[i] * noisy_amp[i];
        }

        w.speech_amp_spec_prev.copy_from_slice(&w.speech_amp_spec);
        out.copy_from_slice(&w.speech_amp_spec);
    }
}

/// Constrains a gain spectrum by windowing its impulse response in the time
/// domain, then rescales it to preserve the gain energy.
struct GainShaper {
    l1: usize,
    l2: usize,
    dft: Dft,
    window: Vec<Real>,
    ir_before: Vec<Real>,
    ir_after: Vec<Real>,
}

impl GainShaper {
    fn new(size: usize) -> Self {
        let l2 = size / 2;

        GainShaper {
            l1: size,
            l2,
            dft: Dft::new(size),
            window: window::hamming(l2),
            ir_before: vec![0.0; size],
            ir_after: vec![0.0; size],
        }
    }

    fn shape(&mut self, gain: &mut [Real]) {
        let half = self.l2 / 2;

        let mut mean_before = 0.0;
        for &g in gain.iter() {
            mean_before += g * g;
        }
        mean_before /= self.l1 as Real;

        // Into the time domain: the gain's unconstrained impulse response.
        self.dft.real.copy_from_slice(gain);
        self.dft.imag.fill(0.0);
        self.dft.run_inverse();
        self.ir_before.copy_from_slice(&self.dft.real);

        // Keep a half-window worth of taps at both ends, zero the middle.
        for i in 0..half {
            self.ir_after[i] = self.ir_before[i] * self.window[i + half];
        }
        for i in 0..self.l2 {
            self.ir_after[i + half] = 0.0;
        }
        for i in 0..half {
            self.ir_after[i + half + self.l2] = self.ir_before[self.l2 + half + i] * self.window[i];
        }

        // Back into the frequency domain.
        self.dft.real.copy_from_slice(&self.ir_after);
        self.dft.imag.fill(0.0);
        self.dft.run_forward();
        spectrum::amplitude(&self.dft.real, &self.dft.imag, gain);

        let mut mean_after = 0.0;
        for &g in gain.iter() {
            mean_after += g * g;
        }
        mean_after /= self.l1 as Real;

        // Rescale so the truncation does not change the overall gain energy.
        let scale = (mean_before / mean_after).sqrt();
        for g in gain.iter_mut() {
            *g *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_close(actual: &[Real], expected: &[Real], epsilon: Real) {
        for (&a, &e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < epsilon, "{} != {} (tolerance {})", a, e, epsilon);
        }
    }

    #[test]
    fn verify_specsub_at_zero_snr() {
        // Equal spectra give 0 dB: alpha = 4, beta = 0.02, and every bin
        // falls back to the residual-noise floor sqrt(0.02) * noise.
        let mut sup = Suppressor::new(Mode::SpecSub, 3);
        let amp = [1.0, 2.0, 3.0];

        sup.run(&amp, &amp);

        let expected: Vec<Real> = amp.iter().map(|a| a * (0.02 as Real).sqrt()).collect();
        check_close(sup.speech_amp_spec(), &expected, 1e-5);
    }

    #[test]
    fn verify_specsub_subtracts_at_high_snr() {
        // 20 dB: alpha = 1, beta = 0.01, the subtraction branch is taken.
        let mut sup = Suppressor::new(Mode::SpecSub, 2);
        let noisy = [10.0, 20.0];
        let noise = [1.0, 2.0];

        sup.run(&noisy, &noise);

        let expected = [(99.0 as Real).sqrt(), 2.0 * (99.0 as Real).sqrt()];
        check_close(sup.speech_amp_spec(), &expected, 1e-4);
    }

    #[test]
    fn verify_wiener_decision_directed_warmup() {
        let mut sup = Suppressor::new(Mode::Wiener, 1);

        // First frame: no previous estimate, the a-priori SNR is dominated
        // by the floored instantaneous SNR: 0.02 * 3 = 0.06.
        sup.run(&[2.0], &[1.0]);
        check_close(sup.speech_amp_spec(), &[2.0 * 0.06 / 1.06], 1e-6);

        // Second frame feeds the previous clean estimate back in, raising
        // the gain.
        let first = sup.speech_amp_spec()[0];
        sup.run(&[2.0], &[1.0]);
        assert!(sup.speech_amp_spec()[0] > first);
    }

    #[test]
    fn verify_tsnr_second_step() {
        let mut sup = Suppressor::new(Mode::Tsnr, 1);

        // speech_1 = 0.1132075; prio_2 = speech_1^2; g_2 = prio_2 / (prio_2
        // + 1) = 0.0126538 (above the floor); out = g_2 * 2.
        sup.run(&[2.0], &[1.0]);
        check_close(sup.speech_amp_spec(), &[0.0253076], 1e-5);
    }

    #[test]
    fn verify_rtsnr_softens_first_step() {
        let mut sup = Suppressor::new(Mode::Rtsnr, 1);

        // speech_1 = (2 - G) * G * 2 = 0.2200071; g_2 = 0.0461685.
        sup.run(&[2.0], &[1.0]);
        check_close(sup.speech_amp_spec(), &[0.0923369], 1e-5);
    }

    #[test]
    fn verify_tsnr_gain_floor() {
        let mut sup = Suppressor::new(Mode::Tsnr, 1);

        // Noisy below noise: snr_inst floors, speech_1 is tiny, and the
        // second-step gain clamps at the floor.
        sup.run(&[0.1], &[1.0]);
        check_close(sup.speech_amp_spec(), &[GAIN_FLOOR * 0.1], 1e-6);
    }

    #[test]
    fn verify_gain_shaper_preserves_constant_gain() {
        // A flat gain has a one-tap impulse response, which truncation
        // cannot alter; energy renormalisation restores it exactly.
        let mut shaper = GainShaper::new(16);
        let mut gain = [0.5; 16];

        shaper.shape(&mut gain);

        check_close(&gain, &[0.5; 16], 1e-5);
    }

    #[test]
    fn verify_gain_shaper_preserves_energy() {
        let mut shaper = GainShaper::new(16);

        let mut gain: Vec<Real> = (0..16).map(|i| 0.2 + 0.04 * i as Real).collect();
        let energy_before: Real = gain.iter().map(|g| g * g).sum();

        shaper.shape(&mut gain);

        let energy_after: Real = gain.iter().map(|g| g * g).sum();
        assert!((energy_before - energy_after).abs() / energy_before < 1e-4);
    }

    #[test]
    fn verify_tsnr_g_runs_end_to_end() {
        let mut sup = Suppressor::new(Mode::TsnrG, 8);

        let noisy = [4.0, 3.0, 2.0, 1.0, 1.0, 2.0, 3.0, 4.0];
        let noise = [1.0; 8];

        sup.run(&noisy, &noise);

        assert!(sup.speech_amp_spec().iter().all(|s| s.is_finite()));

        // Shaped gains must still attenuate relative to the noisy input.
        for (s, n) in sup.speech_amp_spec().iter().zip(noisy.iter()) {
            assert!(s.abs() < n * 1.5);
        }
    }
}
