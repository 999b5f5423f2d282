// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `denoise` module implements the streaming denoiser.
//!
//! [`Denoiser`] accepts interleaved 16-bit little-endian PCM through
//! [`Denoiser::push`], denoises it frame by frame, and exposes finalised
//! bytes through [`Denoiser::get`]. Frames overlap; each push finalises only
//! the samples whose overlap-add sums are complete, so output lags input by
//! the overlap length. [`Denoiser::flush`] releases the remainder at end of
//! stream.
//!
//! All processing happens in place inside the ring buffer: a frame is read
//! out at the current frame index, transformed, suppressed, reconstructed,
//! and its first `step` samples are written back over their originals before
//! the read side reaches them.

pub mod estimator;
pub mod suppressor;

use log::{debug, trace};

use crate::config::{Config, DEFAULT_OVERLAP_PERC, DEFAULT_RING_CAP};
use crate::conv;
use crate::dsp::dft::Dft;
use crate::dsp::{spectrum, window};
use crate::errors::Result;
use crate::ring::RingBuffer;
use crate::Real;

use estimator::NoiseEstimator;
use suppressor::Suppressor;

/// Per-channel processing state.
struct Channel {
    dft: Dft,
    amp_spec: Vec<Real>,
    power_spec: Vec<Real>,
    phase_spec: Vec<Real>,
    est: NoiseEstimator,
    sup: Suppressor,
    /// Accumulates the tails of inverse-transformed frames for overlap-add.
    overlap_buf: Vec<Real>,
}

impl Channel {
    fn new(conf: &Config, dft_size: usize) -> Self {
        Channel {
            dft: Dft::new(dft_size),
            amp_spec: vec![0.0; dft_size],
            power_spec: vec![0.0; dft_size],
            phase_spec: vec![0.0; dft_size],
            est: NoiseEstimator::new(conf.sample_rate, dft_size),
            sup: Suppressor::new(conf.mode, dft_size),
            overlap_buf: vec![0.0; dft_size],
        }
    }

    fn reset(&mut self) {
        self.dft.real.fill(0.0);
        self.dft.imag.fill(0.0);
        self.amp_spec.fill(0.0);
        self.power_spec.fill(0.0);
        self.phase_spec.fill(0.0);
        self.est.reset();
        self.sup.reset();
        self.overlap_buf.fill(0.0);
    }
}

/// A configured streaming denoiser.
pub struct Denoiser {
    conf: Config,
    rb: RingBuffer,
    frame_size_smpls: usize,
    overlap_size_smpls: usize,
    step_size_smpls: usize,
    frame_size_bs: usize,
    step_size_bs: usize,
    norm_factor: Real,
    dft_size_smpls: usize,
    window: Vec<Real>,
    chans: Vec<Channel>,
    /// Byte offset into the ring buffer where the next frame starts.
    idx_frame: usize,
    /// Buffered bytes not yet denoised.
    pending_bytes: usize,
}

impl Denoiser {
    /// Build a denoiser from `conf`, validating it and resolving defaults.
    pub fn new(conf: &Config) -> Result<Self> {
        conf.validate()?;

        let mut conf = *conf;

        if conf.ring_cap == 0 {
            conf.ring_cap = DEFAULT_RING_CAP;
        }
        let rb = RingBuffer::new(conf.ring_cap as usize);

        if conf.frame_size == 0 {
            conf.frame_size = 2 * conf.sample_rate / 100;
        }
        let mut frame_size_smpls = conf.frame_size as usize;
        if frame_size_smpls % 2 == 1 {
            frame_size_smpls += 1;
        }

        if conf.overlap_perc == 0 {
            conf.overlap_perc = DEFAULT_OVERLAP_PERC;
        }
        let overlap_size_smpls = frame_size_smpls * conf.overlap_perc as usize / 100;
        let step_size_smpls = frame_size_smpls - overlap_size_smpls;

        let ch = conf.channels as usize;
        let frame_size_bs = frame_size_smpls * 2 * ch;
        let step_size_bs = step_size_smpls * 2 * ch;

        let norm_factor = 1.0 / ((100.0 - conf.overlap_perc as Real) / 100.0);

        if conf.dft_size == 0 {
            conf.dft_size = (2 * frame_size_smpls) as u32;
        }
        let dft_size_smpls = conf.dft_size as usize;

        let window = window::hann(frame_size_smpls);

        let chans = (0..ch).map(|_| Channel::new(&conf, dft_size_smpls)).collect();

        debug!(
            "configured {:?} denoiser: frame={} smpls, overlap={} smpls, step={} smpls, \
             dft={} smpls, ring={} bytes",
            conf.mode, frame_size_smpls, overlap_size_smpls, step_size_smpls, dft_size_smpls,
            conf.ring_cap,
        );

        Ok(Denoiser {
            conf,
            rb,
            frame_size_smpls,
            overlap_size_smpls,
            step_size_smpls,
            frame_size_bs,
            step_size_bs,
            norm_factor,
            dft_size_smpls,
            window,
            chans,
            idx_frame: 0,
            pending_bytes: 0,
        })
    }

    /// The configuration with all defaults resolved.
    pub fn config(&self) -> &Config {
        &self.conf
    }

    /// Analysis frame length in samples per channel.
    pub fn frame_size(&self) -> usize {
        self.frame_size_smpls
    }

    /// Samples shared between successive frames.
    pub fn overlap_size(&self) -> usize {
        self.overlap_size_smpls
    }

    /// Transform length in samples.
    pub fn dft_size(&self) -> usize {
        self.dft_size_smpls
    }

    /// Buffered bytes awaiting denoising.
    pub fn pending_bytes(&self) -> usize {
        self.pending_bytes
    }

    /// Buffer `data` and denoise every complete frame it makes available.
    ///
    /// Returns the number of bytes finalised by this call. An overflowing
    /// push writes nothing and advances no state; drain with
    /// [`Denoiser::get`] before retrying.
    pub fn push(&mut self, data: &[u8]) -> Result<usize> {
        self.rb.push(data)?;
        self.pending_bytes += data.len();

        Ok(self.denoise())
    }

    /// Read up to `data.len()` finalised bytes, returning the count read.
    ///
    /// Bytes still awaiting denoising are withheld until processed or
    /// released by [`Denoiser::flush`].
    pub fn get(&mut self, data: &mut [u8]) -> usize {
        let avail = self.rb.len() - self.pending_bytes;
        let count = avail.min(data.len());

        self.rb.get(&mut data[..count])
    }

    /// Expose all buffered bytes as finalised without further processing.
    ///
    /// Call at end of stream, then drain with [`Denoiser::get`].
    pub fn flush(&mut self) {
        self.idx_frame = self.rb.idx_in();
        self.pending_bytes = 0;

        trace!("flushed, {} bytes readable", self.rb.len());
    }

    /// Restore the just-configured state for reuse on a new stream.
    pub fn reset(&mut self) {
        self.rb.clear();
        self.idx_frame = 0;
        self.pending_bytes = 0;

        for chan in self.chans.iter_mut() {
            chan.reset();
        }
    }

    fn denoise(&mut self) -> usize {
        let ch_count = self.conf.channels as usize;
        let cap_smpls = self.rb.capacity() / 2;

        let mut processed = 0;
        let mut frames = 0;

        while self.pending_bytes >= self.frame_size_bs {
            // Channel data is interleaved, so each channel of the frame is
            // gathered and rewritten with a stride of `ch_count`.
            for ch in 0..ch_count {
                let chan = &mut self.chans[ch];
                let base = self.idx_frame / 2;

                // Gather the frame; samples beyond it stay zero, padding the
                // transform.
                chan.dft.real.fill(0.0);
                chan.dft.imag.fill(0.0);
                for k in 0..self.frame_size_smpls {
                    let idx = (base + k * ch_count + ch) % cap_smpls;
                    chan.dft.real[k] = conv::i16_to_real(self.rb.sample(idx));
                }

                window::apply(&self.window, &mut chan.dft.real[..self.frame_size_smpls]);

                chan.dft.run_forward();

                spectrum::amplitude(&chan.dft.real, &chan.dft.imag, &mut chan.amp_spec);
                spectrum::power(&chan.dft.real, &chan.dft.imag, &mut chan.power_spec);
                spectrum::phase(&chan.dft.real, &chan.dft.imag, &mut chan.phase_spec);

                chan.est.run(&chan.power_spec);

                chan.sup.run(&chan.amp_spec, chan.est.noise_amp_spec());

                // Reconstruct with the clean amplitude under the noisy
                // phase.
                let speech = chan.sup.speech_amp_spec();
                for k in 0..self.dft_size_smpls {
                    chan.dft.real[k] = speech[k] * chan.phase_spec[k].cos();
                    chan.dft.imag[k] = speech[k] * chan.phase_spec[k].sin();
                }

                chan.dft.run_inverse();

                // The first `step` samples have received every overlapping
                // contribution; finalise them back into the ring buffer.
                for k in 0..self.step_size_smpls {
                    self.pending_bytes -= 2;
                    processed += 2;

                    let idx = (base + k * ch_count + ch) % cap_smpls;
                    let sample = conv::real_to_i16(
                        chan.dft.real[k] / self.norm_factor + chan.overlap_buf[k],
                    );
                    self.rb.set_sample(idx, sample);
                }

                // Fold the whole frame into the overlap accumulator, then
                // advance it by one step.
                for k in 0..self.dft_size_smpls {
                    chan.overlap_buf[k] += chan.dft.real[k] / self.norm_factor;
                }
                chan.overlap_buf.copy_within(self.step_size_smpls.., 0);
                let tail = self.dft_size_smpls - self.step_size_smpls;
                chan.overlap_buf[tail..].fill(0.0);
            }

            // The frame may straddle the end of the ring buffer.
            self.idx_frame = (self.idx_frame + self.step_size_bs) % self.rb.capacity();
            frames += 1;
        }

        if frames > 0 {
            trace!("denoised {} frame(s), {} bytes pending", frames, self.pending_bytes);
        }

        processed
    }
}
