// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hush is a single-pass streaming speech denoiser for 16-bit linear PCM.
//!
//! Callers push interleaved little-endian samples at a fixed rate and channel
//! count, and read back denoised samples in the same format with a latency of
//! one analysis frame plus its overlap. The pipeline forms overlapping frames
//! from a ring buffer, transforms them with a DFT, estimates the noise
//! spectrum with an MCRA-2 tracker, attenuates the amplitude spectrum with one
//! of six suppression modes, and reconstructs the signal by overlap-add.
//!
//! The entry point is [`denoise::Denoiser`].

pub mod config;
pub mod conv;
pub mod denoise;
pub mod dsp;
pub mod errors;
pub mod ring;

/// The floating-point type all spectral processing is carried out in.
///
/// `f32` by default; the `float64` feature switches the whole pipeline to
/// double precision.
#[cfg(not(feature = "float64"))]
pub type Real = f32;
#[cfg(feature = "float64")]
pub type Real = f64;
