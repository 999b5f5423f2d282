// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `config` module defines the denoiser configuration and its validation.

use std::fmt;

use crate::errors::{invalid_config_error, Result};

/// The maximum number of interleaved channels a denoiser will process.
pub const MAX_CHANNELS: u32 = 4;

/// The only supported sample size in bits.
pub const SUPPORTED_BITS: u32 = 16;

/// Default ring-buffer capacity in bytes.
pub const DEFAULT_RING_CAP: u32 = 16384;

/// Default frame overlap in percent.
pub const DEFAULT_OVERLAP_PERC: u32 = 50;

/// Spectral suppression algorithm selector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Berouti-Schwartz spectral subtraction.
    #[default]
    SpecSub,
    /// Scalart decision-directed Wiener filtering.
    Wiener,
    /// Scalart two-step noise reduction.
    Tsnr,
    /// Scalart two-step noise reduction with gain shaping.
    TsnrG,
    /// Shifeng two-step noise reduction.
    Rtsnr,
    /// Shifeng two-step noise reduction with gain shaping.
    RtsnrG,
}

/// Identifies the configuration field that failed validation.
///
/// The discriminants are the 1-based positional indices of the wire contract.
/// Index 4 (mode) is unreachable through the typed API and index 5 is
/// reserved; both are kept so embedders can map codes exhaustively.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ConfigField {
    SampleRate = 1,
    Channels = 2,
    BitsPerSample = 3,
    Mode = 4,
    OverlapPerc = 6,
    DftSize = 7,
    RingCap = 8,
}

impl ConfigField {
    /// The 1-based positional index of the field.
    pub fn index(&self) -> u32 {
        *self as u32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::SampleRate => "sample rate",
            ConfigField::Channels => "channel count",
            ConfigField::BitsPerSample => "bits per sample",
            ConfigField::Mode => "suppression mode",
            ConfigField::OverlapPerc => "overlap percentage",
            ConfigField::DftSize => "dft size",
            ConfigField::RingCap => "ring-buffer capacity",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denoiser configuration.
///
/// `sample_rate`, `channels` and `bits_per_sample` are mandatory. For the
/// remaining fields `0` selects the documented default, resolved when the
/// denoiser is built.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Sample rate in Hz. Must be non-zero.
    pub sample_rate: u32,
    /// Interleaved channel count. Must be in `1..=MAX_CHANNELS`.
    pub channels: u32,
    /// Bits per sample. Must equal [`SUPPORTED_BITS`].
    pub bits_per_sample: u32,
    /// Suppression algorithm.
    pub mode: Mode,
    /// Analysis frame length in samples per channel. `0` selects 20 ms,
    /// `floor(2 * sample_rate / 100)`. Odd values are rounded up to even.
    pub frame_size: u32,
    /// Frame overlap in percent. `0` selects the default of 50. Must be
    /// below 100.
    pub overlap_perc: u32,
    /// Transform length in samples. `0` selects twice the frame length.
    /// Must not be below the frame length.
    pub dft_size: u32,
    /// Ring-buffer capacity in bytes. `0` selects the default. Must be even
    /// and large enough to hold a frame.
    pub ring_cap: u32,
}

impl Config {
    /// Validate the configuration, reporting the first offending field.
    ///
    /// Defaults are resolved on a copy, so a `Config` that validates cleanly
    /// will also build cleanly.
    pub fn validate(&self) -> Result<()> {
        let mut tmp = *self;

        if tmp.sample_rate == 0 {
            return invalid_config_error(ConfigField::SampleRate);
        }
        if tmp.channels == 0 || tmp.channels > MAX_CHANNELS {
            return invalid_config_error(ConfigField::Channels);
        }
        if tmp.bits_per_sample != SUPPORTED_BITS {
            return invalid_config_error(ConfigField::BitsPerSample);
        }

        if tmp.frame_size == 0 {
            tmp.frame_size = 2 * tmp.sample_rate / 100;
        }

        if tmp.overlap_perc == 0 {
            tmp.overlap_perc = DEFAULT_OVERLAP_PERC;
        }
        else if tmp.overlap_perc >= 100 {
            return invalid_config_error(ConfigField::OverlapPerc);
        }

        if tmp.dft_size == 0 {
            tmp.dft_size = 2 * tmp.frame_size;
        }
        else if tmp.dft_size < tmp.frame_size {
            return invalid_config_error(ConfigField::DftSize);
        }

        if tmp.ring_cap != 0 && (tmp.ring_cap % 2 != 0 || tmp.ring_cap < tmp.frame_size) {
            return invalid_config_error(ConfigField::RingCap);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn base() -> Config {
        Config {
            sample_rate: 16000,
            channels: 1,
            bits_per_sample: 16,
            mode: Mode::Wiener,
            ..Default::default()
        }
    }

    #[test]
    fn verify_validate_accepts_defaults() {
        assert_eq!(base().validate(), Ok(()));
    }

    #[test]
    fn verify_validate_field_indices() {
        let cases = [
            (Config { sample_rate: 0, ..base() }, ConfigField::SampleRate, 1),
            (Config { channels: 0, ..base() }, ConfigField::Channels, 2),
            (Config { channels: 5, ..base() }, ConfigField::Channels, 2),
            (Config { bits_per_sample: 8, ..base() }, ConfigField::BitsPerSample, 3),
            (Config { overlap_perc: 100, ..base() }, ConfigField::OverlapPerc, 6),
            (Config { frame_size: 320, dft_size: 319, ..base() }, ConfigField::DftSize, 7),
            (Config { ring_cap: 321, ..base() }, ConfigField::RingCap, 8),
        ];

        for (conf, field, index) in cases {
            assert_eq!(conf.validate(), Err(Error::InvalidConfig(field)));
            assert_eq!(field.index(), index);
        }
    }

    #[test]
    fn verify_validate_ring_cap_bounds() {
        // An explicit capacity must at least cover one frame.
        assert!(Config { ring_cap: 128, ..base() }.validate().is_err());
        // 320 samples is the resolved default frame size at 16 kHz.
        assert_eq!(Config { ring_cap: 320, ..base() }.validate(), Ok(()));
    }
}
