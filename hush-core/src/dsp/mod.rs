// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `dsp` module provides the signal-processing primitives the denoiser
//! is built from: window functions, spectrum helpers, and the DFT.

pub mod dft;
pub mod spectrum;
pub mod window;
