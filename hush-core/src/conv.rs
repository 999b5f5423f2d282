// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `conv` module converts between 16-bit signed samples and [`Real`].
//!
//! The scaling is asymmetric: positive values are scaled by `1 / 32767` and
//! negative values by `1 / 32768`, so both extremes map exactly onto `±1.0`.

use crate::Real;

const INT16_MAX_INV: Real = 1.0 / (i16::MAX as Real);
const INT16_MIN_INV: Real = 1.0 / (i16::MIN as Real);

/// Convert a 16-bit signed sample to a `Real` in `[-1.0, 1.0]`.
#[inline]
pub fn i16_to_real(v: i16) -> Real {
    (v as Real) * (if v > 0 { INT16_MAX_INV } else { -INT16_MIN_INV })
}

/// Convert a `Real` to a 16-bit signed sample, rounding half away from zero
/// and saturating at the signed-16 extremes. NaN converts to zero.
#[inline]
pub fn real_to_i16(v: Real) -> i16 {
    if v > 0.0 {
        if v >= 1.0 {
            i16::MAX
        }
        else {
            (v * (i16::MAX as Real) + 0.5) as i16
        }
    }
    else if v <= -1.0 {
        i16::MIN
    }
    else {
        (-v * (i16::MIN as Real) - 0.5) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_i16_to_real_extremes() {
        assert_eq!(i16_to_real(0), 0.0);
        assert_eq!(i16_to_real(i16::MAX), 1.0);
        assert_eq!(i16_to_real(i16::MIN), -1.0);
    }

    #[test]
    fn verify_round_trip_is_exact() {
        for v in [i16::MIN, -12345, -1, 0, 1, 100, 12345, i16::MAX] {
            assert_eq!(real_to_i16(i16_to_real(v)), v);
        }
    }

    #[test]
    fn verify_real_to_i16_saturates() {
        assert_eq!(real_to_i16(1.5), i16::MAX);
        assert_eq!(real_to_i16(-2.0), i16::MIN);
    }

    #[test]
    fn verify_real_to_i16_rounds_half_away_from_zero() {
        // 0.5 * 32767 = 16383.5 rounds up; -100.5 / 32768 is exactly
        // representable and rounds down to -101.
        assert_eq!(real_to_i16(0.5), 16384);
        assert_eq!(real_to_i16(-100.5 / 32768.0), -101);
    }

    #[test]
    fn verify_real_to_i16_maps_nan_to_zero() {
        assert_eq!(real_to_i16(Real::NAN), 0);
    }
}
