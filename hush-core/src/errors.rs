// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error;
use std::fmt;
use std::result;

use crate::config::ConfigField;

/// `Error` provides an enumeration of all possible errors reported by Hush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A configuration field failed validation.
    InvalidConfig(ConfigField),
    /// An allocation failed.
    ///
    /// Reserved for embedders mapping wire codes: in this implementation
    /// allocations abort the process on failure, so the variant is never
    /// constructed by the library itself.
    Alloc,
    /// A push exceeded the free capacity of the ring buffer. Nothing was
    /// written and no internal state advanced.
    Overflow,
    /// Reserved fallthrough for forward compatibility.
    Unknown,
}

impl Error {
    /// The numeric code this error is surfaced as over the C-compatible wire
    /// contract: `-1` allocation, `-2` overflow, `-1024` unknown. Invalid
    /// configurations are reported positionally by [`ConfigField::index`]
    /// instead and map to `-1024` here.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) => -1024,
            Error::Alloc => -1,
            Error::Overflow => -2,
            Error::Unknown => -1024,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::InvalidConfig(field) => {
                write!(f, "invalid configuration: {}", field.as_str())
            }
            Error::Alloc => write!(f, "allocation failure"),
            Error::Overflow => write!(f, "ring buffer overflow"),
            Error::Unknown => write!(f, "unknown error"),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create an overflow error.
pub fn overflow_error<T>() -> Result<T> {
    Err(Error::Overflow)
}

/// Convenience function to create an invalid-configuration error.
pub fn invalid_config_error<T>(field: ConfigField) -> Result<T> {
    Err(Error::InvalidConfig(field))
}
