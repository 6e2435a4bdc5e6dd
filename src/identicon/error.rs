//! Identicon generation errors.

use thiserror::Error;

/// Precondition failures on the input hash.
#[derive(Debug, Error)]
pub enum IdenticonError {
    #[error("hash `{hash}` is too short: need at least {needed} hex digits, got {len}")]
    HashTooShort {
        hash: String,
        needed: usize,
        len: usize,
    },

    #[error("hash `{hash}` has non-hex digit {digit:?} at index {index}")]
    InvalidDigit {
        hash: String,
        index: usize,
        digit: char,
    },

    #[error("failed to write svg document")]
    Write(#[from] std::io::Error),
}

impl IdenticonError {
    pub(super) fn too_short(hash: &str, needed: usize, len: usize) -> Self {
        Self::HashTooShort {
            hash: hash.to_string(),
            needed,
            len,
        }
    }

    pub(super) fn invalid_digit(hash: &str, index: usize, digit: char) -> Self {
        Self::InvalidDigit {
            hash: hash.to_string(),
            index,
            digit,
        }
    }

    /// Whether the error is caused by the caller's input rather than output I/O.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, Self::HashTooShort { .. } | Self::InvalidDigit { .. })
    }
}
