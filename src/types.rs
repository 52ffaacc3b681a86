//! Shared types used across the dispatch-aes library.

use core::fmt;
#[cfg(feature = "std")]
use std::error;

// =============================================================================
// AES VARIANT
// =============================================================================

/// Which AES key size a context was (or will be) initialized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum AesVariant {
    /// 128-bit key, 10 rounds.
    Aes128 = 128,
    /// 192-bit key, 12 rounds.
    Aes192 = 192,
    /// 256-bit key, 14 rounds.
    Aes256 = 256,
}

impl AesVariant {
    /// Key size in bits.
    #[must_use]
    pub const fn key_bits(self) -> u16 {
        self as u16
    }

    /// Key size in bytes.
    #[must_use]
    pub const fn key_bytes(self) -> usize {
        self.key_bits() as usize / 8
    }

    /// Number of 32-bit words in the cipher key (Nk).
    #[must_use]
    pub const fn nk(self) -> usize {
        match self {
            Self::Aes128 => 4,
            Self::Aes192 => 6,
            Self::Aes256 => 8,
        }
    }

    /// Number of rounds (Nr).
    #[must_use]
    pub const fn nr(self) -> u8 {
        match self {
            Self::Aes128 => 10,
            Self::Aes192 => 12,
            Self::Aes256 => 14,
        }
    }
}

impl TryFrom<u16> for AesVariant {
    type Error = VariantError;

    fn try_from(key_bits: u16) -> Result<Self, Self::Error> {
        match key_bits {
            128 => Ok(Self::Aes128),
            192 => Ok(Self::Aes192),
            256 => Ok(Self::Aes256),
            other => Err(VariantError { key_bits: other }),
        }
    }
}

impl TryFrom<usize> for AesVariant {
    type Error = VariantError;

    /// Resolve a variant from a raw key length in bytes.
    ///
    /// This is the one fallible construction path in the public API: every
    /// other entry point takes a fixed-size key array per variant, so the
    /// length is enforced by the type system instead.
    fn try_from(key_len_bytes: usize) -> Result<Self, Self::Error> {
        match key_len_bytes {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            other => Err(VariantError {
                key_bits: (other * 8) as u16,
            }),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Error for a key length that does not correspond to AES-128/192/256.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantError {
    key_bits: u16,
}

impl fmt::Display for VariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported AES key size: {} bits (expected 128, 192, or 256)",
            self.key_bits
        )
    }
}

#[cfg(feature = "std")]
impl error::Error for VariantError {}
