//! Portable and AES-NI AES-128/192/256 with a runtime dispatcher.
//!
//! [`AesContext::init`] probes the running CPU once and binds whichever
//! backend fits: the hardware AES-NI engine if the CPU has it, otherwise a
//! constant-time portable engine built from a bitsliced Boyar-Peralta S-box
//! circuit. Every mode call afterwards (ECB, CBC, CTR) goes through the
//! function table bound at that time.
//!
//! ```
//! use dispatch_aes::{AesContext, AesVariant};
//!
//! let mut ctx = AesContext::new();
//! ctx.init(AesVariant::Aes128, &[0x2b; 16]);
//!
//! let plaintext = [0x11u8; 32];
//! let mut ciphertext = [0u8; 32];
//! ctx.ecb_encrypt(&plaintext, &mut ciphertext);
//!
//! let mut recovered = [0u8; 32];
//! ctx.ecb_decrypt(&ciphertext, &mut recovered);
//! assert_eq!(recovered, plaintext);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

mod context;
mod cpu;
mod engine;
mod kernels;
mod modes;
mod types;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use context::AesContext;
pub use types::{AesVariant, VariantError};
