//! Binds one backend to a context at `init` time.
//!
//! Mirrors a vtable with a Rust enum instead of function pointers into a
//! C struct: `Backend` is the tagged union holding whichever engine's round
//! keys actually got computed, and `Dispatch` is a 5-entry table of
//! monomorphic wrapper functions selected once, up front, so that every mode
//! call afterwards is a direct call through a function pointer rather than
//! a fresh capability check.
use crate::cpu::{self, CpuCapability};
use crate::kernels::bitsliced;
use crate::modes;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::kernels::aesni;

pub(crate) enum Backend {
    Bitsliced(bitsliced::Engine),
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    AesNi(aesni::Engine),
}

type EcbFn = fn(&Backend, &[u8], &mut [u8]);
type CbcFn = fn(&Backend, [u8; 16], &[u8], &mut [u8]);
type CtrFn = fn(&Backend, [u8; 16], &[u8], &mut [u8]) -> [u8; 16];

/// Five function pointers bound once at `init`; every mode operation after
/// that is a direct call through one of these, never a fresh branch on CPU
/// capability or backend tag.
pub(crate) struct Dispatch {
    pub(crate) ecb_encrypt: EcbFn,
    pub(crate) ecb_decrypt: EcbFn,
    pub(crate) cbc_encrypt: CbcFn,
    pub(crate) cbc_decrypt: CbcFn,
    pub(crate) ctr_xcrypt: CtrFn,
}

fn ecb_encrypt_bitsliced(backend: &Backend, input: &[u8], output: &mut [u8]) {
    let Backend::Bitsliced(engine) = backend else {
        unreachable!("dispatch table bound to the wrong backend")
    };
    modes::ecb_encrypt(engine, input, output);
}

fn ecb_decrypt_bitsliced(backend: &Backend, input: &[u8], output: &mut [u8]) {
    let Backend::Bitsliced(engine) = backend else {
        unreachable!("dispatch table bound to the wrong backend")
    };
    modes::ecb_decrypt(engine, input, output);
}

fn cbc_encrypt_bitsliced(backend: &Backend, iv: [u8; 16], input: &[u8], output: &mut [u8]) {
    let Backend::Bitsliced(engine) = backend else {
        unreachable!("dispatch table bound to the wrong backend")
    };
    modes::cbc_encrypt(engine, iv, input, output);
}

fn cbc_decrypt_bitsliced(backend: &Backend, iv: [u8; 16], input: &[u8], output: &mut [u8]) {
    let Backend::Bitsliced(engine) = backend else {
        unreachable!("dispatch table bound to the wrong backend")
    };
    modes::cbc_decrypt(engine, iv, input, output);
}

fn ctr_xcrypt_bitsliced(
    backend: &Backend,
    counter: [u8; 16],
    input: &[u8],
    output: &mut [u8],
) -> [u8; 16] {
    let Backend::Bitsliced(engine) = backend else {
        unreachable!("dispatch table bound to the wrong backend")
    };
    engine.ctr_xcrypt(counter, input, output)
}

const BITSLICED_DISPATCH: Dispatch = Dispatch {
    ecb_encrypt: ecb_encrypt_bitsliced,
    ecb_decrypt: ecb_decrypt_bitsliced,
    cbc_encrypt: cbc_encrypt_bitsliced,
    cbc_decrypt: cbc_decrypt_bitsliced,
    ctr_xcrypt: ctr_xcrypt_bitsliced,
};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod aesni_dispatch {
    use super::{aesni, modes, Backend};

    fn ecb_encrypt(backend: &Backend, input: &[u8], output: &mut [u8]) {
        let Backend::AesNi(engine) = backend else {
            unreachable!("dispatch table bound to the wrong backend")
        };
        modes::ecb_encrypt(engine, input, output);
    }

    fn ecb_decrypt(backend: &Backend, input: &[u8], output: &mut [u8]) {
        let Backend::AesNi(engine) = backend else {
            unreachable!("dispatch table bound to the wrong backend")
        };
        modes::ecb_decrypt(engine, input, output);
    }

    fn cbc_encrypt(backend: &Backend, iv: [u8; 16], input: &[u8], output: &mut [u8]) {
        let Backend::AesNi(engine) = backend else {
            unreachable!("dispatch table bound to the wrong backend")
        };
        modes::cbc_encrypt(engine, iv, input, output);
    }

    fn cbc_decrypt(backend: &Backend, iv: [u8; 16], input: &[u8], output: &mut [u8]) {
        let Backend::AesNi(engine) = backend else {
            unreachable!("dispatch table bound to the wrong backend")
        };
        modes::cbc_decrypt(engine, iv, input, output);
    }

    fn ctr_xcrypt(
        backend: &Backend,
        counter: [u8; 16],
        input: &[u8],
        output: &mut [u8],
    ) -> [u8; 16] {
        let Backend::AesNi(engine) = backend else {
            unreachable!("dispatch table bound to the wrong backend")
        };
        engine.ctr_xcrypt(counter, input, output)
    }

    pub(super) const DISPATCH: super::Dispatch = super::Dispatch {
        ecb_encrypt,
        ecb_decrypt,
        cbc_encrypt,
        cbc_decrypt,
        ctr_xcrypt,
    };

    /// # Safety
    /// The caller must have confirmed `CpuCapability::has_aesni()`.
    #[allow(unsafe_code)]
    pub(super) unsafe fn try_bind(
        key: &[u8],
        nk: usize,
        nr: u8,
        cap: super::CpuCapability,
    ) -> Option<(Backend, super::Dispatch)> {
        if !cap.has_aesni() {
            return None;
        }
        // SAFETY: forwarded from this fn's own safety contract.
        let engine = unsafe { aesni::Engine::new(key, nk, nr) };
        Some((Backend::AesNi(engine), DISPATCH))
    }
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn try_bind_aesni(
    _key: &[u8],
    _nk: usize,
    _nr: u8,
    _cap: CpuCapability,
) -> Option<(Backend, Dispatch)> {
    None
}

/// Probe the CPU and bind the best available backend.
///
/// Returns the backend payload, its dispatch table, and a static name for
/// [`crate::active_backend`]-style diagnostics.
pub(crate) fn get_best_kernel(key: &[u8], nk: usize, nr: u8) -> (Backend, Dispatch, &'static str) {
    let cap = cpu::probe();

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        // SAFETY: `try_bind` itself checks `cap.has_aesni()` before touching
        // any AES-NI intrinsic.
        if let Some((backend, dispatch)) = unsafe { aesni_dispatch::try_bind(key, nk, nr, cap) } {
            return (backend, dispatch, "aesni");
        }
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if let Some((backend, dispatch)) = try_bind_aesni(key, nk, nr, cap) {
            return (backend, dispatch, "aesni");
        }
    }

    (
        Backend::Bitsliced(bitsliced::Engine::new(key, nk, nr)),
        BITSLICED_DISPATCH,
        "bitsliced",
    )
}
