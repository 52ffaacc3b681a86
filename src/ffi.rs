//! C ABI surface, for callers migrating from a C AES library.
//!
//! Every entry point takes and returns plain integers/pointers and never lets
//! a Rust panic cross the FFI boundary uncaught.
#![allow(unsafe_code)]

use std::panic;
use std::slice;

use crate::{AesContext, AesVariant};

/// Opaque context handle for C callers.
pub struct AesContextPtr(AesContext);

fn variant_from_bits(key_bits: u16) -> Option<AesVariant> {
    AesVariant::try_from(key_bits).ok()
}

/// Allocate and initialize a context. Returns NULL if `key_bits` is not
/// 128/192/256, `key_ptr` is null, or initialization panics.
///
/// # Safety
/// `key_ptr` must be valid for `key_bits / 8` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn aes_init(key_ptr: *const u8, key_bits: u16) -> *mut AesContextPtr {
    if key_ptr.is_null() {
        return std::ptr::null_mut();
    }
    let Some(variant) = variant_from_bits(key_bits) else {
        return std::ptr::null_mut();
    };

    let result = panic::catch_unwind(|| {
        let key = unsafe { slice::from_raw_parts(key_ptr, variant.key_bytes()) };
        let mut ctx = AesContext::new();
        ctx.init(variant, key);
        ctx
    });

    match result {
        Ok(ctx) => Box::into_raw(Box::new(AesContextPtr(ctx))),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a context allocated by [`aes_init`].
///
/// # Safety
/// `ctx_ptr` must be a pointer returned by `aes_init`, or null.
#[no_mangle]
pub unsafe extern "C" fn aes_free(ctx_ptr: *mut AesContextPtr) {
    if !ctx_ptr.is_null() {
        drop(unsafe { Box::from_raw(ctx_ptr) });
    }
}

fn run_block_mode(
    ctx_ptr: *const AesContextPtr,
    in_ptr: *const u8,
    out_ptr: *mut u8,
    len: usize,
    op: impl FnOnce(&AesContext, &[u8], &mut [u8]) + panic::UnwindSafe,
) -> i32 {
    if ctx_ptr.is_null() || in_ptr.is_null() || out_ptr.is_null() {
        return -1;
    }
    let result = panic::catch_unwind(|| {
        let ctx = unsafe { &(*ctx_ptr).0 };
        let input = unsafe { slice::from_raw_parts(in_ptr, len) };
        let output = unsafe { slice::from_raw_parts_mut(out_ptr, len) };
        op(ctx, input, output);
    });
    match result {
        Ok(()) => 0,
        Err(_) => -2,
    }
}

/// ECB encrypt `len` bytes from `in_ptr` into `out_ptr`. `len` must be a
/// multiple of 16.
///
/// # Safety
/// `ctx_ptr` must come from `aes_init`; `in_ptr`/`out_ptr` must be valid for
/// `len` bytes each.
///
/// # Returns
/// `0` on success, `-1` for a null pointer, `-2` if the operation panicked
/// (e.g. `len` not block-aligned).
#[no_mangle]
pub unsafe extern "C" fn aes_ecb_encrypt(
    ctx_ptr: *const AesContextPtr,
    in_ptr: *const u8,
    out_ptr: *mut u8,
    len: usize,
) -> i32 {
    run_block_mode(ctx_ptr, in_ptr, out_ptr, len, |ctx, input, output| {
        ctx.ecb_encrypt(input, output);
    })
}

/// ECB decrypt. Same contract as [`aes_ecb_encrypt`].
///
/// # Safety
/// Same as [`aes_ecb_encrypt`].
#[no_mangle]
pub unsafe extern "C" fn aes_ecb_decrypt(
    ctx_ptr: *const AesContextPtr,
    in_ptr: *const u8,
    out_ptr: *mut u8,
    len: usize,
) -> i32 {
    run_block_mode(ctx_ptr, in_ptr, out_ptr, len, |ctx, input, output| {
        ctx.ecb_decrypt(input, output);
    })
}

/// CBC encrypt `len` bytes, given a 16-byte IV. `len` must be a multiple of
/// 16.
///
/// # Safety
/// `ctx_ptr` must come from `aes_init`; `iv_ptr` must be valid for 16 bytes;
/// `in_ptr`/`out_ptr` must be valid for `len` bytes each.
#[no_mangle]
pub unsafe extern "C" fn aes_cbc_encrypt(
    ctx_ptr: *const AesContextPtr,
    iv_ptr: *const u8,
    in_ptr: *const u8,
    out_ptr: *mut u8,
    len: usize,
) -> i32 {
    if iv_ptr.is_null() {
        return -1;
    }
    let iv = unsafe { load_iv(iv_ptr) };
    run_block_mode(ctx_ptr, in_ptr, out_ptr, len, move |ctx, input, output| {
        ctx.cbc_encrypt(iv, input, output);
    })
}

/// CBC decrypt. Same contract as [`aes_cbc_encrypt`].
///
/// # Safety
/// Same as [`aes_cbc_encrypt`].
#[no_mangle]
pub unsafe extern "C" fn aes_cbc_decrypt(
    ctx_ptr: *const AesContextPtr,
    iv_ptr: *const u8,
    in_ptr: *const u8,
    out_ptr: *mut u8,
    len: usize,
) -> i32 {
    if iv_ptr.is_null() {
        return -1;
    }
    let iv = unsafe { load_iv(iv_ptr) };
    run_block_mode(ctx_ptr, in_ptr, out_ptr, len, move |ctx, input, output| {
        ctx.cbc_decrypt(iv, input, output);
    })
}

/// CTR keystream XOR over `len` bytes of any length, starting at counter
/// `iv_ptr`. If `next_iv_ptr` is non-null, the counter value to resume the
/// stream from is written there.
///
/// # Safety
/// `ctx_ptr` must come from `aes_init`; `iv_ptr` must be valid for 16 bytes;
/// `in_ptr`/`out_ptr` must be valid for `len` bytes each; `next_iv_ptr`, if
/// non-null, must be valid for 16 writable bytes.
#[no_mangle]
pub unsafe extern "C" fn aes_ctr_xcrypt(
    ctx_ptr: *const AesContextPtr,
    iv_ptr: *const u8,
    in_ptr: *const u8,
    out_ptr: *mut u8,
    len: usize,
    next_iv_ptr: *mut u8,
) -> i32 {
    if ctx_ptr.is_null() || iv_ptr.is_null() || in_ptr.is_null() || out_ptr.is_null() {
        return -1;
    }
    let iv = unsafe { load_iv(iv_ptr) };
    let result = panic::catch_unwind(|| {
        let ctx = unsafe { &(*ctx_ptr).0 };
        let input = unsafe { slice::from_raw_parts(in_ptr, len) };
        let output = unsafe { slice::from_raw_parts_mut(out_ptr, len) };
        ctx.ctr_xcrypt(iv, input, output)
    });
    match result {
        Ok(next_iv) => {
            if !next_iv_ptr.is_null() {
                unsafe { std::ptr::copy_nonoverlapping(next_iv.as_ptr(), next_iv_ptr, 16) };
            }
            0
        }
        Err(_) => -2,
    }
}

/// Name of the backend `ctx_ptr` bound to at `aes_init` (`"aesni"` or
/// `"bitsliced"`).
///
/// # Returns
/// A pointer to a static, null-terminated C string, or null if `ctx_ptr` is
/// null. Must NOT be freed by the caller.
///
/// # Safety
/// `ctx_ptr` must come from `aes_init`, or be null.
#[no_mangle]
pub unsafe extern "C" fn aes_active_backend(
    ctx_ptr: *const AesContextPtr,
) -> *const std::os::raw::c_char {
    if ctx_ptr.is_null() {
        return std::ptr::null();
    }
    let ctx = unsafe { &(*ctx_ptr).0 };
    match ctx.active_backend() {
        "aesni" => c"aesni".as_ptr(),
        _ => c"bitsliced".as_ptr(),
    }
}

unsafe fn load_iv(iv_ptr: *const u8) -> [u8; 16] {
    let mut iv = [0u8; 16];
    unsafe { std::ptr::copy_nonoverlapping(iv_ptr, iv.as_mut_ptr(), 16) };
    iv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_returns_null_for_bad_key_size() {
        let key = [0u8; 20];
        let ctx = unsafe { aes_init(key.as_ptr(), 160) };
        assert!(ctx.is_null());
    }

    #[test]
    fn round_trips_through_the_c_abi() {
        let key = [0x2bu8; 16];
        let ctx = unsafe { aes_init(key.as_ptr(), 128) };
        assert!(!ctx.is_null());

        let plaintext = [0x11u8; 32];
        let mut ciphertext = [0u8; 32];
        let rc = unsafe {
            aes_ecb_encrypt(ctx, plaintext.as_ptr(), ciphertext.as_mut_ptr(), 32)
        };
        assert_eq!(rc, 0);

        let mut recovered = [0u8; 32];
        let rc = unsafe {
            aes_ecb_decrypt(ctx, ciphertext.as_ptr(), recovered.as_mut_ptr(), 32)
        };
        assert_eq!(rc, 0);
        assert_eq!(recovered, plaintext);

        unsafe { aes_free(ctx) };
    }

    #[test]
    fn ecb_rejects_unaligned_length_with_panic_error_code() {
        let key = [0u8; 16];
        let ctx = unsafe { aes_init(key.as_ptr(), 128) };
        let input = [0u8; 15];
        let mut output = [0u8; 15];
        let rc = unsafe { aes_ecb_encrypt(ctx, input.as_ptr(), output.as_mut_ptr(), 15) };
        assert_eq!(rc, -2);
        unsafe { aes_free(ctx) };
    }
}
