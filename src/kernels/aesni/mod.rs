//! Hardware backend built on the x86 AES-NI instruction set.
//!
//! Every intrinsic call in this module requires `sse2`, `ssse3`, and `aes` to
//! actually be present on the running CPU; the dispatcher only ever
//! constructs an `Engine` after [`crate::cpu::probe`] has confirmed
//! [`crate::cpu::CpuCapability::has_aesni`], which is the safety
//! precondition every `unsafe` block below relies on.
//!
//! Key expansion follows the Intel whitepaper routines built on
//! `AESKEYGENASSIST` (one shape per key length: a single round-constant
//! ladder for AES-128, the 192-bit two-register `KEY_192_ASSIST` shuffle, and
//! the even/odd round derivation for AES-256), the same three routines
//! `aesni_init` uses. CTR counter arithmetic likewise stays in a
//! byte-swapped `__m128i` the whole time a stream runs, incrementing via
//! 8-bit packed addition with a sign-flip carry trick rather than dropping
//! back to the scalar counter between blocks.
use core::arch::x86_64::{
    __m128i, _mm_add_epi8, _mm_aesdec_si128, _mm_aesdeclast_si128, _mm_aesenc_si128,
    _mm_aesenclast_si128, _mm_aesimc_si128, _mm_aeskeygenassist_si128, _mm_and_si128,
    _mm_castpd_si128, _mm_castsi128_pd, _mm_cmplt_epi8, _mm_loadu_si128, _mm_set1_epi8,
    _mm_set_epi8, _mm_shuffle_epi32, _mm_shuffle_epi8, _mm_shuffle_pd, _mm_slli_si128,
    _mm_storeu_si128, _mm_xor_si128,
};

use super::schedule::MAX_ROUND_KEYS;
use super::BlockCipher;

#[target_feature(enable = "sse2")]
unsafe fn load(block: [u8; 16]) -> __m128i {
    // SAFETY: `block` is a 16-byte local array; `_mm_loadu_si128` has no
    // alignment requirement.
    unsafe { _mm_loadu_si128(block.as_ptr().cast()) }
}

#[target_feature(enable = "sse2")]
unsafe fn store(value: __m128i) -> [u8; 16] {
    let mut out = [0u8; 16];
    // SAFETY: `out` is a 16-byte local array; `_mm_storeu_si128` has no
    // alignment requirement.
    unsafe { _mm_storeu_si128(out.as_mut_ptr().cast(), value) };
    out
}

// ---------------------------------------------------------------------------
// Key expansion (AESKEYGENASSIST-driven, one routine per key length).
// ---------------------------------------------------------------------------

/// `a ^ (a << 32) ^ (a << 64) ^ (a << 96)`, viewing `a` as four 32-bit words:
/// turns a single new word into the running XOR of itself and every word
/// before it in the same round key.
#[target_feature(enable = "sse2")]
unsafe fn xor_dw_with_prev_dw(x: __m128i) -> __m128i {
    unsafe {
        let mut result = x;
        for _ in 0..3 {
            result = _mm_xor_si128(result, _mm_slli_si128::<4>(result));
        }
        result
    }
}

#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn aes128_keyexp_round<const RCON: i32>(key: __m128i) -> __m128i {
    unsafe {
        let x = xor_dw_with_prev_dw(key);
        let y = _mm_shuffle_epi32(_mm_aeskeygenassist_si128::<RCON>(key), 0xff);
        _mm_xor_si128(x, y)
    }
}

#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn expand_key_128(key: __m128i) -> [__m128i; MAX_ROUND_KEYS] {
    unsafe {
        let mut ks = [key; MAX_ROUND_KEYS];
        ks[1] = aes128_keyexp_round::<0x01>(ks[0]);
        ks[2] = aes128_keyexp_round::<0x02>(ks[1]);
        ks[3] = aes128_keyexp_round::<0x04>(ks[2]);
        ks[4] = aes128_keyexp_round::<0x08>(ks[3]);
        ks[5] = aes128_keyexp_round::<0x10>(ks[4]);
        ks[6] = aes128_keyexp_round::<0x20>(ks[5]);
        ks[7] = aes128_keyexp_round::<0x40>(ks[6]);
        ks[8] = aes128_keyexp_round::<0x80>(ks[7]);
        ks[9] = aes128_keyexp_round::<0x1b>(ks[8]);
        ks[10] = aes128_keyexp_round::<0x36>(ks[9]);
        ks
    }
}

#[target_feature(enable = "sse2")]
unsafe fn shufpd0(a: __m128i, b: __m128i) -> __m128i {
    unsafe { _mm_castpd_si128(_mm_shuffle_pd::<0>(_mm_castsi128_pd(a), _mm_castsi128_pd(b))) }
}

#[target_feature(enable = "sse2")]
unsafe fn shufpd1(a: __m128i, b: __m128i) -> __m128i {
    unsafe { _mm_castpd_si128(_mm_shuffle_pd::<1>(_mm_castsi128_pd(a), _mm_castsi128_pd(b))) }
}

/// `KEY_192_ASSIST`: folds one `AESKEYGENASSIST` output into the running
/// 192-bit key material, split across two 128-bit registers (`temp1` holds
/// the first 128 bits, `temp3` the trailing 64, replicated into its own
/// dword-4 lane for the next assist call).
#[target_feature(enable = "sse2")]
unsafe fn key_192_assist(temp1: __m128i, temp2: __m128i, temp3: __m128i) -> (__m128i, __m128i) {
    unsafe {
        let temp2 = _mm_shuffle_epi32(temp2, 0x55);

        let mut tmp1 = temp1;
        let mut temp4 = _mm_slli_si128::<4>(tmp1);
        tmp1 = _mm_xor_si128(tmp1, temp4);
        temp4 = _mm_slli_si128::<4>(temp4);
        tmp1 = _mm_xor_si128(tmp1, temp4);
        temp4 = _mm_slli_si128::<4>(temp4);
        tmp1 = _mm_xor_si128(tmp1, temp4);
        tmp1 = _mm_xor_si128(tmp1, temp2);
        let temp2 = _mm_shuffle_epi32(tmp1, 0xff);

        let mut tmp3 = temp3;
        let temp4 = _mm_slli_si128::<4>(tmp3);
        tmp3 = _mm_xor_si128(tmp3, temp4);
        tmp3 = _mm_xor_si128(tmp3, temp2);

        (tmp1, tmp3)
    }
}

#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn aes192_keyexp_assist<const RCON: i32>(
    temp1: __m128i,
    temp3: __m128i,
) -> (__m128i, __m128i) {
    unsafe { key_192_assist(temp1, _mm_aeskeygenassist_si128::<RCON>(temp3), temp3) }
}

#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn expand_key_192(key_lower: __m128i, key_upper: __m128i) -> [__m128i; MAX_ROUND_KEYS] {
    unsafe {
        let mut ks = [key_lower; MAX_ROUND_KEYS];
        let (mut temp1, mut temp3) = (key_lower, key_upper);
        ks[0] = temp1;
        ks[1] = temp3;

        (temp1, temp3) = aes192_keyexp_assist::<0x01>(temp1, temp3);
        ks[1] = shufpd0(ks[1], temp1);
        ks[2] = shufpd1(temp1, temp3);

        (temp1, temp3) = aes192_keyexp_assist::<0x02>(temp1, temp3);
        ks[3] = temp1;
        ks[4] = temp3;

        (temp1, temp3) = aes192_keyexp_assist::<0x04>(temp1, temp3);
        ks[4] = shufpd0(ks[4], temp1);
        ks[5] = shufpd1(temp1, temp3);

        (temp1, temp3) = aes192_keyexp_assist::<0x08>(temp1, temp3);
        ks[6] = temp1;
        ks[7] = temp3;

        (temp1, temp3) = aes192_keyexp_assist::<0x10>(temp1, temp3);
        ks[7] = shufpd0(ks[7], temp1);
        ks[8] = shufpd1(temp1, temp3);

        (temp1, temp3) = aes192_keyexp_assist::<0x20>(temp1, temp3);
        ks[9] = temp1;
        ks[10] = temp3;

        (temp1, temp3) = aes192_keyexp_assist::<0x40>(temp1, temp3);
        ks[10] = shufpd0(ks[10], temp1);
        ks[11] = shufpd1(temp1, temp3);

        (temp1, _) = aes192_keyexp_assist::<0x80>(temp1, temp3);
        ks[12] = temp1;

        ks
    }
}

/// One step of the AES-256 even/odd round derivation. `key0`/`key1` are the
/// previous two round keys (most recent first); returns the next round key,
/// plus the one after it when `want_upper` is set (the last round has no
/// successor to derive).
#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn aes256_keyexp_round<const RCON: i32>(
    key0: __m128i,
    key1: __m128i,
    want_upper: bool,
) -> (__m128i, Option<__m128i>) {
    unsafe {
        let keygenassist_lower = _mm_aeskeygenassist_si128::<RCON>(key0);
        let tmp1 = _mm_shuffle_epi32(keygenassist_lower, 0xff);
        let key_lower = _mm_xor_si128(xor_dw_with_prev_dw(key1), tmp1);

        let upper = want_upper.then(|| {
            let key_upper = xor_dw_with_prev_dw(key0);
            let tmp2 = _mm_aeskeygenassist_si128::<0>(key_lower);
            let tmp2 = _mm_shuffle_epi32(tmp2, 0xaa);
            _mm_xor_si128(key_upper, tmp2)
        });

        (key_lower, upper)
    }
}

#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn expand_key_256(key0: __m128i, key1: __m128i) -> [__m128i; MAX_ROUND_KEYS] {
    unsafe {
        let mut ks = [key0; MAX_ROUND_KEYS];
        ks[0] = key0;
        ks[1] = key1;

        let (k2, k3) = aes256_keyexp_round::<0x01>(ks[1], ks[0], true);
        ks[2] = k2;
        ks[3] = k3.expect("want_upper was true");

        let (k4, k5) = aes256_keyexp_round::<0x02>(ks[3], ks[2], true);
        ks[4] = k4;
        ks[5] = k5.expect("want_upper was true");

        let (k6, k7) = aes256_keyexp_round::<0x04>(ks[5], ks[4], true);
        ks[6] = k6;
        ks[7] = k7.expect("want_upper was true");

        let (k8, k9) = aes256_keyexp_round::<0x08>(ks[7], ks[6], true);
        ks[8] = k8;
        ks[9] = k9.expect("want_upper was true");

        let (k10, k11) = aes256_keyexp_round::<0x10>(ks[9], ks[8], true);
        ks[10] = k10;
        ks[11] = k11.expect("want_upper was true");

        let (k12, k13) = aes256_keyexp_round::<0x20>(ks[11], ks[10], true);
        ks[12] = k12;
        ks[13] = k13.expect("want_upper was true");

        let (k14, _) = aes256_keyexp_round::<0x40>(ks[13], ks[12], false);
        ks[14] = k14;

        ks
    }
}

/// Expand `key` (16/24/32 bytes per `nk` = 4/6/8) into the encryption round
/// keys, dispatching to the AES-128/192/256 `AESKEYGENASSIST` ladder.
#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn expand_encryption_schedule(key: &[u8], nk: usize) -> [__m128i; MAX_ROUND_KEYS] {
    unsafe {
        let mut block = [0u8; 16];
        block.copy_from_slice(&key[..16]);
        let key_lower = load(block);

        match nk {
            4 => expand_key_128(key_lower),
            6 => {
                let mut upper_half = [0u8; 16];
                upper_half[..8].copy_from_slice(&key[16..24]);
                expand_key_192(key_lower, load(upper_half))
            }
            8 => {
                let mut upper = [0u8; 16];
                upper.copy_from_slice(&key[16..32]);
                expand_key_256(key_lower, load(upper))
            }
            _ => unreachable!("AesVariant only ever produces nk in {{4, 6, 8}}"),
        }
    }
}

/// Equivalent Inverse Cipher schedule (FIPS-197 §5.3.5): lets decryption use
/// `AESDEC`/`AESDECLAST` directly instead of re-deriving the straight
/// inverse cipher's round order.
#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn invert_schedule(enc: &[__m128i; MAX_ROUND_KEYS], nr: usize) -> [__m128i; MAX_ROUND_KEYS] {
    unsafe {
        let mut dec = [enc[0]; MAX_ROUND_KEYS];
        dec[nr] = enc[0];
        for i in 1..nr {
            dec[nr - i] = _mm_aesimc_si128(enc[i]);
        }
        dec[0] = enc[nr];
        dec
    }
}

#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn encrypt_reg(enc_ks: &[__m128i; MAX_ROUND_KEYS], nr: usize, block: __m128i) -> __m128i {
    unsafe {
        let mut state = _mm_xor_si128(block, enc_ks[0]);
        for round_key in enc_ks.iter().take(nr).skip(1) {
            state = _mm_aesenc_si128(state, *round_key);
        }
        _mm_aesenclast_si128(state, enc_ks[nr])
    }
}

#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn decrypt_reg(dec_ks: &[__m128i; MAX_ROUND_KEYS], nr: usize, block: __m128i) -> __m128i {
    unsafe {
        let mut state = _mm_xor_si128(block, dec_ks[0]);
        for round_key in dec_ks.iter().take(nr).skip(1) {
            state = _mm_aesdec_si128(state, *round_key);
        }
        _mm_aesdeclast_si128(state, dec_ks[nr])
    }
}

// ---------------------------------------------------------------------------
// CTR: byte-swapped SIMD counter, incremented in-register between blocks.
// ---------------------------------------------------------------------------

/// Full byte-order reversal of the 16-byte register: turns the big-endian
/// counter as loaded from memory into a little-endian-style value so
/// `_mm_add_epi8` can carry-propagate starting from its low (lowest-address)
/// byte, which after the swap is the counter's actual least-significant byte.
#[target_feature(enable = "ssse3")]
unsafe fn bswap(x: __m128i) -> __m128i {
    unsafe {
        let reverse = _mm_set_epi8(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);
        _mm_shuffle_epi8(x, reverse)
    }
}

/// Unsigned `_mm_cmplt_epi8` via the sign-bit-flip trick (`_mm_cmplt_epi8`
/// itself compares signed bytes).
#[target_feature(enable = "sse2")]
unsafe fn cmplt_epi8_unsigned(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let signbits = _mm_set1_epi8(0x80u8 as i8);
        _mm_cmplt_epi8(_mm_xor_si128(a, signbits), _mm_xor_si128(b, signbits))
    }
}

/// 128-bit addition as eight packed 8-bit lanes, propagating each lane's
/// carry into the next via the unsigned-overflow mask.
#[target_feature(enable = "sse2")]
unsafe fn m128i_add(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let sum = _mm_add_epi8(a, b);
        let overflowed = cmplt_epi8_unsigned(sum, a);
        let ones = _mm_set1_epi8(1);
        let carry = _mm_slli_si128::<1>(_mm_and_si128(overflowed, ones));
        _mm_add_epi8(sum, carry)
    }
}

#[target_feature(enable = "sse2")]
unsafe fn m128i_increment(a: __m128i) -> __m128i {
    unsafe {
        let mut one = [0u8; 16];
        one[0] = 1;
        m128i_add(a, load(one))
    }
}

#[target_feature(enable = "sse2", enable = "ssse3", enable = "aes")]
unsafe fn ctr_xcrypt_simd(
    enc_ks: &[__m128i; MAX_ROUND_KEYS],
    nr: usize,
    counter: [u8; 16],
    input: &[u8],
    output: &mut [u8],
) -> [u8; 16] {
    unsafe {
        debug_assert_eq!(input.len(), output.len());
        let mut iv_reg = bswap(load(counter));
        let mut offset = 0;
        while offset < input.len() {
            let keystream = store(encrypt_reg(enc_ks, nr, bswap(iv_reg)));
            let take = (input.len() - offset).min(16);
            for i in 0..take {
                output[offset + i] = input[offset + i] ^ keystream[i];
            }
            iv_reg = m128i_increment(iv_reg);
            offset += take;
        }
        store(bswap(iv_reg))
    }
}

/// Owns both the encryption and (equivalent-inverse-cipher) decryption
/// schedules and presents the hardware engine as a [`BlockCipher`].
pub(crate) struct Engine {
    enc_keys: [__m128i; MAX_ROUND_KEYS],
    dec_keys: [__m128i; MAX_ROUND_KEYS],
    nr: u8,
}

impl Engine {
    /// # Safety
    /// The caller must have confirmed `CpuCapability::has_aesni()` for the
    /// running CPU before calling this.
    #[allow(unsafe_code)]
    pub(crate) unsafe fn new(key: &[u8], nk: usize, nr: u8) -> Self {
        // SAFETY: forwarded from this fn's own safety contract.
        let enc_keys = unsafe { expand_encryption_schedule(key, nk) };
        // SAFETY: forwarded from this fn's own safety contract.
        let dec_keys = unsafe { invert_schedule(&enc_keys, nr as usize) };
        Self {
            enc_keys,
            dec_keys,
            nr,
        }
    }

    #[allow(unsafe_code)]
    pub(crate) fn ctr_xcrypt(&self, counter: [u8; 16], input: &[u8], output: &mut [u8]) -> [u8; 16] {
        // SAFETY: `Engine` is only constructed via `Engine::new`, whose own
        // safety contract requires AES-NI + SSE2 + SSSE3 to be present.
        unsafe { ctr_xcrypt_simd(&self.enc_keys, self.nr as usize, counter, input, output) }
    }
}

impl BlockCipher for Engine {
    #[allow(unsafe_code)]
    fn encrypt_block(&self, block: [u8; 16]) -> [u8; 16] {
        // SAFETY: see `Engine::new`.
        unsafe { store(encrypt_reg(&self.enc_keys, self.nr as usize, load(block))) }
    }

    #[allow(unsafe_code)]
    fn decrypt_block(&self, block: [u8; 16]) -> [u8; 16] {
        // SAFETY: see `Engine::new`.
        unsafe { store(decrypt_reg(&self.dec_keys, self.nr as usize, load(block))) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_aesni() -> bool {
        crate::cpu::probe().has_aesni()
    }

    #[test]
    fn fips197_appendix_b_single_block() {
        if !has_aesni() {
            return;
        }
        let key = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ];
        let plaintext = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let expected = [
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ];
        // SAFETY: gated on `has_aesni()` above.
        let engine = unsafe { Engine::new(&key, 4, 10) };
        let ciphertext = engine.encrypt_block(plaintext);
        assert_eq!(ciphertext, expected);
        assert_eq!(engine.decrypt_block(ciphertext), plaintext);
    }

    // FIPS-197 Appendix C.2 (AES-192) single block.
    #[test]
    fn aes192_ecb_matches_fips197_vector() {
        if !has_aesni() {
            return;
        }
        let key = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17,
        ];
        let plaintext = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let expected = [
            0xdd, 0xa9, 0x7c, 0xa4, 0x86, 0x4c, 0xdf, 0xe0, 0x6e, 0xaf, 0x70, 0xa0, 0xec, 0x0d,
            0x71, 0x91,
        ];
        // SAFETY: gated on `has_aesni()` above.
        let engine = unsafe { Engine::new(&key, 6, 12) };
        let ciphertext = engine.encrypt_block(plaintext);
        assert_eq!(ciphertext, expected);
        assert_eq!(engine.decrypt_block(ciphertext), plaintext);
    }

    // FIPS-197 Appendix C.3 (AES-256) single block.
    #[test]
    fn aes256_ecb_matches_fips197_vector() {
        if !has_aesni() {
            return;
        }
        let key = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b,
            0x1c, 0x1d, 0x1e, 0x1f,
        ];
        let plaintext = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let expected = [
            0x8e, 0xa2, 0xb7, 0xca, 0x51, 0x67, 0x45, 0xbf, 0xea, 0xfc, 0x49, 0x90, 0x4b, 0x49,
            0x60, 0x89,
        ];
        // SAFETY: gated on `has_aesni()` above.
        let engine = unsafe { Engine::new(&key, 8, 14) };
        let ciphertext = engine.encrypt_block(plaintext);
        assert_eq!(ciphertext, expected);
        assert_eq!(engine.decrypt_block(ciphertext), plaintext);
    }

    #[test]
    fn aes192_round_trips_arbitrary_key() {
        if !has_aesni() {
            return;
        }
        let key = [0x11u8; 24];
        // SAFETY: gated on `has_aesni()` above.
        let engine = unsafe { Engine::new(&key, 6, 12) };
        let block = [0x42u8; 16];
        let ciphertext = engine.encrypt_block(block);
        assert_eq!(engine.decrypt_block(ciphertext), block);
    }

    #[test]
    fn agrees_with_portable_engine_on_random_blocks() {
        if !has_aesni() {
            return;
        }
        let key = [0x5c; 16];
        // SAFETY: gated on `has_aesni()` above.
        let aesni = unsafe { Engine::new(&key, 4, 10) };
        let portable = crate::kernels::bitsliced::Engine::new(&key, 4, 10);
        let block = [7u8; 16];
        assert_eq!(aesni.encrypt_block(block), portable.encrypt_block(block));
    }

    // NIST SP 800-38A F.5.1 (AES-128 CTR), first two keystream blocks.
    #[test]
    fn ctr_matches_nist_vector() {
        if !has_aesni() {
            return;
        }
        let key = [
            0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf,
            0x4f, 0x3c,
        ];
        let iv = [
            0xf0, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8, 0xf9, 0xfa, 0xfb, 0xfc, 0xfd,
            0xfe, 0xff,
        ];
        let plaintext = [
            0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93,
            0x17, 0x2a,
        ];
        let expected = [
            0x87, 0x4d, 0x61, 0x91, 0xb6, 0x20, 0xe3, 0x26, 0x1b, 0xef, 0x68, 0x64, 0x99, 0x0d,
            0xb6, 0xce,
        ];
        // SAFETY: gated on `has_aesni()` above.
        let engine = unsafe { Engine::new(&key, 4, 10) };
        let mut ciphertext = [0u8; 16];
        engine.ctr_xcrypt(iv, &plaintext, &mut ciphertext);
        assert_eq!(ciphertext, expected);
    }

    #[test]
    fn ctr_partial_block_matches_padded_block() {
        if !has_aesni() {
            return;
        }
        let key = [0x2bu8; 16];
        // SAFETY: gated on `has_aesni()` above.
        let engine = unsafe { Engine::new(&key, 4, 10) };
        let counter = [0u8; 16];
        let data: Vec<u8> = (0..20u8).collect();

        let mut direct_out = vec![0u8; data.len()];
        engine.ctr_xcrypt(counter, &data, &mut direct_out);

        let mut padded_in = [0u8; 16];
        padded_in[..4].copy_from_slice(&data[16..]);
        let mut padded_out = [0u8; 16];
        let mut next = [0u8; 16];
        next[15] = 1;
        engine.ctr_xcrypt(next, &padded_in, &mut padded_out);

        assert_eq!(&direct_out[16..], &padded_out[..4]);
    }
}
