//! ECB and CBC, implemented once and shared by both engines.
//!
//! Both modes only ever touch one block at a time with no cross-block state
//! that depends on *how* the block cipher is represented internally, so
//! there is nothing engine-specific to duplicate: they are generic over
//! [`BlockCipher`]. CTR is not here; its counter arithmetic is
//! representation-specific and lives per-engine (see
//! [`crate::kernels::bitsliced`] and [`crate::kernels::aesni`]).
use crate::kernels::BlockCipher;

/// `n % 16 != 0` for a mode that requires whole blocks.
#[track_caller]
fn assert_block_aligned(n: usize) {
    assert!(n % 16 == 0, "input length {n} is not a multiple of the AES block size (16)");
}

pub(crate) fn ecb_encrypt<E: BlockCipher>(engine: &E, input: &[u8], output: &mut [u8]) {
    assert_block_aligned(input.len());
    assert_eq!(input.len(), output.len());
    for (in_block, out_block) in input.chunks_exact(16).zip(output.chunks_exact_mut(16)) {
        let mut block = [0u8; 16];
        block.copy_from_slice(in_block);
        out_block.copy_from_slice(&engine.encrypt_block(block));
    }
}

pub(crate) fn ecb_decrypt<E: BlockCipher>(engine: &E, input: &[u8], output: &mut [u8]) {
    assert_block_aligned(input.len());
    assert_eq!(input.len(), output.len());
    for (in_block, out_block) in input.chunks_exact(16).zip(output.chunks_exact_mut(16)) {
        let mut block = [0u8; 16];
        block.copy_from_slice(in_block);
        out_block.copy_from_slice(&engine.decrypt_block(block));
    }
}

pub(crate) fn cbc_encrypt<E: BlockCipher>(engine: &E, iv: [u8; 16], input: &[u8], output: &mut [u8]) {
    assert_block_aligned(input.len());
    assert_eq!(input.len(), output.len());
    let mut prev = iv;
    for (in_block, out_block) in input.chunks_exact(16).zip(output.chunks_exact_mut(16)) {
        let mut block = [0u8; 16];
        for i in 0..16 {
            block[i] = in_block[i] ^ prev[i];
        }
        let ciphertext = engine.encrypt_block(block);
        out_block.copy_from_slice(&ciphertext);
        prev = ciphertext;
    }
}

pub(crate) fn cbc_decrypt<E: BlockCipher>(engine: &E, iv: [u8; 16], input: &[u8], output: &mut [u8]) {
    assert_block_aligned(input.len());
    assert_eq!(input.len(), output.len());
    let mut prev = iv;
    for (in_block, out_block) in input.chunks_exact(16).zip(output.chunks_exact_mut(16)) {
        let mut ciphertext = [0u8; 16];
        ciphertext.copy_from_slice(in_block);
        let decrypted = engine.decrypt_block(ciphertext);
        for i in 0..16 {
            out_block[i] = decrypted[i] ^ prev[i];
        }
        prev = ciphertext;
    }
}
