//! The caller-owned cipher context.
use crate::engine::dispatcher::{get_best_kernel, Backend, Dispatch};
use crate::types::AesVariant;

/// A caller-owned AES context bound to one key and one backend.
///
/// `init` selects a backend (AES-NI if the CPU supports it, otherwise the
/// portable bitsliced engine) and computes its round-key schedule; every
/// later mode call dispatches through the function table bound at that
/// time, so the CPU capability check happens exactly once per context.
pub struct AesContext {
    variant: AesVariant,
    backend: Option<Backend>,
    dispatch: Option<Dispatch>,
}

impl AesContext {
    /// An empty, unusable context. Calling any mode operation before [`AesContext::init`]
    /// panics rather than operating on absent key material.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            variant: AesVariant::Aes128,
            backend: None,
            dispatch: None,
        }
    }

    /// Bind this context to `key`, probing the CPU and selecting a backend.
    ///
    /// `key` must be exactly `variant.key_bytes()` long.
    ///
    /// # Panics
    /// Panics if `key.len() != variant.key_bytes()`.
    pub fn init(&mut self, variant: AesVariant, key: &[u8]) {
        assert_eq!(
            key.len(),
            variant.key_bytes(),
            "key length {} does not match {:?} (expected {} bytes)",
            key.len(),
            variant,
            variant.key_bytes()
        );
        let (backend, dispatch, _name) = get_best_kernel(key, variant.nk(), variant.nr());
        self.variant = variant;
        self.backend = Some(backend);
        self.dispatch = Some(dispatch);
    }

    /// Which AES variant this context was initialized with.
    #[must_use]
    pub const fn variant(&self) -> AesVariant {
        self.variant
    }

    /// Name of the backend this context bound to at `init`, for diagnostics.
    ///
    /// # Panics
    /// Panics if the context has not been [`AesContext::init`]-ed.
    #[must_use]
    pub fn active_backend(&self) -> &'static str {
        match self.backend() {
            Backend::Bitsliced(_) => "bitsliced",
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::AesNi(_) => "aesni",
        }
    }

    #[track_caller]
    fn backend(&self) -> &Backend {
        self.backend
            .as_ref()
            .expect("AesContext used before init (call `init` first)")
    }

    #[track_caller]
    fn dispatch(&self) -> &Dispatch {
        self.dispatch
            .as_ref()
            .expect("AesContext used before init (call `init` first)")
    }

    /// ECB encryption. `input.len()` must be a multiple of 16; `output` must
    /// be the same length.
    pub fn ecb_encrypt(&self, input: &[u8], output: &mut [u8]) {
        (self.dispatch().ecb_encrypt)(self.backend(), input, output);
    }

    /// ECB decryption. `input.len()` must be a multiple of 16; `output` must
    /// be the same length.
    pub fn ecb_decrypt(&self, input: &[u8], output: &mut [u8]) {
        (self.dispatch().ecb_decrypt)(self.backend(), input, output);
    }

    /// CBC encryption. `input.len()` must be a multiple of 16; `output` must
    /// be the same length.
    pub fn cbc_encrypt(&self, iv: [u8; 16], input: &[u8], output: &mut [u8]) {
        (self.dispatch().cbc_encrypt)(self.backend(), iv, input, output);
    }

    /// CBC decryption. `input.len()` must be a multiple of 16; `output` must
    /// be the same length.
    pub fn cbc_decrypt(&self, iv: [u8; 16], input: &[u8], output: &mut [u8]) {
        (self.dispatch().cbc_decrypt)(self.backend(), iv, input, output);
    }

    /// CTR keystream XOR over `input` of any length, starting at counter
    /// value `iv`. Returns the counter value a follow-up call should be
    /// given as `iv` to continue the same stream.
    pub fn ctr_xcrypt(&self, iv: [u8; 16], input: &[u8], output: &mut [u8]) -> [u8; 16] {
        (self.dispatch().ctr_xcrypt)(self.backend(), iv, input, output)
    }
}

impl Default for AesContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "used before init")]
    fn mode_operation_before_init_panics() {
        let ctx = AesContext::new();
        let mut out = [0u8; 16];
        ctx.ecb_encrypt(&[0u8; 16], &mut out);
    }

    #[test]
    #[should_panic(expected = "key length")]
    fn init_rejects_wrong_key_length() {
        let mut ctx = AesContext::new();
        ctx.init(AesVariant::Aes128, &[0u8; 24]);
    }

    #[test]
    fn ecb_round_trips_after_init() {
        let mut ctx = AesContext::new();
        ctx.init(AesVariant::Aes128, &[0x2b; 16]);
        let plaintext = [0x11u8; 32];
        let mut ciphertext = [0u8; 32];
        ctx.ecb_encrypt(&plaintext, &mut ciphertext);
        let mut recovered = [0u8; 32];
        ctx.ecb_decrypt(&ciphertext, &mut recovered);
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn active_backend_reports_one_of_the_two_engines() {
        let mut ctx = AesContext::new();
        ctx.init(AesVariant::Aes128, &[0u8; 16]);
        assert!(["bitsliced", "aesni"].contains(&ctx.active_backend()));
    }
}
