//! CPU capability probe.
//!
//! Pure function of the running CPU; nothing here is cached in mutable
//! global state, so callers may probe as often as they like.

/// Boolean record of the x86 feature bits `init` cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuCapability {
    /// SSE is available.
    pub sse: bool,
    /// SSE2 is available.
    pub sse2: bool,
    /// SSSE3 is available.
    pub ssse3: bool,
    /// `PCLMULQDQ` is available.
    pub pclmulqdq: bool,
    /// AES-NI is available.
    pub aes: bool,
}

impl CpuCapability {
    /// Whether every feature the AES-NI engine needs is present.
    #[must_use]
    pub const fn has_aesni(self) -> bool {
        self.sse && self.sse2 && self.ssse3 && self.aes
    }
}

/// Probe the current CPU for the feature bits `init` needs to pick a backend.
///
/// # Std builds (x86/x86_64)
/// Queries CPUID leaf 01h at run time via [`std::is_x86_feature_detected`].
///
/// # `no_std` builds (x86/x86_64)
/// No run-time CPUID is available; features are read from whatever the
/// compiler was told to assume for the target via `target_feature`. This
/// mirrors committing to a fixed feature set ahead of time instead of
/// discovering it, the same tradeoff any `no_std` target makes.
///
/// # Non-x86
/// Every bit is `false`; the bitsliced engine is always selected.
#[must_use]
pub fn probe() -> CpuCapability {
    #[cfg(all(feature = "std", any(target_arch = "x86", target_arch = "x86_64")))]
    {
        CpuCapability {
            sse: std::is_x86_feature_detected!("sse"),
            sse2: std::is_x86_feature_detected!("sse2"),
            ssse3: std::is_x86_feature_detected!("ssse3"),
            pclmulqdq: std::is_x86_feature_detected!("pclmulqdq"),
            aes: std::is_x86_feature_detected!("aes"),
        }
    }

    #[cfg(all(not(feature = "std"), any(target_arch = "x86", target_arch = "x86_64")))]
    {
        CpuCapability {
            sse: cfg!(target_feature = "sse"),
            sse2: cfg!(target_feature = "sse2"),
            ssse3: cfg!(target_feature = "ssse3"),
            pclmulqdq: cfg!(target_feature = "pclmulqdq"),
            aes: cfg!(target_feature = "aes"),
        }
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        CpuCapability {
            sse: false,
            sse2: false,
            ssse3: false,
            pclmulqdq: false,
            aes: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_aesni_requires_all_four_bits() {
        let cap = CpuCapability {
            sse: true,
            sse2: true,
            ssse3: true,
            pclmulqdq: false,
            aes: true,
        };
        assert!(cap.has_aesni());

        let missing_ssse3 = CpuCapability {
            ssse3: false,
            ..cap
        };
        assert!(!missing_ssse3.has_aesni());
    }

    #[test]
    fn probe_runs_without_panicking() {
        let _ = probe();
    }
}
