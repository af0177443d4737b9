//! FNV hashing used to pick a bucket for a key.
//!
//! Each byte is XORed into the accumulator before the multiply by the prime
//! (the FNV-1a ordering); arithmetic wraps.
//!
//! See <http://isthe.com/chongo/tech/comp/fnv/> for the constants. The
//! function is pure: no seed, no per-process randomness, so a key maps to
//! the same bucket for the whole lifetime of a table.

use core::hash::{BuildHasher, Hasher};

/// 64-bit FNV offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// 64-bit FNV prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[inline]
fn fnv_step(hash: u64, byte: u8) -> u64 {
    (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
}

/// Hash `data` with the FNV variant described above.
///
/// An empty slice reads nothing and returns [`FNV_OFFSET_BASIS`].
pub fn hash_from_data(data: &[u8]) -> u64 {
    if data.is_empty() {
        return FNV_OFFSET_BASIS;
    }
    data.iter().fold(FNV_OFFSET_BASIS, |h, &b| fnv_step(h, b))
}

/// Streaming form of [`hash_from_data`].
///
/// Successive `write` calls are equivalent to hashing the concatenation of
/// their inputs, so writing a key's bytes once yields `hash_from_data(key)`.
#[derive(Clone, Copy, Debug)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    pub const fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state = fnv_step(self.state, b);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// `BuildHasher` producing fresh [`FnvHasher`]s; the default for `Table`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildFnv;

impl BuildHasher for BuildFnv {
    type Hasher = FnvHasher;

    fn build_hasher(&self) -> Self::Hasher {
        FnvHasher::new()
    }
}
