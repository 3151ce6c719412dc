use core::hash::{BuildHasherDefault, Hasher};

// FNV constants
const FNV_PRIME_64  : u64 = 0x00000100000001B3;
const FNV_OFFSET_64 : u64 = 0xcbf29ce484222325;

/// 64-bit Fowler-Noll-Vo a hash
#[derive(Clone, Copy, Debug)]
pub struct FNVa64(u64);

impl FNVa64 {
    pub const fn new() -> Self {
        Self(FNV_OFFSET_64)
    }
}

impl Default for FNVa64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FNVa64 {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= *byte as u64;
            self.0 = self.0.wrapping_mul(FNV_PRIME_64);
        }
    }
}

/// `BuildHasher` creating [`FNVa64`] hashers, for use with `HashMap` and `HashSet`.
pub type FnvBuildHasher = BuildHasherDefault<FNVa64>;
