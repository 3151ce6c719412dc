mod fnv;

pub use fnv::*;
