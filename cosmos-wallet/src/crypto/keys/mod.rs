//! Key derivation and management
//!
//! Keys are derived along BIP-32 paths on the secp256k1 curve. Nothing is
//! cached: every call walks the full path from the seed.

mod curve;
mod derivation;

pub use curve::*;
pub use derivation::*;
