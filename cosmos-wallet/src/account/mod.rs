//! Account management functionality
//!
//! This module derives bech32 addresses from a mnemonic and provides the
//! [`Session`] type that signs and broadcasts on behalf of one mnemonic.

mod address;
mod session;

pub use address::*;
pub use session::*;
